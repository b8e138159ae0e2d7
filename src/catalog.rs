//! Repositories and performance frameworks known to Treeherder

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A repository tracked by the performance-data service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Repository {
    MozillaCentral,
    Try,
    MozillaBeta,
    MozillaRelease,
    Autoland,
    Fenix,
}

impl Repository {
    /// Every repository, in the order used by error messages
    pub const ALL: [Repository; 6] = [
        Repository::MozillaCentral,
        Repository::Try,
        Repository::MozillaBeta,
        Repository::MozillaRelease,
        Repository::Autoland,
        Repository::Fenix,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Repository::MozillaCentral => "mozilla-central",
            Repository::Try => "try",
            Repository::MozillaBeta => "mozilla-beta",
            Repository::MozillaRelease => "mozilla-release",
            Repository::Autoland => "autoland",
            Repository::Fenix => "fenix",
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Repository {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Repository::ALL
            .iter()
            .copied()
            .find(|repo| repo.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// A benchmark framework, identified on the wire by its numeric id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Framework {
    #[default]
    Talos,
    BuildMetrics,
    Awsy,
    PlatformMicrobench,
    Raptor,
    JsBench,
    Devtools,
    Browsertime,
    Mozperftest,
    Fxrecord,
}

impl Framework {
    pub const ALL: [Framework; 10] = [
        Framework::Talos,
        Framework::BuildMetrics,
        Framework::Awsy,
        Framework::PlatformMicrobench,
        Framework::Raptor,
        Framework::JsBench,
        Framework::Devtools,
        Framework::Browsertime,
        Framework::Mozperftest,
        Framework::Fxrecord,
    ];

    /// Treeherder's id for this framework
    pub fn id(&self) -> u32 {
        match self {
            Framework::Talos => 1,
            Framework::BuildMetrics => 2,
            Framework::Awsy => 4,
            Framework::PlatformMicrobench => 6,
            Framework::Raptor => 10,
            Framework::JsBench => 11,
            Framework::Devtools => 12,
            Framework::Browsertime => 13,
            Framework::Mozperftest => 15,
            Framework::Fxrecord => 16,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Framework::Talos => "talos",
            Framework::BuildMetrics => "build_metrics",
            Framework::Awsy => "awsy",
            Framework::PlatformMicrobench => "platform_microbench",
            Framework::Raptor => "raptor",
            Framework::JsBench => "js-bench",
            Framework::Devtools => "devtools",
            Framework::Browsertime => "browsertime",
            Framework::Mozperftest => "mozperftest",
            Framework::Fxrecord => "fxrecord",
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        Framework::ALL.iter().copied().find(|f| f.id() == id)
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u32> for Framework {
    type Error = String;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        Framework::from_id(id).ok_or_else(|| format!("unknown framework id {}", id))
    }
}

impl From<Framework> for u32 {
    fn from(framework: Framework) -> Self {
        framework.id()
    }
}
