//! Canned comparison results, for demos and offline use

use crate::data::ComparisonResultItem;
use crate::error::{Error, Result};

/// Fixtures compiled into the binary, keyed by commit hash
const FIXTURES: &[(&str, &str)] = &[
    (
        "bb6a5e451dace3b9c7be42d24c9272738d73e6db",
        include_str!("../fixtures/bb6a5e451dace3b9c7be42d24c9272738d73e6db.json"),
    ),
    (
        "9d50665254899d8431813bdc04178e6006ce6d59",
        include_str!("../fixtures/9d50665254899d8431813bdc04178e6006ce6d59.json"),
    ),
];

/// Commit hashes that have a fixture
pub fn fixture_keys() -> impl Iterator<Item = &'static str> {
    FIXTURES.iter().map(|(key, _)| *key)
}

/// Comparison results stored for `commit_hash`, without touching the network
pub fn fetch_fake_compare_results(commit_hash: &str) -> Result<Vec<ComparisonResultItem>> {
    let (_, json) = FIXTURES
        .iter()
        .find(|(key, _)| *key == commit_hash)
        .ok_or_else(|| Error::FixtureNotFound(commit_hash.to_string()))?;

    Ok(serde_json::from_str(json)?)
}
