//! Validation of the `/compare-results/` query parameters

use crate::catalog::{Framework, Repository};
use crate::error::{Error, Param, Result};
use serde::Serialize;

/// Raw query parameters, before any validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawParams {
    pub base_rev: Option<String>,
    pub base_repo: Option<String>,
    pub new_revs: Vec<String>,
    pub new_repos: Vec<String>,
    pub framework: Option<String>,
}

impl RawParams {
    /// Collect parameters from a query string.
    ///
    /// Accepts `baseRev=...&...`, `?baseRev=...` or any URL carrying such a
    /// query, e.g. `/compare-results/?baseRev=...`. Unknown keys are ignored.
    /// For single-valued keys the first occurrence wins.
    pub fn from_query(input: &str) -> Self {
        let query = match input.find('?') {
            Some(idx) => &input[idx + 1..],
            None => input,
        };
        let query = query.split('#').next().unwrap_or("");

        let mut raw = RawParams::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let value = value.into_owned();
            match key.as_ref() {
                "baseRev" => set_once(&mut raw.base_rev, value),
                "baseRepo" => set_once(&mut raw.base_repo, value),
                "framework" => set_once(&mut raw.framework, value),
                "newRev" => raw.new_revs.push(value),
                "newRepo" => raw.new_repos.push(value),
                _ => {}
            }
        }
        raw
    }
}

fn set_once(slot: &mut Option<String>, value: String) {
    if slot.is_none() {
        *slot = Some(value);
    }
}

/// One side of a comparison against the base revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevisionTarget {
    pub repository: Repository,
    pub revision: String,
}

/// A validated comparison request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRequest {
    pub base_repository: Repository,
    pub base_revision: String,
    pub new: Vec<RevisionTarget>,
    pub framework: Framework,
}

impl ComparisonRequest {
    /// Validate a raw query string, see [`RawParams::from_query`]
    pub fn from_query(input: &str) -> Result<Self> {
        validate(&RawParams::from_query(input))
    }
}

/// Validate raw parameters, reporting only the first problem found.
///
/// Checks run in this order: base revision present, base repository
/// present, as many `newRepo` as `newRev`, base repository known, every new
/// repository known, framework numeric, framework known.
pub fn validate(raw: &RawParams) -> Result<ComparisonRequest> {
    let base_revision = non_empty(&raw.base_rev).ok_or(Error::MissingParameter(Param::BaseRev))?;
    let base_repo = non_empty(&raw.base_repo).ok_or(Error::MissingParameter(Param::BaseRepo))?;

    if raw.new_repos.len() != raw.new_revs.len() {
        return Err(Error::ParameterCountMismatch {
            left: Param::NewRepo,
            right: Param::NewRev,
        });
    }

    let base_repository = parse_repository(Param::BaseRepo, base_repo)?;
    let new_repositories = raw
        .new_repos
        .iter()
        .map(|repo| parse_repository(Param::NewRepo, repo))
        .collect::<Result<Vec<_>>>()?;

    let framework = match non_empty(&raw.framework) {
        Some(value) => parse_framework(value)?,
        None => Framework::default(),
    };

    let new = if new_repositories.is_empty() {
        vec![RevisionTarget {
            repository: base_repository,
            revision: base_revision.to_string(),
        }]
    } else {
        new_repositories
            .into_iter()
            .zip(&raw.new_revs)
            .map(|(repository, revision)| RevisionTarget {
                repository,
                revision: revision.clone(),
            })
            .collect()
    };

    Ok(ComparisonRequest {
        base_repository,
        base_revision: base_revision.to_string(),
        new,
        framework,
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_repository(param: Param, value: &str) -> Result<Repository> {
    value
        .parse::<Repository>()
        .map_err(|value| Error::UnknownEnumValue { param, value })
}

/// A framework must be a plain base-10 integer: surrounding spaces,
/// decimals (`2.0`) and exponents (`1e1`) are `NotANumber`. Integers
/// outside the catalog, negatives included, are unknown values.
fn parse_framework(value: &str) -> Result<Framework> {
    let id: i64 = value.parse().map_err(|_| Error::NotANumber {
        param: Param::Framework,
        value: value.to_string(),
    })?;

    u32::try_from(id)
        .ok()
        .and_then(Framework::from_id)
        .ok_or_else(|| Error::UnknownEnumValue {
            param: Param::Framework,
            value: value.to_string(),
        })
}
