//! Data structures returned by the Treeherder API

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row of a comparison between a base and a new revision.
///
/// The object sent by the service is kept verbatim and serialized back
/// unchanged; the fields used here are checked and read once on decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct ComparisonResultItem {
    platform: String,
    delta_percentage: f64,
    delta_value: f64,
    confidence_text: Option<String>,
    base_runs: Vec<f64>,
    new_runs: Vec<f64>,
    raw: Map<String, Value>,
}

impl ComparisonResultItem {
    /// Platform the tests ran on (e.g. "linux1804-64-shippable-qr")
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Difference between the means, in percent
    pub fn delta_percentage(&self) -> f64 {
        self.delta_percentage
    }

    /// Difference between the means, in the test's unit
    pub fn delta_value(&self) -> f64 {
        self.delta_value
    }

    /// Human readable confidence ("Low", "Medium", "High")
    pub fn confidence_text(&self) -> Option<&str> {
        self.confidence_text.as_deref()
    }

    /// Individual measurements for the base revision
    pub fn base_runs(&self) -> &[f64] {
        &self.base_runs
    }

    /// Individual measurements for the new revision
    pub fn new_runs(&self) -> &[f64] {
        &self.new_runs
    }

    /// Any field of the row, as sent by the service
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.raw
    }

    /// Whether there are enough runs to draw a distribution.
    ///
    /// With a single run on both sides only a summary makes sense.
    pub fn shows_distribution(&self) -> bool {
        self.base_runs.len() > 1 || self.new_runs.len() > 1
    }
}

impl TryFrom<Map<String, Value>> for ComparisonResultItem {
    type Error = String;

    fn try_from(raw: Map<String, Value>) -> Result<Self, Self::Error> {
        let platform = match raw.get("platform") {
            Some(Value::String(platform)) => platform.clone(),
            _ => return Err("missing or non-string field `platform`".to_string()),
        };
        let confidence_text = match raw.get("confidence_text") {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(text.clone()),
            Some(_) => return Err("field `confidence_text` is not a string".to_string()),
        };

        Ok(Self {
            platform,
            delta_percentage: number_field(&raw, "delta_percentage")?,
            delta_value: number_field(&raw, "delta_value")?,
            confidence_text,
            base_runs: runs_field(&raw, "base_runs")?,
            new_runs: runs_field(&raw, "new_runs")?,
            raw,
        })
    }
}

impl From<ComparisonResultItem> for Map<String, Value> {
    fn from(item: ComparisonResultItem) -> Self {
        item.raw
    }
}

fn number_field(raw: &Map<String, Value>, key: &str) -> Result<f64, String> {
    raw.get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| format!("missing or non-numeric field `{}`", key))
}

// Absent or null run lists are empty.
fn runs_field(raw: &Map<String, Value>, key: &str) -> Result<Vec<f64>, String> {
    match raw.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(values)) => values
            .iter()
            .map(|v| {
                v.as_f64()
                    .ok_or_else(|| format!("field `{}` holds a non-numeric run", key))
            })
            .collect(),
        Some(_) => Err(format!("field `{}` is not an array", key)),
    }
}

/// A push to a repository, as listed by `/api/project/{repo}/push/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RevisionSummary {
    pub id: u64,
    /// Hash of the push head
    pub revision: String,
    pub author: String,
    /// Unix timestamp, in seconds
    pub push_timestamp: i64,
    pub repository_id: u32,
    /// Individual commits of the push
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub revisions: Vec<CommitSummary>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RevisionSummary {
    /// When the push happened
    pub fn pushed_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.push_timestamp, 0).single()
    }

    /// First line of the head commit message, if the service sent one
    pub fn title(&self) -> Option<&str> {
        self.revisions
            .first()
            .and_then(|c| c.comments.lines().next())
    }
}

/// A single commit inside a push
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommitSummary {
    pub result_set_id: u64,
    pub repository_id: u32,
    pub revision: String,
    pub author: String,
    pub comments: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn item(base_runs: Value, new_runs: Value) -> ComparisonResultItem {
        serde_json::from_value(json!({
            "platform": "linux",
            "delta_percentage": 1.5,
            "delta_value": 3,
            "confidence_text": "Low",
            "base_runs": base_runs,
            "new_runs": new_runs
        }))
        .unwrap()
    }

    #[test]
    fn test_shows_distribution() {
        assert!(!item(json!([1]), json!([2.0])).shows_distribution());
        assert!(!item(json!([]), json!(null)).shows_distribution());
        assert!(item(json!([1.0, 2.0]), json!([2.0])).shows_distribution());
        assert!(item(json!([1]), json!([2, 3])).shows_distribution());
    }

    #[test]
    fn test_result_item_accessors() {
        let item = item(json!([100, 102.5]), json!([105]));
        assert_eq!(item.platform(), "linux");
        assert_eq!(item.delta_percentage(), 1.5);
        assert_eq!(item.delta_value(), 3.0);
        assert_eq!(item.confidence_text(), Some("Low"));
        assert_eq!(item.base_runs(), &[100.0, 102.5]);
        assert_eq!(item.new_runs(), &[105.0]);
    }

    #[test]
    fn test_result_item_keeps_unknown_fields() {
        let value = json!({
            "platform": "windows10-64-shippable-qr",
            "delta_percentage": -2.36,
            "delta_value": -8.5,
            "confidence_text": null,
            "base_runs": [360.0, 362.5],
            "new_runs": [352.0],
            "suite": "tp5n",
            "test": "responsiveness",
            "is_regression": false
        });

        let decoded: ComparisonResultItem = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(decoded.get("suite"), Some(&json!("tp5n")));
        assert_eq!(decoded.confidence_text(), None);
        assert_eq!(serde_json::to_value(&decoded).unwrap(), value);
    }

    #[test]
    fn test_result_item_reencodes_integers_and_missing_fields_as_sent() {
        let body = r#"[{"platform":"linux","delta_percentage":2,"delta_value":5,"base_runs":[100,102],"new_runs":[105]}]"#;

        let decoded: Vec<ComparisonResultItem> = serde_json::from_str(body).unwrap();
        assert_eq!(decoded[0].confidence_text(), None);
        assert_eq!(decoded[0].delta_percentage(), 2.0);
        let sent: Value = serde_json::from_str(body).unwrap();
        assert_eq!(serde_json::to_value(&decoded).unwrap(), sent);
        assert!(serde_json::to_string(&decoded).unwrap().contains(r#""base_runs":[100,102]"#));
    }

    #[test]
    fn test_result_item_rejects_malformed_rows() {
        let missing_platform = json!({"delta_percentage": 1, "delta_value": 1});
        assert!(serde_json::from_value::<ComparisonResultItem>(missing_platform).is_err());

        let bad_runs = json!({
            "platform": "linux",
            "delta_percentage": 1,
            "delta_value": 1,
            "base_runs": ["fast"]
        });
        assert!(serde_json::from_value::<ComparisonResultItem>(bad_runs).is_err());
    }

    #[test]
    fn test_revision_summary_timestamp_and_title() {
        let summary: RevisionSummary = serde_json::from_value(json!({
            "id": 1,
            "revision": "coconut",
            "author": "johncleese@python.com",
            "push_timestamp": 1_666_000_000,
            "repository_id": 4,
            "revisions": [{
                "result_set_id": 1,
                "repository_id": 4,
                "revision": "coconut",
                "author": "johncleese@python.com",
                "comments": "you've got no arms left!\n\nSecond line"
            }]
        }))
        .unwrap();

        assert_eq!(summary.title(), Some("you've got no arms left!"));
        assert_eq!(summary.pushed_at().unwrap().timestamp(), 1_666_000_000);
    }
}
