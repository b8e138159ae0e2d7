//! Markdown report of a loaded comparison

use crate::data::RevisionSummary;
use crate::error::Result;
use crate::loader::LoadedComparison;
use minijinja::{context, Environment};
use serde::Serialize;

const REPORT_TEMPLATE: &str = r#"## Performance comparison

**Base:** {{ base_repository }} `{{ base_revision }}`{% if base_author %} by {{ base_author }}{% endif %}{% if base_date %} ({{ base_date }}){% endif %}
**Framework:** {{ framework }}
{% for comparison in comparisons %}
### {{ comparison.repository }} `{{ comparison.revision }}`
{% if comparison.rows %}
| Platform | Mean difference | Delta | Confidence | Runs |
|----------|-----------------|-------|------------|------|
{% for row in comparison.rows -%}
| {{ row.platform }} | {{ row.delta_percentage }} | {{ row.delta_value }} | {{ row.confidence }} | {{ row.runs }} |
{% endfor %}
{%- else %}
No results.
{% endif %}
{%- endfor %}
"#;

#[derive(Debug, Serialize)]
struct ComparisonSection {
    repository: String,
    revision: String,
    rows: Vec<ReportRow>,
}

#[derive(Debug, Serialize)]
struct ReportRow {
    platform: String,
    delta_percentage: String,
    delta_value: String,
    confidence: String,
    runs: String,
}

/// Render a loaded comparison as Markdown
pub fn render_markdown(loaded: &LoadedComparison) -> Result<String> {
    let mut env = Environment::new();
    env.add_template("report", REPORT_TEMPLATE)?;
    let template = env.get_template("report")?;

    let comparisons: Vec<ComparisonSection> = loaded
        .comparisons
        .iter()
        .map(|comparison| ComparisonSection {
            repository: comparison.target.repository.to_string(),
            revision: short_hash(&comparison.target.revision),
            rows: comparison
                .results
                .iter()
                .map(|item| ReportRow {
                    platform: item.platform().to_string(),
                    delta_percentage: format!("{:+.2}%", item.delta_percentage()),
                    delta_value: format!("{:+.2}", item.delta_value()),
                    confidence: item.confidence_text().unwrap_or("-").to_string(),
                    runs: if item.shows_distribution() {
                        format!("{} vs {}", item.base_runs().len(), item.new_runs().len())
                    } else {
                        "single run".to_string()
                    },
                })
                .collect(),
        })
        .collect();

    let request = &loaded.request;
    let base_author = loaded.base.as_ref().map(|b| b.author.clone());
    let base_date = loaded.base.as_ref().and_then(format_push_date);

    let markdown = template.render(context! {
        base_repository => request.base_repository.to_string(),
        base_revision => short_hash(&request.base_revision),
        base_author => base_author,
        base_date => base_date,
        framework => format!("{} ({})", request.framework, request.framework.id()),
        comparisons => comparisons,
    })?;

    Ok(markdown)
}

/// Render recent pushes as a Markdown list
pub fn render_revisions(revisions: &[RevisionSummary]) -> String {
    if revisions.is_empty() {
        return "No pushes found.".to_string();
    }

    revisions
        .iter()
        .map(|push| {
            let date = format_push_date(push).unwrap_or_else(|| "unknown date".to_string());
            match push.title() {
                Some(title) => format!(
                    "- `{}` {} ({}): {}",
                    short_hash(&push.revision),
                    push.author,
                    date,
                    title
                ),
                None => format!("- `{}` {} ({})", short_hash(&push.revision), push.author, date),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_push_date(push: &RevisionSummary) -> Option<String> {
    push.pushed_at()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

fn short_hash(revision: &str) -> String {
    revision.chars().take(12).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Framework, Repository};
    use crate::fixtures::fetch_fake_compare_results;
    use crate::loader::RevisionComparison;
    use crate::params::{ComparisonRequest, RevisionTarget};
    use serde_json::Map;

    fn loaded(results_key: Option<&str>) -> LoadedComparison {
        let target = RevisionTarget {
            repository: Repository::Try,
            revision: "bb6a5e451dace3b9c7be42d24c9272738d73e6db".to_string(),
        };
        let results = results_key
            .map(|key| fetch_fake_compare_results(key).unwrap())
            .unwrap_or_default();

        LoadedComparison {
            request: ComparisonRequest {
                base_repository: Repository::MozillaCentral,
                base_revision: "9d50665254899d8431813bdc04178e6006ce6d59".to_string(),
                new: vec![target.clone()],
                framework: Framework::Talos,
            },
            base: Some(RevisionSummary {
                id: 1,
                revision: "9d50665254899d8431813bdc04178e6006ce6d59".to_string(),
                author: "johncleese@python.com".to_string(),
                push_timestamp: 0,
                repository_id: 1,
                revisions: Vec::new(),
                extra: Map::new(),
            }),
            comparisons: vec![RevisionComparison { target, results }],
        }
    }

    #[test]
    fn test_render_markdown_with_results() {
        let markdown =
            render_markdown(&loaded(Some("bb6a5e451dace3b9c7be42d24c9272738d73e6db"))).unwrap();

        assert!(markdown.contains("**Base:** mozilla-central `9d5066525489` by johncleese@python.com (1970-01-01 00:00:00 UTC)"));
        assert!(markdown.contains("**Framework:** talos (1)"));
        assert!(markdown.contains("### try `bb6a5e451dac`"));
        assert!(markdown.contains("| linux1804-64-shippable-qr | -1.42% | -17.75 | Medium | 4 vs 4 |"));
        assert!(markdown.contains("| windows10-64-shippable-qr | +2.63% | +0.09 | - | single run |"));
    }

    #[test]
    fn test_render_markdown_without_results() {
        let markdown = render_markdown(&loaded(None)).unwrap();
        assert!(markdown.contains("No results."));
        assert!(!markdown.contains("| Platform |"));
    }

    #[test]
    fn test_render_revisions() {
        assert_eq!(render_revisions(&[]), "No pushes found.");

        let push = loaded(None).base.unwrap();
        let listing = render_revisions(&[push]);
        assert_eq!(
            listing,
            "- `9d5066525489` johncleese@python.com (1970-01-01 00:00:00 UTC)"
        );
    }
}
