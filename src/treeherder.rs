//! Treeherder API client

use crate::catalog::{Framework, Repository};
use crate::data::{ComparisonResultItem, RevisionSummary};
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Production Treeherder instance
pub const TREEHERDER_BASE_URL: &str = "https://treeherder.mozilla.org";

/// Interval, in seconds, over which Treeherder aggregates comparison data
pub const COMPARE_INTERVAL_SECS: u64 = 86400;

/// A completed HTTP exchange, reduced to what the client needs
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// Reason phrase of the status (e.g. "Internal Server Error")
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues GET requests on behalf of [`TreeherderClient`]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<HttpResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn get(&self, url: &Url) -> Result<HttpResponse> {
        (**self).get(url).await
    }
}

/// Transport backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(user_agent: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            body: response.text().await?,
        })
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: TREEHERDER_BASE_URL.to_string(),
            user_agent: concat!("perfcompare/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Parameters of a single base/new comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareQuery<'a> {
    pub base_repository: Repository,
    pub base_revision: &'a str,
    pub new_repository: Repository,
    pub new_revision: &'a str,
    pub framework: Framework,
}

/// Filters for the push listing. `author` takes precedence over `hash`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentRevisionsParams {
    pub repository: Repository,
    pub hash: Option<String>,
    pub author: Option<String>,
}

impl RecentRevisionsParams {
    pub fn new(repository: Repository) -> Self {
        Self {
            repository,
            hash: None,
            author: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PushListResponse {
    results: Vec<RevisionSummary>,
}

/// Treeherder API client
#[derive(Debug, Clone)]
pub struct TreeherderClient<T = ReqwestTransport> {
    transport: T,
    base_url: Url,
}

impl TreeherderClient<ReqwestTransport> {
    /// Create a client talking to Treeherder over HTTP
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config.user_agent)?;
        Self::with_transport(&config.base_url, transport)
    }
}

impl<T: Transport> TreeherderClient<T> {
    /// Create a client with a custom transport
    pub fn with_transport(base_url: &str, transport: T) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::UrlError(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        Ok(Self {
            transport,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of `/api/perfcompare/results/` for one comparison
    pub fn compare_results_url(&self, query: &CompareQuery<'_>) -> Result<Url> {
        let mut url = self.endpoint(&["api", "perfcompare", "results"]);
        url.query_pairs_mut()
            .append_pair("base_repository", query.base_repository.as_str())
            .append_pair("base_revision", query.base_revision)
            .append_pair("new_repository", query.new_repository.as_str())
            .append_pair("new_revision", query.new_revision)
            .append_pair("framework", &query.framework.id().to_string())
            .append_pair("interval", &COMPARE_INTERVAL_SECS.to_string())
            .append_pair("no_subtests", "true");
        Ok(url)
    }

    /// URL of `/api/project/{repository}/push/`, filtered by author, then
    /// by hash, or listing the latest pushes without review bots.
    ///
    /// Filter values are encoded like `encodeURIComponent` (a space is `%20`).
    pub fn recent_revisions_url(&self, params: &RecentRevisionsParams) -> Result<Url> {
        let mut url = self.endpoint(&["api", "project", params.repository.as_str(), "push"]);

        let author = params.author.as_deref().filter(|a| !a.is_empty());
        let hash = params.hash.as_deref().filter(|h| !h.is_empty());
        let query = match (author, hash) {
            (Some(author), _) => format!("author={}", encode_uri_component(author)),
            (None, Some(hash)) => format!("revision={}", encode_uri_component(hash)),
            (None, None) => "hide_reviewbot_pushes=true".to_string(),
        };
        url.set_query(Some(&query));
        Ok(url)
    }

    /// `segments` appended to the base URL's path, with a trailing slash
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments).push("");
        }
        url
    }

    /// Fetch the comparison results between two revisions
    pub async fn fetch_compare_results(
        &self,
        query: &CompareQuery<'_>,
    ) -> Result<Vec<ComparisonResultItem>> {
        let url = self.compare_results_url(query)?;
        let results: Vec<ComparisonResultItem> = self.get_json(&url).await?;
        debug!(
            "Got {} comparison results for {} against {}",
            results.len(),
            query.new_revision,
            query.base_revision
        );
        Ok(results)
    }

    /// Fetch recent pushes of a repository
    pub async fn fetch_recent_revisions(
        &self,
        params: &RecentRevisionsParams,
    ) -> Result<Vec<RevisionSummary>> {
        let url = self.recent_revisions_url(params)?;
        let response: PushListResponse = self.get_json(&url).await?;
        Ok(response.results)
    }

    async fn get_json<R: DeserializeOwned>(&self, url: &Url) -> Result<R> {
        debug!("GET {}", url);
        let response = self.transport.get(url).await?;
        let body = check_response(response)?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Percent-encode a query value the way JavaScript's `encodeURIComponent`
/// does: only `A-Z a-z 0-9 - _ . ! ~ * ' ( )` stay as-is.
pub fn encode_uri_component(value: &str) -> String {
    // Form encoding differs only on space and on `! ~ ' ( )`; a literal `+`
    // is already `%2B`, so every `+` in the output stands for a space.
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
        .replace("%21", "!")
        .replace("%7E", "~")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
}

/// Turn a non-2xx response into [`Error::Remote`], returning the body otherwise.
///
/// A 400 carries Treeherder's explanation in its body; other statuses are
/// reported by code and reason phrase.
pub fn check_response(response: HttpResponse) -> Result<String> {
    if response.is_success() {
        return Ok(response.body);
    }

    debug!("Treeherder answered with status {}", response.status);
    let message = if response.status == 400 {
        response.body
    } else {
        format!("({}) {}", response.status, response.status_text)
    };

    Err(Error::Remote {
        status: response.status,
        message,
    })
}
