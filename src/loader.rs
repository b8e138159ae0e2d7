//! Loading everything a comparison view needs from a raw query

use crate::data::{ComparisonResultItem, RevisionSummary};
use crate::error::Result;
use crate::fixtures::fetch_fake_compare_results;
use crate::params::{validate, ComparisonRequest, RawParams, RevisionTarget};
use crate::treeherder::{
    CompareQuery, RecentRevisionsParams, ReqwestTransport, Transport, TreeherderClient,
};
use futures::future::try_join_all;
use serde::Serialize;
use tracing::{debug, info};

/// Results of one new revision against the base
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevisionComparison {
    pub target: RevisionTarget,
    pub results: Vec<ComparisonResultItem>,
}

/// A validated request and the data fetched for it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedComparison {
    pub request: ComparisonRequest,
    /// Push of the base revision, when Treeherder knows it
    pub base: Option<RevisionSummary>,
    /// One entry per target, in request order
    pub comparisons: Vec<RevisionComparison>,
}

/// Validates comparison queries and fetches their results
#[derive(Debug, Clone)]
pub struct Loader<T = ReqwestTransport> {
    client: TreeherderClient<T>,
    fake: bool,
}

impl<T: Transport> Loader<T> {
    pub fn new(client: TreeherderClient<T>) -> Self {
        Self {
            client,
            fake: false,
        }
    }

    /// Serve results from the bundled fixtures instead of Treeherder
    pub fn with_fake_results(mut self, fake: bool) -> Self {
        self.fake = fake;
        self
    }

    pub fn client(&self) -> &TreeherderClient<T> {
        &self.client
    }

    /// Validate a raw query string and load it
    pub async fn load_query(&self, query: &str) -> Result<LoadedComparison> {
        self.load(&RawParams::from_query(query)).await
    }

    /// Validate `raw`, then fetch every target and the base push concurrently.
    ///
    /// Nothing is requested when validation fails. The first failing fetch
    /// aborts the load.
    pub async fn load(&self, raw: &RawParams) -> Result<LoadedComparison> {
        let request = validate(raw)?;
        info!(
            "Comparing {} on {} with {} revision(s)",
            request.base_revision,
            request.base_repository,
            request.new.len()
        );

        let fetches = request
            .new
            .iter()
            .map(|target| self.results_for(&request, target));
        let (results, base) = tokio::try_join!(try_join_all(fetches), self.base_push(&request))?;

        let comparisons = request
            .new
            .iter()
            .cloned()
            .zip(results)
            .map(|(target, results)| RevisionComparison { target, results })
            .collect();

        Ok(LoadedComparison {
            request,
            base,
            comparisons,
        })
    }

    async fn results_for(
        &self,
        request: &ComparisonRequest,
        target: &RevisionTarget,
    ) -> Result<Vec<ComparisonResultItem>> {
        if self.fake {
            debug!("Using fixture results for {}", target.revision);
            return fetch_fake_compare_results(&target.revision);
        }

        let query = CompareQuery {
            base_repository: request.base_repository,
            base_revision: &request.base_revision,
            new_repository: target.repository,
            new_revision: &target.revision,
            framework: request.framework,
        };
        self.client.fetch_compare_results(&query).await
    }

    async fn base_push(&self, request: &ComparisonRequest) -> Result<Option<RevisionSummary>> {
        if self.fake {
            return Ok(None);
        }

        let params = RecentRevisionsParams {
            repository: request.base_repository,
            hash: Some(request.base_revision.clone()),
            author: None,
        };
        let pushes = self.client.fetch_recent_revisions(&params).await?;
        Ok(pushes.into_iter().next())
    }
}
