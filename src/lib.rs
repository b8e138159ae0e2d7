//! perfcompare - compare Treeherder performance results between revisions
//!
//! This library validates the parameters of a comparison, fetches the
//! results and push metadata from Treeherder, and shapes them for display.
//!
//! # Features
//!
//! - Strict validation of `/compare-results/` query parameters, reporting
//!   exactly one error per invalid query
//! - Closed catalogs of repositories and performance frameworks
//! - Async Treeherder client with a pluggable transport
//! - Concurrent loading of several new revisions against one base
//! - Bundled fixtures for offline use
//! - Markdown reports
//!
//! # Example
//!
//! ```no_run
//! use perfcompare::{loader::Loader, report, treeherder::{ClientConfig, TreeherderClient}};
//!
//! # async fn run() -> perfcompare::Result<()> {
//! let client = TreeherderClient::new(&ClientConfig::default())?;
//! let loader = Loader::new(client);
//!
//! let loaded = loader
//!     .load_query("/compare-results/?baseRev=spam&baseRepo=mozilla-central&newRev=eggs&newRepo=try&framework=1")
//!     .await?;
//! println!("{}", report::render_markdown(&loaded)?);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod data;
pub mod error;
pub mod fixtures;
pub mod loader;
pub mod params;
pub mod report;
pub mod treeherder;

pub use catalog::{Framework, Repository};
pub use error::{Error, Param, Result};
pub use params::{validate, ComparisonRequest, RawParams, RevisionTarget};
