//! NASA ADS API access.
//!
//! Every pipeline stage talks to ADS through [`Upstream`], so the stages can be driven by the
//! HTTP [`client::AdsClient`] or by canned responses in tests.

use serde_json::Value;

pub mod bibtex;
pub mod client;
pub mod doc;
pub mod library;
pub mod search;

pub const DEFAULT_API_URL: &str = "https://api.adsabs.harvard.edu/v1";

/// The ADS operations this tool consumes. Each call is a single attempt; retrying is up to the
/// caller.
pub trait Upstream {
    /// `GET /biblib/libraries`: the user's libraries.
    fn list_libraries(&self) -> anyhow::Result<Value>;
    /// `GET /biblib/libraries/{id}`: one library, including its documents.
    fn library(&self, id: &str) -> anyhow::Result<Value>;
    /// `GET /search/query` with a query string and field projection.
    fn search(&self, query: &str, fields: &[&str], rows: usize) -> anyhow::Result<Value>;
    /// `POST /export/bibtex`: the concatenated BibTeX export text.
    fn export_bibtex(&self, bibcodes: &[String]) -> anyhow::Result<String>;
    /// `POST /metrics`: aggregate metrics for a set of bibcodes.
    fn metrics(&self, bibcodes: &[String]) -> anyhow::Result<Value>;
}
