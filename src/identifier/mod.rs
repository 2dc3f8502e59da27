//! Identifier extraction from ADS records: arXiv ids, DOI links and the canonical landing page.

pub mod arxiv;
pub mod doi;
pub mod link;
