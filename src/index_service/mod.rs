//! External Index Client: free-text search delegated to a separate search engine.
//!
//! Relevance ranking is entirely up to the engine; this boundary only submits the terms and
//! decodes the hits into tracks.

mod elasticsearch;

pub use elasticsearch::ElasticsearchClient;

use crate::model::MusicTrack;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait IndexSearch: Send + Sync {
    async fn search(&self, terms: &str) -> Result<Vec<MusicTrack>>;
}
