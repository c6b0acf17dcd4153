use thiserror::Error;

/// Failures of the catalog persistence layer.
///
/// `Store` and `Document` are both underlying store failures; they are kept apart only so
/// that logs tell a SQLite problem from a document that no longer decodes.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid id: {0:?}")]
    InvalidId(String),

    #[error("no document found in {0}")]
    NotFound(&'static str),

    #[error("bad filter: {0}")]
    BadFilter(String),

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("document encoding error: {0}")]
    Document(#[from] serde_json::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    /// Maps a "no rows" result of a single-document read to `NotFound`.
    pub(crate) fn from_query(err: rusqlite::Error, collection: &'static str) -> Self {
        match err {
            rusqlite::Error::QueryReturnedNoRows => CatalogError::NotFound(collection),
            other => CatalogError::Store(other),
        }
    }
}
