//! Music Master library
//!
//! Partial-update and search persistence for music tracks and playlists, plus the HTTP
//! surface exposing it.

pub mod catalog;
pub mod config;
pub mod document_store;
pub mod index_service;
pub mod merge;
pub mod model;
pub mod server;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use catalog::{EntityService, MusicTrackService, PlaylistService};
pub use document_store::{CatalogError, DocumentStore};
pub use server::{run_server, RequestsLoggingLevel};
