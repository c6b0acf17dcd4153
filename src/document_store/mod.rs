//! Document persistence for catalog entities on top of an embedded SQLite file.
//!
//! Every entity kind lives in its own collection table as a JSON document keyed by an
//! [`ObjectId`]. Single-document operations go through [`EntityStore`]; multi-document work can
//! be grouped with [`DocumentStore::exec_tx`].

mod collection;
mod document;
mod error;
mod filter;
mod indexes;
mod object_id;
mod playlist_tracks;
mod schema;
mod store;

pub use collection::{Collection, CollectionHandle, EntityStore};
pub use document::{Document, SearchScope};
pub use error::{CatalogError, CatalogResult};
pub use filter::Filter;
pub use indexes::{WeightedIndex, MUSIC_TRACK_INDEXES};
pub use object_id::ObjectId;
pub use playlist_tracks::PlaylistStore;
pub use store::{DocumentStore, TxSession};
