//! Table layout of the document store: one table per collection, keyed by the document id.

use crate::document_store::Document;
use crate::model::{MusicTrack, Playlist};
use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema};

const DOCUMENT_COLUMNS: &[Column] = &[
    sqlite_column!(
        "_id",
        &SqlType::Text,
        is_primary_key = true,
        non_null = true
    ),
    sqlite_column!("document", &SqlType::Text, non_null = true),
];

const MUSIC_TRACKS_TABLE_V_0: Table = Table {
    name: <MusicTrack as Document>::COLLECTION,
    columns: DOCUMENT_COLUMNS,
};

const PLAYLISTS_TABLE_V_0: Table = Table {
    name: <Playlist as Document>::COLLECTION,
    columns: DOCUMENT_COLUMNS,
};

pub const DOCUMENT_STORE_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[MUSIC_TRACKS_TABLE_V_0, PLAYLISTS_TABLE_V_0],
    migration: None,
}];
