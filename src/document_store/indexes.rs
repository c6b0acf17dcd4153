//! Index Provisioner: expression indexes over the searchable track fields.
//!
//! Indexes are an optimisation only. Search works with a full scan, so a failing index is
//! logged and skipped and never stops startup.

use super::document::Document;
use super::store::DocumentStore;
use crate::model::MusicTrack;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedIndex {
    pub field: &'static str,
    pub weight: u8,
}

/// Searchable track fields by relevance: title > artist > album > genre.
pub const MUSIC_TRACK_INDEXES: &[WeightedIndex] = &[
    WeightedIndex {
        field: "title",
        weight: 9,
    },
    WeightedIndex {
        field: "artist",
        weight: 8,
    },
    WeightedIndex {
        field: "album",
        weight: 6,
    },
    WeightedIndex {
        field: "genre",
        weight: 3,
    },
];

fn index_name(collection: &str, field: &str) -> String {
    format!("idx_{}_{}", collection, field)
}

impl DocumentStore {
    /// Declares one non-unique index per entry of `indexes` on `D`'s collection, heaviest
    /// first. Returns the names of the indexes that are in place afterwards.
    pub fn provision_indexes<D: Document>(&self, indexes: &[WeightedIndex]) -> Vec<String> {
        let mut ordered = indexes.to_vec();
        ordered.sort_by(|a, b| b.weight.cmp(&a.weight));

        let mut provisioned = Vec::with_capacity(ordered.len());
        for index in ordered {
            let name = index_name(D::COLLECTION, index.field);
            let sql = format!(
                "CREATE INDEX IF NOT EXISTS {} ON {}(json_extract(document, '$.{}'))",
                name,
                D::COLLECTION,
                index.field
            );
            match self.with_conn(|conn| conn.execute(&sql, [])) {
                Ok(_) => {
                    debug!("Index {} (weight {}) in place", name, index.weight);
                    provisioned.push(name);
                }
                Err(err) => warn!("Could not create index {}: {}", name, err),
            }
        }
        provisioned
    }

    /// Startup provisioning of every collection that declares indexes.
    pub fn provision_default_indexes(&self) -> Vec<String> {
        let provisioned = self.provision_indexes::<MusicTrack>(MUSIC_TRACK_INDEXES);
        info!(
            "Provisioned {}/{} indexes on {}",
            provisioned.len(),
            MUSIC_TRACK_INDEXES.len(),
            MusicTrack::COLLECTION
        );
        provisioned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Playlist;
    use std::time::Duration;
    use tempfile::TempDir;

    fn create_tmp_store() -> (DocumentStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = DocumentStore::open(temp_dir.path().join("test.db"), Duration::from_secs(1))
            .unwrap();
        (store, temp_dir)
    }

    fn index_names(store: &DocumentStore, table: &str) -> Vec<String> {
        store.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = ?1 AND name LIKE 'idx_%' ORDER BY name")
                .unwrap();
            stmt.query_map([table], |r| r.get(0))
                .unwrap()
                .collect::<Result<Vec<String>, _>>()
                .unwrap()
        })
    }

    #[test]
    fn provisions_track_indexes_by_descending_weight() {
        let (store, _temp_dir) = create_tmp_store();

        let provisioned = store.provision_default_indexes();
        assert_eq!(
            provisioned,
            vec![
                "idx_music_tracks_title",
                "idx_music_tracks_artist",
                "idx_music_tracks_album",
                "idx_music_tracks_genre",
            ]
        );
        assert_eq!(index_names(&store, "music_tracks").len(), 4);
    }

    #[test]
    fn provisioning_is_repeatable() {
        let (store, _temp_dir) = create_tmp_store();

        store.provision_default_indexes();
        let again = store.provision_default_indexes();
        assert_eq!(again.len(), 4);
    }

    #[test]
    fn failing_index_is_skipped() {
        let (store, _temp_dir) = create_tmp_store();
        store.with_conn(|conn| {
            conn.execute(
                "CREATE TABLE idx_playlists_name (x INTEGER)",
                [],
            )
            .unwrap()
        });

        let provisioned = store.provision_indexes::<Playlist>(&[
            WeightedIndex {
                field: "name",
                weight: 5,
            },
            WeightedIndex {
                field: "id",
                weight: 1,
            },
        ]);
        assert_eq!(provisioned, vec!["idx_playlists_id"]);
    }
}
