use super::MusicTrack;
use crate::document_store::{Document, ObjectId, SearchScope};
use serde::{Deserialize, Serialize};

/// Name of the embedded track array inside a playlist document.
pub const PLAYLIST_TRACKS_FIELD: &str = "tracks";

/// A named, ordered list of full track copies. Embedded tracks are independent of the
/// `music_tracks` collection: editing a standalone track never touches playlists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub tracks: Vec<MusicTrack>,
}

impl Document for Playlist {
    const COLLECTION: &'static str = "playlists";
    const SEARCH_SCOPE: SearchScope = SearchScope::EmbeddedAny {
        array: PLAYLIST_TRACKS_FIELD,
        fields: &["title", "artist", "album", "genre"],
    };

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }
}
