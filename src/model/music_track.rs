use crate::document_store::{Document, ObjectId, SearchScope};
use serde::{Deserialize, Serialize};

/// A track as persisted in the `music_tracks` collection, and as embedded in playlists.
///
/// Every field but the id is optional: `None` means "not set", which a partial update must
/// tell apart from an empty value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MusicTrack {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<i32>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "super::audio_payload"
    )]
    pub mp3_file: Option<Vec<u8>>,
}

impl Document for MusicTrack {
    const COLLECTION: &'static str = "music_tracks";
    const SEARCH_SCOPE: SearchScope =
        SearchScope::Fields(&["title", "artist", "album", "genre"]);

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }
}
