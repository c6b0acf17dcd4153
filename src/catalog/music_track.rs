use super::service::EntityService;
use super::Validate;
use crate::document_store::Collection;
use crate::impl_merge;
use crate::model::MusicTrack;
use serde::Deserialize;

pub type MusicTrackService = EntityService<MusicTrack, Collection<MusicTrack>>;

/// Payload of a track creation. `title`, `artist` and `album` are required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateMusicTrack {
    pub title: String,
    pub artist: String,
    pub album: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default, with = "crate::model::audio_payload")]
    pub mp3_file: Option<Vec<u8>>,
}

/// Payload of a partial track update: only the fields present are changed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMusicTrack {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default, with = "crate::model::audio_payload")]
    pub mp3_file: Option<Vec<u8>>,
}

impl Validate for CreateMusicTrack {
    fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("title", &self.title),
            ("artist", &self.artist),
            ("album", &self.album),
        ] {
            if value.is_empty() {
                return Err(format!("{} is required", field));
            }
        }
        Ok(())
    }
}

impl Validate for UpdateMusicTrack {}

impl_merge!(MusicTrack <- CreateMusicTrack {
    copy_field: title, artist, album, genre, release_year, duration, mp3_file;
});

impl_merge!(MusicTrack <- UpdateMusicTrack {
    copy_present: title, artist, album, genre, release_year, duration, mp3_file;
});
