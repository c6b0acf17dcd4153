use super::service::EntityService;
use super::Validate;
use crate::document_store::{CatalogResult, Collection, PlaylistStore};
use crate::impl_merge;
use crate::model::{MusicTrack, Playlist};
use serde::Deserialize;
use tracing::debug;

pub type PlaylistService = EntityService<Playlist, Collection<Playlist>>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePlaylist {
    pub name: String,
    #[serde(default)]
    pub tracks: Vec<MusicTrack>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePlaylist {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tracks: Option<Vec<MusicTrack>>,
}

/// Payload of the removal of one embedded track from a playlist.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteMusicTrack {
    pub music_track_id: String,
}

impl Validate for DeleteMusicTrack {
    fn validate(&self) -> Result<(), String> {
        if self.music_track_id.is_empty() {
            return Err("music_track_id is required".to_string());
        }
        Ok(())
    }
}

impl Validate for CreatePlaylist {}

impl Validate for UpdatePlaylist {}

impl_merge!(Playlist <- CreatePlaylist { copy_field: name, tracks; });
impl_merge!(Playlist <- UpdatePlaylist { copy_present: name, tracks; });

impl<S: PlaylistStore> EntityService<Playlist, S> {
    /// Removes the embedded copy of a track from playlist `id`, once the playlist is known to
    /// exist. The standalone track is left alone.
    pub fn delete_music_track(&self, id: &str, data: &DeleteMusicTrack) -> CatalogResult<()> {
        self.view(id)?;
        self.store()
            .remove_embedded_track(id, &data.music_track_id)?;
        debug!("Removed track {} from playlist {}", data.music_track_id, id);
        Ok(())
    }
}
