use super::collection::{Collection, CollectionHandle, EntityStore};
use super::error::CatalogResult;
use super::object_id::ObjectId;
use crate::model::{Playlist, PLAYLIST_TRACKS_FIELD};

/// Playlist store client: the generic operations plus embedded track removal.
pub trait PlaylistStore: EntityStore<Playlist> {
    /// Pulls the embedded track `track_id` out of playlist `playlist_id`.
    ///
    /// Both ids must be valid encodings (`InvalidId` otherwise). A playlist that does not
    /// contain the track, or does not exist, is left as is and no error is returned. The
    /// standalone track collection is never touched.
    fn remove_embedded_track(&self, playlist_id: &str, track_id: &str) -> CatalogResult<()>;
}

impl CollectionHandle<'_, Playlist> {
    pub fn remove_embedded_track(
        &self,
        playlist_id: ObjectId,
        track_id: ObjectId,
    ) -> CatalogResult<()> {
        self.pull_embedded(playlist_id, PLAYLIST_TRACKS_FIELD, track_id)
    }
}

impl PlaylistStore for Collection<Playlist> {
    fn remove_embedded_track(&self, playlist_id: &str, track_id: &str) -> CatalogResult<()> {
        let playlist_id = ObjectId::parse_str(playlist_id)?;
        let track_id = ObjectId::parse_str(track_id)?;
        self.run("remove_embedded_track", |c| {
            c.remove_embedded_track(playlist_id, track_id)
        })
    }
}
