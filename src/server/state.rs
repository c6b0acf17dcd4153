use axum::extract::FromRef;

use crate::catalog::EntityService;
use crate::document_store::Collection;
use crate::index_service::IndexSearch;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedEntityService<D> = Arc<EntityService<D, Collection<D>>>;
pub type GuardedMusicTrackService = GuardedEntityService<crate::model::MusicTrack>;
pub type GuardedPlaylistService = GuardedEntityService<crate::model::Playlist>;
pub type OptionalIndexSearch = Option<Arc<dyn IndexSearch>>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub music_tracks: GuardedMusicTrackService,
    pub playlists: GuardedPlaylistService,
    pub index_search: OptionalIndexSearch,
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}

impl FromRef<ServerState> for GuardedMusicTrackService {
    fn from_ref(input: &ServerState) -> Self {
        input.music_tracks.clone()
    }
}

impl FromRef<ServerState> for GuardedPlaylistService {
    fn from_ref(input: &ServerState) -> Self {
        input.playlists.clone()
    }
}

impl FromRef<ServerState> for OptionalIndexSearch {
    fn from_ref(input: &ServerState) -> Self {
        input.index_search.clone()
    }
}
