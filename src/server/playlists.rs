use super::entities::entity_routes;
use super::error::ApiError;
use super::state::{GuardedPlaylistService, ServerState};
use super::ServerConfig;
use crate::catalog::{CreatePlaylist, DeleteMusicTrack, UpdatePlaylist, Validate};
use crate::model::Playlist;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::delete;
use axum::{Json, Router};
use axum_extra::extract::WithRejection;

/// Removes the embedded copy of a track from the playlist in the path.
async fn delete_playlist_music_track(
    State(service): State<GuardedPlaylistService>,
    State(config): State<ServerConfig>,
    WithRejection(Path(id), _): WithRejection<Path<String>, ApiError>,
    WithRejection(Json(data), _): WithRejection<Json<DeleteMusicTrack>, ApiError>,
) -> Result<StatusCode, ApiError> {
    data.validate().map_err(ApiError::validation)?;
    service
        .delete_music_track(&id, &data)
        .map_err(|e| ApiError::catalog(e, config.debug))?;
    Ok(StatusCode::OK)
}

pub(super) fn make_playlist_routes(state: ServerState) -> Router {
    entity_routes::<Playlist, CreatePlaylist, UpdatePlaylist>()
        .route("/music-tracks/{id}", delete(delete_playlist_music_track))
        .with_state(state)
}
