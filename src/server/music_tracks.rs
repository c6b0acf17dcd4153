use super::entities::entity_routes;
use super::error::{ApiError, ErrorType};
use super::state::{OptionalIndexSearch, ServerState};
use crate::catalog::{CreateMusicTrack, UpdateMusicTrack};
use crate::model::MusicTrack;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use tracing::error;

#[derive(Debug, Deserialize)]
struct IndexSearchQuery {
    #[serde(default)]
    query: String,
}

/// Free-text search through the external index service.
async fn index_search(
    State(index_search): State<OptionalIndexSearch>,
    WithRejection(Query(params), _): WithRejection<Query<IndexSearchQuery>, ApiError>,
) -> Result<Json<Vec<MusicTrack>>, ApiError> {
    let Some(index_search) = index_search else {
        return Err(ApiError::service_unavailable(
            "Index service is not configured",
        ));
    };

    match index_search.search(&params.query).await {
        Ok(tracks) => Ok(Json(tracks)),
        Err(err) => {
            error!("Index search failed: {:#}", err);
            Err(ApiError::new(
                StatusCode::BAD_GATEWAY,
                ErrorType::Generic,
                "Index search failed",
            ))
        }
    }
}

pub(super) fn make_music_track_routes(state: ServerState) -> Router {
    entity_routes::<MusicTrack, CreateMusicTrack, UpdateMusicTrack>()
        .route("/index-search", get(index_search))
        .with_state(state)
}
