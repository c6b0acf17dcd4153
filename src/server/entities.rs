//! Routes shared by every entity kind: create, search, view, update and delete.

use super::error::ApiError;
use super::state::{GuardedEntityService, ServerState};
use super::ServerConfig;
use crate::catalog::{ListRequest, Validate};
use crate::document_store::Document;
use crate::merge::Merge;
use axum::extract::{FromRef, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ListResponse<D> {
    pub data: Vec<D>,
    pub total_count: u64,
}

async fn create_entity<D, C>(
    State(service): State<GuardedEntityService<D>>,
    State(config): State<ServerConfig>,
    WithRejection(Json(data), _): WithRejection<Json<C>, ApiError>,
) -> Result<Json<D>, ApiError>
where
    D: Document + Default + Merge<C>,
    C: DeserializeOwned + Validate + Send + 'static,
{
    data.validate().map_err(ApiError::validation)?;
    let entity = service
        .create(&data)
        .map_err(|e| ApiError::catalog(e, config.debug))?;
    Ok(Json(entity))
}

async fn search_entities<D: Document>(
    State(service): State<GuardedEntityService<D>>,
    State(config): State<ServerConfig>,
    WithRejection(Query(request), _): WithRejection<Query<ListRequest>, ApiError>,
) -> Result<Json<ListResponse<D>>, ApiError> {
    request.validate().map_err(ApiError::validation)?;
    let data = service
        .search(&request)
        .map_err(|e| ApiError::catalog(e, config.debug))?;
    let total_count = service
        .count(&request)
        .map_err(|e| ApiError::catalog(e, config.debug))?;
    Ok(Json(ListResponse { data, total_count }))
}

async fn view_entity<D: Document>(
    State(service): State<GuardedEntityService<D>>,
    State(config): State<ServerConfig>,
    WithRejection(Path(id), _): WithRejection<Path<String>, ApiError>,
) -> Result<Json<D>, ApiError> {
    let entity = service
        .view(&id)
        .map_err(|e| ApiError::catalog(e, config.debug))?;
    Ok(Json(entity))
}

async fn update_entity<D, U>(
    State(service): State<GuardedEntityService<D>>,
    State(config): State<ServerConfig>,
    WithRejection(Path(id), _): WithRejection<Path<String>, ApiError>,
    WithRejection(Json(data), _): WithRejection<Json<U>, ApiError>,
) -> Result<Json<D>, ApiError>
where
    D: Document + Merge<U>,
    U: DeserializeOwned + Validate + Send + 'static,
{
    data.validate().map_err(ApiError::validation)?;
    let entity = service
        .update(&id, &data)
        .map_err(|e| ApiError::catalog(e, config.debug))?;
    Ok(Json(entity))
}

async fn delete_entity<D: Document>(
    State(service): State<GuardedEntityService<D>>,
    State(config): State<ServerConfig>,
    WithRejection(Path(id), _): WithRejection<Path<String>, ApiError>,
) -> Result<StatusCode, ApiError> {
    service
        .delete(&id)
        .map_err(|e| ApiError::catalog(e, config.debug))?;
    Ok(StatusCode::OK)
}

/// CRUD and search routes for `D`, created from `C` payloads and updated from `U` payloads.
pub(super) fn entity_routes<D, C, U>() -> Router<ServerState>
where
    D: Document + Default + Merge<C> + Merge<U>,
    C: DeserializeOwned + Validate + Send + 'static,
    U: DeserializeOwned + Validate + Send + 'static,
    GuardedEntityService<D>: FromRef<ServerState>,
{
    Router::new()
        .route("/", post(create_entity::<D, C>).get(search_entities::<D>))
        .route(
            "/{id}",
            get(view_entity::<D>)
                .patch(update_entity::<D, U>)
                .delete(delete_entity::<D>),
        )
}
