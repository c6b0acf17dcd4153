use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::State, http::StatusCode, middleware, response::IntoResponse, routing::get, Json,
    Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tracing::{error, info};

use super::metrics::metrics_handler;
use super::music_tracks::make_music_track_routes;
use super::playlists::make_playlist_routes;
use super::{cors_layer, log_requests, security_headers, state::*, ServerConfig};
use crate::catalog::{MusicTrackService, PlaylistService};
use crate::document_store::DocumentStore;

#[derive(Serialize)]
struct ServerStats {
    pub status: &'static str,
    pub uptime: String,
    pub version: &'static str,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    Json(ServerStats {
        status: "ok",
        uptime: format_uptime(state.start_time.elapsed()),
        version: env!("CARGO_PKG_VERSION"),
    })
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        store: &DocumentStore,
        index_search: OptionalIndexSearch,
    ) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            music_tracks: Arc::new(MusicTrackService::new(Arc::new(store.collection()))),
            playlists: Arc::new(PlaylistService::new(Arc::new(store.collection()))),
            index_search,
        }
    }
}

pub fn make_app(
    config: ServerConfig,
    store: &DocumentStore,
    index_search: OptionalIndexSearch,
) -> Result<Router> {
    let state = ServerState::new(config.clone(), store, index_search);

    let home_router: Router = Router::new()
        .route("/", get(home))
        .with_state(state.clone());

    let mut app: Router = home_router
        .nest("/v1/customer/music-tracks", make_music_track_routes(state.clone()))
        .nest("/v1/customer/playlists", make_playlist_routes(state));

    app = security_headers(app);
    if let Some(cors) = cors_layer(&config.allow_origins) {
        app = app.layer(cors);
    }
    app = app.layer(TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        config.request_timeout,
    ));
    app = app.layer(middleware::from_fn_with_state(config, log_requests));

    Ok(app)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, draining connections..."),
        Err(err) => {
            error!("Failed to listen for shutdown signal: {}", err);
            std::future::pending::<()>().await;
        }
    }
}

pub async fn run_server(
    config: ServerConfig,
    store: DocumentStore,
    index_search: OptionalIndexSearch,
    metrics_port: u16,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, &store, index_search)?;

    let metrics_listener = TcpListener::bind(("0.0.0.0", metrics_port))
        .await
        .with_context(|| format!("Failed to bind metrics port {}", metrics_port))?;
    let metrics_app = Router::new().route("/metrics", get(metrics_handler));
    tokio::spawn(async move {
        if let Err(err) = axum::serve(metrics_listener, metrics_app).await {
            error!("Metrics server stopped: {}", err);
        }
    });
    info!("Metrics available on port {}", metrics_port);

    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on port {}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
