pub mod config;
mod entities;
mod error;
mod http_layers;
pub mod metrics;
mod music_tracks;
mod playlists;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use entities::ListResponse;
pub use error::{ApiError, ErrorBody, ErrorType};
pub use http_layers::*;
pub use server::{make_app, run_server};
