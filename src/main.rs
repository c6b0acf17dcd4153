use anyhow::{Context, Result};
use clap::Parser;
use music_master::config::{AppConfig, CliConfig, FileConfig};
use music_master::document_store::{Document, DocumentStore};
use music_master::index_service::{ElasticsearchClient, IndexSearch};
use music_master::model::{MusicTrack, Playlist};
use music_master::server::{self, run_server, RequestsLoggingLevel};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    if path_buf.is_absolute() {
        return Ok(path_buf);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(path_buf))
}

#[derive(Parser, Debug)]
#[command(version, about = "Music tracks and playlists service")]
struct CliArgs {
    /// Optional TOML config file; its values override flags and environment.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Deployment stage, informational.
    #[clap(long, env = "STAGE", default_value = "development")]
    pub stage: String,

    #[clap(long, env = "APP_NAME", default_value = "music-master")]
    pub app_name: String,

    /// Path to the SQLite document store file. Created when missing.
    #[clap(long, env = "DB_PATH", value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, env = "METRICS_PORT", default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, env = "REQUESTS_LOGGING_LEVEL", default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Comma separated CORS origins, `*` for any.
    #[clap(long, env = "ALLOW_ORIGINS", value_delimiter = ',')]
    pub allow_origins: Vec<String>,

    /// Report store failure details in error responses.
    #[clap(long, env = "DEBUG")]
    pub debug: bool,

    /// How long a store call waits for a locked database, in milliseconds.
    #[clap(long, env = "DB_BUSY_TIMEOUT_MS", default_value_t = 5000)]
    pub busy_timeout_ms: u64,

    /// Requests running longer than this are answered with 408.
    #[clap(long, env = "REQUEST_TIMEOUT_SEC", default_value_t = 30)]
    pub request_timeout_sec: u64,

    /// Base URL of the external index service (Elasticsearch compatible).
    #[clap(long, env = "INDEX_SERVICE_URL")]
    pub index_service_url: Option<String>,

    #[clap(long, env = "INDEX_SERVICE_TIMEOUT_SEC", default_value_t = 10)]
    pub index_service_timeout_sec: u64,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            stage: self.stage.clone(),
            app_name: self.app_name.clone(),
            db_path: self.db_path.clone(),
            port: self.port,
            metrics_port: self.metrics_port,
            logging_level: self.logging_level.clone(),
            allow_origins: self.allow_origins.clone(),
            debug: self.debug,
            busy_timeout_ms: self.busy_timeout_ms,
            request_timeout_sec: self.request_timeout_sec,
            index_service_url: self.index_service_url.clone(),
            index_service_timeout_sec: self.index_service_timeout_sec,
        }
    }
}

/// Loads `.env.local` then `.env` into the environment. Values already set win; missing
/// files are ignored.
fn preload_env_files() {
    for file in [".env.local", ".env"] {
        if let Ok(path) = dotenvy::from_filename(file) {
            info!("Loaded environment from {:?}", path);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    preload_env_files();
    let cli_args = CliArgs::parse();

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}...", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;
    info!(
        "Starting {} ({} stage)",
        config.app_name, config.stage
    );

    info!("Opening document store at {:?}...", config.db_path);
    let store = DocumentStore::open(&config.db_path, config.busy_timeout)?;
    store.provision_default_indexes();

    info!("Initializing metrics...");
    server::metrics::init_metrics();
    for collection in [MusicTrack::COLLECTION, Playlist::COLLECTION] {
        server::metrics::set_documents_count(collection, store.count_documents(collection)?);
    }

    let index_search: Option<Arc<dyn IndexSearch>> = match &config.index_service {
        Some(settings) => {
            info!("Using index service at {}", settings.url);
            Some(Arc::new(ElasticsearchClient::new(
                &settings.url,
                settings.timeout,
            )?))
        }
        None => {
            info!("No index service configured, index search disabled");
            None
        }
    };

    run_server(
        config.server_config(),
        store,
        index_search,
        config.metrics_port,
    )
    .await
}
