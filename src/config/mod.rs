mod file_config;

pub use file_config::{FileConfig, IndexServiceConfig};

use crate::server::{RequestsLoggingLevel, ServerConfig};
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

/// Values coming from CLI flags and their environment variables.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub stage: String,
    pub app_name: String,
    pub db_path: Option<PathBuf>,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub allow_origins: Vec<String>,
    pub debug: bool,
    pub busy_timeout_ms: u64,
    pub request_timeout_sec: u64,
    pub index_service_url: Option<String>,
    pub index_service_timeout_sec: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub stage: String,
    pub app_name: String,
    pub db_path: PathBuf,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub allow_origins: Vec<String>,
    pub debug: bool,
    pub busy_timeout: Duration,
    pub request_timeout: Duration,

    pub index_service: Option<IndexServiceSettings>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexServiceSettings {
    pub url: String,
    pub timeout: Duration,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_path must be specified via --db-path or in config file")
            })?;

        if db_path.is_dir() {
            bail!("db_path is a directory: {:?}", db_path);
        }
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                bail!("Database directory does not exist: {:?}", parent);
            }
        }

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let index_file = file.index_service.unwrap_or_default();
        let index_service = index_file
            .url
            .or_else(|| cli.index_service_url.clone())
            .filter(|url| !url.is_empty())
            .map(|url| IndexServiceSettings {
                url,
                timeout: Duration::from_secs(
                    index_file
                        .timeout_sec
                        .unwrap_or(cli.index_service_timeout_sec),
                ),
            });

        Ok(Self {
            stage: file.stage.unwrap_or_else(|| cli.stage.clone()),
            app_name: file.app_name.unwrap_or_else(|| cli.app_name.clone()),
            db_path,
            port: file.port.unwrap_or(cli.port),
            metrics_port: file.metrics_port.unwrap_or(cli.metrics_port),
            logging_level,
            allow_origins: file
                .allow_origins
                .unwrap_or_else(|| cli.allow_origins.clone()),
            debug: file.debug.unwrap_or(cli.debug),
            busy_timeout: Duration::from_millis(
                file.busy_timeout_ms.unwrap_or(cli.busy_timeout_ms),
            ),
            request_timeout: Duration::from_secs(
                file.request_timeout_sec.unwrap_or(cli.request_timeout_sec),
            ),
            index_service,
        })
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            requests_logging_level: self.logging_level.clone(),
            port: self.port,
            allow_origins: self.allow_origins.clone(),
            debug: self.debug,
            request_timeout: self.request_timeout,
        }
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
