use super::RequestsLoggingLevel;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    /// Origins allowed by CORS. `*` allows any origin, an empty list disables CORS headers.
    pub allow_origins: Vec<String>,
    /// When set, store failures are reported with their message instead of a generic one.
    pub debug: bool,
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 8080,
            allow_origins: vec![],
            debug: false,
            request_timeout: Duration::from_secs(30),
        }
    }
}
