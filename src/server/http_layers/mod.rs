mod requests_logging;
mod security_headers;

pub use requests_logging::{log_requests, RequestsLoggingLevel};
pub use security_headers::{cors_layer, security_headers};
