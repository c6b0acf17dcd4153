//! Shared constants for end-to-end tests

// ============================================================================
// Timeouts
// ============================================================================

/// Maximum time to wait for the test server to answer its health endpoint
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Delay between readiness polls
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 20;

/// Timeout of every request issued by the test client
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Test Data
// ============================================================================

/// Well formed id that no document is ever stored under
pub const UNKNOWN_ID: &str = "000000000000000000000000";

/// Id that is not a valid encoding
pub const MALFORMED_ID: &str = "not-an-id";
