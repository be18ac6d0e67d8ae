// crates/retag/src/http.rs
// Shared HTTP client for registry lookups

use std::time::Duration;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default connect timeout
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Create the shared HTTP client with appropriate defaults.
pub fn create_shared_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .user_agent(concat!("retag/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
