// ABOUTME: Shared HTTP client utilities with connection pooling and timeout configuration
// ABOUTME: Builds the single reqwest client every upstream call goes through

use crate::config::UpstreamConfig;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Create an HTTP client with explicit request and connect timeouts
///
/// The client keeps no cookie store; session cookies from upstream are read
/// off individual responses instead.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized
pub fn create_client_with_timeout(
    timeout: Duration,
    connect_timeout: Duration,
) -> reqwest::Result<Client> {
    ClientBuilder::new()
        .timeout(timeout)
        .connect_timeout(connect_timeout)
        .user_agent(concat!("palmr-gateway/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Create the client used for every call to the upstream identity API
///
/// # Errors
///
/// Returns an error if the client cannot be built
pub fn upstream_client(config: &UpstreamConfig) -> reqwest::Result<Client> {
    create_client_with_timeout(config.request_timeout, config.connect_timeout)
}
