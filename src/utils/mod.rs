// ABOUTME: Utility module exports for shared helpers
// ABOUTME: Currently holds the outbound HTTP client construction

/// Shared HTTP client construction with timeout configuration
pub mod http_client;
