// ABOUTME: HTTP middleware for the gateway router
// ABOUTME: Cross-origin policy and request correlation ids

//! HTTP middleware

/// CORS layer construction
pub mod cors;
/// Request correlation ids
pub mod request_id;

pub use cors::setup_cors;
pub use request_id::{request_id_middleware, RequestId};
