// ABOUTME: Error type re-exports for the gateway crate
// ABOUTME: Component errors and the HTTP-facing AppError live in gateway-core

//! Error handling
//!
//! See `gateway_core::errors` for the definitions.

pub use gateway_core::errors::{
    AppError, AuthError, ClientError, DatabaseError, ErrorCode, ErrorResponse,
    ErrorResponseDetails, VaultError,
};
