// ABOUTME: Shared test helpers for integration tests
// ABOUTME: Exports the Axum request/response helpers

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod axum_test;
