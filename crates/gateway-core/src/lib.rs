// ABOUTME: Core types and constants for the Palmr registration gateway
// ABOUTME: Foundation crate with error handling, user and token models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Palmr Gateway Contributors

#![deny(unsafe_code)]

//! # Gateway Core
//!
//! Foundation crate providing shared types and constants for the Palmr
//! registration gateway. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and domain-specific errors
//! - **constants**: Application-wide constants organized by domain
//! - **models**: Local user records, upstream payloads, and the admin token

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants and configuration defaults organized by domain
pub mod constants;

/// Core data models (User, `UserRegistration`, `AdminToken`, ...)
pub mod models;
