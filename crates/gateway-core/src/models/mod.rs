// ABOUTME: Core data models for the registration gateway
// ABOUTME: Re-exports local user records, upstream payloads, and admin token types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Palmr Gateway Contributors

//! # Data Models
//!
//! - `User`: the locally persisted record (source of truth)
//! - `UserRegistration`: the payload mirrored to the upstream identity API
//! - `AdminToken` / `AdminCredentials`: the gateway's own upstream identity
//! - `UpstreamOutcome`: classified result of an upstream registration call

mod token;
mod upstream;
mod user;

pub use token::{AdminCredentials, AdminToken};
pub use upstream::{UpstreamOutcome, UserRegistration};
pub use user::{NewUser, User, UserUpdate};
