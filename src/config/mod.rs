// ABOUTME: Configuration management module for gateway settings
// ABOUTME: Exposes the environment-driven ServerConfig and its typed sections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Palmr Gateway Contributors

//! Configuration module for the Palmr gateway
//!
//! All settings come from environment variables and are validated once at
//! startup; components receive their typed section by value.

/// Environment and server configuration
pub mod environment;

pub use environment::{
    CorsConfig, DatabaseConfig, DatabaseUrl, Environment, LogLevel, RegistrationConfig,
    ServerConfig, UpstreamConfig, VaultConfig,
};
