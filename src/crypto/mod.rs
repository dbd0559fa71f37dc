// ABOUTME: Cryptography module for at-rest protection of the admin credentials
// ABOUTME: Centralizes the AES-256-GCM credential vault used by the gateway
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Palmr Gateway Contributors

//! Cryptographic utilities for the Palmr gateway

/// AES-256-GCM credential vault
pub mod vault;

pub use vault::{AesGcmVault, CredentialVault, EncryptedAdminCredentials};
