// ABOUTME: Dependency container shared by every route handler
// ABOUTME: Builds the store, token cache, authenticator, upstream client, and orchestrator once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Palmr Gateway Contributors

//! Server resources
//!
//! Everything a handler needs is created once at startup and shared through
//! `Arc`. The token cache lives here and nowhere else.

use crate::config::ServerConfig;
use crate::crypto::{AesGcmVault, CredentialVault, EncryptedAdminCredentials};
use crate::database::{Database, UserRepository};
use crate::registration::RegistrationOrchestrator;
use crate::upstream::{AdminAuthenticator, RegistrationClient, TokenCache, TokenPolicy};
use crate::utils::http_client;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// Shared server state
pub struct ServerResources {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
    /// Local user store
    pub database: Arc<Database>,
    /// Repository view of the store
    pub users: Arc<dyn UserRepository>,
    /// Process-wide admin token slot
    pub token_cache: TokenCache,
    /// Admin login
    pub authenticator: Arc<AdminAuthenticator>,
    /// Upstream account creation
    pub registration_client: Arc<RegistrationClient>,
    /// Registration entry point
    pub orchestrator: Arc<RegistrationOrchestrator>,
}

impl ServerResources {
    /// Wire all components from explicit parts
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(
        config: ServerConfig,
        database: Database,
        vault: Arc<dyn CredentialVault>,
        credentials: EncryptedAdminCredentials,
    ) -> Result<Self> {
        let config = Arc::new(config);
        let database = Arc::new(database);
        let users: Arc<dyn UserRepository> = database.clone();

        let http = http_client::upstream_client(&config.upstream)
            .context("Failed to build upstream HTTP client")?;

        let token_cache = TokenCache::new();
        let authenticator = Arc::new(AdminAuthenticator::new(
            http.clone(),
            &config.upstream.base_url,
            credentials,
            vault,
            token_cache.clone(),
            TokenPolicy::from_config(&config.upstream),
        ));
        let registration_client = Arc::new(RegistrationClient::new(
            http,
            &config.upstream.base_url,
            authenticator.clone(),
        ));
        let orchestrator = Arc::new(RegistrationOrchestrator::new(
            users.clone(),
            registration_client.clone(),
            &config.registration,
            config.upstream.retry_on_unauthorized,
        ));

        Ok(Self {
            config,
            database,
            users,
            token_cache,
            authenticator,
            registration_client,
            orchestrator,
        })
    }

    /// Build everything from configuration: open the store and the vault
    ///
    /// # Errors
    ///
    /// Returns an error if vault settings are missing or invalid, or the
    /// database cannot be opened
    pub async fn from_config(config: ServerConfig) -> Result<Self> {
        let vault = AesGcmVault::from_base64(config.vault.require_key()?)
            .context("Invalid GATEWAY_VAULT_KEY")?;
        let (username, password) = config.vault.require_admin_credentials()?;
        let credentials = EncryptedAdminCredentials::new(username, password);

        // Surface a wrong key at startup instead of on the first registration
        credentials
            .decrypt(&vault)
            .context("Admin credentials do not decrypt with GATEWAY_VAULT_KEY")?;

        let database = Database::new(&config.database.url.to_connection_string())
            .await
            .context("Failed to open local user store")?;

        info!(upstream = %config.upstream.base_url, "Server resources initialized");
        Self::new(config, database, Arc::new(vault), credentials)
    }
}
