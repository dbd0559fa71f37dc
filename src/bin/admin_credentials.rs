// ABOUTME: Vault utility for producing the encrypted admin credential variables
// ABOUTME: Generates AES-256-GCM keys and seals the upstream admin username and password
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Palmr Gateway Contributors

//! Usage:
//! ```bash
//! # Create a new vault key
//! cargo run --bin admin-credentials -- generate-key
//!
//! # Encrypt the admin login with GATEWAY_VAULT_KEY
//! GATEWAY_VAULT_KEY=... cargo run --bin admin-credentials -- seal --username admin --password 's3cret'
//!
//! # Check that stored ciphertexts open with the key
//! cargo run --bin admin-credentials -- verify
//! ```

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use palmr_gateway::constants::env_vars;
use palmr_gateway::crypto::{AesGcmVault, EncryptedAdminCredentials};

#[derive(Parser)]
#[command(
    name = "admin-credentials",
    about = "Palmr gateway admin credential vault",
    long_about = "Generate vault keys and encrypt the upstream admin credentials for the Palmr gateway."
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a new base64 AES-256-GCM key
    GenerateKey,

    /// Encrypt the admin username and password
    Seal {
        /// Upstream admin username or email
        #[arg(long)]
        username: String,

        /// Upstream admin password
        #[arg(long)]
        password: String,

        /// Vault key (defaults to GATEWAY_VAULT_KEY)
        #[arg(long, env = "GATEWAY_VAULT_KEY", hide_env_values = true)]
        key: String,
    },

    /// Decrypt the configured ciphertexts and report whether they open
    Verify {
        /// Vault key (defaults to GATEWAY_VAULT_KEY)
        #[arg(long, env = "GATEWAY_VAULT_KEY", hide_env_values = true)]
        key: String,

        /// Username ciphertext
        #[arg(long, env = "ADMIN_USERNAME_ENCRYPTED")]
        username_encrypted: String,

        /// Password ciphertext
        #[arg(long, env = "ADMIN_PASSWORD_ENCRYPTED", hide_env_values = true)]
        password_encrypted: String,
    },
}

fn main() -> Result<()> {
    match Args::parse().command {
        Command::GenerateKey => {
            println!("{}={}", env_vars::VAULT_KEY, AesGcmVault::generate_key());
        }
        Command::Seal {
            username,
            password,
            key,
        } => {
            let vault = AesGcmVault::from_base64(&key).context("Invalid vault key")?;
            let sealed = EncryptedAdminCredentials::seal(&vault, &username, &password)
                .context("Failed to encrypt admin credentials")?;
            println!(
                "{}={}",
                env_vars::ADMIN_USERNAME_ENCRYPTED,
                sealed.username_ciphertext()
            );
            println!(
                "{}={}",
                env_vars::ADMIN_PASSWORD_ENCRYPTED,
                sealed.password_ciphertext()
            );
        }
        Command::Verify {
            key,
            username_encrypted,
            password_encrypted,
        } => {
            let vault = AesGcmVault::from_base64(&key).context("Invalid vault key")?;
            let credentials =
                EncryptedAdminCredentials::new(username_encrypted, password_encrypted)
                    .decrypt(&vault)
                    .map_err(|e| anyhow!("Stored credentials do not open: {e}"))?;
            println!("OK: credentials for '{}' decrypt", credentials.username());
        }
    }
    Ok(())
}
