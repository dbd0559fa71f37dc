// ABOUTME: AES-256-GCM vault that seals and opens the upstream admin credentials
// ABOUTME: Ciphertexts are base64(nonce || ciphertext+tag) strings suitable for env variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Palmr Gateway Contributors

//! # Credential Vault
//!
//! The admin username and password never appear in configuration in the
//! clear. They are stored as two ciphertexts and opened on every login
//! attempt; the plaintext lives only as long as that attempt.

use crate::errors::VaultError;
use crate::models::AdminCredentials;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::{aead::Aead, Aes256Gcm, KeyInit};
use base64::{engine::general_purpose::STANDARD, Engine};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

/// Turns stored ciphertext back into plaintext
pub trait CredentialVault: Send + Sync {
    /// Decrypt one stored value
    ///
    /// # Errors
    ///
    /// Returns a `VaultError` if the ciphertext is malformed, was produced
    /// with another key, or does not decode to text
    fn decrypt(&self, ciphertext: &str) -> Result<String, VaultError>;
}

/// Vault backed by a single AES-256-GCM key
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct AesGcmVault {
    key: [u8; KEY_LEN],
}

impl AesGcmVault {
    /// Create a vault from raw key bytes
    #[must_use]
    pub const fn from_bytes(key: [u8; KEY_LEN]) -> Self {
        Self { key }
    }

    /// Create a vault from a base64-encoded 32-byte key
    ///
    /// # Errors
    ///
    /// Returns `VaultError::InvalidKey` if the key is not base64 or not 32 bytes
    pub fn from_base64(encoded: &str) -> Result<Self, VaultError> {
        let bytes = Zeroizing::new(
            STANDARD
                .decode(encoded.trim())
                .map_err(|e| VaultError::InvalidKey(format!("invalid base64: {e}")))?,
        );
        let key: [u8; KEY_LEN] = bytes.as_slice().try_into().map_err(|_| {
            VaultError::InvalidKey(format!("expected {KEY_LEN} bytes, got {}", bytes.len()))
        })?;
        Ok(Self { key })
    }

    /// Generate a random key, returned base64-encoded
    #[must_use]
    pub fn generate_key() -> String {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        rand::thread_rng().fill_bytes(key.as_mut());
        STANDARD.encode(key.as_ref())
    }

    /// Encrypt a value into the stored text format
    ///
    /// # Errors
    ///
    /// Returns `VaultError::EncryptionFailed` if the cipher rejects the input
    pub fn encrypt(&self, plaintext: &str) -> Result<String, VaultError> {
        let cipher = Aes256Gcm::new(GenericArray::from_slice(&self.key));

        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = GenericArray::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| VaultError::EncryptionFailed)?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);

        Ok(STANDARD.encode(sealed))
    }
}

impl CredentialVault for AesGcmVault {
    fn decrypt(&self, ciphertext: &str) -> Result<String, VaultError> {
        let sealed = STANDARD
            .decode(ciphertext.trim())
            .map_err(|e| VaultError::MalformedCiphertext(format!("invalid base64: {e}")))?;

        // Nonce plus a 16-byte tag is the shortest valid input
        if sealed.len() < NONCE_LEN + 16 {
            return Err(VaultError::MalformedCiphertext(format!(
                "{} bytes is too short",
                sealed.len()
            )));
        }

        let cipher = Aes256Gcm::new(GenericArray::from_slice(&self.key));
        let (nonce, body) = sealed.split_at(NONCE_LEN);

        let plaintext = Zeroizing::new(
            cipher
                .decrypt(GenericArray::from_slice(nonce), body)
                .map_err(|_| VaultError::DecryptionFailed)?,
        );

        String::from_utf8(plaintext.to_vec()).map_err(|_| VaultError::InvalidPlaintext)
    }
}

/// The two stored ciphertexts for the upstream admin login
#[derive(Debug, Clone)]
pub struct EncryptedAdminCredentials {
    username: String,
    password: String,
}

impl EncryptedAdminCredentials {
    /// Wrap stored ciphertexts
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Encrypt plaintext credentials with `vault`
    ///
    /// # Errors
    ///
    /// Returns an error if either value fails to encrypt
    pub fn seal(vault: &AesGcmVault, username: &str, password: &str) -> Result<Self, VaultError> {
        Ok(Self {
            username: vault.encrypt(username)?,
            password: vault.encrypt(password)?,
        })
    }

    /// Username ciphertext
    #[must_use]
    pub fn username_ciphertext(&self) -> &str {
        &self.username
    }

    /// Password ciphertext
    #[must_use]
    pub fn password_ciphertext(&self) -> &str {
        &self.password
    }

    /// Open both values; fails as a whole if either one fails
    ///
    /// # Errors
    ///
    /// Returns the first `VaultError` encountered
    pub fn decrypt(&self, vault: &dyn CredentialVault) -> Result<AdminCredentials, VaultError> {
        let username = Zeroizing::new(vault.decrypt(&self.username)?);
        let password = Zeroizing::new(vault.decrypt(&self.password)?);
        Ok(AdminCredentials::new(username.as_str(), password.as_str()))
    }
}
