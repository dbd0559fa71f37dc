// ABOUTME: Error types for decrypting at-rest admin credentials
// ABOUTME: Distinguishes key problems from ciphertext problems without leaking plaintext

/// Credential vault failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VaultError {
    /// The vault key is missing, not base64, or not 32 bytes
    #[error("Invalid vault key: {0}")]
    InvalidKey(String),

    /// The ciphertext is not valid base64 or too short to hold a nonce
    #[error("Malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    /// Authentication tag check failed (wrong key or tampered data)
    #[error("Decryption failed: ciphertext was not produced with this key")]
    DecryptionFailed,

    /// Encryption failed
    #[error("Encryption failed")]
    EncryptionFailed,

    /// Decrypted bytes are not UTF-8 text
    #[error("Decrypted value is not valid UTF-8")]
    InvalidPlaintext,
}
