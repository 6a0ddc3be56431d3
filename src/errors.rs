use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in filevault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: wrong password or corrupted data")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Container format errors ---
    #[error("Invalid container format: {0}")]
    InvalidFormat(String),

    #[error("Truncated stream: input ended before the final chunk")]
    Truncated,

    // --- Traversal errors ---
    #[error("Cannot access {}: {source}", path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot derive an output path from {0}")]
    InvalidPath(PathBuf),

    // --- Credential errors ---
    #[error("User not initialized yet (no credential file at {0})")]
    NotInitialized(PathBuf),

    #[error("Login failed")]
    LoginFailed,

    #[error("Credential error: {0}")]
    CredentialError(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("File not provided")]
    NoInput,

    #[error("Command failed: {0}")]
    CommandFailed(String),
}

impl VaultError {
    /// True for errors caused by a malformed or incomplete container.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::InvalidFormat(_) | Self::Truncated)
    }
}

/// Convenience type alias for filevault results.
pub type Result<T> = std::result::Result<T, VaultError>;
