//! Local credential store.
//!
//! A single file holds one Argon2id PHC string
//! (`$argon2id$v=19$m=...,t=...,p=1$<salt>$<hash>`).  It is written through
//! `atomic_write` with owner-only permissions.  Verification reads the cost
//! back from the string, so changing the configured cost never locks out an
//! existing user.

use std::fs;
use std::path::{Path, PathBuf};

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Version};
use zeroize::Zeroizing;

use crate::crypto::kdf::{generate_salt, KdfParams};
use crate::errors::{Result, VaultError};
use crate::storage::atomic_write;

/// Hash `password` into a PHC string with the given cost.
pub fn hash(password: &[u8], params: &KdfParams) -> Result<String> {
    let salt = SaltString::encode_b64(&generate_salt())
        .map_err(|e| VaultError::CredentialError(format!("salt encoding failed: {e}")))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.to_argon2(None)?);

    let phc = argon2
        .hash_password(password, &salt)
        .map_err(|e| VaultError::CredentialError(format!("could not create hash: {e}")))?;
    Ok(phc.to_string())
}

/// Check `password` against a stored PHC string.
///
/// Returns `Ok(false)` on mismatch and an error only if `stored` is not a
/// valid hash.
pub fn verify(stored: &str, password: &[u8]) -> Result<bool> {
    let parsed = PasswordHash::new(stored.trim())
        .map_err(|e| VaultError::CredentialError(format!("malformed credential file: {e}")))?;
    Ok(Argon2::default().verify_password(password, &parsed).is_ok())
}

/// The credential file at a fixed path.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Has a user been initialized?
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Hash `password` and persist it, replacing any previous credential.
    pub fn create(&self, password: &[u8], params: &KdfParams) -> Result<()> {
        let phc = Zeroizing::new(hash(password, params)?);
        atomic_write(&self.path, phc.as_bytes())?;
        tracing::debug!("credential file written: {}", self.path.display());
        Ok(())
    }

    /// Fail with `LoginFailed` unless `password` matches the stored hash.
    pub fn login(&self, password: &[u8]) -> Result<()> {
        if !self.exists() {
            return Err(VaultError::NotInitialized(self.path.clone()));
        }

        let stored = Zeroizing::new(fs::read_to_string(&self.path)?);
        if verify(&stored, password)? {
            Ok(())
        } else {
            Err(VaultError::LoginFailed)
        }
    }
}
