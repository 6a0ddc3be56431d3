//! Password-based key derivation using Argon2id.
//!
//! Every encryption derives a fresh 32-byte key from the password and a
//! fresh random salt.  The cost actually used is recorded in the stream
//! header, so decryption never hardcodes it and later versions can raise
//! the cost without breaking old files.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{Result, VaultError};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Argon2 lanes.  Not recorded in any header, so it can never change.
const LANES: u32 = 1;

/// Minimum accepted memory cost in KiB (8 MB).
const MIN_MEMORY_KIB: u32 = 8_192;

/// Maximum accepted memory cost in KiB (1 GB).  The stream header's cost
/// is read before anything is authenticated, so this also caps what a
/// crafted file can make us allocate.
pub const MAX_MEMORY_KIB: u32 = 1_048_576;

/// Maximum accepted iteration count.
const MAX_ITERATIONS: u32 = 64;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes over memory.
    pub iterations: u32,
}

impl KdfParams {
    /// The "moderate" preset: 256 MB, 3 passes.
    ///
    /// Legacy containers do not record their cost, so they are always
    /// derived with this preset.
    pub const MODERATE: KdfParams = KdfParams {
        memory_kib: 262_144,
        iterations: 3,
    };

    /// Reject costs that are dangerously weak or that would exhaust memory.
    pub fn validate(&self) -> Result<()> {
        if self.memory_kib < MIN_MEMORY_KIB {
            return Err(VaultError::KeyDerivationFailed(format!(
                "Argon2 memory cost must be at least {MIN_MEMORY_KIB} KiB (got {})",
                self.memory_kib
            )));
        }
        if self.memory_kib > MAX_MEMORY_KIB {
            return Err(VaultError::KeyDerivationFailed(format!(
                "Argon2 memory cost {} KiB exceeds the {MAX_MEMORY_KIB} KiB limit",
                self.memory_kib
            )));
        }
        if self.iterations < 1 || self.iterations > MAX_ITERATIONS {
            return Err(VaultError::KeyDerivationFailed(format!(
                "Argon2 iterations must be between 1 and {MAX_ITERATIONS} (got {})",
                self.iterations
            )));
        }
        Ok(())
    }

    /// Build the `argon2` crate parameters for a given output length.
    pub(crate) fn to_argon2(self, output_len: Option<usize>) -> Result<Params> {
        self.validate()?;
        Params::new(self.memory_kib, self.iterations, LANES, output_len)
            .map_err(|e| VaultError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::MODERATE
    }
}

/// A 32-byte symmetric key that is wiped from memory when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    bytes: [u8; KEY_LEN],
}

impl SecretKey {
    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

/// Derive a 32-byte key from a password and salt using Argon2id.
///
/// The same password + salt + params always produce the same key.
pub fn derive_key(password: &[u8], salt: &[u8], params: &KdfParams) -> Result<SecretKey> {
    let argon2 = Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        params.to_argon2(Some(KEY_LEN))?,
    );

    let mut key = SecretKey {
        bytes: [0u8; KEY_LEN],
    };
    argon2
        .hash_password_into(password, salt, &mut key.bytes)
        .map_err(|e| VaultError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;

    Ok(key)
}

/// Generate a cryptographically random 16-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}
