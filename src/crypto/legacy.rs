//! Legacy whole-file `SIMPL1` container.
//!
//! The whole input is read into memory and sealed with one
//! ChaCha20-Poly1305 (IETF) call, without associated data.  The key is
//! always derived with `KdfParams::MODERATE` because the header does not
//! record a cost.  Kept so that old files still open; new files use the
//! streaming format.

use std::fs;
use std::path::Path;

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use rand::RngCore;
use zeroize::Zeroizing;

use super::kdf::{derive_key, generate_salt, KdfParams};
use crate::errors::{Result, VaultError};
use crate::format::header::{LegacyHeader, LEGACY_NONCE_LEN};
use crate::storage::atomic_write;

/// Encrypt `plaintext` into a complete `SIMPL1` container.
pub fn seal(plaintext: &[u8], password: &[u8], params: &KdfParams) -> Result<Vec<u8>> {
    let mut nonce = [0u8; LEGACY_NONCE_LEN];
    rand::rng().fill_bytes(&mut nonce);
    let header = LegacyHeader {
        salt: generate_salt(),
        nonce,
    };

    let key = derive_key(password, &header.salt, params)?;
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&header.nonce), plaintext)
        .map_err(|e| VaultError::EncryptionFailed(format!("AEAD error: {e}")))?;

    let mut output = Vec::with_capacity(LegacyHeader::LEN + ciphertext.len());
    output.extend_from_slice(&header.to_bytes());
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

/// Decrypt a complete `SIMPL1` container.
///
/// A wrong password and a tampered file both yield `DecryptionFailed`.
pub fn open(container: &[u8], password: &[u8], params: &KdfParams) -> Result<Zeroizing<Vec<u8>>> {
    let header = LegacyHeader::parse(container)?;
    let ciphertext = &container[LegacyHeader::LEN..];

    let key = derive_key(password, &header.salt, params)?;
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    let plaintext = cipher
        .decrypt(Nonce::from_slice(&header.nonce), ciphertext)
        .map_err(|_| VaultError::DecryptionFailed)?;

    Ok(Zeroizing::new(plaintext))
}

/// Encrypt the file at `in_path` into `out_path` using the moderate preset.
pub fn encrypt_file(in_path: &Path, out_path: &Path, password: &[u8]) -> Result<()> {
    encrypt_file_with_params(in_path, out_path, password, &KdfParams::MODERATE)
}

/// Decrypt the file at `in_path` into `out_path` using the moderate preset.
pub fn decrypt_file(in_path: &Path, out_path: &Path, password: &[u8]) -> Result<()> {
    decrypt_file_with_params(in_path, out_path, password, &KdfParams::MODERATE)
}

/// Encrypt with an explicit KDF cost.
///
/// The cost is not stored, so the same params must be passed to decrypt.
pub fn encrypt_file_with_params(
    in_path: &Path,
    out_path: &Path,
    password: &[u8],
    params: &KdfParams,
) -> Result<()> {
    let plaintext = Zeroizing::new(fs::read(in_path)?);
    let container = seal(&plaintext, password, params)?;
    atomic_write(out_path, &container)?;

    tracing::debug!(
        "legacy-encrypted {} ({} bytes)",
        in_path.display(),
        plaintext.len()
    );
    Ok(())
}

/// Decrypt with an explicit KDF cost.
pub fn decrypt_file_with_params(
    in_path: &Path,
    out_path: &Path,
    password: &[u8],
    params: &KdfParams,
) -> Result<()> {
    let container = fs::read(in_path)?;
    let plaintext = open(&container, password, params)?;
    atomic_write(out_path, &plaintext)?;

    tracing::debug!(
        "legacy-decrypted {} ({} bytes)",
        in_path.display(),
        plaintext.len()
    );
    Ok(())
}
