//! Cryptographic engine for filevault.
//!
//! This module provides:
//! - Argon2id password-based key derivation (`kdf`)
//! - The legacy whole-file `SIMPL1` cipher (`legacy`)
//! - The chunked streaming `SEALv1` cipher (`stream`)

pub mod kdf;
pub mod legacy;
pub mod stream;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{derive_key, KdfParams, StreamStats, ...};
pub use kdf::{derive_key, generate_salt, KdfParams, SecretKey};
pub use stream::{decrypt_stream, encrypt_stream, StreamStats, CHUNK_SIZE};
