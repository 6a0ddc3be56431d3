//! Fixed-layout container headers.
//!
//! Legacy (`SIMPL1`) container:
//!
//! ```text
//! [SIMPL1: 6][salt: 16][nonce: 12][ciphertext + 16-byte tag]
//! ```
//!
//! Streaming (`SEALv1`) container:
//!
//! ```text
//! [SEALv1: 6][version: u16 LE][kdf_mem_kib: u32 LE][kdf_opslimit: u32 LE]
//! [salt: 16][stream header: 19][chunk_0]...[chunk_N (final)]
//! ```
//!
//! The first 32 bytes of a stream header (magic through salt) are bound as
//! associated data on every chunk.  The 19-byte stream header is the nonce
//! prefix of the STREAM construction and is not part of the AAD.

use crate::crypto::kdf::{KdfParams, SALT_LEN};
use crate::errors::{Result, VaultError};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic bytes at the start of every legacy container.
pub const LEGACY_MAGIC: &[u8; 6] = b"SIMPL1";

/// Magic bytes at the start of every streaming container.
pub const STREAM_MAGIC: &[u8; 6] = b"SEALv1";

/// Length of either magic.
pub const MAGIC_LEN: usize = 6;

/// Current streaming format version.
pub const STREAM_VERSION: u16 = 1;

/// ChaCha20-Poly1305 (IETF) nonce length.
pub const LEGACY_NONCE_LEN: usize = 12;

/// STREAM nonce prefix length for XChaCha20-Poly1305 (24 - 4 counter - 1 flag).
pub const STREAM_NONCE_PREFIX_LEN: usize = 19;

// ---------------------------------------------------------------------------
// LegacyHeader
// ---------------------------------------------------------------------------

/// Header of a whole-file `SIMPL1` container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyHeader {
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; LEGACY_NONCE_LEN],
}

impl LegacyHeader {
    /// Encoded size: magic + salt + nonce.
    pub const LEN: usize = MAGIC_LEN + SALT_LEN + LEGACY_NONCE_LEN;

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut out = [0u8; Self::LEN];
        out[..MAGIC_LEN].copy_from_slice(LEGACY_MAGIC);
        out[MAGIC_LEN..MAGIC_LEN + SALT_LEN].copy_from_slice(&self.salt);
        out[MAGIC_LEN + SALT_LEN..].copy_from_slice(&self.nonce);
        out
    }

    /// Parse the header at the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < Self::LEN {
            return Err(VaultError::InvalidFormat(
                "file too small to be a valid container".into(),
            ));
        }
        if &data[..MAGIC_LEN] != LEGACY_MAGIC {
            return Err(VaultError::InvalidFormat("missing SIMPL1 magic bytes".into()));
        }

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&data[MAGIC_LEN..MAGIC_LEN + SALT_LEN]);
        let mut nonce = [0u8; LEGACY_NONCE_LEN];
        nonce.copy_from_slice(&data[MAGIC_LEN + SALT_LEN..Self::LEN]);

        Ok(Self { salt, nonce })
    }
}

// ---------------------------------------------------------------------------
// StreamHeader
// ---------------------------------------------------------------------------

/// Header of a chunked `SEALv1` container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamHeader {
    pub version: u16,
    pub kdf: KdfParams,
    pub salt: [u8; SALT_LEN],
    pub nonce_prefix: [u8; STREAM_NONCE_PREFIX_LEN],
}

impl StreamHeader {
    /// Bytes bound as AAD: magic, version, KDF cost and salt.
    pub const AAD_LEN: usize = MAGIC_LEN + 2 + 4 + 4 + SALT_LEN;

    /// Encoded size including the stream nonce prefix.
    pub const LEN: usize = Self::AAD_LEN + STREAM_NONCE_PREFIX_LEN;

    pub fn new(
        kdf: KdfParams,
        salt: [u8; SALT_LEN],
        nonce_prefix: [u8; STREAM_NONCE_PREFIX_LEN],
    ) -> Self {
        Self {
            version: STREAM_VERSION,
            kdf,
            salt,
            nonce_prefix,
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut out = [0u8; Self::LEN];
        out[..Self::AAD_LEN].copy_from_slice(&self.aad());
        out[Self::AAD_LEN..].copy_from_slice(&self.nonce_prefix);
        out
    }

    /// The associated data authenticated with every chunk.
    pub fn aad(&self) -> [u8; Self::AAD_LEN] {
        let mut aad = [0u8; Self::AAD_LEN];
        aad[0..6].copy_from_slice(STREAM_MAGIC);
        aad[6..8].copy_from_slice(&self.version.to_le_bytes());
        aad[8..12].copy_from_slice(&self.kdf.memory_kib.to_le_bytes());
        aad[12..16].copy_from_slice(&self.kdf.iterations.to_le_bytes());
        aad[16..32].copy_from_slice(&self.salt);
        aad
    }

    /// Parse and validate (magic, version) a stream header.
    ///
    /// The KDF cost is returned as stored; it is validated when the key is
    /// derived.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < Self::LEN {
            return Err(VaultError::InvalidFormat(
                "short or missing stream header".into(),
            ));
        }
        if &data[..MAGIC_LEN] != STREAM_MAGIC {
            return Err(VaultError::InvalidFormat(
                "bad magic: not a SEALv1 container".into(),
            ));
        }

        let version = u16::from_le_bytes([data[6], data[7]]);
        if version != STREAM_VERSION {
            return Err(VaultError::InvalidFormat(format!(
                "unsupported version {version}, expected {STREAM_VERSION}"
            )));
        }

        let memory_kib = u32::from_le_bytes([data[8], data[9], data[10], data[11]]);
        let iterations = u32::from_le_bytes([data[12], data[13], data[14], data[15]]);

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&data[16..Self::AAD_LEN]);
        let mut nonce_prefix = [0u8; STREAM_NONCE_PREFIX_LEN];
        nonce_prefix.copy_from_slice(&data[Self::AAD_LEN..Self::LEN]);

        Ok(Self {
            version,
            kdf: KdfParams {
                memory_kib,
                iterations,
            },
            salt,
            nonce_prefix,
        })
    }
}
