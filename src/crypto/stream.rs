//! Chunked streaming `SEALv1` container.
//!
//! Plaintext is cut into 64 KiB chunks, each sealed with XChaCha20-Poly1305
//! under the STREAM construction (`EncryptorBE32`): a 19-byte random nonce
//! prefix, a 32-bit big-endian chunk counter and a last-chunk flag.  The
//! flag lives inside the nonce, so a reader that runs out of input before
//! it authenticates a last chunk knows the stream was cut short.
//!
//! Every chunk is bound to the first 32 header bytes (magic, version, KDF
//! cost, salt) as associated data.
//!
//! Framing rule: a non-final chunk always carries exactly `CHUNK_SIZE`
//! plaintext bytes, the final chunk strictly fewer (possibly zero).  An
//! input whose length is a multiple of `CHUNK_SIZE` therefore ends with an
//! empty final chunk.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use chacha20poly1305::aead::generic_array::GenericArray;
use chacha20poly1305::aead::stream::{DecryptorBE32, EncryptorBE32};
use chacha20poly1305::aead::{KeyInit, Payload};
use chacha20poly1305::{Key, XChaCha20Poly1305};
use rand::RngCore;
use zeroize::Zeroizing;

use super::kdf::{derive_key, generate_salt, KdfParams};
use crate::errors::{Result, VaultError};
use crate::format::header::{StreamHeader, STREAM_NONCE_PREFIX_LEN};
use crate::storage::{read_full, AtomicFile};

/// Maximum plaintext bytes per chunk.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Poly1305 tag appended to every chunk.
pub const TAG_LEN: usize = 16;

/// What a completed stream operation processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Number of chunks, including the final one.
    pub chunks: u64,
    /// Plaintext bytes encrypted or recovered.
    pub plaintext_bytes: u64,
}

/// Encrypt everything `reader` yields into a `SEALv1` stream on `writer`.
///
/// The header (with the KDF cost actually used) is written first, then the
/// chunks.  Exactly one final chunk is emitted, even for empty input.
pub fn encrypt_stream<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    password: &[u8],
    params: &KdfParams,
) -> Result<StreamStats> {
    let mut nonce_prefix = [0u8; STREAM_NONCE_PREFIX_LEN];
    rand::rng().fill_bytes(&mut nonce_prefix);
    let header = StreamHeader::new(*params, generate_salt(), nonce_prefix);
    let aad = header.aad();

    let key = derive_key(password, &header.salt, &header.kdf)?;
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    let mut encryptor =
        EncryptorBE32::from_aead(cipher, GenericArray::from_slice(&header.nonce_prefix));

    writer.write_all(&header.to_bytes())?;

    let mut stats = StreamStats::default();
    let mut buf = Zeroizing::new(vec![0u8; CHUNK_SIZE]);

    let last_len = loop {
        let n = read_full(reader, &mut buf)?;
        if n < CHUNK_SIZE {
            break n;
        }

        let chunk = encryptor
            .encrypt_next(Payload {
                msg: &buf[..],
                aad: &aad,
            })
            .map_err(|e| VaultError::EncryptionFailed(format!("chunk {}: {e}", stats.chunks)))?;
        writer.write_all(&chunk)?;

        stats.chunks += 1;
        stats.plaintext_bytes += n as u64;
    };

    let chunk = encryptor
        .encrypt_last(Payload {
            msg: &buf[..last_len],
            aad: &aad,
        })
        .map_err(|e| VaultError::EncryptionFailed(format!("final chunk: {e}")))?;
    writer.write_all(&chunk)?;
    writer.flush()?;

    stats.chunks += 1;
    stats.plaintext_bytes += last_len as u64;
    Ok(stats)
}

/// Read and validate a stream header, then derive its key.
///
/// Nothing has been written when this fails, so header tampering never
/// produces plaintext.
fn open_header<R: Read>(
    reader: &mut R,
    password: &[u8],
) -> Result<(StreamHeader, DecryptorBE32<XChaCha20Poly1305>)> {
    let mut raw = [0u8; StreamHeader::LEN];
    let n = read_full(reader, &mut raw)?;
    let header = StreamHeader::parse(&raw[..n])?;

    let key = derive_key(password, &header.salt, &header.kdf)?;
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    let decryptor =
        DecryptorBE32::from_aead(cipher, GenericArray::from_slice(&header.nonce_prefix));

    Ok((header, decryptor))
}

/// Decrypt a `SEALv1` stream from `reader`, writing plaintext to `writer`.
///
/// Fails with `Truncated` if input ends before the final chunk and with
/// `DecryptionFailed` as soon as any chunk fails authentication.  Chunks
/// authenticated before a failure have already been handed to `writer`;
/// use `decrypt_file` for all-or-nothing output.
pub fn decrypt_stream<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    password: &[u8],
) -> Result<StreamStats> {
    let (header, decryptor) = open_header(reader, password)?;
    decrypt_chunks(reader, writer, &header, decryptor)
}

fn decrypt_chunks<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    header: &StreamHeader,
    mut decryptor: DecryptorBE32<XChaCha20Poly1305>,
) -> Result<StreamStats> {
    let aad = header.aad();

    let mut stats = StreamStats::default();
    let mut buf = vec![0u8; CHUNK_SIZE + TAG_LEN];

    let last_len = loop {
        let n = read_full(reader, &mut buf)?;
        if n < buf.len() {
            break n;
        }

        let plaintext = Zeroizing::new(
            decryptor
                .decrypt_next(Payload {
                    msg: &buf[..],
                    aad: &aad,
                })
                .map_err(|_| VaultError::DecryptionFailed)?,
        );
        writer.write_all(&plaintext)?;

        stats.chunks += 1;
        stats.plaintext_bytes += plaintext.len() as u64;
    };

    // A short read must be the final chunk.  Anything smaller than a tag
    // (including nothing at all) means the final chunk is missing.
    if last_len < TAG_LEN {
        return Err(VaultError::Truncated);
    }

    let plaintext = Zeroizing::new(
        decryptor
            .decrypt_last(Payload {
                msg: &buf[..last_len],
                aad: &aad,
            })
            .map_err(|_| VaultError::DecryptionFailed)?,
    );
    writer.write_all(&plaintext)?;
    writer.flush()?;

    stats.chunks += 1;
    stats.plaintext_bytes += plaintext.len() as u64;
    Ok(stats)
}

/// Stream-encrypt `in_path` into `out_path`.
///
/// Output goes through an `AtomicFile`: `out_path` only appears once the
/// whole container has been written and synced.
pub fn encrypt_file(
    in_path: &Path,
    out_path: &Path,
    password: &[u8],
    params: &KdfParams,
) -> Result<StreamStats> {
    let mut input = File::open(in_path)?;
    let mut output = AtomicFile::create(out_path)?;

    let stats = encrypt_stream(&mut input, &mut output, password, params)?;
    output.commit()?;

    tracing::debug!(
        "encrypted {} -> {} ({} chunks, {} bytes)",
        in_path.display(),
        out_path.display(),
        stats.chunks,
        stats.plaintext_bytes
    );
    Ok(stats)
}

/// Stream-decrypt `in_path` into `out_path`.
///
/// On any failure the temp output is discarded and `out_path` is left as it
/// was, so a failed decrypt never leaves partial plaintext behind.
pub fn decrypt_file(in_path: &Path, out_path: &Path, password: &[u8]) -> Result<StreamStats> {
    let mut input = File::open(in_path)?;

    // The header is validated before any output exists.
    let (header, decryptor) = open_header(&mut input, password)?;

    let mut output = AtomicFile::create(out_path)?;
    let stats = decrypt_chunks(&mut input, &mut output, &header, decryptor)?;
    output.commit()?;

    tracing::debug!(
        "decrypted {} -> {} ({} chunks, {} bytes)",
        in_path.display(),
        out_path.display(),
        stats.chunks,
        stats.plaintext_bytes
    );
    Ok(stats)
}
