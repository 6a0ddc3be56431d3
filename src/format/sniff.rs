//! Container detection from a file's leading bytes.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::header::{LEGACY_MAGIC, MAGIC_LEN, STREAM_MAGIC};
use crate::errors::Result;

/// Which container a file appears to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    Legacy,
    Stream,
    Unknown,
}

/// Classify a buffer by its magic bytes.
pub fn sniff_bytes(data: &[u8]) -> ContainerFormat {
    match data.get(..MAGIC_LEN) {
        Some(magic) if magic == LEGACY_MAGIC => ContainerFormat::Legacy,
        Some(magic) if magic == STREAM_MAGIC => ContainerFormat::Stream,
        _ => ContainerFormat::Unknown,
    }
}

/// Read at most the first six bytes of `path` and classify them.
///
/// Files shorter than a magic are `Unknown`, not an error.
pub fn sniff_file(path: &Path) -> Result<ContainerFormat> {
    let mut magic = Vec::with_capacity(MAGIC_LEN);
    File::open(path)?
        .take(MAGIC_LEN as u64)
        .read_to_end(&mut magic)?;
    Ok(sniff_bytes(&magic))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_both_magics() {
        assert_eq!(sniff_bytes(b"SIMPL1rest"), ContainerFormat::Legacy);
        assert_eq!(sniff_bytes(b"SEALv1\x01\x00"), ContainerFormat::Stream);
    }

    #[test]
    fn short_or_foreign_input_is_unknown() {
        assert_eq!(sniff_bytes(b""), ContainerFormat::Unknown);
        assert_eq!(sniff_bytes(b"SEAL"), ContainerFormat::Unknown);
        assert_eq!(sniff_bytes(b"hello world"), ContainerFormat::Unknown);
    }

    #[test]
    fn sniffs_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("x.enc");
        std::fs::write(&path, b"SIMPL1\x00\x00").unwrap();
        assert_eq!(sniff_file(&path).unwrap(), ContainerFormat::Legacy);

        std::fs::write(&path, b"ab").unwrap();
        assert_eq!(sniff_file(&path).unwrap(), ContainerFormat::Unknown);
    }
}
