//! On-disk container formats.
//!
//! This module provides:
//! - Legacy `SIMPL1` and streaming `SEALv1` headers (`header`)
//! - Magic-byte detection used to pick a decryptor (`sniff`)

pub mod header;
pub mod sniff;

pub use header::{LegacyHeader, StreamHeader, LEGACY_MAGIC, STREAM_MAGIC, STREAM_VERSION};
pub use sniff::{sniff_bytes, sniff_file, ContainerFormat};
