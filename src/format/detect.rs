//! Container detection for frame files.
//!
//! This module identifies the container a file uses by examining its magic
//! bytes. Currently supports:
//!
//! - **TIFF / BigTIFF**: `II` or `MM` byte order marker followed by version 42 or 43
//! - **HDF5**: the 8-byte format signature, at offset 0 or after a user block
//!
//! Detection is a diagnostic. Readers never call it: a resource is read with
//! the handler its format tag names, whatever the file contains.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::FormatError;

use super::spec::FormatSpec;

// =============================================================================
// ContainerKind
// =============================================================================

/// Detected container kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Classic TIFF (version 42)
    Tiff,

    /// BigTIFF (version 43)
    BigTiff,

    /// HDF5 file
    Hdf5,
}

impl ContainerKind {
    /// Get a human-readable name for the container.
    pub const fn name(&self) -> &'static str {
        match self {
            ContainerKind::Tiff => "TIFF",
            ContainerKind::BigTiff => "BigTIFF",
            ContainerKind::Hdf5 => "HDF5",
        }
    }

    /// Format tag of the built-in reader for this container.
    pub const fn suggested_spec(&self) -> FormatSpec {
        match self {
            ContainerKind::Tiff | ContainerKind::BigTiff => FormatSpec::AdTiffGerm,
            ContainerKind::Hdf5 => FormatSpec::AdHdf5Germ,
        }
    }
}

// =============================================================================
// Container Detection
// =============================================================================

/// Size of the classic TIFF header.
pub const TIFF_HEADER_SIZE: usize = 8;

/// HDF5 format signature.
pub const HDF5_SIGNATURE: [u8; 8] = [0x89, b'H', b'D', b'F', b'\r', b'\n', 0x1A, b'\n'];

/// Smallest non-zero offset of the HDF5 signature (user block size).
const HDF5_MIN_USER_BLOCK: usize = 512;

/// How far into the file to look for an HDF5 signature.
const MAX_PROBE_BYTES: usize = 8192;

/// Detect the container of a file on disk.
///
/// Reads at most the first 8 KiB of the file.
///
/// # Returns
/// * `Ok(ContainerKind)` - The detected container
/// * `Err(FormatError::UnrecognizedContainer)` - Neither TIFF nor HDF5
/// * `Err(FormatError::Io)` - The file could not be read
pub fn detect_container(path: impl AsRef<Path>) -> Result<ContainerKind, FormatError> {
    let mut probe = Vec::with_capacity(MAX_PROBE_BYTES);
    File::open(path.as_ref())?
        .take(MAX_PROBE_BYTES as u64)
        .read_to_end(&mut probe)?;

    detect_container_from_bytes(&probe)
}

/// Detect the container from the leading bytes of a file.
pub fn detect_container_from_bytes(bytes: &[u8]) -> Result<ContainerKind, FormatError> {
    if let Some(kind) = tiff_kind(bytes) {
        return Ok(kind);
    }

    if find_hdf5_signature(bytes).is_some() {
        return Ok(ContainerKind::Hdf5);
    }

    let reason = if bytes.len() < TIFF_HEADER_SIZE {
        format!("file too small ({} bytes)", bytes.len())
    } else {
        "no TIFF or HDF5 signature".to_string()
    };
    Err(FormatError::UnrecognizedContainer { reason })
}

/// Check if bytes represent a valid TIFF or BigTIFF header.
pub fn is_tiff_header(bytes: &[u8]) -> bool {
    tiff_kind(bytes).is_some()
}

fn tiff_kind(bytes: &[u8]) -> Option<ContainerKind> {
    if bytes.len() < TIFF_HEADER_SIZE {
        return None;
    }

    let version = match &bytes[0..2] {
        b"II" => u16::from_le_bytes([bytes[2], bytes[3]]),
        b"MM" => u16::from_be_bytes([bytes[2], bytes[3]]),
        _ => return None,
    };

    match version {
        42 => Some(ContainerKind::Tiff),
        43 => Some(ContainerKind::BigTiff),
        _ => None,
    }
}

/// Find the offset of the HDF5 signature.
///
/// The signature sits at offset 0, or right after a user block whose size is
/// a power of two of at least 512 bytes.
pub fn find_hdf5_signature(bytes: &[u8]) -> Option<usize> {
    let offsets = std::iter::once(0).chain(
        std::iter::successors(Some(HDF5_MIN_USER_BLOCK), |o| o.checked_mul(2))
            .take_while(|&o| o < bytes.len()),
    );

    for offset in offsets {
        if bytes[offset..].starts_with(&HDF5_SIGNATURE) {
            return Some(offset);
        }
    }
    None
}

// =============================================================================
// Tests
// =============================================================================
