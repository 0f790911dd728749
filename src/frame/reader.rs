//! FrameReader trait for format-agnostic frame access.
//!
//! This module defines the `FrameReader` trait, the capability every frame
//! handler provides to a dispatcher: construct from a resource path without
//! touching the file, then read a frame given the datum's arguments.
//!
//! # Usage
//!
//! The trait is implemented by format-specific readers:
//! - [`crate::format::TiffFrameReader`] for single-image TIFF files
//! - [`crate::format::Hdf5FrameReader`] for multi-frame HDF5 datasets
//!
//! The trait is object safe, so a [`crate::frame::HandlerRegistry`] can hand
//! out `Box<dyn FrameReader>` for whichever tag a resource declares.

use std::fmt::Debug;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FrameError;
use crate::format::FormatSpec;

use super::array::PixelArray;

// =============================================================================
// Datum Arguments
// =============================================================================

/// Per-record arguments for a single read.
///
/// Deserialized from the `datum_kwargs` object of a datum document. Unknown
/// keys are rejected so a datum meant for another handler fails loudly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatumKwargs {
    /// Index along the leading (frame) axis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<usize>,
}

impl DatumKwargs {
    /// Arguments with no frame index (TIFF datums).
    pub const fn none() -> Self {
        Self { frame: None }
    }

    /// Arguments selecting one frame.
    pub const fn frame(frame: usize) -> Self {
        Self { frame: Some(frame) }
    }

    /// Names of the arguments that are set.
    pub fn present(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.frame.is_some() {
            names.push("frame");
        }
        names
    }
}

// =============================================================================
// FrameReader Trait
// =============================================================================

/// Capability contract of a frame handler.
///
/// Implementations hold only the resource path. Every call to
/// [`read_frame`](FrameReader::read_frame) opens the file, reads, and releases
/// the file before returning, whether or not the read succeeds.
pub trait FrameReader: Debug + Send + Sync {
    /// Format tags this reader declares to the dispatcher.
    fn specs() -> &'static [FormatSpec]
    where
        Self: Sized;

    /// Create a reader for a resource path. Performs no I/O.
    fn open(path: &Path) -> Self
    where
        Self: Sized;

    /// Path this reader resolves frames from.
    fn path(&self) -> &Path;

    /// Read the frame selected by `datum`.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments do not fit the handler, or if the
    /// underlying library fails to open or decode the file. Library errors
    /// are passed through without translation.
    fn read_frame(&self, datum: &DatumKwargs) -> Result<PixelArray, FrameError>;
}

// =============================================================================
// Tests
// =============================================================================
