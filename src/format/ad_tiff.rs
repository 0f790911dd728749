//! Single-image TIFF reader (`AD_TIFF_GERM`).
//!
//! Each acquisition writes one GeRM image per TIFF file, so a resource holds
//! exactly one frame. The reader returns it with an extra leading axis of
//! length 1, matching the frame-stack layout of the HDF5 reader's dataset.

use std::fs::File;
use std::io::BufReader;
use std::path::{Component, Path, PathBuf};

use ndarray::{ArrayD, IxDyn};
use tiff::decoder::{Decoder, DecodingResult};
use tracing::{debug, trace};

use crate::error::FrameError;
use crate::frame::{DatumKwargs, FrameReader, PixelArray};

use super::spec::FormatSpec;

/// Reader for one image stored in a TIFF file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TiffFrameReader {
    /// Normalized path of the TIFF file
    path: PathBuf,
}

impl TiffFrameReader {
    /// Declared format tags.
    pub const SPECS: &'static [FormatSpec] = &[FormatSpec::AdTiffGerm];

    /// Create a reader for `path`.
    ///
    /// The path is normalized lexically (see [`normalize_path`]); the file is
    /// not touched until [`read`](Self::read).
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: normalize_path(path.as_ref()),
        }
    }

    /// Normalized path of the TIFF file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decode the image and return it with shape `(1, H, W)` or `(1, H, W, C)`.
    ///
    /// The file is opened for this call only and is closed before returning,
    /// including when decoding fails.
    pub fn read(&self) -> Result<PixelArray, FrameError> {
        trace!(path = %self.path.display(), "opening TIFF file");
        let image = decode_tiff(&self.path)?;
        let frame = image.insert_leading_axis();

        debug!(
            path = %self.path.display(),
            shape = ?frame.shape(),
            dtype = %frame.pixel_type(),
            "read TIFF frame"
        );
        Ok(frame)
    }
}

impl FrameReader for TiffFrameReader {
    fn specs() -> &'static [FormatSpec] {
        Self::SPECS
    }

    fn open(path: &Path) -> Self {
        Self::new(path)
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn read_frame(&self, datum: &DatumKwargs) -> Result<PixelArray, FrameError> {
        if let Some(name) = datum.present().into_iter().next() {
            return Err(FrameError::UnexpectedArgument {
                spec: FormatSpec::AdTiffGerm.to_string(),
                name: name.to_string(),
            });
        }
        self.read()
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode the first image of a TIFF file into an `(H, W)` or `(H, W, C)` array.
///
/// The decoder owns the file handle, so it is dropped on every return path.
pub fn decode_tiff(path: &Path) -> Result<PixelArray, FrameError> {
    let file = File::open(path)?;
    let mut decoder = Decoder::new(BufReader::new(file))?;

    let (width, height) = decoder.dimensions()?;
    let image = decoder.read_image()?;

    let pixels = match image {
        DecodingResult::U8(v) => to_array(v, width, height)?,
        DecodingResult::U16(v) => to_array(v, width, height)?,
        DecodingResult::U32(v) => to_array(v, width, height)?,
        DecodingResult::U64(v) => to_array(v, width, height)?,
        DecodingResult::I8(v) => to_array(v, width, height)?,
        DecodingResult::I16(v) => to_array(v, width, height)?,
        DecodingResult::I32(v) => to_array(v, width, height)?,
        DecodingResult::I64(v) => to_array(v, width, height)?,
        DecodingResult::F32(v) => to_array(v, width, height)?,
        DecodingResult::F64(v) => to_array(v, width, height)?,
    };

    Ok(pixels)
}

/// Shape interleaved samples as `(H, W)` or `(H, W, C)`.
fn to_array<T>(samples: Vec<T>, width: u32, height: u32) -> Result<PixelArray, FrameError>
where
    ArrayD<T>: Into<PixelArray>,
{
    let shape = image_shape(samples.len(), width as usize, height as usize);
    let array = ArrayD::from_shape_vec(IxDyn(&shape), samples)?;
    Ok(array.into())
}

/// Image shape for `len` decoded samples.
///
/// One sample per pixel gives `(H, W)`; more gives a trailing channel axis.
fn image_shape(len: usize, width: usize, height: usize) -> Vec<usize> {
    let pixels = width * height;
    if pixels == 0 || len <= pixels {
        return vec![height, width];
    }
    vec![height, width, len / pixels]
}

// =============================================================================
// Path Normalization
// =============================================================================

/// Lexically normalize a path.
///
/// Repeated separators, `.` components (leading ones included) and a trailing
/// separator are removed. `..` components and symlinks are left alone; the
/// filesystem is never consulted. A path that ends up empty becomes `.`.
pub fn normalize_path(path: &Path) -> PathBuf {
    let normalized: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

// =============================================================================
// Tests
// =============================================================================
