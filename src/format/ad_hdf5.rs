//! Multi-frame HDF5 reader (`AD_HDF5_GERM`).
//!
//! During acquisition, frames are appended to a resizable dataset at
//! `/entry/data/data` with shape `(frames, height, width)`. A datum selects one
//! frame by its index along the leading axis.
//!
//! The reader never checks the index against the dataset's extent. The HDF5
//! selection rejects out-of-range indices and that error is returned as is.

use std::path::{Path, PathBuf};

use hdf5::types::{FloatSize, IntSize, TypeDescriptor};
use hdf5::{Dataset, H5Type, Hyperslab, Selection, SliceOrIndex};
use ndarray::IxDyn;
use tracing::{debug, trace};

use crate::error::FrameError;
use crate::frame::{DatumKwargs, FrameReader, Pixel, PixelArray};

use super::spec::FormatSpec;

/// Location of the frame stack inside the file.
pub const DATASET_PATH: &str = "/entry/data/data";

/// Reader for frames stacked in an HDF5 dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hdf5FrameReader {
    /// File name exactly as given
    filename: PathBuf,
}

impl Hdf5FrameReader {
    /// Declared format tags.
    pub const SPECS: &'static [FormatSpec] = &[FormatSpec::AdHdf5Germ];

    /// Create a reader for `filename`. The file is not opened.
    pub fn new(filename: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
        }
    }

    pub fn filename(&self) -> &Path {
        &self.filename
    }

    /// Read frame `frame`, i.e. `dataset[frame, ...]`.
    ///
    /// The file is opened read-only for this call and closed when the file
    /// and dataset handles drop at the end of it, on success or failure.
    ///
    /// # Errors
    ///
    /// * `FrameError::Hdf5` - the file or dataset is missing, or `frame` is
    ///   past the end of the leading axis
    /// * `FrameError::UnsupportedElementType` - the dataset does not hold
    ///   integers or floats
    pub fn read(&self, frame: usize) -> Result<PixelArray, FrameError> {
        trace!(path = %self.filename.display(), "opening HDF5 file");
        let file = hdf5::File::open(&self.filename)?;
        let dataset = file.dataset(DATASET_PATH)?;

        let pixels = read_leading_slice(&dataset, frame)?;

        debug!(
            path = %self.filename.display(),
            frame,
            shape = ?pixels.shape(),
            dtype = %pixels.pixel_type(),
            "read HDF5 frame"
        );
        Ok(pixels)
    }
}

impl FrameReader for Hdf5FrameReader {
    fn specs() -> &'static [FormatSpec] {
        Self::SPECS
    }

    fn open(path: &Path) -> Self {
        Self::new(path)
    }

    fn path(&self) -> &Path {
        &self.filename
    }

    fn read_frame(&self, datum: &DatumKwargs) -> Result<PixelArray, FrameError> {
        let frame = datum.frame.ok_or_else(|| FrameError::MissingArgument {
            spec: FormatSpec::AdHdf5Germ.to_string(),
            name: "frame".to_string(),
        })?;
        self.read(frame)
    }
}

// =============================================================================
// Slicing
// =============================================================================

/// Selection of `index` on axis 0 and everything on the remaining axes.
///
/// An index (rather than a one-element range) drops the leading axis from the
/// result.
pub fn leading_index_selection(index: usize, ndim: usize) -> Selection {
    let mut dims = Vec::with_capacity(ndim.max(1));
    dims.push(SliceOrIndex::Index(index));
    dims.extend((1..ndim).map(|_| SliceOrIndex::from(..)));
    Selection::from(Hyperslab::from(dims))
}

/// Read `dataset[index, ...]` in the dataset's own element type.
fn read_leading_slice(dataset: &Dataset, index: usize) -> Result<PixelArray, FrameError> {
    let selection = leading_index_selection(index, dataset.ndim());
    let descriptor = dataset.dtype()?.to_descriptor()?;

    match descriptor {
        TypeDescriptor::Unsigned(IntSize::U1) => read_as::<u8>(dataset, selection),
        TypeDescriptor::Unsigned(IntSize::U2) => read_as::<u16>(dataset, selection),
        TypeDescriptor::Unsigned(IntSize::U4) => read_as::<u32>(dataset, selection),
        TypeDescriptor::Unsigned(IntSize::U8) => read_as::<u64>(dataset, selection),
        TypeDescriptor::Integer(IntSize::U1) => read_as::<i8>(dataset, selection),
        TypeDescriptor::Integer(IntSize::U2) => read_as::<i16>(dataset, selection),
        TypeDescriptor::Integer(IntSize::U4) => read_as::<i32>(dataset, selection),
        TypeDescriptor::Integer(IntSize::U8) => read_as::<i64>(dataset, selection),
        TypeDescriptor::Float(FloatSize::U4) => read_as::<f32>(dataset, selection),
        TypeDescriptor::Float(FloatSize::U8) => read_as::<f64>(dataset, selection),
        other => Err(FrameError::UnsupportedElementType(format!("{other:?}"))),
    }
}

fn read_as<T: Pixel + H5Type>(
    dataset: &Dataset,
    selection: Selection,
) -> Result<PixelArray, FrameError> {
    let array = dataset.read_slice::<T, _, IxDyn>(selection)?;
    Ok(T::wrap(array))
}

// =============================================================================
// Tests
// =============================================================================
