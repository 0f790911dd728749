//! Frame stack writer for the `AD_HDF5_GERM` layout.
//!
//! Acquisition creates the stack when a run is staged and appends one frame
//! per trigger:
//!
//! - `/entry/data/data` is `float32` with shape `(1, H, W)`, filled with NaN
//! - the leading axis is unlimited, the frame axes are fixed
//! - chunks hold exactly one frame
//! - frame `i` is written by growing the leading axis to `i + 1` first
//!
//! [`StackAcquisition`] wraps a writer with the resource and datum documents
//! the readers resolve frames from.

use std::path::{Path, PathBuf};

use hdf5::{Dataset, Extent, SimpleExtents};
use ndarray::{Array3, ArrayView2};
use tracing::{debug, trace};

use crate::error::FrameError;
use crate::frame::{DatumDocument, DatumKwargs, ResourceDocument};

use super::ad_hdf5::{leading_index_selection, DATASET_PATH};
use super::spec::FormatSpec;

// =============================================================================
// FrameStackWriter
// =============================================================================

/// Writes frames into a new HDF5 frame stack.
///
/// The file stays open for the lifetime of the writer and is closed when the
/// writer is dropped or [`finish`](Self::finish)ed.
#[derive(Debug)]
pub struct FrameStackWriter {
    path: PathBuf,
    frame_shape: (usize, usize),
    frames_written: usize,
    dataset: Dataset,
    file: hdf5::File,
}

impl FrameStackWriter {
    /// Create the stack at `path` for frames of `frame_shape` `(H, W)`.
    ///
    /// Fails if `path` already exists. The dataset starts with one NaN frame,
    /// which the first [`append_frame`](Self::append_frame) overwrites.
    pub fn create(
        path: impl Into<PathBuf>,
        frame_shape: (usize, usize),
    ) -> Result<Self, FrameError> {
        let path = path.into();
        let (height, width) = frame_shape;

        let file = hdf5::File::create_excl(&path)?;
        let group = file.create_group("entry")?.create_group("data")?;

        let extents = SimpleExtents::from_vec(vec![
            Extent::resizable(1),
            Extent::fixed(height),
            Extent::fixed(width),
        ]);
        let dataset = group
            .new_dataset::<f32>()
            .chunk((1, height, width))
            .shape(extents)
            .create("data")?;
        dataset.write(&Array3::from_elem((1, height, width), f32::NAN))?;

        debug!(
            path = %path.display(),
            dataset = DATASET_PATH,
            height,
            width,
            "created frame stack"
        );

        Ok(Self {
            path,
            frame_shape,
            frames_written: 0,
            dataset,
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Frame shape `(H, W)`.
    pub fn frame_shape(&self) -> (usize, usize) {
        self.frame_shape
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    /// Append a frame and return its index.
    ///
    /// The leading axis is grown to `index + 1` before the frame is written.
    pub fn append_frame(&mut self, frame: ArrayView2<'_, f32>) -> Result<usize, FrameError> {
        if frame.dim() != self.frame_shape {
            return Err(FrameError::FrameShape {
                expected: vec![self.frame_shape.0, self.frame_shape.1],
                actual: frame.shape().to_vec(),
            });
        }

        let index = self.frames_written;
        let (height, width) = self.frame_shape;
        self.dataset.resize((index + 1, height, width))?;
        self.dataset
            .write_slice(frame, leading_index_selection(index, 3))?;
        self.frames_written += 1;

        trace!(path = %self.path.display(), index, "appended frame");
        Ok(index)
    }

    /// Flush and close the file. Returns the number of frames written.
    pub fn finish(self) -> Result<usize, FrameError> {
        self.file.flush()?;
        debug!(
            path = %self.path.display(),
            frames = self.frames_written,
            "closed frame stack"
        );
        Ok(self.frames_written)
    }
}

// =============================================================================
// StackAcquisition
// =============================================================================

/// A frame stack together with its resource and datum documents.
///
/// Staging creates the file at `root / resource_path` and the resource
/// document; every trigger appends a frame and returns the datum selecting it.
#[derive(Debug)]
pub struct StackAcquisition {
    resource: ResourceDocument,
    writer: FrameStackWriter,
}

impl StackAcquisition {
    /// Create the stack file and its `AD_HDF5_GERM` resource document.
    pub fn stage(
        root: impl Into<PathBuf>,
        resource_path: impl Into<PathBuf>,
        uid: impl Into<String>,
        frame_shape: (usize, usize),
    ) -> Result<Self, FrameError> {
        let resource = ResourceDocument::new(FormatSpec::AdHdf5Germ.as_str(), root, resource_path)
            .with_uid(uid);
        let writer = FrameStackWriter::create(resource.full_path(), frame_shape)?;
        Ok(Self { resource, writer })
    }

    pub fn resource(&self) -> &ResourceDocument {
        &self.resource
    }

    pub fn writer(&self) -> &FrameStackWriter {
        &self.writer
    }

    /// Append a frame and return the datum document that reads it back.
    pub fn trigger(&mut self, frame: ArrayView2<'_, f32>) -> Result<DatumDocument, FrameError> {
        let index = self.writer.append_frame(frame)?;
        let uid = self.resource.uid.clone().unwrap_or_default();
        Ok(DatumDocument::new(uid, index, DatumKwargs::frame(index)))
    }

    /// Close the stack file and hand back the resource document.
    pub fn unstage(self) -> Result<ResourceDocument, FrameError> {
        self.writer.finish()?;
        Ok(self.resource)
    }
}

// =============================================================================
// Tests
// =============================================================================
