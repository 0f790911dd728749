//! NeXus export of HDF5 frame stacks.
//!
//! When a run ends, every `AD_HDF5_GERM` resource gets a sibling `.nxs` file
//! (`3f2a.h5` -> `3f2a.nxs`) that:
//!
//! - links `/entry/data/data` externally to the frame stack in the `.h5` file
//! - stores the detector parameters as scalar datasets under
//!   `/entry/instrument/detector`
//!
//! The frames are not copied. The `.nxs` file has the stack layout, so
//! [`Hdf5FrameReader`](super::Hdf5FrameReader) reads frames through it.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use hdf5::types::VarLenUnicode;
use ndarray::arr0;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FrameError;
use crate::frame::{ResourceDocument, RootMap};

use super::ad_hdf5::DATASET_PATH;
use super::spec::FormatSpec;

/// Extension of exported NeXus files.
pub const NEXUS_EXTENSION: &str = "nxs";

/// Group holding the detector parameters.
pub const DETECTOR_GROUP: &str = "/entry/instrument/detector";

/// Parameters the GeRM detector reports for a run.
pub const GERM_DETECTOR_KEYS: [&str; 5] =
    ["count_time", "gain", "shaping_time", "hv_bias", "voltage"];

// =============================================================================
// Detector Parameters
// =============================================================================

/// One detector parameter value.
///
/// Stored as `int32`, `float32` or a variable-length UTF-8 string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetectorValue {
    Integer(i32),
    Float(f64),
    Text(String),
}

impl FromStr for DetectorValue {
    type Err = Infallible;

    /// Integers first, then floats; anything else is text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(v) = s.parse::<i32>() {
            return Ok(DetectorValue::Integer(v));
        }
        if let Ok(v) = s.parse::<f64>() {
            return Ok(DetectorValue::Float(v));
        }
        Ok(DetectorValue::Text(s.to_string()))
    }
}

impl From<i32> for DetectorValue {
    fn from(v: i32) -> Self {
        DetectorValue::Integer(v)
    }
}

impl From<f64> for DetectorValue {
    fn from(v: f64) -> Self {
        DetectorValue::Float(v)
    }
}

impl From<&str> for DetectorValue {
    fn from(v: &str) -> Self {
        DetectorValue::Text(v.to_string())
    }
}

/// Detector parameters by name.
pub type DetectorParameters = BTreeMap<String, DetectorValue>;

// =============================================================================
// Export
// =============================================================================

/// Path of the NeXus file for a frame stack: same directory and stem.
pub fn nexus_path(stack_path: &Path) -> PathBuf {
    stack_path.with_extension(NEXUS_EXTENSION)
}

/// Write a NeXus file at `nexus_file` that links to the frames in `stack_file`.
///
/// An existing file at `nexus_file` is replaced. The link stores
/// `stack_file` as given, so a relative path is resolved by HDF5 when the
/// link is followed.
pub fn write_nexus(
    nexus_file: &Path,
    stack_file: &Path,
    parameters: &DetectorParameters,
) -> Result<(), FrameError> {
    let target = stack_file
        .to_str()
        .ok_or_else(|| FrameError::InvalidPath(stack_file.to_path_buf()))?;

    let file = hdf5::File::create(nexus_file)?;
    let entry = file.create_group("entry")?;
    let data = entry.create_group("data")?;
    let detector = entry.create_group("instrument")?.create_group("detector")?;

    for (key, value) in parameters {
        write_parameter(&detector, key, value)?;
    }

    data.link_external(target, DATASET_PATH, "data")?;

    debug!(
        path = %nexus_file.display(),
        target = %stack_file.display(),
        parameters = parameters.len(),
        "wrote NeXus file"
    );
    Ok(())
}

/// Export the NeXus file for one resource.
///
/// Returns `None` for resources that are not `AD_HDF5_GERM` frame stacks.
pub fn export_resource(
    resource: &ResourceDocument,
    root_map: &RootMap,
    parameters: &DetectorParameters,
) -> Result<Option<PathBuf>, FrameError> {
    if resource.spec != FormatSpec::AdHdf5Germ.as_str() {
        debug!(spec = %resource.spec, "skipping resource without a frame stack");
        return Ok(None);
    }

    let stack_file = resource.mapped_path(root_map);
    let nexus_file = nexus_path(&stack_file);
    write_nexus(&nexus_file, &stack_file, parameters)?;
    Ok(Some(nexus_file))
}

fn write_parameter(
    group: &hdf5::Group,
    key: &str,
    value: &DetectorValue,
) -> Result<(), FrameError> {
    let builder = group.new_dataset_builder();
    match value {
        DetectorValue::Integer(v) => builder.with_data(&arr0(*v)).create(key)?,
        DetectorValue::Float(v) => builder.with_data(&arr0(*v as f32)).create(key)?,
        DetectorValue::Text(v) => {
            let text = VarLenUnicode::from_str(v).map_err(|e| FrameError::Metadata {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
            builder.with_data(&arr0(text)).create(key)?
        }
    };
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
