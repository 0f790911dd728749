//! Format specification tags.
//!
//! A resource document names the handler that can read it through a `spec`
//! string. These are the tags the readers in this crate declare.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// Built-in format specification tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FormatSpec {
    /// One GeRM image per TIFF file
    #[serde(rename = "AD_TIFF_GERM")]
    AdTiffGerm,

    /// GeRM frames stacked in an HDF5 dataset at `/entry/data/data`
    #[serde(rename = "AD_HDF5_GERM")]
    AdHdf5Germ,
}

impl FormatSpec {
    /// All built-in tags.
    pub const ALL: [FormatSpec; 2] = [FormatSpec::AdTiffGerm, FormatSpec::AdHdf5Germ];

    /// The tag string as it appears in resource documents.
    pub const fn as_str(&self) -> &'static str {
        match self {
            FormatSpec::AdTiffGerm => "AD_TIFF_GERM",
            FormatSpec::AdHdf5Germ => "AD_HDF5_GERM",
        }
    }

    /// Get a human-readable name for the format.
    pub const fn name(&self) -> &'static str {
        match self {
            FormatSpec::AdTiffGerm => "GeRM TIFF image",
            FormatSpec::AdHdf5Germ => "GeRM HDF5 frame stack",
        }
    }
}

impl fmt::Display for FormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatSpec {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|spec| spec.as_str() == s)
            .ok_or_else(|| FormatError::UnknownSpec(s.to_string()))
    }
}
