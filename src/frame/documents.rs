//! Resource and datum documents.
//!
//! The acquisition side records where frames were written as a pair of
//! documents: a *resource* naming the file, the format tag of the handler that
//! reads it, and the root directory it was written under; and one *datum* per
//! frame carrying the arguments for a single read.
//!
//! ```text
//! resource: {"spec": "AD_HDF5_GERM", "root": "/nsls2/data/hex/assets/germ",
//!            "resource_path": "2024/01/31/3f2a.h5", "resource_kwargs": {},
//!            "uid": "5b1c..."}
//! datum:    {"datum_id": "5b1c.../0", "resource": "5b1c...",
//!            "datum_kwargs": {"frame": 0}}
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DocumentError;

use super::reader::DatumKwargs;

/// A stored file and the format tag of the handler that reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDocument {
    /// Format specification tag
    pub spec: String,

    /// Root directory the file was written under
    pub root: PathBuf,

    /// File path relative to `root`
    pub resource_path: PathBuf,

    /// Constructor arguments for the handler
    #[serde(default)]
    pub resource_kwargs: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    /// Path convention of `root` and `resource_path` ("posix" or "windows")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_semantics: Option<String>,
}

impl ResourceDocument {
    /// Create a resource with no constructor arguments.
    pub fn new(
        spec: impl Into<String>,
        root: impl Into<PathBuf>,
        resource_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            spec: spec.into(),
            root: root.into(),
            resource_path: resource_path.into(),
            resource_kwargs: Map::new(),
            uid: None,
            path_semantics: None,
        }
    }

    /// Set the resource uid.
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    /// Path of the stored file: `root / resource_path`.
    pub fn full_path(&self) -> PathBuf {
        self.root.join(&self.resource_path)
    }

    /// Path of the stored file after substituting the root through `root_map`.
    pub fn mapped_path(&self, root_map: &RootMap) -> PathBuf {
        root_map.apply(&self.root).join(&self.resource_path)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        load_json(path.as_ref())
    }
}

/// Arguments for reading one piece of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatumDocument {
    pub datum_id: String,

    /// Uid of the resource this datum belongs to
    pub resource: String,

    #[serde(default)]
    pub datum_kwargs: DatumKwargs,
}

impl DatumDocument {
    /// Create a datum for `resource`.
    ///
    /// The id follows the `{resource}/{index}` convention.
    pub fn new(resource: impl Into<String>, index: usize, datum_kwargs: DatumKwargs) -> Self {
        let resource = resource.into();
        Self {
            datum_id: format!("{resource}/{index}"),
            resource,
            datum_kwargs,
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        load_json(path.as_ref())
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, DocumentError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

// =============================================================================
// Root Map
// =============================================================================

/// Substitutions for resource roots.
///
/// Data written under one root is often read from another mount point. A root
/// map rewrites a resource's `root` before it is joined with the resource path.
/// Only an exact match of the whole root is replaced; the first match wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootMap {
    entries: Vec<(PathBuf, PathBuf)>,
}

impl RootMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a substitution from `from` to `to`.
    pub fn with(mut self, from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        self.insert(from, to);
        self
    }

    pub fn insert(&mut self, from: impl Into<PathBuf>, to: impl Into<PathBuf>) {
        self.entries.push((from.into(), to.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Root to use in place of `root`.
    pub fn apply<'a>(&'a self, root: &'a Path) -> &'a Path {
        self.entries
            .iter()
            .find(|(from, _)| from.as_path() == root)
            .map(|(_, to)| to.as_path())
            .unwrap_or(root)
    }
}

impl FromIterator<(PathBuf, PathBuf)> for RootMap {
    fn from_iter<I: IntoIterator<Item = (PathBuf, PathBuf)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
