//! Handler registry for dispatching resources to frame readers.
//!
//! The registry maps format specification tags to reader constructors:
//! - Built-in readers are registered under the tags they declare
//! - Additional readers can be registered for other tags
//! - A resource/datum document pair resolves to a pixel array in one call
//!
//! Opening a reader never touches the file, and nothing is cached: every
//! resolve constructs a fresh reader and performs one read.
//!
//! # Example
//!
//! ```ignore
//! use germ_frames::frame::{DatumKwargs, HandlerRegistry};
//!
//! let registry = HandlerRegistry::new();
//! let reader = registry.open("AD_HDF5_GERM", "/data/germ/frames.h5")?;
//! let frame = reader.read_frame(&DatumKwargs::frame(3))?;
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::error::FrameError;
use crate::format::{Hdf5FrameReader, TiffFrameReader};

use super::array::PixelArray;
use super::documents::{DatumDocument, ResourceDocument, RootMap};
use super::reader::FrameReader;

/// Constructor stored for each registered tag.
type ReaderFactory = fn(&Path) -> Box<dyn FrameReader>;

fn boxed_reader<R: FrameReader + 'static>(path: &Path) -> Box<dyn FrameReader> {
    Box::new(R::open(path))
}

// =============================================================================
// HandlerRegistry
// =============================================================================

/// Maps format specification tags to frame readers.
#[derive(Clone)]
pub struct HandlerRegistry {
    handlers: BTreeMap<String, ReaderFactory>,
}

impl HandlerRegistry {
    /// Create a registry with the built-in TIFF and HDF5 readers.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<TiffFrameReader>();
        registry.register::<Hdf5FrameReader>();
        registry
    }

    /// Create a registry with no readers.
    pub fn empty() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Register `R` under every tag it declares.
    ///
    /// A tag that is already registered is taken over by `R`.
    pub fn register<R: FrameReader + 'static>(&mut self) -> &mut Self {
        for spec in R::specs() {
            self.register_spec(spec.as_str(), boxed_reader::<R>);
        }
        self
    }

    /// Register a constructor under an arbitrary tag.
    pub fn register_spec(&mut self, spec: impl Into<String>, factory: ReaderFactory) -> &mut Self {
        let spec = spec.into();
        if self.handlers.insert(spec.clone(), factory).is_some() {
            debug!(spec = %spec, "replaced registered handler");
        }
        self
    }

    /// Registered tags, in sorted order.
    pub fn specs(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, spec: &str) -> bool {
        self.handlers.contains_key(spec)
    }

    /// Construct the reader registered for `spec`. Performs no I/O.
    pub fn open(
        &self,
        spec: &str,
        path: impl AsRef<Path>,
    ) -> Result<Box<dyn FrameReader>, FrameError> {
        let factory = self
            .handlers
            .get(spec)
            .ok_or_else(|| FrameError::UnknownSpec(spec.to_string()))?;
        Ok(factory(path.as_ref()))
    }

    /// Construct the reader for a resource document.
    ///
    /// The root is substituted through `root_map` before it is joined with the
    /// resource path. Readers take no constructor arguments, so a resource
    /// with `resource_kwargs` is rejected.
    pub fn open_resource(
        &self,
        resource: &ResourceDocument,
        root_map: &RootMap,
    ) -> Result<Box<dyn FrameReader>, FrameError> {
        if let Some(name) = resource.resource_kwargs.keys().next() {
            return Err(FrameError::UnexpectedArgument {
                spec: resource.spec.clone(),
                name: name.clone(),
            });
        }

        let path = resource.mapped_path(root_map);
        debug!(spec = %resource.spec, path = %path.display(), "opening resource");
        self.open(&resource.spec, path)
    }

    /// Read the frame a datum points at.
    ///
    /// When the resource carries a uid, the datum must reference it.
    pub fn resolve(
        &self,
        resource: &ResourceDocument,
        datum: &DatumDocument,
        root_map: &RootMap,
    ) -> Result<PixelArray, FrameError> {
        if let Some(uid) = &resource.uid {
            if *uid != datum.resource {
                return Err(FrameError::DatumMismatch {
                    datum_id: datum.datum_id.clone(),
                    expected: datum.resource.clone(),
                    actual: uid.clone(),
                });
            }
        }

        let reader = self.open_resource(resource, root_map)?;
        reader.read_frame(&datum.datum_kwargs)
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("specs", &self.specs())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
