//! Frame abstraction layer.
//!
//! This module provides a unified interface for reading detector frames
//! regardless of the file format they are stored in.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │   ResourceDocument + DatumDocument      │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │           HandlerRegistry               │
//! │  (format tag -> reader constructor)     │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │           FrameReader Trait             │
//! │  (open without I/O, read one frame)     │
//! └────────────────────┬────────────────────┘
//!                      │
//!          ┌───────────┴───────────┐
//!          ▼                       ▼
//! ┌─────────────────┐    ┌─────────────────────┐
//! │ TiffFrameReader │    │  Hdf5FrameReader    │
//! │ (AD_TIFF_GERM)  │    │  (AD_HDF5_GERM)     │
//! └─────────────────┘    └─────────────────────┘
//! ```

mod array;
mod documents;
mod preview;
mod reader;
mod registry;

pub use array::{Pixel, PixelArray, PixelStats, PixelType};
pub use documents::{DatumDocument, ResourceDocument, RootMap};
pub use preview::{render_preview, write_preview};
pub use reader::{DatumKwargs, FrameReader};
pub use registry::HandlerRegistry;
