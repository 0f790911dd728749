//! # germ-frames
//!
//! Frame readers for images captured by the GeRM detector.
//!
//! Acquisition writes frames either as one TIFF file per image or as a stack
//! of frames in an HDF5 dataset, and records each file as a *resource* tagged
//! with the format specification of the handler that can read it. This crate
//! provides those handlers, plus a small registry that turns a resource and a
//! datum into a pixel array.
//!
//! ## Features
//!
//! - **`AD_TIFF_GERM`**: reads the image in a TIFF file as a `(1, H, W)` array
//! - **`AD_HDF5_GERM`**: reads frame `i` of `/entry/data/data` as an `(H, W)` array
//! - **Scoped file access**: every read opens and closes its own file handle
//! - **Typed pixels**: arrays keep the element type stored on disk
//! - **Frame stacks**: write `AD_HDF5_GERM` stacks and their NeXus link files
//!
//! ## Architecture
//!
//! - [`mod@format`] - TIFF and HDF5 readers, stack writer, NeXus export, detection
//! - [`frame`] - `FrameReader` trait, pixel arrays, documents, handler registry
//! - [`report`] - Frame summaries printed by the CLI
//! - [`config`] - CLI configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use germ_frames::{Hdf5FrameReader, TiffFrameReader};
//!
//! let stack = Hdf5FrameReader::new("/data/germ/2024/01/31/3f2a.h5");
//! let frame = stack.read(0)?;
//! println!("frame 0: {:?} {}", frame.shape(), frame.pixel_type());
//!
//! let image = TiffFrameReader::new("/data/germ/2024/01/31/9c1e.tiff");
//! let wrapped = image.read()?;
//! assert_eq!(wrapped.shape()[0], 1);
//! # Ok::<(), germ_frames::FrameError>(())
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod frame;
pub mod report;

// Re-export commonly used types
pub use config::{
    Cli, Command, DetectConfig, NexusConfig, OutputArgs, OutputFormat, ReadConfig, ResolveConfig,
};
pub use error::{DocumentError, FormatError, FrameError};
pub use format::{
    detect_container, export_resource, is_tiff_header, nexus_path, normalize_path, write_nexus,
    ContainerKind, DetectorParameters, DetectorValue, FormatSpec, FrameStackWriter,
    Hdf5FrameReader, StackAcquisition, TiffFrameReader, DATASET_PATH,
};
pub use frame::{
    render_preview, write_preview, DatumDocument, DatumKwargs, FrameReader, HandlerRegistry,
    Pixel, PixelArray, PixelStats, PixelType, ResourceDocument, RootMap,
};
pub use report::FrameReport;
