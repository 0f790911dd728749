//! Format-specific frame readers and writers.
//!
//! Each reader handles one format specification tag:
//!
//! - **`AD_TIFF_GERM`**: [`TiffFrameReader`], one image per TIFF file
//! - **`AD_HDF5_GERM`**: [`Hdf5FrameReader`], frames stacked in `/entry/data/data`
//!
//! The acquisition side of `AD_HDF5_GERM` lives here too: [`FrameStackWriter`]
//! creates and appends to frame stacks, and [`nexus`] exports the linked
//! `.nxs` file for a finished run.
//!
//! Use [`detect::detect_container`] to check what a file actually contains.

pub mod ad_hdf5;
pub mod ad_tiff;
pub mod detect;
pub mod nexus;
pub mod spec;
pub mod stack_writer;

pub use ad_hdf5::{Hdf5FrameReader, DATASET_PATH};
pub use ad_tiff::{normalize_path, TiffFrameReader};
pub use detect::{detect_container, is_tiff_header, ContainerKind};
pub use nexus::{export_resource, nexus_path, write_nexus, DetectorParameters, DetectorValue};
pub use spec::FormatSpec;
pub use stack_writer::{FrameStackWriter, StackAcquisition};
