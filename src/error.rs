use thiserror::Error;

/// Errors raised while reading a frame.
///
/// Library errors are wrapped as-is so callers can match on the original
/// `std::io`, `tiff` or `hdf5` error.
#[derive(Debug, Error)]
pub enum FrameError {
    /// I/O error while opening or reading the file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TIFF decoding error
    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),

    /// HDF5 error (missing file or dataset, index out of bounds, ...)
    #[error("HDF5 error: {0}")]
    Hdf5(#[from] hdf5::Error),

    /// Decoded samples do not fit the reported image shape
    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// Dataset element type has no pixel representation
    #[error("Unsupported element type: {0}")]
    UnsupportedElementType(String),

    /// No reader is registered for the format tag
    #[error("No handler registered for spec {0:?}")]
    UnknownSpec(String),

    /// A reader was invoked without an argument it requires
    #[error("Handler for {spec} requires argument `{name}`")]
    MissingArgument { spec: String, name: String },

    /// A reader was invoked with an argument it does not accept
    #[error("Handler for {spec} got unexpected argument `{name}`")]
    UnexpectedArgument { spec: String, name: String },

    /// Datum document refers to a different resource
    #[error("Datum {datum_id} belongs to resource {expected}, not {actual}")]
    DatumMismatch {
        datum_id: String,
        expected: String,
        actual: String,
    },

    /// Image encoding error while writing a preview
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Array cannot be rendered as a 2-D preview
    #[error("Cannot render array of shape {0:?} as a preview")]
    PreviewShape(Vec<usize>),

    /// Frame appended to a stack has the wrong shape
    #[error("Frame shape {actual:?} does not match stack frame shape {expected:?}")]
    FrameShape {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Path cannot be stored in an HDF5 link
    #[error("Path is not valid UTF-8: {0:?}")]
    InvalidPath(std::path::PathBuf),

    /// Detector parameter cannot be stored
    #[error("Cannot store detector parameter `{key}`: {reason}")]
    Metadata { key: String, reason: String },
}

/// Errors related to format tags and container detection
#[derive(Debug, Error)]
pub enum FormatError {
    /// I/O error while reading the file header
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Format tag is not one of the built-in tags
    #[error("Unknown format spec: {0:?}")]
    UnknownSpec(String),

    /// Leading bytes match neither TIFF nor HDF5
    #[error("Unrecognized container: {reason}")]
    UnrecognizedContainer { reason: String },
}

/// Errors loading resource or datum documents
#[derive(Debug, Error)]
pub enum DocumentError {
    /// I/O error while reading the document file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document is not valid JSON or misses required fields
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
