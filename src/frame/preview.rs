//! Grayscale previews of frames.
//!
//! Detector frames are rarely 8-bit, so a preview is rescaled linearly from
//! the frame's finite `[min, max]` range to `[0, 255]`.

use std::path::Path;

use image::GrayImage;
use tracing::debug;

use crate::error::FrameError;

use super::array::PixelArray;

/// Render a frame as an 8-bit grayscale image.
///
/// Leading axes of length 1 are dropped first, so a TIFF frame of shape
/// `(1, H, W)` renders the same as an HDF5 frame of shape `(H, W)`. Anything
/// that is not 2-D after that fails with `FrameError::PreviewShape`.
pub fn render_preview(pixels: &PixelArray) -> Result<GrayImage, FrameError> {
    let squeezed = pixels.clone().squeeze_leading();
    let (height, width) = match *squeezed.shape() {
        [h, w] => (h, w),
        _ => return Err(FrameError::PreviewShape(pixels.shape().to_vec())),
    };
    let (width, height) = match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => return Err(FrameError::PreviewShape(pixels.shape().to_vec())),
    };

    let values = squeezed.to_f64_vec();
    let buffer = match squeezed.stats() {
        Some(stats) => values
            .iter()
            .map(|&v| scale_to_u8(v, stats.min, stats.max))
            .collect(),
        None => vec![0u8; values.len()],
    };

    GrayImage::from_raw(width, height, buffer)
        .ok_or_else(|| FrameError::PreviewShape(pixels.shape().to_vec()))
}

/// Render a frame and save it; the image format follows the file extension.
pub fn write_preview(pixels: &PixelArray, path: impl AsRef<Path>) -> Result<(), FrameError> {
    let path = path.as_ref();
    let image = render_preview(pixels)?;
    image.save(path)?;

    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "wrote preview"
    );
    Ok(())
}

/// Map `v` from `[min, max]` to `[0, 255]`.
///
/// Non-finite values and constant images map to 0.
fn scale_to_u8(v: f64, min: f64, max: f64) -> u8 {
    if !v.is_finite() || max <= min {
        return 0;
    }
    let scaled = (v - min) / (max - min) * 255.0;
    scaled.round().clamp(0.0, 255.0) as u8
}

// =============================================================================
// Tests
// =============================================================================
