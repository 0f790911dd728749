//! Test utilities for integration tests.
//!
//! This module provides helpers for writing TIFF images and HDF5 frame stacks
//! with known contents into temporary directories.

use std::fs::File;
use std::path::Path;

use hdf5::H5Type;
use ndarray::{Array2, Array3, ArrayD};
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::{colortype, TiffEncoder};

// =============================================================================
// TIFF Fixtures
// =============================================================================

/// Row-major 16-bit test pattern: `value = row * 100 + col`.
pub fn gray16_pattern(width: u32, height: u32) -> Vec<u16> {
    (0..height)
        .flat_map(|r| (0..width).map(move |c| (r * 100 + c) as u16))
        .collect()
}

/// Write a 16-bit grayscale TIFF.
pub fn write_gray16_tiff(path: &Path, width: u32, height: u32, data: &[u16]) {
    let file = File::create(path).unwrap();
    let mut encoder = TiffEncoder::new(file).unwrap();
    encoder
        .write_image::<colortype::Gray16>(width, height, data)
        .unwrap();
}

/// Write an 8-bit grayscale TIFF.
pub fn write_gray8_tiff(path: &Path, width: u32, height: u32, data: &[u8]) {
    let file = File::create(path).unwrap();
    let mut encoder = TiffEncoder::new(file).unwrap();
    encoder
        .write_image::<colortype::Gray8>(width, height, data)
        .unwrap();
}

/// Write an 8-bit RGB TIFF (interleaved samples).
pub fn write_rgb8_tiff(path: &Path, width: u32, height: u32, data: &[u8]) {
    let file = File::create(path).unwrap();
    let mut encoder = TiffEncoder::new(file).unwrap();
    encoder
        .write_image::<colortype::RGB8>(width, height, data)
        .unwrap();
}

/// Write a 32-bit float grayscale TIFF.
pub fn write_gray32f_tiff(path: &Path, width: u32, height: u32, data: &[f32]) {
    let file = File::create(path).unwrap();
    let mut encoder = TiffEncoder::new(file).unwrap();
    encoder
        .write_image::<colortype::Gray32Float>(width, height, data)
        .unwrap();
}

/// Decode a 16-bit TIFF directly, without going through the frame reader.
pub fn decode_gray16_directly(path: &Path) -> Array2<u16> {
    let mut decoder = Decoder::new(File::open(path).unwrap()).unwrap();
    let (width, height) = decoder.dimensions().unwrap();
    match decoder.read_image().unwrap() {
        DecodingResult::U16(v) => {
            Array2::from_shape_vec((height as usize, width as usize), v).unwrap()
        }
        _ => panic!("expected 16-bit samples"),
    }
}

// =============================================================================
// HDF5 Fixtures
// =============================================================================

/// Frame stack where every value encodes its position:
/// `value = frame * 1000 + row * 10 + col`.
pub fn frame_stack(frames: usize, height: usize, width: usize) -> Array3<f32> {
    Array3::from_shape_fn((frames, height, width), |(f, r, c)| {
        (f * 1000 + r * 10 + c) as f32
    })
}

/// Write `data` to `/entry/data/data`, the layout the acquisition side uses.
pub fn write_frame_stack<T: H5Type>(path: &Path, data: &ArrayD<T>) {
    let file = hdf5::File::create(path).unwrap();
    let group = file
        .create_group("entry")
        .unwrap()
        .create_group("data")
        .unwrap();
    group
        .new_dataset_builder()
        .with_data(data)
        .create("data")
        .unwrap();
}

/// Write a dataset at some path other than `/entry/data/data`.
pub fn write_misplaced_stack(path: &Path, data: &Array3<f32>) {
    let file = hdf5::File::create(path).unwrap();
    let group = file.create_group("entry").unwrap();
    group
        .new_dataset_builder()
        .with_data(data)
        .create("frames")
        .unwrap();
}

// =============================================================================
// Documents
// =============================================================================

/// Write a JSON document to `path`.
pub fn write_json(path: &Path, value: &serde_json::Value) {
    std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}
