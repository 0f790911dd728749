//! Dynamically typed pixel arrays.
//!
//! Detector frames come in whatever element type the file stores: TIFF images
//! are usually `u8`/`u16`, HDF5 datasets written during acquisition are `f32`.
//! [`PixelArray`] carries an `ndarray::ArrayD` of the stored type together with
//! a tag, so callers can inspect the shape without knowing the type and
//! downcast when they do.

use std::fmt;

use ndarray::{ArrayD, Axis};
use serde::{Serialize, Serializer};

// =============================================================================
// Pixel Types
// =============================================================================

/// Element type of a [`PixelArray`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelType {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl PixelType {
    /// NumPy-style name of the element type.
    pub const fn name(&self) -> &'static str {
        match self {
            PixelType::U8 => "uint8",
            PixelType::U16 => "uint16",
            PixelType::U32 => "uint32",
            PixelType::U64 => "uint64",
            PixelType::I8 => "int8",
            PixelType::I16 => "int16",
            PixelType::I32 => "int32",
            PixelType::I64 => "int64",
            PixelType::F32 => "float32",
            PixelType::F64 => "float64",
        }
    }

    /// Size of one element in bytes.
    pub const fn size(&self) -> usize {
        match self {
            PixelType::U8 | PixelType::I8 => 1,
            PixelType::U16 | PixelType::I16 => 2,
            PixelType::U32 | PixelType::I32 | PixelType::F32 => 4,
            PixelType::U64 | PixelType::I64 | PixelType::F64 => 8,
        }
    }
}

impl fmt::Display for PixelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for PixelType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Element types that can be stored in a [`PixelArray`].
pub trait Pixel: Copy + Send + Sync + 'static {
    /// Tag for this element type.
    const TYPE: PixelType;

    /// Wrap an array of this type.
    fn wrap(array: ArrayD<Self>) -> PixelArray;

    /// Borrow the inner array if `pixels` holds this type.
    fn view(pixels: &PixelArray) -> Option<&ArrayD<Self>>;

    /// Take the inner array if `pixels` holds this type.
    fn take(pixels: PixelArray) -> Result<ArrayD<Self>, PixelArray>;

    /// Lossy conversion used for statistics and previews.
    fn to_f64(self) -> f64;
}

macro_rules! impl_pixel {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Pixel for $ty {
                const TYPE: PixelType = PixelType::$variant;

                fn wrap(array: ArrayD<Self>) -> PixelArray {
                    PixelArray::$variant(array)
                }

                fn view(pixels: &PixelArray) -> Option<&ArrayD<Self>> {
                    match pixels {
                        PixelArray::$variant(a) => Some(a),
                        _ => None,
                    }
                }

                fn take(pixels: PixelArray) -> Result<ArrayD<Self>, PixelArray> {
                    match pixels {
                        PixelArray::$variant(a) => Ok(a),
                        other => Err(other),
                    }
                }

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }

            impl From<ArrayD<$ty>> for PixelArray {
                fn from(array: ArrayD<$ty>) -> Self {
                    PixelArray::$variant(array)
                }
            }
        )*
    };
}

impl_pixel! {
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
}

// =============================================================================
// PixelArray
// =============================================================================

/// A dense N-dimensional array of pixels tagged with its element type.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelArray {
    U8(ArrayD<u8>),
    U16(ArrayD<u16>),
    U32(ArrayD<u32>),
    U64(ArrayD<u64>),
    I8(ArrayD<i8>),
    I16(ArrayD<i16>),
    I32(ArrayD<i32>),
    I64(ArrayD<i64>),
    F32(ArrayD<f32>),
    F64(ArrayD<f64>),
}

/// Evaluate `$body` with `$a` bound to the inner array, whatever its type.
macro_rules! with_array {
    ($pixels:expr, $a:ident => $body:expr) => {
        match $pixels {
            PixelArray::U8($a) => $body,
            PixelArray::U16($a) => $body,
            PixelArray::U32($a) => $body,
            PixelArray::U64($a) => $body,
            PixelArray::I8($a) => $body,
            PixelArray::I16($a) => $body,
            PixelArray::I32($a) => $body,
            PixelArray::I64($a) => $body,
            PixelArray::F32($a) => $body,
            PixelArray::F64($a) => $body,
        }
    };
}

/// Summary statistics over the finite values of an array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl PixelArray {
    /// Element type of the array.
    pub fn pixel_type(&self) -> PixelType {
        match self {
            PixelArray::U8(_) => PixelType::U8,
            PixelArray::U16(_) => PixelType::U16,
            PixelArray::U32(_) => PixelType::U32,
            PixelArray::U64(_) => PixelType::U64,
            PixelArray::I8(_) => PixelType::I8,
            PixelArray::I16(_) => PixelType::I16,
            PixelArray::I32(_) => PixelType::I32,
            PixelArray::I64(_) => PixelType::I64,
            PixelArray::F32(_) => PixelType::F32,
            PixelArray::F64(_) => PixelType::F64,
        }
    }

    pub fn shape(&self) -> &[usize] {
        with_array!(self, a => a.shape())
    }

    pub fn ndim(&self) -> usize {
        with_array!(self, a => a.ndim())
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        with_array!(self, a => a.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add an axis of length 1 in front of the existing axes.
    ///
    /// `(H, W)` becomes `(1, H, W)`.
    pub fn insert_leading_axis(self) -> Self {
        with_array!(self, a => a.insert_axis(Axis(0)).into())
    }

    /// Remove every leading axis of length 1.
    pub fn squeeze_leading(self) -> Self {
        with_array!(self, a => {
            let mut a = a;
            while a.ndim() > 0 && a.shape()[0] == 1 {
                a = a.index_axis_move(Axis(0), 0);
            }
            a.into()
        })
    }

    /// Borrow the inner array if it holds elements of type `T`.
    pub fn downcast_ref<T: Pixel>(&self) -> Option<&ArrayD<T>> {
        T::view(self)
    }

    /// Take the inner array if it holds elements of type `T`.
    ///
    /// Returns `self` unchanged on a type mismatch.
    pub fn into_array<T: Pixel>(self) -> Result<ArrayD<T>, Self> {
        T::take(self)
    }

    /// Values converted to `f64` in logical (row-major) order.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        with_array!(self, a => a.iter().map(|&v| v.to_f64()).collect())
    }

    /// Min, max and mean over finite values.
    ///
    /// Returns `None` if the array has no finite values.
    pub fn stats(&self) -> Option<PixelStats> {
        with_array!(self, a => finite_stats(a.iter().map(|&v| v.to_f64())))
    }
}

fn finite_stats(values: impl Iterator<Item = f64>) -> Option<PixelStats> {
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for v in values.filter(|v| v.is_finite()) {
        count += 1;
        sum += v;
        min = min.min(v);
        max = max.max(v);
    }

    if count == 0 {
        return None;
    }

    Some(PixelStats {
        min,
        max,
        mean: sum / count as f64,
    })
}

// =============================================================================
// Tests
// =============================================================================
