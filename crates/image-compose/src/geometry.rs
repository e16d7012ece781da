//! Rectangle and crop-box arithmetic.
//!
//! Everything here is pure integer math on dimensions; no pixels are touched.

use crate::error::{ComposeError, Result};

/// Target region in a base image's coordinate space.
///
/// Edges are exclusive on the right/bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Build a rect from `(left, top, right, bottom)` components.
    ///
    /// Fails with [`ComposeError::InvalidBox`] unless exactly 4 components are given.
    pub fn from_slice(components: &[i32]) -> Result<Self> {
        match *components {
            [left, top, right, bottom] => Ok(Self::new(left, top, right, bottom)),
            _ => Err(ComposeError::InvalidBox {
                len: components.len(),
            }),
        }
    }

    pub fn to_array(&self) -> [i32; 4] {
        [self.left, self.top, self.right, self.bottom]
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Positive `(width, height)`, or `None` for an empty or inverted rect.
    pub fn extent(&self) -> Option<(u32, u32)> {
        let (w, h) = (self.width(), self.height());
        if w > 0 && h > 0 {
            Some((w as u32, h as u32))
        } else {
            None
        }
    }
}

impl From<(i32, i32, i32, i32)> for Rect {
    fn from((left, top, right, bottom): (i32, i32, i32, i32)) -> Self {
        Self::new(left, top, right, bottom)
    }
}

/// A crop window inside a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Centered crop of a `src_w × src_h` image to the aspect ratio of `w × h`.
///
/// The longer axis (relative to the target ratio) loses equal margins.
/// Returns `None` when the ratios are already equal. All inputs must be non-zero.
pub fn aspect_crop(src_w: u32, src_h: u32, w: u32, h: u32) -> Option<CropBox> {
    // compare src_w / src_h against w / h without rounding
    let src_ratio = u64::from(src_w) * u64::from(h);
    let target_ratio = u64::from(w) * u64::from(src_h);

    if src_ratio > target_ratio {
        let temp_w = f64::from(w) * f64::from(src_h) / f64::from(h);
        let margin = ((f64::from(src_w) - temp_w) / 2.0).floor() as u32;
        Some(CropBox {
            x: margin,
            y: 0,
            width: src_w - margin * 2,
            height: src_h,
        })
    } else if src_ratio < target_ratio {
        let temp_h = f64::from(h) * f64::from(src_w) / f64::from(w);
        let margin = ((f64::from(src_h) - temp_h) / 2.0).floor() as u32;
        Some(CropBox {
            x: 0,
            y: margin,
            width: src_w,
            height: src_h - margin * 2,
        })
    } else {
        None
    }
}

/// Largest centered square inside a `width × height` image.
pub fn square_crop(width: u32, height: u32) -> CropBox {
    let side = width.min(height);
    CropBox {
        x: (width - side) / 2,
        y: (height - side) / 2,
        width: side,
        height: side,
    }
}
