//! Image compositing and text helpers on top of `image` and `imageproc`.
//!
//! Provides fitted and circular image inserts, square cropping, rounded
//! corners, and left-aligned or centered text with greedy line wrapping.

pub mod compose;
pub mod crop;
pub mod error;
pub mod font;
pub mod geometry;
pub mod mask;
pub mod resize;
pub mod text;

// Re-exports for convenience
pub use compose::{FitOptions, alpha_composite, insert_circle_image, insert_image};
pub use crop::crop_into_square;
pub use error::{ComposeError, Result};
pub use font::{FontSource, MeasureText, ResolvedFont};
pub use geometry::Rect;
pub use mask::add_border_radius;
pub use resize::UpscaleStrategy;
pub use text::{Align, TextOptions, add_text, add_text_center, wrap_lines};
