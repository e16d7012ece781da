//! Font resolution and text measurement.

use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont, point};
use tracing::debug;

use crate::error::{ComposeError, Result};

/// Pixel measurements of rendered text.
///
/// Implemented by [`ResolvedFont`]; line wrapping and layout only depend on
/// this trait.
pub trait MeasureText {
    /// Horizontal advance of `text`, kerning included, rounded up.
    fn text_width(&self, text: &str) -> u32;

    /// Distance from the top of the line to the lowest inked pixel of `text`.
    fn text_height(&self, text: &str) -> u32;

    fn text_size(&self, text: &str) -> (u32, u32) {
        (self.text_width(text), self.text_height(text))
    }
}

/// A parsed font bound to a fixed size.
#[derive(Clone)]
pub struct ResolvedFont {
    font: FontArc,
    scale: PxScale,
}

impl std::fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFont")
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

impl ResolvedFont {
    /// Bind `font` to `size`, interpreted as the em size in pixels.
    pub fn new(font: FontArc, size: f32) -> Self {
        let scale = font
            .pt_to_px_scale(size)
            .unwrap_or_else(|| PxScale::from(size));
        Self { font, scale }
    }

    /// Parse TTF/OTF bytes.
    pub fn from_bytes(data: Vec<u8>, size: f32) -> Result<Self> {
        let font = FontArc::try_from_vec(data).map_err(|_| ComposeError::InvalidFont)?;
        Ok(Self::new(font, size))
    }

    /// Read and parse a TTF/OTF file.
    pub fn load(path: impl AsRef<Path>, size: f32) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| ComposeError::FontLoad {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), size, "Loaded font");
        Self::from_bytes(data, size)
    }

    pub fn font(&self) -> &FontArc {
        &self.font
    }

    pub fn scale(&self) -> PxScale {
        self.scale
    }
}

impl MeasureText for ResolvedFont {
    fn text_width(&self, text: &str) -> u32 {
        let scaled = self.font.as_scaled(self.scale);
        let mut width = 0.0f32;
        let mut prev_glyph: Option<GlyphId> = None;

        for ch in text.chars() {
            let glyph_id = scaled.glyph_id(ch);
            if let Some(prev) = prev_glyph {
                width += scaled.kern(prev, glyph_id);
            }
            width += scaled.h_advance(glyph_id);
            prev_glyph = Some(glyph_id);
        }

        width.max(0.0).ceil() as u32
    }

    fn text_height(&self, text: &str) -> u32 {
        let scaled = self.font.as_scaled(self.scale);
        let mut x = 0.0f32;
        let mut bottom: Option<f32> = None;

        for ch in text.chars() {
            let glyph_id = scaled.glyph_id(ch);
            let glyph = glyph_id.with_scale_and_position(self.scale, point(x, scaled.ascent()));
            x += scaled.h_advance(glyph_id);
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let max_y = outlined.px_bounds().max.y;
                bottom = Some(bottom.map_or(max_y, |b| b.max(max_y)));
            }
        }

        // whitespace has no outline; fall back to the full line box
        let height = bottom.unwrap_or_else(|| scaled.ascent() - scaled.descent());
        height.max(0.0).ceil() as u32
    }
}

/// Font argument accepted by the text drawing functions.
///
/// A path is loaded at the requested size; a [`ResolvedFont`] is used as-is
/// and keeps its own size.
#[derive(Debug, Clone)]
pub enum FontSource {
    Path(PathBuf),
    Resolved(ResolvedFont),
}

impl FontSource {
    pub fn resolve(self, size: f32) -> Result<ResolvedFont> {
        match self {
            Self::Path(path) => ResolvedFont::load(path, size),
            Self::Resolved(font) => Ok(font),
        }
    }
}

impl From<&str> for FontSource {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<String> for FontSource {
    fn from(path: String) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<&Path> for FontSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for FontSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<ResolvedFont> for FontSource {
    fn from(font: ResolvedFont) -> Self {
        Self::Resolved(font)
    }
}

impl From<&ResolvedFont> for FontSource {
    fn from(font: &ResolvedFont) -> Self {
        Self::Resolved(font.clone())
    }
}

#[cfg(test)]
pub(crate) fn system_font_candidates() -> &'static [&'static str] {
    #[cfg(target_os = "macos")]
    {
        &[
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "/System/Library/Fonts/Supplemental/Helvetica.ttf",
        ]
    }
    #[cfg(target_os = "windows")]
    {
        &["C:\\Windows\\Fonts\\arial.ttf"]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        &[
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        ]
    }
}

/// First installed system font, or `None` so font tests can bail out.
#[cfg(test)]
pub(crate) fn system_font(size: f32) -> Option<ResolvedFont> {
    system_font_candidates()
        .iter()
        .find_map(|path| ResolvedFont::load(path, size).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_rejects_garbage() {
        let err = ResolvedFont::from_bytes(b"not a font".to_vec(), 25.0).unwrap_err();
        assert!(matches!(err, ComposeError::InvalidFont));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ResolvedFont::load("/nonexistent/font.ttf", 25.0).unwrap_err();
        match err {
            ComposeError::FontLoad { path, .. } => {
                assert_eq!(path, PathBuf::from("/nonexistent/font.ttf"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn path_source_resolves_through_the_file_system() {
        let source = FontSource::from("/nonexistent/font.ttf");
        assert!(matches!(
            source.resolve(12.0),
            Err(ComposeError::FontLoad { .. })
        ));
    }

    #[test]
    fn resolved_source_keeps_its_own_size() {
        let Some(font) = system_font(40.0) else {
            return;
        };
        let scale = font.scale();
        let resolved = FontSource::from(&font).resolve(10.0).unwrap();
        assert_eq!(resolved.scale(), scale);
    }

    #[test]
    fn measurements_grow_with_text_and_size() {
        let (Some(small), Some(large)) = (system_font(20.0), system_font(40.0)) else {
            return;
        };
        assert_eq!(small.text_width(""), 0);
        assert!(small.text_width("ab") > small.text_width("a"));
        assert!(large.text_width("abc") > small.text_width("abc"));
        assert!(small.text_height("A") > 0);
        assert!(large.text_height("A") > small.text_height("A"));
    }
}
