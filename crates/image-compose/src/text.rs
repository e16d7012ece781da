//! Text drawing with optional greedy line wrapping.
//!
//! Lines are either split on `'\n'` only, or wrapped character by character
//! to a maximum pixel width. Every line advances by the same line height,
//! taken once from the first character of the text.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use tracing::debug;

use crate::error::Result;
use crate::font::{FontSource, MeasureText, ResolvedFont};

/// Default font size in pixels.
pub const DEFAULT_FONT_SIZE: f32 = 25.0;

/// A trailing wrapped fragment narrower than this is merged onto the
/// previous line.
pub const MERGE_THRESHOLD: u32 = 35;

/// Horizontal placement of each drawn line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Every line starts at the configured x.
    #[default]
    Left,
    /// Every line is centered on the image on its own.
    Center,
}

/// Options for [`add_text`] and [`add_text_center`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextOptions {
    /// Font size, used when the font is given as a path.
    pub size: f32,
    pub color: Rgba<u8>,
    /// Left edge of every line; ignored by [`add_text_center`].
    pub x: i32,
    /// Top of the first line.
    pub y: i32,
    /// Wrap width in pixels; 0 splits on newlines only.
    pub max_width: u32,
    pub merge_threshold: u32,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_FONT_SIZE,
            color: Rgba([0, 0, 0, 255]),
            x: 0,
            y: 0,
            max_width: 0,
            merge_threshold: MERGE_THRESHOLD,
        }
    }
}

impl TextOptions {
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_color(mut self, color: Rgba<u8>) -> Self {
        self.color = color;
        self
    }

    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_max_width(mut self, max_width: u32) -> Self {
        self.max_width = max_width;
        self
    }
}

/// A line of text with its drawing position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedLine {
    pub text: String,
    pub x: i32,
    pub y: i32,
}

/// Wrap `text` greedily, one character at a time.
///
/// A `'\n'` ends the current line (the newline itself is dropped). Any other
/// character is appended first and the line is measured afterwards, so the
/// character that pushes it past `max_width` stays on that line. A trailing
/// fragment narrower than `merge_threshold` is appended onto the previous line;
/// when there is no previous line it becomes a line of its own.
pub fn wrap_lines<M>(measure: &M, text: &str, max_width: u32, merge_threshold: u32) -> Vec<String>
where
    M: MeasureText + ?Sized,
{
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for ch in text.chars() {
        if ch == '\n' {
            lines.push(std::mem::take(&mut current_line));
            continue;
        }
        current_line.push(ch);
        if measure.text_width(&current_line) > max_width {
            lines.push(std::mem::take(&mut current_line));
        }
    }

    if !current_line.is_empty() {
        match lines.last_mut() {
            Some(last) if measure.text_width(&current_line) < merge_threshold => {
                last.push_str(&current_line);
            }
            _ => lines.push(current_line),
        }
    }

    lines
}

/// Break `text` into lines: wrapped when `max_width > 0`, otherwise split on
/// `'\n'` only (blank lines are kept).
pub fn split_lines<M>(measure: &M, text: &str, max_width: u32, merge_threshold: u32) -> Vec<String>
where
    M: MeasureText + ?Sized,
{
    if max_width > 0 {
        wrap_lines(measure, text, max_width, merge_threshold)
    } else {
        text.split('\n').map(str::to_owned).collect()
    }
}

/// Fixed line advance for `text`: the rendered height of its first character.
pub fn line_height<M>(measure: &M, text: &str) -> u32
where
    M: MeasureText + ?Sized,
{
    let mut buf = [0u8; 4];
    text.chars()
        .next()
        .map_or(0, |ch| measure.text_height(ch.encode_utf8(&mut buf)))
}

/// Position each line, starting at `(x, y)` and advancing by `line_height`.
///
/// With [`Align::Center`] each line's x is `(image_width - line_width) / 2`
/// (rounded down, negative when the line is wider than the image) and `x` is
/// ignored.
pub fn layout_lines<M>(
    measure: &M,
    lines: Vec<String>,
    align: Align,
    image_width: u32,
    (x, y): (i32, i32),
    line_height: u32,
) -> Vec<PlacedLine>
where
    M: MeasureText + ?Sized,
{
    let mut y = y;
    let mut placed = Vec::with_capacity(lines.len());
    for text in lines {
        let x = match align {
            Align::Left => x,
            Align::Center => {
                let line_width = measure.text_width(&text) as i32;
                (image_width as i32 - line_width).div_euclid(2)
            }
        };
        placed.push(PlacedLine { text, x, y });
        y += line_height as i32;
    }
    placed
}

/// Draw `text` left-aligned at `(options.x, options.y)`.
///
/// Empty text is a no-op and the font is not resolved. Draws directly into `img`.
pub fn add_text(
    img: &mut RgbaImage,
    text: &str,
    font: impl Into<FontSource>,
    options: &TextOptions,
) -> Result<()> {
    draw_aligned(img, text, font.into(), options, Align::Left)
}

/// Draw `text` with every line horizontally centered on its own, starting
/// at `options.y`.
///
/// Empty text is a no-op and the font is not resolved. Draws directly into `img`.
pub fn add_text_center(
    img: &mut RgbaImage,
    text: &str,
    font: impl Into<FontSource>,
    options: &TextOptions,
) -> Result<()> {
    draw_aligned(img, text, font.into(), options, Align::Center)
}

fn draw_aligned(
    img: &mut RgbaImage,
    text: &str,
    font: FontSource,
    options: &TextOptions,
    align: Align,
) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }

    let font = font.resolve(options.size)?;
    let placed = place_text(&font, text, options, align, img.width());
    debug!(
        lines = placed.len(),
        ?align,
        max_width = options.max_width,
        "Drawing text"
    );
    draw_placed(img, &font, &placed, options.color);
    Ok(())
}

fn place_text<M>(
    measure: &M,
    text: &str,
    options: &TextOptions,
    align: Align,
    image_width: u32,
) -> Vec<PlacedLine>
where
    M: MeasureText + ?Sized,
{
    let lh = line_height(measure, text);
    let lines = split_lines(measure, text, options.max_width, options.merge_threshold);
    layout_lines(measure, lines, align, image_width, (options.x, options.y), lh)
}

fn draw_placed(img: &mut RgbaImage, font: &ResolvedFont, placed: &[PlacedLine], color: Rgba<u8>) {
    for line in placed.iter().filter(|line| !line.text.is_empty()) {
        draw_text_mut(img, color, line.x, line.y, font.scale(), font.font(), &line.text);
    }
}
