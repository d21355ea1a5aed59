//! Drawing-surface abstraction
//!
//! The layout engine never talks to `pdf-writer` directly. It draws through
//! `DocumentSurface`, which `PdfSurface` implements for real output and
//! `RecordingSurface` implements for tests. Coordinates are millimetres from
//! the top-left corner; text `y` is the baseline of the first line.
//!
//! Measurement (`text_width`, `split_text`, `text_height`) and wrapped drawing
//! (`text`) are provided methods built on `metrics`, so every surface wraps
//! text exactly the way the layout code measured it.

use crate::error::RendererResult;
use crate::metrics;
use crate::table::{self, TableOutcome, TableSpec};
use crate::types::{Color, Rect, Size};

/// Decoded RGBA bitmap handed to `draw_image`
pub type Bitmap = image::RgbaImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Font weight, size (points) and fill colour of drawn text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub weight: FontWeight,
    pub size: f64,
    pub color: Color,
}

impl TextStyle {
    pub fn regular(size: f64, color: Color) -> Self {
        Self { weight: FontWeight::Regular, size, color }
    }

    pub fn bold(size: f64, color: Color) -> Self {
        Self { weight: FontWeight::Bold, size, color }
    }
}

/// Placement options for `DocumentSurface::text`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextOptions {
    /// `x` is the left edge, the centre or the right edge of each line
    pub align: Align,
    /// Wrap lines wider than this many millimetres
    pub max_width: Option<f64>,
}

impl TextOptions {
    pub fn aligned(align: Align) -> Self {
        Self { align, max_width: None }
    }

    pub fn wrapped(max_width: f64) -> Self {
        Self { align: Align::Left, max_width: Some(max_width) }
    }

    pub fn with_max_width(mut self, max_width: f64) -> Self {
        self.max_width = Some(max_width);
        self
    }
}

/// Stroke width (millimetres) and colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub width: f64,
    pub color: Color,
}

impl LineStyle {
    pub fn new(width: f64, color: Color) -> Self {
        Self { width, color }
    }
}

/// Minimal canvas contract the technical-sheet layout needs
pub trait DocumentSurface {
    fn page_size(&self) -> Size;

    fn fill_rect(&mut self, rect: Rect, color: Color) -> RendererResult<()>;

    fn stroke_rect(&mut self, rect: Rect, stroke: LineStyle) -> RendererResult<()>;

    fn line(&mut self, from: (f64, f64), to: (f64, f64), stroke: LineStyle) -> RendererResult<()>;

    /// Draw one line of text with its baseline at `y`; no wrapping
    fn draw_text_line(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) -> RendererResult<()>;

    fn draw_image(&mut self, bitmap: &Bitmap, rect: Rect) -> RendererResult<()>;

    /// Append a page and make it current. Returns its 1-based number.
    fn add_page(&mut self) -> RendererResult<u32>;

    fn page_count(&self) -> u32;

    /// 1-based number of the page drawing calls go to
    fn current_page(&self) -> u32;

    /// Switch drawing to an existing page
    fn set_page(&mut self, page: u32) -> RendererResult<()>;

    fn text_width(&self, text: &str, style: &TextStyle) -> f64 {
        metrics::text_width(text, style.weight, style.size)
    }

    fn line_height(&self, style: &TextStyle) -> f64 {
        metrics::line_height(style.size)
    }

    fn split_text(&self, text: &str, max_width: f64, style: &TextStyle) -> Vec<String> {
        metrics::split_to_width(text, max_width, style.weight, style.size)
    }

    /// Height `text` occupies once wrapped to `max_width`
    fn text_height(&self, text: &str, style: &TextStyle, max_width: Option<f64>) -> f64 {
        let lines = match max_width {
            Some(width) => self.split_text(text, width, style).len(),
            None => text.split('\n').count().max(1),
        };
        lines as f64 * self.line_height(style)
    }

    /// Draw possibly multi-line text. Returns the height consumed, which is
    /// always what `text_height` reports for the same arguments.
    fn text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        style: &TextStyle,
        options: TextOptions,
    ) -> RendererResult<f64> {
        let lines: Vec<String> = match options.max_width {
            Some(width) => self.split_text(text, width, style),
            None => text.split('\n').map(str::to_string).collect(),
        };
        let line_height = self.line_height(style);

        for (index, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let width = self.text_width(line, style);
            let line_x = match options.align {
                Align::Left => x,
                Align::Center => x - width / 2.0,
                Align::Right => x - width,
            };
            self.draw_text_line(line, line_x, y + index as f64 * line_height, style)?;
        }

        Ok(lines.len().max(1) as f64 * line_height)
    }

    /// Lay out a paginating table; see `table::draw_table`
    fn auto_table(&mut self, spec: &TableSpec) -> RendererResult<TableOutcome>
    where
        Self: Sized,
    {
        table::draw_table(self, spec)
    }
}
