//! Per-page content stream writer over pdf-writer
//!
//! Works in PDF user space (points, bottom-left origin). `PdfSurface` does the
//! millimetre conversion and owns one `PdfCanvas` per page.

use pdf_writer::{Content, Name, Str};

use crate::types::Color;
use crate::unicode_utils::unicode_to_winansi;

/// Resource name of the regular text font
pub const FONT_REGULAR: Name<'static> = Name(b"F1");
/// Resource name of the bold text font
pub const FONT_BOLD: Name<'static> = Name(b"F2");

/// Canvas state for graphics operations
#[derive(Clone, Copy, PartialEq)]
struct CanvasState {
    fill_color: Color,
    stroke_color: Color,
    line_width: f64,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            fill_color: Color::black(),
            stroke_color: Color::black(),
            line_width: 1.0,
        }
    }
}

/// Content stream of a single page
pub struct PdfCanvas {
    content: Content,
    state: CanvasState,
    state_stack: Vec<CanvasState>,
    /// Image XObject names referenced from this page
    images: Vec<String>,
}

impl PdfCanvas {
    pub fn new() -> Self {
        Self {
            content: Content::new(),
            state: CanvasState::default(),
            state_stack: Vec::new(),
            images: Vec::new(),
        }
    }

    /// XObject names this page draws, for its resource dictionary
    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Get content (for finalizing)
    pub fn finish(self) -> Vec<u8> {
        self.content.finish()
    }

    // ===== State Management =====

    pub fn save_state(&mut self) {
        self.state_stack.push(self.state);
        self.content.save_state();
    }

    pub fn restore_state(&mut self) {
        if let Some(state) = self.state_stack.pop() {
            self.state = state;
            self.content.restore_state();
        }
    }

    // ===== Colors =====

    pub fn set_fill_color(&mut self, color: Color) {
        if self.state.fill_color == color {
            return;
        }
        self.state.fill_color = color;
        self.content.set_fill_rgb(color.r as f32, color.g as f32, color.b as f32);
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        if self.state.stroke_color == color {
            return;
        }
        self.state.stroke_color = color;
        self.content.set_stroke_rgb(color.r as f32, color.g as f32, color.b as f32);
    }

    pub fn set_line_width(&mut self, width: f64) {
        if self.state.line_width == width {
            return;
        }
        self.state.line_width = width;
        self.content.set_line_width(width as f32);
    }

    // ===== Drawing =====

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: bool, stroke: bool) {
        self.content.rect(x, y, width, height);
        match (fill, stroke) {
            (true, true) => {
                self.content.fill_nonzero_and_stroke();
            }
            (true, false) => {
                self.content.fill_nonzero();
            }
            (false, true) => {
                self.content.stroke();
            }
            (false, false) => {
                self.content.end_path();
            }
        }
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.content.move_to(x1, y1);
        self.content.line_to(x2, y2);
        self.content.stroke();
    }

    // ===== Text =====

    /// Show `text` with its baseline starting at (x, y). Standard Type1 fonts
    /// are declared with WinAnsiEncoding, so the string is re-encoded.
    pub fn draw_string(&mut self, x: f32, y: f32, font: Name<'_>, size: f32, text: &str) {
        self.content.begin_text();
        self.content.set_font(font, size);
        self.content.next_line(x, y);
        let winansi_bytes = unicode_to_winansi(text);
        self.content.show(Str(&winansi_bytes));
        self.content.end_text();
    }

    // ===== Images =====

    /// Paint the XObject `name` into the box with bottom-left corner (x, y)
    pub fn draw_image(&mut self, name: &str, x: f32, y: f32, width: f32, height: f32) {
        if !self.images.iter().any(|n| n == name) {
            self.images.push(name.to_string());
        }
        self.save_state();
        // Images are a 1x1 unit square; scale it to the box and move it there
        self.content.transform([width, 0.0, 0.0, height, x, y]);
        self.content.x_object(Name(name.as_bytes()));
        self.restore_state();
    }
}

impl Default for PdfCanvas {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_text(bytes: Vec<u8>) -> String {
        String::from_utf8_lossy(&bytes).into_owned()
    }

    #[test]
    fn test_color_changes_are_not_repeated() {
        let mut canvas = PdfCanvas::new();
        let blue = Color::from_rgb8(0, 82, 155);
        canvas.set_fill_color(blue);
        canvas.set_fill_color(blue);
        canvas.rect(0.0, 0.0, 10.0, 10.0, true, false);
        let out = as_text(canvas.finish());
        assert_eq!(out.matches(" rg").count(), 1);
        assert!(out.contains("re"));
    }

    #[test]
    fn test_draw_string_uses_font_and_winansi() {
        let mut canvas = PdfCanvas::new();
        canvas.draw_string(10.0, 20.0, FONT_BOLD, 12.0, "Ação");
        let bytes = canvas.finish();
        let out = String::from_utf8_lossy(&bytes);
        assert!(out.contains("/F2 12"));
        assert!(out.contains("Tf"));
        // ç ã, written either raw or as a hex string
        let raw = bytes.windows(2).any(|w| w == [0xE7, 0xE3]);
        assert!(raw || out.to_uppercase().contains("E7E3"));
    }

    #[test]
    fn test_images_are_tracked_once() {
        let mut canvas = PdfCanvas::new();
        canvas.draw_image("Im1", 0.0, 0.0, 10.0, 10.0);
        canvas.draw_image("Im1", 20.0, 0.0, 10.0, 10.0);
        assert_eq!(canvas.images(), &["Im1".to_string()]);
        assert!(as_text(canvas.finish()).contains("/Im1 Do"));
    }
}
