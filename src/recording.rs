//! Recording drawing surface
//!
//! Implements `DocumentSurface` without any rendering backend: every
//! primitive call is appended to a list of `DrawOp`s tagged with the page it
//! went to. Layout tests assert against that list.

use crate::error::{RendererError, RendererResult};
use crate::surface::{Bitmap, DocumentSurface, FontWeight, LineStyle, TextStyle};
use crate::types::{Color, Rect, Size};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect { page: u32, rect: Rect, color: Color },
    StrokeRect { page: u32, rect: Rect, stroke: LineStyle },
    Line { page: u32, from: (f64, f64), to: (f64, f64), stroke: LineStyle },
    Text { page: u32, text: String, x: f64, y: f64, size: f64, weight: FontWeight, color: Color },
    Image { page: u32, rect: Rect, pixels: (u32, u32) },
    AddPage { page: u32 },
}

impl DrawOp {
    pub fn page(&self) -> u32 {
        match self {
            DrawOp::FillRect { page, .. }
            | DrawOp::StrokeRect { page, .. }
            | DrawOp::Line { page, .. }
            | DrawOp::Text { page, .. }
            | DrawOp::Image { page, .. }
            | DrawOp::AddPage { page } => *page,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: Size,
    pages: u32,
    current: u32,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    /// A surface with one blank page, like a freshly created document
    pub fn new(size: Size) -> Self {
        Self { size, pages: 1, current: 1, ops: Vec::new() }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Every drawn text line, in call order
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn texts_on_page(&self, page: u32) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { page: p, text, .. } if *p == page => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// True if any drawn line contains `needle`
    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
    }

    /// The first text op whose line equals `text`
    pub fn find_text(&self, text: &str) -> Option<&DrawOp> {
        self.ops
            .iter()
            .find(|op| matches!(op, DrawOp::Text { text: t, .. } if t == text))
    }

    pub fn lines(&self) -> Vec<&DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Line { .. })).collect()
    }

    pub fn images(&self) -> Vec<&DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Image { .. })).collect()
    }

    pub fn fill_count(&self, color: Color) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::FillRect { color: c, .. } if *c == color))
            .count()
    }
}

impl DocumentSurface for RecordingSurface {
    fn page_size(&self) -> Size {
        self.size
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> RendererResult<()> {
        self.ops.push(DrawOp::FillRect { page: self.current, rect, color });
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: LineStyle) -> RendererResult<()> {
        self.ops.push(DrawOp::StrokeRect { page: self.current, rect, stroke });
        Ok(())
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), stroke: LineStyle) -> RendererResult<()> {
        self.ops.push(DrawOp::Line { page: self.current, from, to, stroke });
        Ok(())
    }

    fn draw_text_line(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) -> RendererResult<()> {
        self.ops.push(DrawOp::Text {
            page: self.current,
            text: text.to_string(),
            x,
            y,
            size: style.size,
            weight: style.weight,
            color: style.color,
        });
        Ok(())
    }

    fn draw_image(&mut self, bitmap: &Bitmap, rect: Rect) -> RendererResult<()> {
        self.ops.push(DrawOp::Image { page: self.current, rect, pixels: bitmap.dimensions() });
        Ok(())
    }

    fn add_page(&mut self) -> RendererResult<u32> {
        self.pages += 1;
        self.current = self.pages;
        self.ops.push(DrawOp::AddPage { page: self.current });
        Ok(self.current)
    }

    fn page_count(&self) -> u32 {
        self.pages
    }

    fn current_page(&self) -> u32 {
        self.current
    }

    fn set_page(&mut self, page: u32) -> RendererResult<()> {
        if page == 0 || page > self.pages {
            return Err(RendererError::InvalidPage { page, count: self.pages });
        }
        self.current = page;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{Align, TextOptions};

    #[test]
    fn test_set_page_bounds() {
        let mut surface = RecordingSurface::new(Size::a4());
        surface.add_page().unwrap();
        assert!(surface.set_page(1).is_ok());
        assert!(matches!(surface.set_page(3), Err(RendererError::InvalidPage { page: 3, count: 2 })));
        assert!(surface.set_page(0).is_err());
    }

    #[test]
    fn test_text_height_matches_drawn_height() {
        let mut surface = RecordingSurface::new(Size::a4());
        let style = TextStyle::regular(10.0, Color::black());
        let text = "Quadro de distribuição principal do bloco A, segundo pavimento";
        let measured = surface.text_height(text, &style, Some(40.0));
        let drawn = surface.text(text, 10.0, 10.0, &style, TextOptions::wrapped(40.0)).unwrap();
        assert_eq!(measured, drawn);
        assert!(surface.texts().len() > 1);
    }

    #[test]
    fn test_right_aligned_text_ends_at_anchor() {
        let mut surface = RecordingSurface::new(Size::a4());
        let style = TextStyle::bold(12.0, Color::black());
        surface.text("Página 1 de 2", 195.0, 290.0, &style, TextOptions::aligned(Align::Right)).unwrap();
        let width = surface.text_width("Página 1 de 2", &style);
        match surface.find_text("Página 1 de 2") {
            Some(DrawOp::Text { x, .. }) => assert!((x + width - 195.0).abs() < 1e-9),
            other => panic!("unexpected op: {:?}", other),
        }
    }
}
