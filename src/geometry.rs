//! Geometry utilities for PDF rendering
//!
//! Layout happens in millimetres from the top-left corner. PDF user space is
//! points from the bottom-left corner.

use pdf_writer::Rect as PdfRect;

use crate::types::{Rect, Size};

pub const POINTS_PER_MM: f64 = 72.0 / 25.4;

pub fn mm_to_pt(mm: f64) -> f64 {
    mm * POINTS_PER_MM
}

/// Media box for a page of the given size
pub fn media_box(page: Size) -> PdfRect {
    PdfRect::new(0.0, 0.0, mm_to_pt(page.width) as f32, mm_to_pt(page.height) as f32)
}

/// Convert a top-left point in millimetres to PDF points
pub fn point_to_pdf(page: Size, x: f64, y: f64) -> (f32, f32) {
    (mm_to_pt(x) as f32, mm_to_pt(page.height - y) as f32)
}

/// Convert a top-left rectangle in millimetres to a PDF `re` operand
/// (bottom-left corner plus size, in points)
pub fn rect_to_pdf(page: Size, rect: &Rect) -> (f32, f32, f32, f32) {
    (
        mm_to_pt(rect.x) as f32,
        mm_to_pt(page.height - rect.bottom()) as f32,
        mm_to_pt(rect.width) as f32,
        mm_to_pt(rect.height) as f32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_media_box() {
        let b = media_box(Size::a4());
        assert!((b.x2 - 595.28).abs() < 0.01);
        assert!((b.y2 - 841.89).abs() < 0.01);
    }

    #[test]
    fn test_rect_flips_y() {
        let page = Size::new(100.0, 100.0);
        let (x, y, w, h) = rect_to_pdf(page, &Rect::new(0.0, 0.0, 100.0, 10.0));
        assert_eq!(x, 0.0);
        assert!((y as f64 - mm_to_pt(90.0)).abs() < 1e-3);
        assert!((w as f64 - mm_to_pt(100.0)).abs() < 1e-3);
        assert!((h as f64 - mm_to_pt(10.0)).abs() < 1e-3);
    }
}
