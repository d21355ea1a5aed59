//! PDF implementation of `DocumentSurface`
//!
//! Pages are kept as separate `PdfCanvas` content streams until `finish`, so
//! the layout code can switch back to earlier pages (the footer pass does).
//! `finish` writes the catalog, the two standard fonts, the image XObjects
//! and the page tree in one go.

use std::collections::HashMap;

use log::debug;
use pdf_writer::{Finish, Name, Pdf, Ref, TextStr};

use crate::canvas::{PdfCanvas, FONT_BOLD, FONT_REGULAR};
use crate::error::{RendererError, RendererResult};
use crate::geometry::{media_box, mm_to_pt, point_to_pdf, rect_to_pdf};
use crate::surface::{Bitmap, DocumentSurface, FontWeight, LineStyle, TextStyle};
use crate::types::{Color, Rect, Size};

/// Decoded image waiting to be written as an XObject
struct PendingImage {
    name: String,
    width: u32,
    height: u32,
    rgb: Vec<u8>,
    alpha: Option<Vec<u8>>,
}

impl PendingImage {
    fn from_bitmap(name: String, bitmap: &Bitmap) -> Self {
        let (width, height) = bitmap.dimensions();
        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        let mut alpha = Vec::with_capacity((width * height) as usize);
        for pixel in bitmap.pixels() {
            rgb.extend_from_slice(&pixel.0[..3]);
            alpha.push(pixel.0[3]);
        }
        // Fully opaque images need no soft mask
        let alpha = if alpha.iter().all(|a| *a == u8::MAX) { None } else { Some(alpha) };
        Self { name, width, height, rgb, alpha }
    }
}

/// Multi-page PDF drawing surface
pub struct PdfSurface {
    size: Size,
    pages: Vec<PdfCanvas>,
    current: usize,
    images: Vec<PendingImage>,
    title: Option<String>,
}

impl PdfSurface {
    /// Create a document with one blank page of `size` millimetres
    pub fn new(size: Size) -> RendererResult<Self> {
        if !(size.width > 0.0 && size.height > 0.0) || !size.width.is_finite() || !size.height.is_finite() {
            return Err(RendererError::InvalidGeometry(format!(
                "page size must be positive, got {}x{} mm",
                size.width, size.height
            )));
        }
        Ok(Self {
            size,
            pages: vec![PdfCanvas::new()],
            current: 0,
            images: Vec::new(),
            title: None,
        })
    }

    /// Title written into the document information dictionary
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    fn canvas(&mut self) -> &mut PdfCanvas {
        &mut self.pages[self.current]
    }

    fn next_ref(next_ref_id: &mut i32) -> Ref {
        let r = Ref::new(*next_ref_id);
        *next_ref_id += 1;
        r
    }

    /// Serialize every page into a complete PDF file
    pub fn finish(self) -> RendererResult<Vec<u8>> {
        let mut pdf = Pdf::new();
        let mut next_ref_id = 1;

        let catalog_id = Self::next_ref(&mut next_ref_id);
        let page_tree_id = Self::next_ref(&mut next_ref_id);
        let regular_id = Self::next_ref(&mut next_ref_id);
        let bold_id = Self::next_ref(&mut next_ref_id);

        pdf.catalog(catalog_id).pages(page_tree_id);

        // Standard 14 fonts: no embedding, WinAnsi byte strings
        pdf.type1_font(regular_id)
            .base_font(Name(b"Helvetica"))
            .pair(Name(b"Encoding"), Name(b"WinAnsiEncoding"));
        pdf.type1_font(bold_id)
            .base_font(Name(b"Helvetica-Bold"))
            .pair(Name(b"Encoding"), Name(b"WinAnsiEncoding"));

        if let Some(title) = &self.title {
            let info_id = Self::next_ref(&mut next_ref_id);
            pdf.document_info(info_id).title(TextStr(title));
        }

        let mut image_ids: HashMap<String, Ref> = HashMap::new();
        for image in &self.images {
            let smask_id = image.alpha.as_ref().map(|alpha| {
                let smask_id = Self::next_ref(&mut next_ref_id);
                let mut smask = pdf.image_xobject(smask_id, alpha);
                smask.width(image.width as i32);
                smask.height(image.height as i32);
                smask.color_space().device_gray();
                smask.bits_per_component(8);
                smask_id
            });

            let image_id = Self::next_ref(&mut next_ref_id);
            let mut xobject = pdf.image_xobject(image_id, &image.rgb);
            xobject.width(image.width as i32);
            xobject.height(image.height as i32);
            xobject.color_space().device_rgb();
            xobject.bits_per_component(8);
            if let Some(smask_id) = smask_id {
                xobject.s_mask(smask_id);
            }
            xobject.finish();
            image_ids.insert(image.name.clone(), image_id);
        }

        let mut page_ids = Vec::with_capacity(self.pages.len());
        for canvas in self.pages {
            let page_id = Self::next_ref(&mut next_ref_id);
            let content_id = Self::next_ref(&mut next_ref_id);
            let page_images = canvas.images().to_vec();
            let content = canvas.finish();
            pdf.stream(content_id, &content);

            let mut page = pdf.page(page_id);
            page.media_box(media_box(self.size));
            page.parent(page_tree_id);
            page.contents(content_id);
            {
                let mut resources = page.resources();
                resources.fonts().pair(FONT_REGULAR, regular_id).pair(FONT_BOLD, bold_id);
                if !page_images.is_empty() {
                    let mut xobjects = resources.x_objects();
                    for name in &page_images {
                        let image_id = image_ids.get(name).copied().ok_or_else(|| {
                            RendererError::PdfError(format!("image {} was drawn but never registered", name))
                        })?;
                        xobjects.pair(Name(name.as_bytes()), image_id);
                    }
                }
            }
            page.finish();
            page_ids.push(page_id);
        }

        let count = page_ids.len() as i32;
        pdf.pages(page_tree_id).kids(page_ids).count(count);

        let bytes = pdf.finish();
        debug!("PDF serialized: {} page(s), {} bytes", count, bytes.len());
        Ok(bytes)
    }
}

impl DocumentSurface for PdfSurface {
    fn page_size(&self) -> Size {
        self.size
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> RendererResult<()> {
        let (x, y, w, h) = rect_to_pdf(self.size, &rect);
        let canvas = self.canvas();
        canvas.set_fill_color(color);
        canvas.rect(x, y, w, h, true, false);
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: LineStyle) -> RendererResult<()> {
        let (x, y, w, h) = rect_to_pdf(self.size, &rect);
        let canvas = self.canvas();
        canvas.set_stroke_color(stroke.color);
        canvas.set_line_width(mm_to_pt(stroke.width));
        canvas.rect(x, y, w, h, false, true);
        Ok(())
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), stroke: LineStyle) -> RendererResult<()> {
        let (x1, y1) = point_to_pdf(self.size, from.0, from.1);
        let (x2, y2) = point_to_pdf(self.size, to.0, to.1);
        let canvas = self.canvas();
        canvas.set_stroke_color(stroke.color);
        canvas.set_line_width(mm_to_pt(stroke.width));
        canvas.line(x1, y1, x2, y2);
        Ok(())
    }

    fn draw_text_line(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) -> RendererResult<()> {
        let (px, py) = point_to_pdf(self.size, x, y);
        let font = match style.weight {
            FontWeight::Regular => FONT_REGULAR,
            FontWeight::Bold => FONT_BOLD,
        };
        let canvas = self.canvas();
        canvas.set_fill_color(style.color);
        canvas.draw_string(px, py, font, style.size as f32, text);
        Ok(())
    }

    fn draw_image(&mut self, bitmap: &Bitmap, rect: Rect) -> RendererResult<()> {
        let (width, height) = bitmap.dimensions();
        if width == 0 || height == 0 {
            return Err(RendererError::ImageError("cannot draw an empty bitmap".to_string()));
        }
        let name = format!("Im{}", self.images.len() + 1);
        self.images.push(PendingImage::from_bitmap(name.clone(), bitmap));

        let (x, y, w, h) = rect_to_pdf(self.size, &rect);
        self.canvas().draw_image(&name, x, y, w, h);
        Ok(())
    }

    fn add_page(&mut self) -> RendererResult<u32> {
        self.pages.push(PdfCanvas::new());
        self.current = self.pages.len() - 1;
        debug!("added page {}", self.pages.len());
        Ok(self.pages.len() as u32)
    }

    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn current_page(&self) -> u32 {
        self.current as u32 + 1
    }

    fn set_page(&mut self, page: u32) -> RendererResult<()> {
        if page == 0 || page as usize > self.pages.len() {
            return Err(RendererError::InvalidPage { page, count: self.pages.len() as u32 });
        }
        self.current = page as usize - 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn pdf_text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    #[test]
    fn test_rejects_degenerate_page() {
        assert!(matches!(PdfSurface::new(Size::new(0.0, 297.0)), Err(RendererError::InvalidGeometry(_))));
        assert!(PdfSurface::new(Size::new(f64::NAN, 297.0)).is_err());
    }

    #[test]
    fn test_two_pages_with_fonts() {
        let mut surface = PdfSurface::new(Size::a4()).unwrap();
        let style = TextStyle::regular(10.0, Color::black());
        surface.draw_text_line("Página 1", 15.0, 20.0, &style).unwrap();
        assert_eq!(surface.add_page().unwrap(), 2);
        surface.draw_text_line("Página 2", 15.0, 20.0, &style).unwrap();
        surface.set_page(1).unwrap();
        assert_eq!(surface.current_page(), 1);

        let bytes = surface.finish().unwrap();
        let text = pdf_text(&bytes);
        assert!(text.starts_with("%PDF-"));
        assert!(text.contains("/Count 2"));
        assert!(text.contains("/Helvetica-Bold"));
        assert!(text.contains("/WinAnsiEncoding"));
    }

    #[test]
    fn test_transparent_image_gets_soft_mask() {
        let mut surface = PdfSurface::new(Size::a4()).unwrap();
        let mut bitmap = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255]));
        bitmap.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        surface.draw_image(&bitmap, Rect::new(10.0, 10.0, 20.0, 20.0)).unwrap();

        let text = pdf_text(&surface.finish().unwrap());
        assert!(text.contains("/SMask"));
        assert!(text.contains("/Im1"));
    }

    #[test]
    fn test_empty_bitmap_is_an_error() {
        let mut surface = PdfSurface::new(Size::a4()).unwrap();
        let bitmap = RgbaImage::new(0, 0);
        assert!(matches!(
            surface.draw_image(&bitmap, Rect::new(0.0, 0.0, 1.0, 1.0)),
            Err(RendererError::ImageError(_))
        ));
    }

    #[test]
    fn test_identical_drawing_is_byte_identical() {
        let render = || {
            let mut surface = PdfSurface::new(Size::a4()).unwrap();
            surface.set_title("Ficha técnica");
            surface.fill_rect(Rect::new(0.0, 0.0, 210.0, 28.0), Color::from_rgb8(0, 82, 155)).unwrap();
            surface.line((15.0, 40.0), (195.0, 40.0), LineStyle::new(0.3, Color::black())).unwrap();
            surface.finish().unwrap()
        };
        assert_eq!(render(), render());
    }
}
