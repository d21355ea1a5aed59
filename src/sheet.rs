//! Technical-sheet layout
//!
//! Single top-to-bottom pass over one record: header band, identification
//! block, circuit table, observations, QR/contact block, optional gatehouse
//! block, then a footer on every page. Each section takes the cursor where
//! the previous one left it; page breaks happen only inside the table or in
//! the explicit `ensure_space` checks before the later blocks.

use chrono::FixedOffset;
use log::{debug, warn};

use crate::assets::SheetAssets;
use crate::config::{LayoutConfig, ResolvedPalette};
use crate::cursor::LayoutCursor;
use crate::error::RendererResult;
use crate::format::{footer_stamp, format_date, page_label};
use crate::metrics;
use crate::record::TechnicalSheetRecord;
use crate::surface::{Align, Bitmap, DocumentSurface, LineStyle, TextOptions, TextStyle};
use crate::table::{ColumnSpec, TableOutcome, TableSpec, TableTheme};
use crate::types::Rect;

pub const DEFAULT_REFERENCE_STANDARD: &str = "Conforme NBR 5410";
pub const ACCESS_PENDING: &str = "Link disponível após salvar a ficha";
pub const LINK_PENDING: &str = "Link gerado após salvar";
pub const MISSING_CELL: &str = "-";

pub const TABLE_HEAD: [&str; 5] = ["Nº", "Circuito", "Disjuntor", "Cabo (mm²)", "Observações"];

const LABEL_COLUMN: f64 = 45.0;
const ROW_SPACING: f64 = 2.5;
const OBSERVATIONS_RESERVE: f64 = 40.0;
const CONTACT_RESERVE: f64 = 55.0;
const GATEHOUSE_RESERVE: f64 = 16.0;
const QR_SIZE: f64 = 35.0;
const QR_GAP: f64 = 15.0;
const SIGNATURE_HEIGHT: f64 = 14.0;
const SIGNATURE_LINE: f64 = 70.0;

/// What a finished layout pass produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSummary {
    pub page_count: u32,
    pub table: TableOutcome,
    pub gatehouse_drawn: bool,
    /// Cursor after the last content block, on the last page
    pub final_y: f64,
}

/// Draws a `TechnicalSheetRecord` onto any `DocumentSurface`
pub struct TechnicalSheetLayout<'a> {
    config: &'a LayoutConfig,
    assets: &'a SheetAssets,
    palette: ResolvedPalette,
    offset: FixedOffset,
}

impl<'a> TechnicalSheetLayout<'a> {
    pub fn new(config: &'a LayoutConfig, assets: &'a SheetAssets) -> RendererResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            assets,
            palette: config.palette.resolve()?,
            offset: config.utc_offset()?,
        })
    }

    pub fn draw<S: DocumentSurface>(&self, surface: &mut S, record: &TechnicalSheetRecord) -> RendererResult<LayoutSummary> {
        let config = self.config;
        let mut cursor = LayoutCursor::new(config.header_height + 12.0, config.margins.top, config.content_bottom());

        self.draw_header(surface, record)?;
        self.draw_identification(surface, &mut cursor, record)?;
        debug!("identification block ends at {:.1} mm", cursor.y());

        let table = self.draw_circuits(surface, &mut cursor, record)?;
        debug!(
            "circuit table: {} rows, {} page(s) added, ends at {:.1} mm",
            table.body_rows_drawn,
            table.pages_added,
            table.final_y
        );

        self.draw_observations(surface, &mut cursor, record)?;
        self.draw_qr_and_contact(surface, &mut cursor, record)?;
        let gatehouse_drawn = self.draw_gatehouse(surface, &mut cursor, record)?;
        let final_y = cursor.y();

        self.draw_footers(surface, record)?;

        Ok(LayoutSummary {
            page_count: surface.page_count(),
            table,
            gatehouse_drawn,
            final_y,
        })
    }

    fn content_left(&self) -> f64 {
        self.config.margins.left
    }

    fn content_right(&self) -> f64 {
        self.config.page_size.width - self.config.margins.right
    }

    fn rule(&self) -> LineStyle {
        LineStyle::new(0.3, self.palette.rule)
    }

    /// Resolve an optional bitmap, degrading every failure to "not available"
    fn resolve_bitmap(&self, what: &str, result: RendererResult<Option<Bitmap>>) -> Option<Bitmap> {
        match result {
            Ok(Some(bitmap)) if bitmap.width() > 0 && bitmap.height() > 0 => Some(bitmap),
            Ok(_) => None,
            Err(err) => {
                warn!("{} unavailable, drawing placeholder: {}", what, err);
                None
            }
        }
    }

    /// Largest box of `bitmap`'s aspect ratio inside `max_width` x `height`
    fn fit(bitmap: &Bitmap, max_width: f64, height: f64) -> (f64, f64) {
        let aspect = bitmap.width() as f64 / bitmap.height() as f64;
        let width = height * aspect;
        if width <= max_width {
            (width, height)
        } else {
            (max_width, max_width / aspect)
        }
    }

    fn draw_header<S: DocumentSurface>(&self, surface: &mut S, record: &TechnicalSheetRecord) -> RendererResult<()> {
        let page = surface.page_size();
        let band = self.config.header_height;
        let white = crate::types::Color::white();
        surface.fill_rect(Rect::new(0.0, 0.0, page.width, band), self.palette.accent)?;

        let wordmark = TextStyle::bold(20.0, white);
        let baseline = band / 2.0 + metrics::ascent(wordmark.size) / 2.0;
        surface.draw_text_line(&self.config.brand_wordmark, self.content_left(), baseline, &wordmark)?;
        let kicker = TextStyle::regular(8.0, white);
        surface.draw_text_line(&self.config.sheet_title, self.content_left(), band - 4.0, &kicker)?;

        // Bolt glyph after the wordmark
        let x = self.content_left() + surface.text_width(&self.config.brand_wordmark, &wordmark) + 5.0;
        let top = band / 2.0 - 5.0;
        let stroke = LineStyle::new(0.8, white);
        surface.line((x + 2.0, top), (x - 1.0, top + 5.5), stroke)?;
        surface.line((x - 1.0, top + 5.5), (x + 2.0, top + 5.5), stroke)?;
        surface.line((x + 2.0, top + 5.5), (x - 1.0, top + 11.0), stroke)?;

        let max_width = self.config.content_width() / 2.0;
        let right = self.content_right();
        if let Some(reference) = record.company_logo_ref() {
            let logo = self.resolve_bitmap("company logo", self.assets.images.resolve(reference));
            match logo {
                Some(bitmap) => {
                    let (w, h) = Self::fit(&bitmap, max_width, band - 8.0);
                    surface.draw_image(&bitmap, Rect::new(right - w, (band - h) / 2.0, w, h))?;
                }
                None => {
                    let label = TextStyle::regular(10.0, white);
                    surface.text("[Logo]", right, baseline, &label, TextOptions::aligned(Align::Right))?;
                }
            }
        } else if let Some(company) = record.company_name() {
            // One line only; anything below the band would be white on white
            let style = TextStyle::bold(12.0, white);
            let line = surface.split_text(company, max_width, &style).into_iter().next().unwrap_or_default();
            surface.text(&line, right, baseline, &style, TextOptions::aligned(Align::Right))?;
        }
        Ok(())
    }

    fn draw_identification<S: DocumentSurface>(
        &self,
        surface: &mut S,
        cursor: &mut LayoutCursor,
        record: &TechnicalSheetRecord,
    ) -> RendererResult<()> {
        let page = surface.page_size();
        let title = TextStyle::bold(15.0, self.palette.accent);
        let title_options = TextOptions::aligned(Align::Center).with_max_width(self.config.content_width());
        let height = surface.text(&record.title, page.width / 2.0, cursor.y() + metrics::ascent(title.size), &title, title_options)?;
        cursor.advance(height + 5.0);

        let label = TextStyle::bold(10.0, self.palette.text);
        let value = TextStyle::regular(10.0, self.palette.text);
        let value_x = self.content_left() + LABEL_COLUMN;
        let value_width = self.content_right() - value_x;

        let installation_date = format_date(&record.installation_date, &self.offset);
        let rows = [
            ("Local:", record.location_label.as_str()),
            ("Data de instalação:", installation_date.as_str()),
            ("Responsável técnico:", record.technical_responsible.as_str()),
            ("Versão da ficha:", record.sheet_version.as_str()),
        ];

        for (name, text) in rows {
            let text = if text.trim().is_empty() { MISSING_CELL } else { text };
            let baseline = cursor.y() + metrics::ascent(value.size);
            surface.draw_text_line(name, self.content_left(), baseline, &label)?;
            // Same measurement the wrapped draw uses, so rows never overlap
            let height = surface.text_height(text, &value, Some(value_width));
            surface.text(text, value_x, baseline, &value, TextOptions::wrapped(value_width))?;
            cursor.advance(height + ROW_SPACING);
        }
        cursor.advance(4.0);
        Ok(())
    }

    fn draw_circuits<S: DocumentSurface>(
        &self,
        surface: &mut S,
        cursor: &mut LayoutCursor,
        record: &TechnicalSheetRecord,
    ) -> RendererResult<TableOutcome> {
        let cell = |value: &str| {
            if value.trim().is_empty() {
                MISSING_CELL.to_string()
            } else {
                value.to_string()
            }
        };
        let body = record
            .circuits
            .iter()
            .enumerate()
            .map(|(index, circuit)| {
                vec![
                    (index + 1).to_string(),
                    cell(&circuit.name),
                    cell(&circuit.breaker),
                    cell(&circuit.cable_gauge),
                    cell(circuit.notes().unwrap_or("")),
                ]
            })
            .collect();

        let spec = TableSpec {
            head: TABLE_HEAD.iter().map(|h| h.to_string()).collect(),
            body,
            columns: vec![
                ColumnSpec::fixed(12.0, Align::Center),
                ColumnSpec::auto(),
                ColumnSpec::fixed(24.0, Align::Center),
                ColumnSpec::fixed(26.0, Align::Center),
                ColumnSpec::auto(),
            ],
            theme: TableTheme {
                head_fill: self.palette.accent,
                head_text: TextStyle::bold(9.0, crate::types::Color::white()),
                body_text: TextStyle::regular(9.0, self.palette.text),
                stripe_fill: Some(self.palette.stripe),
                grid: None,
                cell_padding: 2.0,
            },
            start_y: cursor.y(),
            margins: self.config.margins,
        };

        let outcome = surface.auto_table(&spec)?;
        cursor.move_to(outcome.final_y + 8.0);
        Ok(outcome)
    }

    fn draw_observations<S: DocumentSurface>(
        &self,
        surface: &mut S,
        cursor: &mut LayoutCursor,
        record: &TechnicalSheetRecord,
    ) -> RendererResult<()> {
        cursor.ensure_space(surface, OBSERVATIONS_RESERVE)?;

        let heading = TextStyle::bold(12.0, self.palette.accent);
        let height = surface.text("Observações", self.content_left(), cursor.y() + metrics::ascent(heading.size), &heading, TextOptions::default())?;
        cursor.advance(height + 2.0);

        let standard = record.reference_standard_note().unwrap_or(DEFAULT_REFERENCE_STANDARD);
        let mut residual = format!(
            "DR instalado: {}",
            if record.residual_device_installed { "Sim" } else { "Não" }
        );
        if let Some(note) = record.residual_device_extra_note() {
            residual.push_str(" - ");
            residual.push_str(note);
        }
        let access = record.public_access_text().unwrap_or(ACCESS_PENDING);

        let lines = [
            format!("Norma de referência: {}", standard),
            residual,
            format!("Acesso público: {}", access),
        ];
        let body = TextStyle::regular(10.0, self.palette.text);
        let options = TextOptions::wrapped(self.config.content_width());
        for line in &lines {
            let height = surface.text(line, self.content_left(), cursor.y() + metrics::ascent(body.size), &body, options)?;
            cursor.advance(height + 1.5);
        }
        cursor.advance(6.0);
        Ok(())
    }

    fn draw_qr_and_contact<S: DocumentSurface>(
        &self,
        surface: &mut S,
        cursor: &mut LayoutCursor,
        record: &TechnicalSheetRecord,
    ) -> RendererResult<()> {
        cursor.ensure_space(surface, CONTACT_RESERVE)?;
        let top = cursor.y();
        let left = self.content_left();

        // QR column
        let link = record.public_sheet_link();
        let qr = link.and_then(|payload| self.resolve_bitmap("QR code", self.assets.qr.render(payload)));
        let qr_box = Rect::new(left, top, QR_SIZE, QR_SIZE);
        match qr {
            Some(bitmap) => surface.draw_image(&bitmap, qr_box)?,
            None => {
                surface.stroke_rect(qr_box, LineStyle::new(0.4, self.palette.rule))?;
                let label = TextStyle::bold(14.0, self.palette.muted);
                let baseline = top + QR_SIZE / 2.0 + metrics::ascent(label.size) / 2.0;
                surface.text("QR", left + QR_SIZE / 2.0, baseline, &label, TextOptions::aligned(Align::Center))?;
            }
        }
        let caption = TextStyle::regular(7.5, self.palette.muted);
        let caption_top = top + QR_SIZE + 2.0;
        let caption_options = TextOptions::aligned(Align::Center).with_max_width(QR_SIZE + 10.0);
        let caption_height = surface.text(
            link.unwrap_or(LINK_PENDING),
            left + QR_SIZE / 2.0,
            caption_top + metrics::ascent(caption.size),
            &caption,
            caption_options,
        )?;
        let qr_end = caption_top + caption_height;

        // Contact column
        let x = left + QR_SIZE + QR_GAP;
        let width = self.content_right() - x;
        let mut y = top;

        let name = TextStyle::bold(12.0, self.palette.text);
        y += surface.text(&record.electrician_name, x, y + metrics::ascent(name.size), &name, TextOptions::wrapped(width))?;
        y += 1.0;
        let role = TextStyle::regular(9.0, self.palette.muted);
        y += surface.text("Eletricista responsável", x, y + metrics::ascent(role.size), &role, TextOptions::default())?;
        y += 3.0;

        match record.electrician_signature_ref() {
            Some(reference) => {
                let signature = self.resolve_bitmap("electrician signature", self.assets.images.resolve(reference));
                match signature {
                    Some(bitmap) => {
                        let (w, h) = Self::fit(&bitmap, SIGNATURE_LINE, SIGNATURE_HEIGHT);
                        surface.draw_image(&bitmap, Rect::new(x, y, w, h))?;
                        y += SIGNATURE_HEIGHT + 2.0;
                    }
                    None => {
                        let label = TextStyle::regular(10.0, self.palette.muted);
                        y += surface.text("(Assinatura digital)", x, y + metrics::ascent(label.size), &label, TextOptions::default())?;
                        y += 2.0;
                    }
                }
            }
            None => {
                let line_y = y + 10.0;
                surface.line((x, line_y), (x + SIGNATURE_LINE, line_y), self.rule())?;
                y = line_y + 2.0;
            }
        }

        let body = TextStyle::regular(10.0, self.palette.text);
        let contact = format!("Contato: {}", record.electrician_contact);
        y += surface.text(&contact, x, y + metrics::ascent(body.size), &body, TextOptions::wrapped(width))?;

        if let Some(company) = record.company_name() {
            let social = TextStyle::regular(9.0, self.palette.muted);
            for line in self.assets.social.lines(company) {
                y += 0.5;
                y += surface.text(&line, x, y + metrics::ascent(social.size), &social, TextOptions::wrapped(width))?;
            }
        }

        debug!("QR block ends at {:.1} mm, contact block at {:.1} mm", qr_end, y);
        cursor.move_to(qr_end.max(y) + 6.0);
        Ok(())
    }

    fn draw_gatehouse<S: DocumentSurface>(
        &self,
        surface: &mut S,
        cursor: &mut LayoutCursor,
        record: &TechnicalSheetRecord,
    ) -> RendererResult<bool> {
        let Some(extension) = record.gatehouse_extension() else {
            return Ok(false);
        };
        cursor.ensure_space(surface, GATEHOUSE_RESERVE)?;

        let y = cursor.y();
        surface.line((self.content_left(), y), (self.content_right(), y), self.rule())?;
        cursor.advance(5.0);

        let style = TextStyle::bold(10.0, self.palette.text);
        let text = format!("Ramal da portaria: {}", extension);
        let height = surface.text(&text, self.content_left(), cursor.y() + metrics::ascent(style.size), &style, TextOptions::default())?;
        cursor.advance(height);
        Ok(true)
    }

    fn draw_footers<S: DocumentSurface>(&self, surface: &mut S, record: &TechnicalSheetRecord) -> RendererResult<()> {
        let page = surface.page_size();
        let total = surface.page_count();
        let stamp = footer_stamp(&record.created_at, &self.offset);
        let style = TextStyle::regular(8.0, self.palette.muted);
        let rule_y = self.config.content_bottom() + 4.0;
        let baseline = rule_y + 6.0;

        for number in 1..=total {
            surface.set_page(number)?;
            surface.line((self.content_left(), rule_y), (self.content_right(), rule_y), self.rule())?;
            surface.text(&stamp, page.width / 2.0, baseline, &style, TextOptions::aligned(Align::Center))?;
            surface.text(&page_label(number, total), self.content_right(), baseline, &style, TextOptions::aligned(Align::Right))?;
        }
        Ok(())
    }
}
