//! Auto-table primitive
//!
//! Lays out a head row and body rows on any `DocumentSurface`: resolves
//! column widths, wraps cell text, stripes alternate body rows, and starts a
//! new page (repeating the head row) whenever the next row would cross the
//! bottom margin. The caller continues from `TableOutcome::final_y`.

use log::debug;

use crate::error::{RendererError, RendererResult};
use crate::metrics;
use crate::surface::{Align, DocumentSurface, LineStyle, TextOptions, TextStyle};
use crate::types::{Color, Margins, Rect};

/// Narrowest an `Auto` column may get, in millimetres
pub const MIN_AUTO_WIDTH: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnWidth {
    /// Exact width in millimetres
    Fixed(f64),
    /// Even share of whatever the fixed columns leave
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSpec {
    pub width: ColumnWidth,
    pub align: Align,
}

impl ColumnSpec {
    pub fn fixed(width: f64, align: Align) -> Self {
        Self { width: ColumnWidth::Fixed(width), align }
    }

    pub fn auto() -> Self {
        Self { width: ColumnWidth::Auto, align: Align::Left }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableTheme {
    pub head_fill: Color,
    pub head_text: TextStyle,
    pub body_text: TextStyle,
    /// Fill for every second body row
    pub stripe_fill: Option<Color>,
    /// Cell borders; `None` draws no grid
    pub grid: Option<LineStyle>,
    /// Inner padding of every cell, in millimetres
    pub cell_padding: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    pub head: Vec<String>,
    pub body: Vec<Vec<String>>,
    pub columns: Vec<ColumnSpec>,
    pub theme: TableTheme,
    /// Top of the head row on the current page
    pub start_y: f64,
    /// Left/right bound the columns; top/bottom bound continuation pages
    pub margins: Margins,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableOutcome {
    /// Cursor below the last row, on the page the table ended on
    pub final_y: f64,
    pub body_rows_drawn: usize,
    /// Head row draws, one per page the table touched
    pub head_rows_drawn: usize,
    pub pages_added: u32,
}

/// Resolve column widths against the available content width
pub fn resolve_widths(columns: &[ColumnSpec], content_width: f64) -> RendererResult<Vec<f64>> {
    if columns.is_empty() {
        return Err(RendererError::InvalidGeometry("table has no columns".to_string()));
    }

    let fixed: f64 = columns
        .iter()
        .filter_map(|c| match c.width {
            ColumnWidth::Fixed(w) => Some(w),
            ColumnWidth::Auto => None,
        })
        .sum();
    if fixed > content_width {
        return Err(RendererError::InvalidGeometry(format!(
            "fixed columns need {:.1} mm, only {:.1} mm available",
            fixed, content_width
        )));
    }

    let auto_count = columns.iter().filter(|c| c.width == ColumnWidth::Auto).count();
    let auto_width = if auto_count > 0 {
        (content_width - fixed) / auto_count as f64
    } else {
        0.0
    };
    if auto_count > 0 && auto_width < MIN_AUTO_WIDTH {
        return Err(RendererError::InvalidGeometry(format!(
            "auto columns would be {:.1} mm wide (minimum {:.1} mm)",
            auto_width, MIN_AUTO_WIDTH
        )));
    }

    Ok(columns
        .iter()
        .map(|c| match c.width {
            ColumnWidth::Fixed(w) => w,
            ColumnWidth::Auto => auto_width,
        })
        .collect())
}

fn cell_text(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

fn row_height<S: DocumentSurface>(surface: &S, row: &[String], widths: &[f64], style: &TextStyle, padding: f64) -> f64 {
    let tallest = widths
        .iter()
        .enumerate()
        .map(|(i, w)| surface.text_height(cell_text(row, i), style, Some((w - 2.0 * padding).max(1.0))))
        .fold(0.0, f64::max);
    tallest + 2.0 * padding
}

fn draw_row<S: DocumentSurface>(
    surface: &mut S,
    row: &[String],
    spec: &TableSpec,
    widths: &[f64],
    y: f64,
    height: f64,
    style: &TextStyle,
    fill: Option<Color>,
) -> RendererResult<()> {
    let padding = spec.theme.cell_padding;
    let total_width: f64 = widths.iter().sum();

    if let Some(color) = fill {
        surface.fill_rect(Rect::new(spec.margins.left, y, total_width, height), color)?;
    }

    let baseline = y + padding + metrics::ascent(style.size);
    let mut x = spec.margins.left;
    for (i, (width, column)) in widths.iter().zip(&spec.columns).enumerate() {
        let text_x = match column.align {
            Align::Left => x + padding,
            Align::Center => x + width / 2.0,
            Align::Right => x + width - padding,
        };
        let options = TextOptions::aligned(column.align).with_max_width((width - 2.0 * padding).max(1.0));
        surface.text(cell_text(row, i), text_x, baseline, style, options)?;

        if let Some(grid) = spec.theme.grid {
            surface.stroke_rect(Rect::new(x, y, *width, height), grid)?;
        }
        x += width;
    }
    Ok(())
}

/// Draw `spec` onto `surface`, paginating as needed
pub fn draw_table<S: DocumentSurface>(surface: &mut S, spec: &TableSpec) -> RendererResult<TableOutcome> {
    let page = surface.page_size();
    let margins = spec.margins;
    let widths = resolve_widths(&spec.columns, page.width - margins.left - margins.right)?;
    let theme = &spec.theme;

    let bottom = page.height - margins.bottom;
    let usable = bottom - margins.top;
    let head_height = row_height(surface, &spec.head, &widths, &theme.head_text, theme.cell_padding);
    if head_height >= usable {
        return Err(RendererError::TableOverflow { row: 0, needed: head_height, available: usable });
    }

    let body_heights: Vec<f64> = spec
        .body
        .iter()
        .map(|row| row_height(surface, row, &widths, &theme.body_text, theme.cell_padding))
        .collect();
    if let Some((row, needed)) = body_heights
        .iter()
        .enumerate()
        .find(|(_, h)| head_height + **h > usable)
    {
        return Err(RendererError::TableOverflow {
            row: row + 1,
            needed: *needed,
            available: usable - head_height,
        });
    }

    let mut outcome = TableOutcome {
        final_y: spec.start_y,
        body_rows_drawn: 0,
        head_rows_drawn: 0,
        pages_added: 0,
    };
    let mut y = spec.start_y;

    // The head row never sits alone at the bottom of a page
    let first_height = body_heights.first().copied().unwrap_or(0.0);
    if y + head_height + first_height > bottom {
        surface.add_page()?;
        outcome.pages_added += 1;
        y = margins.top;
    }

    draw_row(surface, &spec.head, spec, &widths, y, head_height, &theme.head_text, Some(theme.head_fill))?;
    outcome.head_rows_drawn += 1;
    y += head_height;

    for (index, (row, height)) in spec.body.iter().zip(&body_heights).enumerate() {
        if y + height > bottom {
            let page_number = surface.add_page()?;
            debug!("table continues on page {} at row {}", page_number, index + 1);
            outcome.pages_added += 1;
            y = margins.top;
            draw_row(surface, &spec.head, spec, &widths, y, head_height, &theme.head_text, Some(theme.head_fill))?;
            outcome.head_rows_drawn += 1;
            y += head_height;
        }

        let fill = if index % 2 == 1 { theme.stripe_fill } else { None };
        draw_row(surface, row, spec, &widths, y, *height, &theme.body_text, fill)?;
        outcome.body_rows_drawn += 1;
        y += height;
    }

    outcome.final_y = y;
    Ok(outcome)
}
