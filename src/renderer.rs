//! Document generation entry points
//!
//! ## Data Flow
//!
//! ```text
//! TechnicalSheetRecord → TechnicalSheetLayout → PdfSurface → RenderedDocument → DocumentSink
//! ```
//!
//! Every call builds its own surface and cursor; nothing is shared between
//! renders except the read-only configuration and asset collaborators. Any
//! failure along the way surfaces as a single `DocumentGenerationFailure`.

use log::info;

use crate::assets::SheetAssets;
use crate::config::LayoutConfig;
use crate::delivery::DocumentSink;
use crate::error::DocumentGenerationFailure;
use crate::format::document_filename;
use crate::pdf_surface::PdfSurface;
use crate::record::TechnicalSheetRecord;
use crate::sheet::TechnicalSheetLayout;

/// A finished PDF and the name it should be saved under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub page_count: u32,
}

/// Lay out `record` and serialize it to PDF bytes
pub fn render_technical_sheet(
    record: &TechnicalSheetRecord,
    config: &LayoutConfig,
    assets: &SheetAssets,
) -> Result<RenderedDocument, DocumentGenerationFailure> {
    let layout = TechnicalSheetLayout::new(config, assets)?;

    let mut surface = PdfSurface::new(config.page_size)?;
    surface.set_title(format!("{} - {}", config.sheet_title, record.location_label.trim()));
    let summary = layout.draw(&mut surface, record)?;
    let bytes = surface.finish()?;

    let filename = document_filename(&config.filename_prefix, &record.location_label);
    info!(
        "rendered {} ({} page(s), {} circuit(s), {} bytes)",
        filename,
        summary.page_count,
        summary.table.body_rows_drawn,
        bytes.len()
    );

    Ok(RenderedDocument {
        filename,
        bytes,
        page_count: summary.page_count,
    })
}

/// Render `record` and hand the result to `sink`. The sink is only called
/// once the whole document has been produced.
pub fn generate_technical_sheet(
    record: &TechnicalSheetRecord,
    config: &LayoutConfig,
    assets: &SheetAssets,
    sink: &mut dyn DocumentSink,
) -> Result<RenderedDocument, DocumentGenerationFailure> {
    let document = render_technical_sheet(record, config, assets)?;
    sink.deliver(&document)?;
    Ok(document)
}
