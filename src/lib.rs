//! Technical-sheet PDF renderer
//!
//! Lays out an electrical-panel technical sheet (identification block,
//! paginated circuit table, observations, QR/contact block, gatehouse
//! extension and per-page footer) and writes it as PDF with `pdf-writer`.
//! Optional Python bindings via PyO3 behind the `python` feature.

pub mod assets;
mod canvas;
pub mod config;
pub mod cursor;
pub mod delivery;
pub mod error;
pub mod format;
mod geometry;
pub mod metrics;
pub mod pdf_surface;
pub mod record;
pub mod recording;
pub mod renderer;
pub mod sheet;
pub mod surface;
pub mod table;
pub mod types;
mod unicode_utils;

#[cfg(feature = "python")]
mod python;

pub use assets::{ImageResolver, LocalImageResolver, QrRenderer, SheetAssets, SocialLinks, StaticSocialLinks};
pub use config::LayoutConfig;
pub use delivery::{DirectorySink, DocumentSink, MemorySink};
pub use error::{DocumentGenerationFailure, RendererError, RendererResult};
pub use record::{CircuitRow, TechnicalSheetRecord};
pub use renderer::{generate_technical_sheet, render_technical_sheet, RenderedDocument};
pub use sheet::{LayoutSummary, TechnicalSheetLayout};
pub use surface::DocumentSurface;

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python module for technical-sheet rendering
#[cfg(feature = "python")]
#[pymodule]
fn ficha_pdf(_py: Python, m: &PyModule) -> PyResult<()> {
    python::register(m)
}
