//! Python bindings
//!
//! Records and configuration cross the boundary as JSON strings, so the
//! Python side only needs `json.dumps` on whatever the record store returned.

use pyo3::prelude::*;
use pyo3::types::PyBytes;

use crate::assets::SheetAssets;
use crate::config::LayoutConfig;
use crate::delivery::DirectorySink;
use crate::error::DocumentGenerationFailure;
use crate::record::TechnicalSheetRecord;

fn parse_inputs(
    record_json: &str,
    config_json: Option<&str>,
) -> Result<(TechnicalSheetRecord, LayoutConfig), DocumentGenerationFailure> {
    let record = TechnicalSheetRecord::from_json_str(record_json)?;
    let config = match config_json {
        Some(json) => LayoutConfig::from_json_str(json)?,
        None => LayoutConfig::default(),
    };
    Ok((record, config))
}

/// Render a technical sheet. Returns `(filename, pdf_bytes)`.
#[pyfunction]
#[pyo3(name = "render_technical_sheet", signature = (record_json, config_json = None))]
fn py_render_technical_sheet(
    py: Python<'_>,
    record_json: &str,
    config_json: Option<&str>,
) -> PyResult<(String, Py<PyBytes>)> {
    let (record, config) = parse_inputs(record_json, config_json)?;
    let document = crate::renderer::render_technical_sheet(&record, &config, &SheetAssets::default())?;
    Ok((document.filename, PyBytes::new(py, &document.bytes).into()))
}

/// Render a technical sheet into `output_dir`. Returns the written path.
#[pyfunction]
#[pyo3(name = "generate_technical_sheet", signature = (record_json, output_dir, config_json = None))]
fn py_generate_technical_sheet(record_json: &str, output_dir: &str, config_json: Option<&str>) -> PyResult<String> {
    let (record, config) = parse_inputs(record_json, config_json)?;
    let mut sink = DirectorySink::new(output_dir);
    let document = crate::renderer::generate_technical_sheet(&record, &config, &SheetAssets::default(), &mut sink)?;
    Ok(sink.path_for(&document.filename).display().to_string())
}

pub(crate) fn register(m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_render_technical_sheet, m)?)?;
    m.add_function(wrap_pyfunction!(py_generate_technical_sheet, m)?)?;
    Ok(())
}
