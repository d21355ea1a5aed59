//! Error types for the technical-sheet renderer
//!
//! `RendererError` describes what went wrong inside a drawing primitive.
//! Callers of the public entry points only ever see
//! `DocumentGenerationFailure`, which wraps the cause.

use thiserror::Error;

/// Custom error type for renderer operations
#[derive(Error, Debug)]
pub enum RendererError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Table row {row} needs {needed:.1} mm but a page only offers {available:.1} mm")]
    TableOverflow { row: usize, needed: f64, available: f64 },

    #[error("Invalid page {page}: document has {count} page(s)")]
    InvalidPage { page: u32, count: u32 },

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("PDF generation error: {0}")]
    PdfError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for renderer operations
pub type RendererResult<T> = Result<T, RendererError>;

/// Helper to convert serde_json errors
impl From<serde_json::Error> for RendererError {
    fn from(err: serde_json::Error) -> Self {
        RendererError::JsonError(err.to_string())
    }
}

impl From<image::ImageError> for RendererError {
    fn from(err: image::ImageError) -> Self {
        RendererError::ImageError(err.to_string())
    }
}

/// The single error kind surfaced to callers: the document could not be
/// produced, and nothing was delivered.
#[derive(Error, Debug)]
#[error("document generation failed: {source}")]
pub struct DocumentGenerationFailure {
    #[from]
    source: RendererError,
}

impl DocumentGenerationFailure {
    /// The primitive failure that aborted the render
    pub fn cause(&self) -> &RendererError {
        &self.source
    }
}

#[cfg(feature = "python")]
impl From<DocumentGenerationFailure> for pyo3::PyErr {
    fn from(err: DocumentGenerationFailure) -> Self {
        pyo3::PyErr::new::<pyo3::exceptions::PyValueError, _>(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_wraps_cause() {
        let failure = DocumentGenerationFailure::from(RendererError::InvalidPage { page: 3, count: 2 });
        assert_eq!(
            failure.to_string(),
            "document generation failed: Invalid page 3: document has 2 page(s)"
        );
        assert!(matches!(failure.cause(), RendererError::InvalidPage { page: 3, .. }));
        assert!(std::error::Error::source(&failure).is_some());
    }

    #[test]
    fn test_json_error_conversion() {
        let err: RendererError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, RendererError::JsonError(_)));
    }
}
