//! Where finished documents go
//!
//! A sink receives the `RenderedDocument` only after rendering succeeded, so a
//! failed render never leaves a partial file behind.

use std::path::PathBuf;

use log::info;

use crate::error::RendererResult;
use crate::renderer::RenderedDocument;

pub trait DocumentSink {
    fn deliver(&mut self, document: &RenderedDocument) -> RendererResult<()>;
}

/// Writes `<dir>/<filename>`, creating `dir` when needed
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }
}

impl DocumentSink for DirectorySink {
    fn deliver(&mut self, document: &RenderedDocument) -> RendererResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(&document.filename);
        std::fs::write(&path, &document.bytes)?;
        info!("wrote {} ({} bytes)", path.display(), document.bytes.len());
        Ok(())
    }
}

/// Keeps every delivered document in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub documents: Vec<RenderedDocument>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&RenderedDocument> {
        self.documents.last()
    }
}

impl DocumentSink for MemorySink {
    fn deliver(&mut self, document: &RenderedDocument) -> RendererResult<()> {
        self.documents.push(document.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> RenderedDocument {
        RenderedDocument {
            filename: "ficha-tecnica_casa.pdf".to_string(),
            bytes: b"%PDF-1.7 test".to_vec(),
            page_count: 1,
        }
    }

    #[test]
    fn test_directory_sink_creates_dir() {
        let root = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(root.path().join("saida").join("fichas"));
        sink.deliver(&document()).unwrap();

        let written = std::fs::read(sink.path_for("ficha-tecnica_casa.pdf")).unwrap();
        assert_eq!(written, b"%PDF-1.7 test");
    }

    #[test]
    fn test_directory_sink_reports_io_errors() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("arquivo");
        std::fs::write(&blocker, b"x").unwrap();
        let mut sink = DirectorySink::new(blocker.join("sub"));
        assert!(matches!(sink.deliver(&document()), Err(crate::error::RendererError::IoError(_))));
    }

    #[test]
    fn test_memory_sink() {
        let mut sink = MemorySink::new();
        assert!(sink.last().is_none());
        sink.deliver(&document()).unwrap();
        assert_eq!(sink.documents.len(), 1);
        assert_eq!(sink.last().unwrap().filename, "ficha-tecnica_casa.pdf");
    }
}
