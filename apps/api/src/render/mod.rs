// PDF rendering of assembled report content.
// The pipeline only sees the PdfRenderer trait; printpdf stays behind it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::report::Section;

pub mod document;

pub use document::PrintPdfRenderer;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Turns section text into a document on disk. Blocking; run off the async runtime.
pub trait PdfRenderer: Send + Sync {
    fn render(
        &self,
        content: &BTreeMap<Section, String>,
        person_name: &str,
        output_path: &Path,
    ) -> Result<(), RenderError>;
}
