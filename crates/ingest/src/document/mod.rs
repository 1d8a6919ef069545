mod md;
mod pdf;
mod txt;

use std::path::Path;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("PDF extraction failed: {0}")]
    PdfError(String),
    #[error("No text could be extracted from {0}")]
    NoText(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Source format, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Text,
    Markdown,
}

impl DocumentKind {
    pub fn from_filename(filename: &str) -> Result<Self, ExtractionError> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "txt" | "text" => Ok(DocumentKind::Text),
            "md" | "markdown" => Ok(DocumentKind::Markdown),
            other => Err(ExtractionError::UnsupportedType(other.to_string())),
        }
    }
}

/// A page of extracted text.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// 1-based page number (for PDFs). For TXT/MD, always 1.
    pub page_number: usize,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub filename: String,
    pub kind: DocumentKind,
    /// Pages in document order.
    pub pages: Vec<PageContent>,
}

impl ExtractedDocument {
    /// All pages concatenated in page order.
    pub fn full_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Extract text from in-memory file bytes based on the file name's extension.
pub fn extract_document(bytes: &[u8], filename: &str) -> Result<ExtractedDocument, ExtractionError> {
    let kind = DocumentKind::from_filename(filename)?;
    let pages = match kind {
        DocumentKind::Pdf => pdf::extract_pdf(bytes)?,
        DocumentKind::Text => txt::extract_txt(bytes),
        DocumentKind::Markdown => md::extract_md(bytes),
    };
    Ok(ExtractedDocument {
        filename: filename.to_string(),
        kind,
        pages,
    })
}

/// Turns a document on disk into page-ordered raw text.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractionError>;
}

/// Reads PDF, plain-text and markdown files from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileTextExtractor;

impl TextExtractor for FileTextExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractionError> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bytes = std::fs::read(path)?;
        let doc = extract_document(&bytes, &filename)?;
        let text = doc.full_text();
        if text.trim().is_empty() {
            return Err(ExtractionError::NoText(filename));
        }
        debug!(file = %filename, pages = doc.pages.len(), chars = text.len(), "extracted text");
        Ok(text)
    }
}
