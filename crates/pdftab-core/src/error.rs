//! Error types for the pdftab-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the pdftab library.
#[derive(Error, Debug)]
pub enum PdftabError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Page specification error.
    #[error("page spec error: {0}")]
    PageSpec(#[from] PageSpecError),

    /// Layout analysis error.
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Error reported by the table parser.
    #[error("table parser error: {0}")]
    Table(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF is encrypted and the password is wrong or missing.
    #[error("failed to decrypt PDF: {0}")]
    Decryption(String),

    /// Requested page lies beyond the end of the document.
    #[error("page {page} is out of range (document has {page_count} pages)")]
    PageOutOfRange { page: u32, page_count: u32 },

    /// Failed to write or re-render a single page.
    #[error("failed to render page {page}: {reason}")]
    Render { page: u32, reason: String },

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The input is not a PDF file.
    #[error("file format not supported: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Errors related to page specifications.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageSpecError {
    /// A comma-separated token could not be parsed.
    #[error("malformed page token '{token}': {reason}")]
    Malformed { token: String, reason: String },
}

/// Errors related to layout analysis.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// The content stream interpreter failed.
    #[error("layout analysis failed: {0}")]
    Analysis(String),
}

impl PdftabError {
    /// Page number a per-page failure belongs to, if any.
    pub fn page(&self) -> Option<u32> {
        match self {
            PdftabError::Pdf(PdfError::PageOutOfRange { page, .. })
            | PdftabError::Pdf(PdfError::Render { page, .. }) => Some(*page),
            _ => None,
        }
    }

    /// Whether the failure is confined to a single page and other pages can
    /// still be processed.
    pub fn is_page_local(&self) -> bool {
        matches!(
            self,
            PdftabError::Pdf(PdfError::PageOutOfRange { .. })
                | PdftabError::Pdf(PdfError::Render { .. })
                | PdftabError::Layout(_)
                | PdftabError::Table(_)
        )
    }
}

/// Result type for the pdftab library.
pub type Result<T> = std::result::Result<T, PdftabError>;
