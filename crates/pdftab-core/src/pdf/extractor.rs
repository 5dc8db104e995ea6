//! Single-page extraction using lopdf.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Result, open_document, page_count};
use crate::error::PdfError;
use crate::layout::Rotation;

/// A single page written to its own PDF file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedPage {
    /// Page number in the source document (1-indexed).
    pub page_number: u32,
    /// Path of the single-page PDF.
    pub file_path: PathBuf,
    /// Rotation that was corrected on this page.
    pub rotation_applied: Rotation,
}

impl ExtractedPage {
    /// Deterministic file name for a page inside a run directory.
    pub fn file_name(page: u32) -> String {
        format!("page-{}.pdf", page)
    }
}

/// Splits pages out of a source document.
///
/// The source is reopened for every extraction, so no document handle is
/// held between calls.
#[derive(Debug, Clone)]
pub struct PageExtractor {
    source: PathBuf,
    password: String,
}

impl PageExtractor {
    /// Create an extractor for a source document.
    pub fn new(source: impl Into<PathBuf>, password: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            password: password.into(),
        }
    }

    /// Path of the source document.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Write page `page` (1-indexed) to `dest_dir/page-{page}.pdf`.
    pub fn extract(&self, page: u32, dest_dir: &Path) -> crate::Result<ExtractedPage> {
        let data = self.extract_to_bytes(page)?;
        let file_path = dest_dir.join(ExtractedPage::file_name(page));
        std::fs::write(&file_path, &data)?;

        debug!("Saved page {} to {}", page, file_path.display());
        Ok(ExtractedPage {
            page_number: page,
            file_path,
            rotation_applied: Rotation::None,
        })
    }

    /// Serialize page `page` (1-indexed) as a standalone PDF.
    pub fn extract_to_bytes(&self, page: u32) -> Result<Vec<u8>> {
        let mut doc = open_document(&self.source, &self.password)?;

        let total = page_count(&doc);
        if page == 0 || page > total {
            return Err(PdfError::PageOutOfRange {
                page,
                page_count: total,
            });
        }

        let others: Vec<u32> = (1..=total).filter(|&p| p != page).collect();
        if !others.is_empty() {
            doc.delete_pages(&others);
        }
        doc.prune_objects();
        doc.renumber_objects();

        let mut data = Vec::new();
        doc.save_to(&mut data).map_err(|e| PdfError::Render {
            page,
            reason: format!("failed to save page: {}", e),
        })?;

        Ok(data)
    }
}
