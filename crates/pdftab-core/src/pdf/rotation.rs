//! Rotation correction for extracted pages.

use std::path::{Path, PathBuf};

use lopdf::Object;
use tracing::debug;

use super::{ExtractedPage, Result, open_document, page_id, page_rotation};
use crate::error::PdfError;
use crate::layout::Rotation;

/// Path under which the mis-rotated original of a page is preserved.
pub fn rotated_artifact_path(page_path: &Path, page: u32) -> PathBuf {
    page_path.with_file_name(format!("p-{}_rotated.pdf", page))
}

/// Rewrites extracted pages so their text reads upright.
#[derive(Debug, Clone, Default)]
pub struct RotationCorrector {
    password: String,
}

impl RotationCorrector {
    /// Create a corrector. The password is only used if the page file is
    /// itself encrypted.
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }

    /// Correct `page` for the detected `rotation`.
    ///
    /// The mis-rotated file is renamed to `p-{N}_rotated.pdf` and the
    /// corrected document is written back to the page's original path.
    /// Calling this with [`Rotation::None`] leaves the page untouched.
    pub fn correct(&self, page: &ExtractedPage, rotation: Rotation) -> Result<ExtractedPage> {
        let Some(degrees) = rotation.corrective_degrees() else {
            return Ok(page.clone());
        };
        let number = page.page_number;
        let render_error = |reason: String| PdfError::Render {
            page: number,
            reason,
        };

        let original = rotated_artifact_path(&page.file_path, number);
        std::fs::rename(&page.file_path, &original).map_err(|e| {
            render_error(format!("failed to move {}: {}", page.file_path.display(), e))
        })?;

        let mut doc = open_document(&original, &self.password)
            .map_err(|e| render_error(e.to_string()))?;
        let id = page_id(&doc, 1).map_err(|e| render_error(e.to_string()))?;
        let current = page_rotation(&doc, id);
        let updated = (current + degrees).rem_euclid(360);

        doc.get_object_mut(id)
            .and_then(|obj| obj.as_dict_mut())
            .map_err(|e| render_error(e.to_string()))?
            .set("Rotate", Object::Integer(updated));

        let mut data = Vec::new();
        doc.save_to(&mut data)
            .map_err(|e| render_error(format!("failed to save page: {}", e)))?;
        std::fs::write(&page.file_path, &data).map_err(|e| {
            render_error(format!("failed to write {}: {}", page.file_path.display(), e))
        })?;

        debug!(
            "Page {} was {:?}; /Rotate {} -> {}",
            number, rotation, current, updated
        );

        Ok(ExtractedPage {
            page_number: number,
            file_path: page.file_path.clone(),
            rotation_applied: rotation,
        })
    }
}
