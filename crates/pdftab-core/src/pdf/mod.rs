//! PDF document handling: opening, single-page extraction and rotation.

mod extractor;
mod rotation;

pub use extractor::{ExtractedPage, PageExtractor};
pub use rotation::{RotationCorrector, rotated_artifact_path};

use std::path::Path;

use lopdf::encryption::{self, DecryptionError};
use lopdf::{Document, Object, ObjectId};
use tracing::debug;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Open a PDF from disk, decrypting it with `password` when it is encrypted.
///
/// The returned document no longer carries an `/Encrypt` entry, so saving it
/// produces a plain PDF.
pub fn open_document(path: &Path, password: &str) -> Result<Document> {
    let data = std::fs::read(path)
        .map_err(|e| PdfError::Parse(format!("failed to read {}: {}", path.display(), e)))?;
    load_document(&data, password)
}

/// Load a PDF from bytes, decrypting it when needed.
pub fn load_document(data: &[u8], password: &str) -> Result<Document> {
    let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

    if doc.is_encrypted() {
        decrypt(&mut doc, password)?;
        doc.trailer.remove(b"Encrypt");
        debug!("Decrypted PDF");
    }

    if doc.get_pages().is_empty() {
        return Err(PdfError::NoPages);
    }

    Ok(doc)
}

/// Decrypt every string and stream of `doc` in place.
///
/// `Document::decrypt` reads the crypt filter (`/CF/StdCF/CFM`) to choose
/// between RC4 and AES, and fails on `/V 1` and `/V 2` documents that have
/// none. Those are always RC4, so they are decrypted object by object here.
fn decrypt(doc: &mut Document, password: &str) -> Result<()> {
    let has_crypt_filters = doc
        .get_encrypted()
        .map(|dict| dict.has(b"CF"))
        .unwrap_or(false);
    if has_crypt_filters {
        return doc
            .decrypt(password)
            .map_err(|e| PdfError::Decryption(e.to_string()));
    }

    let key = encryption::get_encryption_key(&*doc, password, true).map_err(decryption_error)?;
    let encrypt_id = doc
        .trailer
        .get(b"Encrypt")
        .and_then(Object::as_reference)
        .ok();

    for (&id, obj) in doc.objects.iter_mut() {
        if Some(id) == encrypt_id {
            continue;
        }
        let plain = match encryption::decrypt_object(&key, id, &*obj, false) {
            Ok(plain) => plain,
            Err(DecryptionError::NotDecryptable) => continue,
            Err(e) => return Err(decryption_error(e)),
        };
        match obj {
            Object::Stream(stream) => stream.set_content(plain),
            Object::String(content, _) => *content = plain,
            _ => {}
        }
    }
    Ok(())
}

fn decryption_error(e: DecryptionError) -> PdfError {
    PdfError::Decryption(e.to_string())
}

/// Number of pages in the document.
pub fn page_count(doc: &Document) -> u32 {
    doc.get_pages().len() as u32
}

/// Object id of a 1-indexed page.
pub fn page_id(doc: &Document, page: u32) -> Result<ObjectId> {
    doc.get_pages()
        .get(&page)
        .copied()
        .ok_or(PdfError::PageOutOfRange {
            page,
            page_count: page_count(doc),
        })
}

/// Look up a page attribute, following `/Parent` links for inherited values.
pub fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut node_id = page_id;
    // Guard against cyclic page trees.
    for _ in 0..32 {
        let dict = doc.get_object(node_id).ok()?.as_dict().ok()?;
        if let Ok(value) = dict.get(key) {
            return doc.dereference(value).ok().map(|(_, obj)| obj);
        }
        node_id = dict.get(b"Parent").ok()?.as_reference().ok()?;
    }
    None
}

/// Effective `/Rotate` of a page, normalized to 0, 90, 180 or 270.
pub fn page_rotation(doc: &Document, page_id: ObjectId) -> i64 {
    inherited_attribute(doc, page_id, b"Rotate")
        .and_then(|obj| obj.as_i64().ok())
        .map(|deg| deg.rem_euclid(360) / 90 * 90)
        .unwrap_or(0)
}

/// Effective `/MediaBox` of a page as `(x0, y0, x1, y1)`.
pub fn page_media_box(doc: &Document, page_id: ObjectId) -> Option<[f64; 4]> {
    let array = inherited_attribute(doc, page_id, b"MediaBox")?.as_array().ok()?;
    if array.len() != 4 {
        return None;
    }
    let mut values = [0.0; 4];
    for (value, obj) in values.iter_mut().zip(array) {
        *value = match obj {
            Object::Integer(i) => *i as f64,
            Object::Real(r) => f64::from(*r),
            _ => return None,
        };
    }
    Some(values)
}

/// Whether the path names a PDF file.
pub fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}
