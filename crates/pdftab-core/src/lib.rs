//! Core library for preparing PDF pages for table extraction.
//!
//! This crate provides:
//! - Page spec parsing and resolution (`"1"`, `"all"`, `"1,3-end"`)
//! - Single-page extraction, including from encrypted documents
//! - Layout analysis and detection of pages with rotated text
//! - Rotation correction of extracted pages
//! - Table title guessing by anchor distance

pub mod error;
pub mod handler;
pub mod layout;
pub mod models;
pub mod pages;
pub mod parser;
pub mod pdf;
pub mod title;

pub use error::{LayoutError, PageSpecError, PdfError, PdftabError, Result};
pub use handler::{PdfHandler, PreparedPage};
pub use layout::{BBox, LayoutParams, Orientation, PageLayout, Rotation, TextObject};
pub use models::{
    Flavor, HandlerConfig, PageErrorPolicy, ParserConfig, PdftabConfig, Table, TableList,
    TitleAssignment,
};
pub use pages::{PageSet, PageSpec, resolve_pages};
pub use parser::TableParser;
pub use pdf::{ExtractedPage, PageExtractor, RotationCorrector};
