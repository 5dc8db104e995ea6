//! Seam for the external table detection strategies.

use crate::error::Result;
use crate::layout::PageLayout;
use crate::models::config::ParserConfig;
use crate::models::table::Table;
use crate::pdf::ExtractedPage;

/// Detects tables on a prepared single-page document.
///
/// Implementations receive an upright page file together with its layout
/// analysis and return the tables found on it, tagged with the page number.
pub trait TableParser {
    /// Extract tables from one page.
    fn extract_tables(
        &self,
        page: &ExtractedPage,
        layout: &PageLayout,
        config: &ParserConfig,
    ) -> Result<Vec<Table>>;
}

impl<F> TableParser for F
where
    F: Fn(&ExtractedPage, &PageLayout, &ParserConfig) -> Result<Vec<Table>>,
{
    fn extract_tables(
        &self,
        page: &ExtractedPage,
        layout: &PageLayout,
        config: &ParserConfig,
    ) -> Result<Vec<Table>> {
        self(page, layout, config)
    }
}
