//! Page preparation pipeline.
//!
//! Splits the requested pages out of the source document into a scoped
//! temporary directory, straightens rotated pages, hands every page to the
//! table parser and guesses a title for each table found.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::error::{PdfError, PdftabError, Result};
use crate::layout::{Orientation, PageLayout, analyze_file};
use crate::models::config::{PageErrorPolicy, PdftabConfig};
use crate::models::table::{Table, TableList};
use crate::pages::{PageSet, PageSpec};
use crate::parser::TableParser;
use crate::pdf::{self, ExtractedPage, PageExtractor, RotationCorrector};
use crate::title;

/// An upright single-page document with its layout analysis.
#[derive(Debug, Clone)]
pub struct PreparedPage {
    pub page: ExtractedPage,
    pub layout: PageLayout,
}

/// Prepares the pages of one PDF and runs a table parser over them.
#[derive(Debug)]
pub struct PdfHandler {
    path: PathBuf,
    pages: PageSet,
    extractor: PageExtractor,
    corrector: RotationCorrector,
    config: PdftabConfig,
}

impl PdfHandler {
    /// Create a handler with the default configuration.
    ///
    /// `pages` uses the page spec grammar (`"1"`, `"all"`, `"1,3-end"`).
    pub fn new(path: impl Into<PathBuf>, pages: &str, password: Option<&str>) -> Result<Self> {
        Self::with_config(path, pages, password, PdftabConfig::default())
    }

    /// Create a handler.
    ///
    /// The page spec is checked before the file is touched. The source is
    /// then opened once, decrypting it if needed, to bound the pages by the
    /// document's length.
    pub fn with_config(
        path: impl Into<PathBuf>,
        pages: &str,
        password: Option<&str>,
        config: PdftabConfig,
    ) -> Result<Self> {
        let path = path.into();
        if !pdf::is_pdf_path(&path) {
            return Err(PdfError::UnsupportedFormat(path).into());
        }
        config.validate()?;

        let spec = PageSpec::parse(pages)?;
        let password = password.unwrap_or_default();

        let doc = pdf::open_document(&path, password)?;
        let page_count = pdf::page_count(&doc);
        let pages = spec.resolve(page_count)?;

        info!(
            "Opened {} ({} pages), selected pages {}",
            path.display(),
            page_count,
            pages
        );

        Ok(Self {
            extractor: PageExtractor::new(&path, password),
            corrector: RotationCorrector::new(password),
            path,
            pages,
            config,
        })
    }

    /// Source document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Pages selected for processing.
    pub fn pages(&self) -> &PageSet {
        &self.pages
    }

    pub fn config(&self) -> &PdftabConfig {
        &self.config
    }

    /// Extract one page into `dir`, analyse it and straighten it if rotated.
    pub fn prepare_page(&self, page: u32, dir: &Path) -> Result<PreparedPage> {
        let extracted = self.extractor.extract(page, dir)?;
        let params = &self.config.parser.layout;
        let layout = analyze_file(&extracted.file_path, page, params)?;

        if !self.config.handler.correct_rotation {
            return Ok(PreparedPage {
                page: extracted,
                layout,
            });
        }

        let rotation = layout.rotation();
        if !rotation.is_rotated() {
            return Ok(PreparedPage {
                page: extracted,
                layout,
            });
        }

        info!("Page {} is rotated {:?}, correcting", page, rotation);
        let corrected = self.corrector.correct(&extracted, rotation)?;
        let layout = analyze_file(&corrected.file_path, page, params)?;
        Ok(PreparedPage {
            page: corrected,
            layout,
        })
    }

    /// Prepare every selected page into `dir`, in ascending page order.
    pub fn prepare_pages(&self, dir: &Path) -> Result<Vec<PreparedPage>> {
        let mut prepared = Vec::with_capacity(self.pages.len());
        for page in self.pages.iter() {
            match self.prepare_page(page, dir) {
                Ok(p) => prepared.push(p),
                Err(e) if self.skips(&e) => warn!("Skipping page {}: {}", page, e),
                Err(e) => return Err(e),
            }
        }
        Ok(prepared)
    }

    /// Run `parser` over every selected page and return the tables found,
    /// each with a guessed title.
    ///
    /// Page files live in a temporary directory that is removed when this
    /// returns, whether or not it succeeds.
    pub fn parse<P: TableParser + ?Sized>(&self, parser: &P) -> Result<TableList> {
        let temp = self.temp_dir()?;
        debug!("Working directory {}", temp.path().display());

        let prepared = self.prepare_pages(temp.path())?;

        let mut tables: Vec<Table> = Vec::new();
        let mut candidates = HashMap::new();
        for p in &prepared {
            let number = p.page.page_number;
            let found = match parser.extract_tables(&p.page, &p.layout, &self.config.parser) {
                Ok(found) => found,
                Err(e) if self.skips(&e) => {
                    warn!("Skipping tables on page {}: {}", number, e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            debug!("Page {}: {} tables", number, found.len());
            tables.extend(found.into_iter().enumerate().map(|(order, mut table)| {
                table.page = number;
                table.order = order;
                table
            }));
            let horizontal = p.layout.text_objects(Orientation::Horizontal);
            candidates.insert(number, horizontal.to_vec());
        }

        let list = TableList::new(
            self.pages.clone(),
            title::assign_titles(tables, &candidates),
        );
        temp.close()?;

        info!("Found {} tables in {}", list.len(), self.path.display());
        Ok(list)
    }

    fn temp_dir(&self) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("pdftab-");
        let dir = match &self.config.handler.temp_root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        Ok(dir)
    }

    fn skips(&self, error: &PdftabError) -> bool {
        self.config.handler.on_page_error == PageErrorPolicy::Skip && error.is_page_local()
    }
}
