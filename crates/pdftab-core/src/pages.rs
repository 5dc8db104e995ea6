//! Page specification parsing and resolution.
//!
//! Accepted forms are `"1"` (the default), `"all"`, or comma-separated tokens
//! of the form `N` or `A-B`, where `B` may be `end`.

use std::fmt;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PageSpecError, PdfError, PdftabError, Result};
use crate::pdf;

lazy_static! {
    static ref PAGE_TOKEN: Regex =
        Regex::new(r"^([0-9A-Za-z]+)\s*(?:-\s*([0-9A-Za-z]+))?$").unwrap();
}

/// Upper bound of a page range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEnd {
    /// A concrete page number.
    Page(u32),
    /// The last page of the document.
    End,
}

/// An inclusive, 1-indexed page range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: u32,
    pub end: RangeEnd,
}

impl PageRange {
    /// A range covering a single page.
    pub fn single(page: u32) -> Self {
        Self {
            start: page,
            end: RangeEnd::Page(page),
        }
    }
}

/// A parsed page specification that has not been resolved against a document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageSpec {
    /// Only the first page.
    #[default]
    First,
    /// Every page of the document.
    All,
    /// An explicit list of ranges.
    Ranges(Vec<PageRange>),
}

impl PageSpec {
    /// Parse a page specification string.
    ///
    /// Only syntax is checked here; no document is opened.
    pub fn parse(input: &str) -> std::result::Result<Self, PageSpecError> {
        let input = input.trim();
        match input {
            "1" => return Ok(PageSpec::First),
            "all" => return Ok(PageSpec::All),
            _ => {}
        }

        let ranges = input
            .split(',')
            .map(parse_token)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(PageSpec::Ranges(ranges))
    }

    /// Whether resolving this spec requires the document's page count.
    pub fn needs_page_count(&self) -> bool {
        match self {
            PageSpec::First => false,
            PageSpec::All => true,
            PageSpec::Ranges(ranges) => ranges.iter().any(|r| r.end == RangeEnd::End),
        }
    }

    /// Flatten into a sorted, duplicate-free page set.
    pub fn resolve(&self, page_count: u32) -> Result<PageSet> {
        let ranges: Vec<(u32, u32)> = match self {
            PageSpec::First => vec![(1, 1)],
            PageSpec::All => vec![(1, page_count)],
            PageSpec::Ranges(ranges) => ranges
                .iter()
                .map(|r| match r.end {
                    RangeEnd::Page(end) => (r.start, end),
                    RangeEnd::End => (r.start, page_count),
                })
                .collect(),
        };

        let mut pages = Vec::new();
        for (start, end) in ranges {
            if start > page_count || end > page_count {
                return Err(PdftabError::Pdf(PdfError::PageOutOfRange {
                    page: start.max(end),
                    page_count,
                }));
            }
            pages.extend(start..=end);
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSet(pages))
    }
}

impl std::str::FromStr for PageSpec {
    type Err = PageSpecError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        PageSpec::parse(s)
    }
}

fn parse_token(token: &str) -> std::result::Result<PageRange, PageSpecError> {
    let trimmed = token.trim();
    let malformed = |reason: &str| PageSpecError::Malformed {
        token: token.to_string(),
        reason: reason.to_string(),
    };

    let caps = PAGE_TOKEN
        .captures(trimmed)
        .ok_or_else(|| malformed("expected N or A-B"))?;

    let start = parse_page_number(&caps[1]).ok_or_else(|| malformed("not a page number"))?;
    if start == 0 {
        return Err(malformed("pages start at 1"));
    }

    let end = match caps.get(2).map(|m| m.as_str()) {
        None => return Ok(PageRange::single(start)),
        Some("end") => RangeEnd::End,
        Some(end) => {
            let end = parse_page_number(end).ok_or_else(|| malformed("not a page number"))?;
            if end < start {
                return Err(malformed("range end precedes start"));
            }
            RangeEnd::Page(end)
        }
    };

    Ok(PageRange { start, end })
}

fn parse_page_number(s: &str) -> Option<u32> {
    if s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

/// Sorted, duplicate-free page numbers (1-indexed).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageSet(Vec<u32>);

impl PageSet {
    /// Page numbers in ascending order.
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, page: u32) -> bool {
        self.0.binary_search(&page).is_ok()
    }
}

impl fmt::Display for PageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pages: Vec<String> = self.0.iter().map(u32::to_string).collect();
        write!(f, "{}", pages.join(","))
    }
}

/// Resolve a page spec against a document on disk.
///
/// The default spec resolves without touching the file. Every other spec
/// opens (and decrypts) the document to bound the pages by its length.
pub fn resolve_pages(path: &Path, spec: &PageSpec, password: &str) -> Result<PageSet> {
    if let PageSpec::First = spec {
        return Ok(PageSet(vec![1]));
    }

    let doc = pdf::open_document(path, password)?;
    let page_count = pdf::page_count(&doc);
    debug!("Resolving {:?} against {} pages", spec, page_count);
    spec.resolve(page_count)
}
