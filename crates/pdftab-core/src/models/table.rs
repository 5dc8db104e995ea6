//! Table result models.

use serde::{Deserialize, Serialize};

use crate::layout::BBox;
use crate::models::config::Flavor;
use crate::pages::PageSet;

/// A table found by the table parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Bounding box in page coordinates (y grows upward).
    pub bbox: BBox,
    /// Page number in the source document (1-indexed).
    pub page: u32,
    /// Position of the table among the tables of its page.
    pub order: usize,
    /// Strategy that produced the table.
    pub flavor: Flavor,
    /// Cell text, row by row.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table.
    pub fn new(bbox: BBox, page: u32) -> Self {
        Self {
            bbox,
            page,
            order: 0,
            flavor: Flavor::default(),
            rows: Vec::new(),
        }
    }

    pub fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    pub fn with_flavor(mut self, flavor: Flavor) -> Self {
        self.flavor = flavor;
        self
    }

    pub fn with_rows(mut self, rows: Vec<Vec<String>>) -> Self {
        self.rows = rows;
        self
    }

    /// Number of rows and of columns in the widest row.
    pub fn shape(&self) -> (usize, usize) {
        let cols = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        (self.rows.len(), cols)
    }
}

/// A table with its guessed title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleAssignment {
    pub table: Table,
    pub title: Option<String>,
}

/// All tables found in a run, sorted by page and position.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableList {
    /// Pages that were processed.
    pub pages: PageSet,
    pub tables: Vec<TitleAssignment>,
}

impl TableList {
    /// Build a list, sorting tables by page then by order.
    pub fn new(pages: PageSet, mut tables: Vec<TitleAssignment>) -> Self {
        tables.sort_by_key(|t| (t.table.page, t.table.order));
        Self { pages, tables }
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TitleAssignment> {
        self.tables.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TitleAssignment> {
        self.tables.iter()
    }

    /// Tables found on one page.
    pub fn on_page(&self, page: u32) -> Vec<&TitleAssignment> {
        self.tables.iter().filter(|t| t.table.page == page).collect()
    }

    /// Serialize the list as pretty-printed JSON.
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| crate::PdftabError::Table(e.to_string()))
    }
}
