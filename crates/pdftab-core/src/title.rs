//! Title guessing for tables by geometric proximity.
//!
//! A table's anchor is the midpoint of its top edge; a text block's anchor is
//! the midpoint of its bottom edge. The text block with the smallest
//! Euclidean distance between anchors becomes the title. Blocks below the
//! table are not excluded.

use std::collections::HashMap;

use tracing::trace;

use crate::layout::TextObject;
use crate::models::table::{Table, TitleAssignment};

/// Distance between a table's top-mid anchor and a text block's bottom-mid anchor.
pub fn anchor_distance(table: &Table, text: &TextObject) -> f64 {
    let (tx, ty) = table.bbox.top_mid();
    let (cx, cy) = text.bbox.bottom_mid();
    (tx - cx).hypot(ty - cy)
}

/// Nearest candidate to `table`, the first one winning on exact ties.
pub fn nearest_title<'a>(table: &Table, candidates: &'a [TextObject]) -> Option<&'a TextObject> {
    let mut best: Option<(&TextObject, f64)> = None;
    for candidate in candidates {
        let distance = anchor_distance(table, candidate);
        match best {
            Some((_, d)) if distance >= d => {}
            _ => best = Some((candidate, distance)),
        }
    }
    best.map(|(text, _)| text)
}

/// Order text blocks top to bottom, then left to right.
pub fn sort_reading_order(texts: &mut [TextObject]) {
    texts.sort_by(|a, b| {
        b.bbox
            .y1
            .total_cmp(&a.bbox.y1)
            .then_with(|| a.bbox.x0.total_cmp(&b.bbox.x0))
    });
}

/// Assign a title to every table from the horizontal text of its page.
///
/// Candidates are put in reading order before matching so ties do not
/// depend on how the text was enumerated. Pages without candidates yield
/// tables without titles.
pub fn assign_titles(
    tables: Vec<Table>,
    candidates_by_page: &HashMap<u32, Vec<TextObject>>,
) -> Vec<TitleAssignment> {
    let ordered: HashMap<u32, Vec<TextObject>> = candidates_by_page
        .iter()
        .map(|(page, texts)| {
            let mut texts = texts.clone();
            sort_reading_order(&mut texts);
            (*page, texts)
        })
        .collect();

    tables
        .into_iter()
        .map(|table| {
            let title = ordered
                .get(&table.page)
                .and_then(|texts| nearest_title(&table, texts))
                .map(|text| text.text.trim().to_string());
            trace!("Table {}/{} title: {:?}", table.page, table.order, title);
            TitleAssignment { table, title }
        })
        .collect()
}
