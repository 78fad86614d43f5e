//! Geometric table reconstruction.
//!
//! PDFs carry no table model, only drawing primitives and positioned text.
//! This module rebuilds a grid by closing rectangles out of horizontal and
//! vertical ruling lines, grouping the cells into rows, and dropping each
//! text line into the cell that contains it.

mod cells;
mod index;
mod lines;
mod rows;

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::geometry::{APPROX_TOLERANCE, Rect, TextRect};
use crate::page::{LayoutAnalyzer, PageLayout, TextFragment};

pub use cells::detect_cells;
pub use index::{StartIndex, Starts};
pub use lines::{Line, Orientation, classify, dedup_lines, ruling_lines};
pub use rows::{assign_texts, group_rows};

#[derive(Clone, Debug)]
pub struct TableSettings {
    /// Coordinates closer than this are treated as equal.
    pub tolerance: f64,
    /// Split multi-line text fragments into one entry per line.
    pub split_text_lines: bool,
    /// Keep rows whose cells received no text. Off by default, so only
    /// rows that hold text are emitted.
    pub keep_empty_rows: bool,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            tolerance: APPROX_TOLERANCE,
            split_text_lines: true,
            keep_empty_rows: false,
        }
    }
}

/// Rows of cells; each cell holds every text run found inside it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Table {
    pub rows: Vec<Vec<Vec<String>>>,
}

impl Table {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Text fragments flipped into page space, one entry per visual line.
pub fn text_rects(texts: &[TextFragment], page_height: f64, split_lines: bool) -> Vec<TextRect> {
    texts
        .iter()
        .flat_map(|t| {
            let rect = Rect::from_corners(t.x0, page_height - t.y0, t.x1, page_height - t.y1);
            if split_lines {
                TextRect::split_lines(rect, &t.text)
            } else {
                vec![TextRect {
                    rect,
                    text: t.text.trim_end_matches('\n').to_string(),
                }]
            }
        })
        .collect()
}

/// Reconstruct the table drawn on one page.
///
/// Never fails: geometry that does not close yields an empty table.
pub fn extract_table(page: &PageLayout, settings: &TableSettings) -> Table {
    let tol = settings.tolerance;
    let lines = ruling_lines(&page.segments, page.height, tol);
    let cells = detect_cells(&lines, tol);
    let rows = group_rows(&cells, tol);
    let texts = text_rects(&page.texts, page.height, settings.split_text_lines);
    let mut grid = assign_texts(&rows, &texts, tol);
    if !settings.keep_empty_rows {
        grid.retain(|row| row.iter().any(|cell| !cell.is_empty()));
    }
    debug!(
        lines = lines.len(),
        cells = cells.len(),
        rows = grid.len(),
        "reconstructed page table"
    );
    Table { rows: grid }
}

/// Lazily yields one table per page, in page order.
pub struct TableIter {
    pages: std::vec::IntoIter<PageLayout>,
    settings: TableSettings,
}

impl Iterator for TableIter {
    type Item = Table;

    fn next(&mut self) -> Option<Table> {
        let page = self.pages.next()?;
        Some(extract_table(&page, &self.settings))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pages.size_hint()
    }
}

/// Analyze a PDF and iterate its page tables.
pub fn extract_tables<A: LayoutAnalyzer + ?Sized>(
    pdf: &[u8],
    analyzer: &A,
    settings: TableSettings,
) -> Result<TableIter> {
    let pages = analyzer.analyze(pdf)?;
    debug!(pages = pages.len(), "analyzed pdf layout");
    Ok(TableIter {
        pages: pages.into_iter(),
        settings,
    })
}

/// Reconstruct every page's table in parallel. Output keeps page order.
pub fn extract_tables_par(pages: &[PageLayout], settings: &TableSettings) -> Vec<Table> {
    pages
        .par_iter()
        .map(|page| extract_table(page, settings))
        .collect()
}
