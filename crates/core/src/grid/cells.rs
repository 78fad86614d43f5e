//! Cell closure: find rectangles bounded by four ruling lines.

use tracing::trace;

use crate::geometry::{Rect, approx_eq_tol};

use super::index::StartIndex;
use super::lines::{Line, Orientation};

/// Detect every closed cell.
///
/// From each start point, follow a horizontal (top) line to its far end
/// and require a vertical (right) line starting there. Follow a vertical
/// (left) line from the same point down and require a horizontal (bottom)
/// line starting at its far end. The cell closes when the bottom line ends
/// where the right line ends.
pub fn detect_cells(lines: &[Line], tolerance: f64) -> Vec<Rect> {
    let index = StartIndex::build(lines);
    let mut cells: Vec<Rect> = Vec::new();

    for &(px, py) in index.points() {
        let Some(starts) = index.starts_at((px, py)) else {
            continue;
        };
        if starts.horizontal.is_empty() {
            continue;
        }
        let lefts = index.lookup_neighbors(px, py, Orientation::Vertical);
        if lefts.is_empty() {
            continue;
        }

        for &top_id in &starts.horizontal {
            let top = index.line(top_id);
            let (tx, ty) = top.end();
            for right_id in index.lookup_neighbors(tx, ty, Orientation::Vertical) {
                let right = index.line(right_id);
                for &left_id in &lefts {
                    let left = index.line(left_id);
                    if let Some(cell) = close_cell(&index, top, right, left, tolerance) {
                        push_unique(&mut cells, cell, tolerance);
                    }
                }
            }
        }
    }
    cells
}

fn close_cell(
    index: &StartIndex<'_>,
    top: &Line,
    right: &Line,
    left: &Line,
    tolerance: f64,
) -> Option<Rect> {
    let near = |a: i64, b: i64| approx_eq_tol(a as f64, b as f64, tolerance);

    let (rx, ry) = right.end();
    let (lx, ly) = left.end();
    if !near(ly, ry) {
        trace!(left = ?left, right = ?right, "side lengths differ");
        return None;
    }
    let closes = index
        .lookup_neighbors(lx, ly, Orientation::Horizontal)
        .into_iter()
        .map(|id| index.line(id))
        .any(|bottom| near(bottom.x1, rx) && near(bottom.y1, ry));
    if !closes {
        trace!(top = ?top, "no bottom line closes candidate");
        return None;
    }
    Some(Rect {
        x0: top.x0 as f64,
        y0: top.y0 as f64,
        x1: rx as f64,
        y1: ry as f64,
    })
}

fn push_unique(cells: &mut Vec<Rect>, cell: Rect, tolerance: f64) {
    if !cells.iter().any(|c| c.approx_eq(&cell, tolerance)) {
        cells.push(cell);
    }
}
