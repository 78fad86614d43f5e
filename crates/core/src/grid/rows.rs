//! Row grouping and text placement.

use ordered_float::OrderedFloat;

use crate::geometry::{Rect, TextRect};

/// Group cells sharing a vertical span into rows.
///
/// Rows are ordered by `y0`, cells within a row by `x0`.
pub fn group_rows(cells: &[Rect], tolerance: f64) -> Vec<Vec<Rect>> {
    let mut rows: Vec<Vec<Rect>> = Vec::new();
    for cell in cells {
        match rows
            .iter_mut()
            .find(|row| row[0].same_span(cell, tolerance))
        {
            Some(row) => row.push(*cell),
            None => rows.push(vec![*cell]),
        }
    }
    for row in &mut rows {
        row.sort_by_key(|c| OrderedFloat(c.x0));
    }
    rows.sort_by_key(|row| (OrderedFloat(row[0].y0), OrderedFloat(row[0].y1)));
    rows
}

/// Place each text line into every cell containing it.
///
/// Nested or overlapping cells each receive the text. Text that falls
/// outside every cell is dropped.
pub fn assign_texts(rows: &[Vec<Rect>], texts: &[TextRect], tolerance: f64) -> Vec<Vec<Vec<String>>> {
    let mut grid: Vec<Vec<Vec<String>>> = rows
        .iter()
        .map(|row| vec![Vec::new(); row.len()])
        .collect();

    for text in texts {
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if cell.contains(&text.rect, tolerance) {
                    grid[r][c].push(text.text.clone());
                }
            }
        }
    }
    grid
}
