//! Ruling-line normalization: flip, snap, classify and deduplicate.

use crate::geometry::{Rect, approx_eq_tol, snap};
use crate::page::{Segment, SegmentKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// An axis-aligned ruling line on the snapped lattice.
///
/// Horizontal lines run left to right (`y0 == y1`, `x0 < x1`), vertical
/// lines run top to bottom (`x0 == x1`, `y0 < y1`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Line {
    pub orientation: Orientation,
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl Line {
    fn horizontal(y: i64, x0: i64, x1: i64) -> Option<Self> {
        (x0 < x1).then_some(Self {
            orientation: Orientation::Horizontal,
            x0,
            y0: y,
            x1,
            y1: y,
        })
    }

    fn vertical(x: i64, y0: i64, y1: i64) -> Option<Self> {
        (y0 < y1).then_some(Self {
            orientation: Orientation::Vertical,
            x0: x,
            y0,
            x1: x,
            y1,
        })
    }

    pub fn start(&self) -> (i64, i64) {
        (self.x0, self.y0)
    }

    pub fn end(&self) -> (i64, i64) {
        (self.x1, self.y1)
    }

    fn approx_eq(&self, other: &Line, tolerance: f64) -> bool {
        self.orientation == other.orientation
            && approx_eq_tol(self.x0 as f64, other.x0 as f64, tolerance)
            && approx_eq_tol(self.y0 as f64, other.y0 as f64, tolerance)
            && approx_eq_tol(self.x1 as f64, other.x1 as f64, tolerance)
            && approx_eq_tol(self.y1 as f64, other.y1 as f64, tolerance)
    }
}

/// Flip a PDF-space segment into page space (y down).
pub fn to_page_rect(seg: &Segment, page_height: f64) -> Rect {
    Rect::from_corners(seg.x0, page_height - seg.y0, seg.x1, page_height - seg.y1)
}

/// Turn one primitive into zero or more ruling lines.
///
/// A box wider and taller than the tolerance is a full rectangle and
/// contributes its four sides. Anything thinner than the tolerance on one
/// axis collapses to its centre line. Diagonals and dots contribute nothing.
pub fn classify(seg: &Segment, page_height: f64, tolerance: f64) -> Vec<Line> {
    let r = to_page_rect(seg, page_height).snapped();
    let flat_x = approx_eq_tol(r.x0, r.x1, tolerance);
    let flat_y = approx_eq_tol(r.y0, r.y1, tolerance);
    let (x0, y0, x1, y1) = (r.x0 as i64, r.y0 as i64, r.x1 as i64, r.y1 as i64);

    match (flat_x, flat_y) {
        (true, true) => Vec::new(),
        (true, false) => Line::vertical(snap((r.x0 + r.x1) / 2.0), y0, y1)
            .into_iter()
            .collect(),
        (false, true) => Line::horizontal(snap((r.y0 + r.y1) / 2.0), x0, x1)
            .into_iter()
            .collect(),
        (false, false) if seg.kind == SegmentKind::Rect => [
            Line::horizontal(y0, x0, x1),
            Line::vertical(x1, y0, y1),
            Line::horizontal(y1, x0, x1),
            Line::vertical(x0, y0, y1),
        ]
        .into_iter()
        .flatten()
        .collect(),
        (false, false) => Vec::new(),
    }
}

/// Normalize every segment of a page and drop near-duplicate lines.
pub fn ruling_lines(segments: &[Segment], page_height: f64, tolerance: f64) -> Vec<Line> {
    let mut lines: Vec<Line> = segments
        .iter()
        .flat_map(|seg| classify(seg, page_height, tolerance))
        .collect();
    lines.sort();
    dedup_lines(lines, tolerance)
}

/// Collapse lines whose endpoints are all approximately equal, keeping
/// the first in sort order.
pub fn dedup_lines(lines: Vec<Line>, tolerance: f64) -> Vec<Line> {
    let mut kept: Vec<Line> = Vec::with_capacity(lines.len());
    for line in lines {
        if !kept.iter().any(|k| k.approx_eq(&line, tolerance)) {
            kept.push(line);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::APPROX_TOLERANCE;

    #[test]
    fn classify_flips_y_axis() {
        let lines = classify(&Segment::line(0.0, 90.0, 50.0, 90.0), 100.0, APPROX_TOLERANCE);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].orientation, Orientation::Horizontal);
        assert_eq!(lines[0].start(), (0, 10));
        assert_eq!(lines[0].end(), (50, 10));
    }

    #[test]
    fn thin_rect_becomes_centre_line() {
        let lines = classify(&Segment::rect(99.6, 0.0, 100.4, 40.0), 40.0, APPROX_TOLERANCE);
        assert_eq!(
            lines,
            vec![Line {
                orientation: Orientation::Vertical,
                x0: 100,
                y0: 0,
                x1: 100,
                y1: 40,
            }]
        );
    }

    #[test]
    fn full_rect_explodes_into_sides() {
        let lines = classify(&Segment::rect(0.0, 0.0, 20.0, 10.0), 10.0, APPROX_TOLERANCE);
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines
                .iter()
                .filter(|l| l.orientation == Orientation::Vertical)
                .count(),
            2
        );
    }

    #[test]
    fn diagonals_and_dots_are_dropped() {
        assert!(classify(&Segment::line(0.0, 0.0, 30.0, 30.0), 50.0, APPROX_TOLERANCE).is_empty());
        assert!(classify(&Segment::line(5.0, 5.0, 5.5, 5.2), 50.0, APPROX_TOLERANCE).is_empty());
    }

    #[test]
    fn overlapping_duplicates_collapse() {
        let segs = vec![
            Segment::line(0.0, 50.0, 100.0, 50.0),
            Segment::line(0.4, 50.3, 100.6, 50.3),
            Segment::line(0.0, 20.0, 100.0, 20.0),
        ];
        assert_eq!(ruling_lines(&segs, 100.0, APPROX_TOLERANCE).len(), 2);
    }
}
