//! Page-space geometry with tolerant coordinate comparison.
//!
//! All rectangles here live in a top-left origin, y-down space. PDF
//! coordinates are bottom-up and get flipped exactly once, when a
//! [`PageLayout`](crate::page::PageLayout) is normalized.

use serde::{Deserialize, Serialize};

/// Two coordinates closer than this are the same coordinate.
///
/// Generators emit ruling lines as thin rectangles and "touching" lines
/// that miss each other by a fraction of a unit.
pub const APPROX_TOLERANCE: f64 = 2.0;

/// `|a - b| < tolerance`.
#[inline]
pub fn approx_eq_tol(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() < tolerance
}

#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    approx_eq_tol(a, b, APPROX_TOLERANCE)
}

/// `a <= b` or approximately equal.
#[inline]
pub fn approx_le_tol(a: f64, b: f64, tolerance: f64) -> bool {
    a <= b || approx_eq_tol(a, b, tolerance)
}


/// Round a coordinate onto the integer lattice used for hashing.
#[inline]
pub fn snap(v: f64) -> i64 {
    v.round() as i64
}

/// Axis-aligned box, `x0 <= x1` and `y0 <= y1`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    /// Build a rect from two arbitrary corners.
    pub fn from_corners(ax: f64, ay: f64, bx: f64, by: f64) -> Self {
        Self {
            x0: ax.min(bx),
            y0: ay.min(by),
            x1: ax.max(bx),
            y1: ay.max(by),
        }
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Same rect with every coordinate snapped to the lattice.
    pub fn snapped(&self) -> Self {
        Self {
            x0: snap(self.x0) as f64,
            y0: snap(self.y0) as f64,
            x1: snap(self.x1) as f64,
            y1: snap(self.y1) as f64,
        }
    }

    /// All four coordinates approximately equal.
    pub fn approx_eq(&self, other: &Rect, tolerance: f64) -> bool {
        approx_eq_tol(self.x0, other.x0, tolerance)
            && approx_eq_tol(self.y0, other.y0, tolerance)
            && approx_eq_tol(self.x1, other.x1, tolerance)
            && approx_eq_tol(self.y1, other.y1, tolerance)
    }

    /// Same vertical extent, within tolerance.
    pub fn same_span(&self, other: &Rect, tolerance: f64) -> bool {
        approx_eq_tol(self.y0, other.y0, tolerance) && approx_eq_tol(self.y1, other.y1, tolerance)
    }

    /// `inner` lies within `self` on both axes, tolerance included.
    pub fn contains(&self, inner: &Rect, tolerance: f64) -> bool {
        approx_le_tol(self.x0, inner.x0, tolerance)
            && approx_le_tol(inner.x1, self.x1, tolerance)
            && approx_le_tol(self.y0, inner.y0, tolerance)
            && approx_le_tol(inner.y1, self.y1, tolerance)
    }
}

/// One visual line of text and the box it occupies.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRect {
    pub rect: Rect,
    pub text: String,
}

impl TextRect {
    /// Split a multi-line fragment into one `TextRect` per line, each
    /// taking an equal vertical slice of `rect`.
    pub fn split_lines(rect: Rect, text: &str) -> Vec<TextRect> {
        let lines: Vec<&str> = text.trim_end_matches('\n').split('\n').collect();
        let h = rect.height() / lines.len() as f64;
        lines
            .into_iter()
            .enumerate()
            .map(|(n, line)| {
                let top = rect.y0 + n as f64 * h;
                TextRect {
                    rect: Rect {
                        x0: rect.x0,
                        y0: top,
                        x1: rect.x1,
                        y1: top + h,
                    },
                    text: line.to_string(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_boundary() {
        assert!(approx_eq(10.0, 11.999));
        assert!(!approx_eq(10.0, 12.0));
        assert!(!approx_eq(10.0, 7.5));
    }

    #[test]
    fn ordered_comparisons_respect_tolerance() {
        assert!(approx_le_tol(11.0, 10.0, APPROX_TOLERANCE));
        assert!(approx_le_tol(3.0, 10.0, APPROX_TOLERANCE));
        assert!(!approx_le_tol(12.5, 10.0, APPROX_TOLERANCE));
    }

    #[test]
    fn containment_is_tolerant() {
        let cell = Rect::from_corners(10.0, 10.0, 100.0, 30.0);
        let inside = Rect::from_corners(9.0, 12.0, 101.0, 28.0);
        let outside = Rect::from_corners(5.0, 12.0, 50.0, 28.0);
        assert!(cell.contains(&inside, APPROX_TOLERANCE));
        assert!(!cell.contains(&outside, APPROX_TOLERANCE));
    }

    #[test]
    fn split_lines_slices_height() {
        let rect = Rect::from_corners(0.0, 30.0, 50.0, 0.0);
        let lines = TextRect::split_lines(rect, "one\ntwo\nthree\n");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].text, "two");
        assert_eq!(lines[1].rect.y0, 10.0);
        assert_eq!(lines[1].rect.y1, 20.0);
    }
}
