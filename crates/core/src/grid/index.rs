//! Start-point index over ruling lines with neighbour-tolerant lookup.

use rustc_hash::FxHashMap;

use super::lines::{Line, Orientation};

/// Lines leaving one lattice point.
#[derive(Clone, Debug, Default)]
pub struct Starts {
    pub horizontal: Vec<usize>,
    pub vertical: Vec<usize>,
}

pub struct StartIndex<'a> {
    lines: &'a [Line],
    by_start: FxHashMap<(i64, i64), Starts>,
    points: Vec<(i64, i64)>,
}

impl<'a> StartIndex<'a> {
    pub fn build(lines: &'a [Line]) -> Self {
        let mut by_start: FxHashMap<(i64, i64), Starts> = FxHashMap::default();
        for (id, line) in lines.iter().enumerate() {
            let entry = by_start.entry(line.start()).or_default();
            match line.orientation {
                Orientation::Horizontal => entry.horizontal.push(id),
                Orientation::Vertical => entry.vertical.push(id),
            }
        }
        let mut points: Vec<(i64, i64)> = by_start.keys().copied().collect();
        // y first, so traversal follows reading order.
        points.sort_by_key(|&(x, y)| (y, x));
        Self {
            lines,
            by_start,
            points,
        }
    }

    pub fn line(&self, id: usize) -> &Line {
        &self.lines[id]
    }

    /// Start points in top-to-bottom, left-to-right order.
    pub fn points(&self) -> &[(i64, i64)] {
        &self.points
    }

    pub fn starts_at(&self, point: (i64, i64)) -> Option<&Starts> {
        self.by_start.get(&point)
    }

    /// Lines of `orientation` starting anywhere in the 3x3 lattice
    /// neighbourhood of `(x, y)`, in ascending id order.
    pub fn lookup_neighbors(&self, x: i64, y: i64, orientation: Orientation) -> Vec<usize> {
        let mut found = Vec::new();
        for dy in -1..=1 {
            for dx in -1..=1 {
                // Saturated coordinates sit at the lattice edge.
                let (Some(nx), Some(ny)) = (x.checked_add(dx), y.checked_add(dy)) else {
                    continue;
                };
                if let Some(starts) = self.by_start.get(&(nx, ny)) {
                    found.extend_from_slice(match orientation {
                        Orientation::Horizontal => &starts.horizontal,
                        Orientation::Vertical => &starts.vertical,
                    });
                }
            }
        }
        found.sort_unstable();
        found.dedup();
        found
    }
}
