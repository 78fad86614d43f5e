//! Page layout as delivered by a layout-analysis collaborator.
//!
//! Coordinates are PDF user space: origin bottom-left, y growing up.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::normalize::check_signature;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Line,
    Rect,
}

/// A vector primitive: a stroked line or a (possibly degenerate) rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Segment {
    pub fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            kind: SegmentKind::Line,
            x0,
            y0,
            x1,
            y1,
        }
    }

    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            kind: SegmentKind::Rect,
            x0,
            y0,
            x1,
            y1,
        }
    }
}

/// A text box and its content. May hold several `\n`-separated lines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub text: String,
}

impl TextFragment {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64, text: impl Into<String>) -> Self {
        Self {
            x0,
            y0,
            x1,
            y1,
            text: text.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page height, used to flip the y axis.
    pub height: f64,
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub texts: Vec<TextFragment>,
}

impl PageLayout {
    pub fn new(height: f64) -> Self {
        Self {
            height,
            ..Self::default()
        }
    }
}

/// Produces per-page layouts for a PDF document.
pub trait LayoutAnalyzer {
    fn analyze(&self, pdf: &[u8]) -> Result<Vec<PageLayout>>;
}

/// Layouts computed ahead of time by an external analyzer and loaded
/// from a JSON dump (an array of [`PageLayout`]).
#[derive(Clone, Debug, Default)]
pub struct PrecomputedLayout {
    pages: Vec<PageLayout>,
}

impl PrecomputedLayout {
    pub fn new(pages: Vec<PageLayout>) -> Self {
        Self { pages }
    }

    pub fn from_json<R: Read>(reader: R) -> Result<Self> {
        let pages: Vec<PageLayout> = serde_json::from_reader(reader)?;
        Ok(Self { pages })
    }

    pub fn pages(&self) -> &[PageLayout] {
        &self.pages
    }
}

impl LayoutAnalyzer for PrecomputedLayout {
    fn analyze(&self, pdf: &[u8]) -> Result<Vec<PageLayout>> {
        check_signature(pdf)?;
        Ok(self.pages.clone())
    }
}
