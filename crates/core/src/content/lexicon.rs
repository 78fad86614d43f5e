//! Ordered lexing tables.
//!
//! Patterns are tried in declaration order and the first match wins. Some
//! token shapes are subsets of others (a parenthesized payment is also
//! valid free text), so order is part of a lexicon's meaning.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{LedgridError, Result};

use super::token::{LayoutOp, TokenKind};

const AMOUNT: &str = r"-?\$?\d+(?:,\d{3})*\.\d{2}";
const SHORT_DATE: &str = r"\d{1,2}/\d{1,2}";
const LONG_DATE: &str = r"\d{1,2}/\d{1,2}/(?:\d{4}|\d{2})";
const NAMED_DATE: &str = r"[A-Za-z]+ \d{1,2}, \d{4}";
const REFERENCE: &str = r"[0-9A-Z]{17}";

/// How shown strings appear in the content stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// `(text) Tj`
    #[default]
    Strings,
    /// `[(text)] TJ`
    Arrays,
}

impl Dialect {
    /// Wrap a string-body pattern in this dialect's show operator.
    fn shown(&self, body: &str) -> String {
        match self {
            Dialect::Strings => format!(r"^\({body}\) Tj$"),
            Dialect::Arrays => format!(r"^\[\({body}\)\] TJ$"),
        }
    }

    fn free_text(&self) -> &'static str {
        match self {
            Dialect::Strings => "(.*)",
            Dialect::Arrays => r"([^\)]*)",
        }
    }
}

/// One named pattern, as written in a format config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternConfig {
    pub kind: String,
    pub pattern: String,
}

#[derive(Clone, Debug)]
pub struct Lexicon {
    entries: Vec<(TokenKind, Regex)>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a pattern after every existing one.
    pub fn push(&mut self, kind: TokenKind, pattern: &str) -> Result<&mut Self> {
        let re = Regex::new(pattern).map_err(|source| LedgridError::InvalidPattern {
            kind: kind.name().to_string(),
            source,
        })?;
        self.entries.push((kind, re));
        Ok(self)
    }

    pub fn with(mut self, kind: TokenKind, pattern: &str) -> Result<Self> {
        self.push(kind, pattern)?;
        Ok(self)
    }

    pub fn from_config(patterns: &[PatternConfig]) -> Result<Self> {
        let mut lexicon = Self::new();
        for p in patterns {
            lexicon.push(p.kind.parse()?, &p.pattern)?;
        }
        Ok(lexicon)
    }

    /// The general-purpose table for a dialect.
    pub fn preset(dialect: Dialect) -> Self {
        let shown = |body: &str| dialect.shown(body);
        let table: Vec<(TokenKind, String)> = vec![
            (
                TokenKind::DateRange,
                shown(&format!(r"({LONG_DATE}) ?(?:-|to) ?({LONG_DATE})")),
            ),
            (
                TokenKind::DateRange,
                shown(&format!(r"({NAMED_DATE}) - ({NAMED_DATE})")),
            ),
            (TokenKind::PaymentAmount, shown(&format!(r"\\\(({AMOUNT})\\\)"))),
            (TokenKind::Amount, shown(&format!("({AMOUNT})"))),
            (TokenKind::FullDate, shown(&format!("({LONG_DATE})"))),
            (TokenKind::Date, shown(&format!("({SHORT_DATE})"))),
            (TokenKind::Ref, shown(&format!("({REFERENCE})"))),
            (TokenKind::Text, shown(dialect.free_text())),
            (TokenKind::Layout(LayoutOp::Tf), r"^.* Tf$".to_string()),
            (TokenKind::Layout(LayoutOp::Tm), format!(r"^{}Tm$", r"(\S+) ".repeat(6))),
            (TokenKind::Layout(LayoutOp::Td), r"^(\S+) (\S+) T[dD]$".to_string()),
            (TokenKind::Layout(LayoutOp::Tz), r"^(\S+) Tz$".to_string()),
            (TokenKind::Layout(LayoutOp::Tc), r"^(\S+) Tc$".to_string()),
            (TokenKind::Layout(LayoutOp::Tw), r"^(\S+) Tw$".to_string()),
            (TokenKind::Layout(LayoutOp::Bt), r"^BT$".to_string()),
            (TokenKind::Layout(LayoutOp::Et), r"^ET$".to_string()),
            (TokenKind::Layout(LayoutOp::Blank), r"^\s*$".to_string()),
        ];
        let mut lexicon = Self::new();
        for (kind, pattern) in table {
            let re = Regex::new(&pattern).expect("preset pattern");
            lexicon.entries.push((kind, re));
        }
        lexicon
    }

    /// First matching kind and its captured groups.
    pub fn classify(&self, line: &str) -> (TokenKind, Vec<String>) {
        for (kind, re) in &self.entries {
            if let Some(caps) = re.captures(line) {
                let groups = caps
                    .iter()
                    .skip(1)
                    .map(|m| m.map_or_else(String::new, |m| m.as_str().to_string()))
                    .collect();
                return (*kind, groups);
            }
        }
        (TokenKind::Other, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::preset(Dialect::Strings)
    }
}
