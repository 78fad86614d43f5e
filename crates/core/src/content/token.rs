//! Content-stream tokens.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::date::{MonthDay, parse_statement_date};
use crate::error::{LedgridError, Result};

/// Positioning and formatting operators. They carry no business value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayoutOp {
    Bt, // begin text object
    Et, // end text object
    Tf, // font
    Tm, // text matrix
    Td, // move text position
    Tz, // horizontal scaling
    Tc, // char spacing
    Tw, // word spacing
    Blank,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `MM/DD`.
    Date,
    /// `MM/DD/YY` or `MM/DD/YYYY`.
    FullDate,
    /// Two full dates bounding the statement.
    DateRange,
    /// Amount carrying its own printed sign (charges print positive).
    Amount,
    /// Debit printed without sign.
    ChargeAmount,
    /// Credit, typically parenthesized in the source.
    PaymentAmount,
    /// Fixed-format reference code.
    Ref,
    Text,
    Layout(LayoutOp),
    /// Line matched no pattern.
    Other,
    Eof,
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Date => "date",
            TokenKind::FullDate => "full_date",
            TokenKind::DateRange => "date_range",
            TokenKind::Amount => "amount",
            TokenKind::ChargeAmount => "charge_amount",
            TokenKind::PaymentAmount => "payment_amount",
            TokenKind::Ref => "ref",
            TokenKind::Text => "text",
            TokenKind::Layout(LayoutOp::Bt) => "layout_bt",
            TokenKind::Layout(LayoutOp::Et) => "layout_et",
            TokenKind::Layout(LayoutOp::Tf) => "layout_tf",
            TokenKind::Layout(LayoutOp::Tm) => "layout_tm",
            TokenKind::Layout(LayoutOp::Td) => "layout_td",
            TokenKind::Layout(LayoutOp::Tz) => "layout_tz",
            TokenKind::Layout(LayoutOp::Tc) => "layout_tc",
            TokenKind::Layout(LayoutOp::Tw) => "layout_tw",
            TokenKind::Layout(LayoutOp::Blank) => "whitespace",
            TokenKind::Other => "other",
            TokenKind::Eof => "eof",
        }
    }
}

impl FromStr for TokenKind {
    type Err = LedgridError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "date" => TokenKind::Date,
            "full_date" => TokenKind::FullDate,
            "date_range" => TokenKind::DateRange,
            "amount" => TokenKind::Amount,
            "charge_amount" => TokenKind::ChargeAmount,
            "payment_amount" => TokenKind::PaymentAmount,
            "ref" => TokenKind::Ref,
            "text" => TokenKind::Text,
            "layout_bt" => TokenKind::Layout(LayoutOp::Bt),
            "layout_et" => TokenKind::Layout(LayoutOp::Et),
            "layout_tf" => TokenKind::Layout(LayoutOp::Tf),
            "layout_tm" => TokenKind::Layout(LayoutOp::Tm),
            "layout_td" => TokenKind::Layout(LayoutOp::Td),
            "layout_tz" => TokenKind::Layout(LayoutOp::Tz),
            "layout_tc" => TokenKind::Layout(LayoutOp::Tc),
            "layout_tw" => TokenKind::Layout(LayoutOp::Tw),
            "whitespace" => TokenKind::Layout(LayoutOp::Blank),
            _ => return Err(LedgridError::UnknownTokenKind(s.to_string())),
        })
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One classified content-stream line.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    kind: TokenKind,
    groups: Vec<String>,
    line: String,
    /// Horizontal offset of the most recent text matrix in this text object.
    x_offset: Option<f64>,
}

impl Token {
    pub fn new(kind: TokenKind, groups: Vec<String>, line: impl Into<String>) -> Self {
        Self {
            kind,
            groups,
            line: line.into(),
            x_offset: None,
        }
    }

    pub fn eof() -> Self {
        Self::new(TokenKind::Eof, Vec::new(), "")
    }

    pub(crate) fn set_x_offset(&mut self, x: Option<f64>) {
        self.x_offset = x;
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// First captured group, or the empty string.
    pub fn value(&self) -> &str {
        self.groups.first().map_or("", String::as_str)
    }

    pub fn x_offset(&self) -> Option<f64> {
        self.x_offset
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    pub fn is_date(&self) -> bool {
        self.kind == TokenKind::Date
    }

    /// Any of the amount kinds.
    pub fn is_amount(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Amount | TokenKind::ChargeAmount | TokenKind::PaymentAmount
        )
    }

    pub fn is_text(&self) -> bool {
        self.kind == TokenKind::Text
    }

    pub fn is_layout(&self) -> bool {
        matches!(self.kind, TokenKind::Layout(_))
    }

    pub fn is_layout_op(&self, op: LayoutOp) -> bool {
        self.kind == TokenKind::Layout(op)
    }

    pub fn month_day(&self) -> Result<MonthDay> {
        MonthDay::parse(self.value())
    }

    pub fn full_date(&self) -> Result<NaiveDate> {
        parse_statement_date(self.value())
    }

    pub fn date_range(&self) -> Result<(NaiveDate, NaiveDate)> {
        match self.groups.as_slice() {
            [from, to, ..] => Ok((parse_statement_date(from)?, parse_statement_date(to)?)),
            _ => Err(LedgridError::InvalidDate(self.line.clone())),
        }
    }

    /// Amount as printed.
    pub fn decimal(&self) -> Result<Decimal> {
        parse_amount(self.value())
    }

    /// Amount signed as a transaction: credits positive, debits negative.
    pub fn signed_amount(&self) -> Result<Decimal> {
        let printed = self.decimal()?;
        match self.kind {
            TokenKind::PaymentAmount => Ok(printed.abs()),
            TokenKind::ChargeAmount => Ok(-printed.abs()),
            TokenKind::Amount => Ok(-printed),
            _ => Err(LedgridError::InvalidAmount(self.line.clone())),
        }
    }

    /// Text value with PDF string escapes undone.
    pub fn text(&self) -> String {
        unescape_pdf_string(self.value())
    }

    /// The six operands of a `Tm` operator.
    pub fn matrix(&self) -> Option<[f64; 6]> {
        if !self.is_layout_op(LayoutOp::Tm) || self.groups.len() < 6 {
            return None;
        }
        let mut m = [0.0; 6];
        for (slot, g) in m.iter_mut().zip(&self.groups) {
            *slot = g.parse().ok()?;
        }
        Some(m)
    }
}

/// Parse `$1,234.56`, `-$12.34`, `(12.34)` and plain decimals.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let trimmed = s.trim();
    let (negative, body) = match trimmed.strip_prefix('(').and_then(|b| b.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, trimmed),
    };
    let cleaned: String = body
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-'))
        .collect();
    let value: Decimal = cleaned
        .parse()
        .map_err(|_| LedgridError::InvalidAmount(s.to_string()))?;
    Ok(if negative { -value } else { value })
}

/// Undo `\(`, `\)`, `\\` and the `\n`-style escapes of a PDF literal string.
pub fn unescape_pdf_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
