//! Cursor-based read primitives.
//!
//! Every `read_*` takes a position and returns `(next, Some(value))` when
//! the token there has the expected kind, or `(pos, None)` leaving the
//! cursor where it was. Composite reads can therefore chain primitives and
//! bail out on the first `None` without rollback bookkeeping.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::date::MonthDay;
use crate::geometry::approx_eq;

use super::token::{Token, TokenKind};
use super::tokenizer::Tokenizer;

/// Tm x-offset columns used to sign amounts by where they are printed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IndentColumns {
    /// Amounts in this column are credits.
    pub credit: Option<(f64, f64)>,
    /// Amounts in this column are debits.
    pub debit: Option<(f64, f64)>,
    /// Amounts in this column are ignored (running balance).
    pub skip: Option<(f64, f64)>,
}

impl IndentColumns {
    fn within(range: Option<(f64, f64)>, x: f64) -> bool {
        range.is_some_and(|(lo, hi)| lo <= x && x <= hi)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Reader<'a> {
    tok: &'a Tokenizer,
}

impl<'a> Reader<'a> {
    pub fn new(tok: &'a Tokenizer) -> Self {
        Self { tok }
    }

    pub fn tok(&self, pos: usize) -> &'a Token {
        self.tok.tok(pos)
    }

    fn read_kind<T>(
        &self,
        pos: usize,
        kind: TokenKind,
        value: impl FnOnce(&'a Token) -> Option<T>,
    ) -> (usize, Option<T>) {
        let t = self.tok(pos);
        if t.kind() != kind {
            return (pos, None);
        }
        match value(t) {
            Some(v) => (pos + 1, Some(v)),
            None => (pos, None),
        }
    }

    pub fn read_date(&self, pos: usize) -> (usize, Option<MonthDay>) {
        self.read_kind(pos, TokenKind::Date, |t| t.month_day().ok())
    }

    pub fn read_full_date(&self, pos: usize) -> (usize, Option<NaiveDate>) {
        self.read_kind(pos, TokenKind::FullDate, |t| t.full_date().ok())
    }

    pub fn read_date_range(&self, pos: usize) -> (usize, Option<(NaiveDate, NaiveDate)>) {
        self.read_kind(pos, TokenKind::DateRange, |t| t.date_range().ok())
    }

    pub fn read_ref(&self, pos: usize) -> (usize, Option<String>) {
        self.read_kind(pos, TokenKind::Ref, |t| Some(t.value().to_string()))
    }

    /// Text value and the x-offset it was shown at.
    pub fn read_text(&self, pos: usize) -> (usize, Option<(String, Option<f64>)>) {
        self.read_kind(pos, TokenKind::Text, |t| Some((t.text(), t.x_offset())))
    }

    /// A text token whose trimmed value is exactly `literal`.
    pub fn read_literal(&self, pos: usize, literal: &str) -> (usize, Option<String>) {
        self.read_kind(pos, TokenKind::Text, |t| {
            let text = t.text();
            (text.trim() == literal).then_some(text)
        })
    }

    pub fn read_payment_amount(&self, pos: usize) -> (usize, Option<Decimal>) {
        self.read_kind(pos, TokenKind::PaymentAmount, |t| t.signed_amount().ok())
    }

    pub fn read_charge_amount(&self, pos: usize) -> (usize, Option<Decimal>) {
        self.read_kind(pos, TokenKind::ChargeAmount, |t| t.signed_amount().ok())
    }

    pub fn read_signed_amount(&self, pos: usize) -> (usize, Option<Decimal>) {
        self.read_kind(pos, TokenKind::Amount, |t| t.signed_amount().ok())
    }

    /// Payment first, then charge, then self-signed amount.
    pub fn read_amount(&self, pos: usize) -> (usize, Option<Decimal>) {
        let reads: [fn(&Self, usize) -> (usize, Option<Decimal>); 3] = [
            Self::read_payment_amount,
            Self::read_charge_amount,
            Self::read_signed_amount,
        ];
        for read in reads {
            let (next, amount) = read(self, pos);
            if amount.is_some() {
                return (next, amount);
            }
        }
        (pos, None)
    }

    /// Skip zero or more layout tokens.
    pub fn skip_layout(&self, mut pos: usize) -> usize {
        while self.tok(pos).is_layout() {
            pos += 1;
        }
        pos
    }

    /// Read a description that may wrap over several physical lines.
    ///
    /// Lines join while they share the first line's x-offset. Reading stops
    /// before an amount (not consumed) or at the first line shown at a
    /// different offset. Layout tokens between lines are skipped.
    pub fn read_description(&self, pos: usize) -> (usize, Option<String>) {
        let mut parts: Vec<String> = Vec::new();
        let mut first_offset: Option<f64> = None;
        let mut cursor = pos;

        loop {
            let next = if parts.is_empty() {
                cursor
            } else {
                self.skip_layout(cursor)
            };
            if self.tok(next).is_amount() {
                break;
            }
            let (after, text) = self.read_text(next);
            let Some((text, offset)) = text else {
                break;
            };
            if parts.is_empty() {
                first_offset = offset;
            } else if !same_offset(first_offset, offset) {
                break;
            }
            parts.push(text);
            cursor = after;
        }

        if parts.is_empty() {
            (pos, None)
        } else {
            (cursor, Some(parts.join(" ")))
        }
    }

    /// Sum consecutive amounts, signing each by the column it is printed in.
    pub fn read_indented_amount(&self, pos: usize, columns: &IndentColumns) -> (usize, Option<Decimal>) {
        let mut total = Decimal::ZERO;
        let mut seen = 0usize;
        let mut cursor = pos;

        loop {
            let next = self.skip_layout(cursor);
            let t = self.tok(next);
            if !t.is_amount() {
                break;
            }
            let (Ok(value), Some(x)) = (t.decimal(), t.x_offset()) else {
                break;
            };
            if !IndentColumns::within(columns.skip, x) {
                if IndentColumns::within(columns.credit, x) {
                    total += value.abs();
                } else if IndentColumns::within(columns.debit, x) {
                    total -= value.abs();
                }
            }
            seen += 1;
            cursor = next + 1;
        }

        if seen == 0 {
            (pos, None)
        } else {
            (cursor, Some(total))
        }
    }

    /// First value `read` yields scanning forward from `from`.
    pub fn find_first<T>(
        &self,
        from: usize,
        read: impl Fn(&Self, usize) -> (usize, Option<T>),
    ) -> Option<(usize, T)> {
        let mut pos = from;
        while !self.tok(pos).is_eof() {
            if let (next, Some(v)) = read(self, pos) {
                return Some((next, v));
            }
            pos += 1;
        }
        None
    }
}

fn same_offset(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => approx_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}
