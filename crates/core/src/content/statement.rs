//! Statement parsing: range discovery and the slide-and-retry record scan.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{LedgridError, Result};
use crate::normalize::{Normalizer, check_signature};

use super::format::{RangeRule, StatementFormat};
use super::reader::Reader;
use super::record::{TransactionRecord, clean_label, read_record};
use super::tokenizer::Tokenizer;

/// A tokenized statement, ready to yield transactions.
pub struct Statement<'f> {
    format: &'f StatementFormat,
    tokens: Tokenizer,
}

impl<'f> Statement<'f> {
    /// Normalize raw PDF bytes and tokenize the result.
    pub fn parse<N: Normalizer + ?Sized>(
        pdf: &[u8],
        normalizer: &N,
        format: &'f StatementFormat,
    ) -> Result<Self> {
        check_signature(pdf)?;
        let clean = normalizer.decompress(pdf)?;
        Ok(Self::from_content(&String::from_utf8_lossy(&clean), format))
    }

    /// Tokenize already-decompressed content.
    pub fn from_content(content: &str, format: &'f StatementFormat) -> Self {
        let tokens = Tokenizer::new(content, &format.lexicon);
        debug!(tokens = tokens.len(), "tokenized statement");
        Self { format, tokens }
    }

    pub fn tokens(&self) -> &Tokenizer {
        &self.tokens
    }

    fn reader(&self) -> Reader<'_> {
        Reader::new(&self.tokens)
    }

    /// Whether the format's marker line (if any) is present.
    pub fn has_marker(&self) -> bool {
        self.format
            .marker
            .as_deref()
            .is_none_or(|m| self.tokens.contains_line(m))
    }

    /// The statement's covering range, per the format's rules in order.
    pub fn date_range(&self) -> Result<(NaiveDate, NaiveDate)> {
        let reader = self.reader();
        for rule in &self.format.range_rules {
            let found = match rule {
                RangeRule::DateRange => reader
                    .find_first(0, Reader::read_date_range)
                    .map(|(_, range)| range),
                RangeRule::ClosingDate {
                    label,
                    lookback_days,
                } => closing_date(&reader, label)
                    .map(|closing| (closing - Duration::days(*lookback_days), closing)),
            };
            if let Some((from, to)) = found {
                debug!(%from, %to, rule = ?rule, "statement range");
                return Ok((from, to));
            }
        }
        Err(LedgridError::MissingStatementRange)
    }

    /// Transactions, with dates resolved against the discovered range.
    ///
    /// A statement lacking its format's marker yields nothing.
    pub fn transactions(&self) -> Result<Transactions<'_>> {
        if !self.has_marker() {
            debug!("statement marker absent, no transactions");
            return Ok(Transactions::finished(self));
        }
        let (from, to) = self.date_range()?;
        Ok(self.transactions_in(from, to))
    }

    /// Transactions, with dates resolved against an explicit range.
    pub fn transactions_in(&self, from: NaiveDate, to: NaiveDate) -> Transactions<'_> {
        Transactions {
            reader: self.reader(),
            format: self.format,
            from,
            to,
            pos: 0,
            done: false,
        }
    }
}

fn closing_date(reader: &Reader<'_>, label: &str) -> Option<NaiveDate> {
    let (after, _) = reader.find_first(0, |r, pos| match r.read_text(pos) {
        (next, Some((text, _))) if text.trim() == label => (next, Some(())),
        _ => (pos, None),
    })?;
    reader
        .find_first(after, Reader::read_full_date)
        .map(|(_, date)| date)
}

/// Lazy record scan. On a failed read the cursor advances one token.
pub struct Transactions<'s> {
    reader: Reader<'s>,
    format: &'s StatementFormat,
    from: NaiveDate,
    to: NaiveDate,
    pos: usize,
    done: bool,
}

impl<'s> Transactions<'s> {
    fn finished(statement: &'s Statement<'_>) -> Self {
        let mut t = statement.transactions_in(NaiveDate::MIN, NaiveDate::MIN);
        t.done = true;
        t
    }

    fn label(&self, description: &str) -> String {
        let mut text = description.to_string();
        for filter in &self.format.label_filters {
            text = filter.replace_all(&text, "").into_owned();
        }
        clean_label(&text, self.format.uppercase_labels)
    }
}

impl Iterator for Transactions<'_> {
    type Item = Result<TransactionRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        while !self.reader.tok(self.pos).is_eof() {
            let (next, raw) = read_record(&self.reader, self.pos, &self.format.script);
            let Some(raw) = raw else {
                self.pos += 1;
                continue;
            };
            self.pos = next;
            if self.format.drop_zero_amounts && raw.amount == Some(Decimal::ZERO) {
                continue;
            }
            let label = self.label(raw.description.as_deref().unwrap_or_default());
            match raw.resolve(label, self.from, self.to) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
        self.done = true;
        None
    }
}
