//! Transaction record assembly from a field-order script.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::date::{MonthDay, closest_date};
use crate::error::Result;

use super::reader::{IndentColumns, Reader};

/// One field read of a record, in script order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Transaction date. Always required.
    TxnDate,
    /// Posting date; falls back to the transaction date when absent.
    PostDate { required: bool },
    Ref { required: bool },
    /// A fixed text marker (such as a `S` flag column) that is not part
    /// of the description.
    Literal { text: String, required: bool },
    /// Possibly wrapped description.
    Description,
    /// Payment, charge or self-signed amount.
    Amount,
    /// Consecutive amounts signed by print column.
    IndentedAmount(IndentColumns),
}

/// The usual card statement shape: date, optional posting date, optional
/// reference, description, amount.
pub fn default_script() -> Vec<Step> {
    vec![
        Step::TxnDate,
        Step::PostDate { required: false },
        Step::Ref { required: false },
        Step::Description,
        Step::Amount,
    ]
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub date: NaiveDate,
    pub value_date: NaiveDate,
    pub label: String,
    /// Credits positive, debits negative.
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Fields read so far for one attempted record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawRecord {
    pub date: Option<MonthDay>,
    pub post_date: Option<MonthDay>,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
}

impl RawRecord {
    /// Attach years using the statement range.
    pub fn resolve(
        self,
        label: String,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Option<TransactionRecord>> {
        let (Some(date), Some(amount)) = (self.date, self.amount) else {
            return Ok(None);
        };
        let value_date = self.post_date.unwrap_or(date);
        Ok(Some(TransactionRecord {
            date: closest_date(date, from, to)?,
            value_date: closest_date(value_date, from, to)?,
            label,
            amount,
            reference: self.reference,
        }))
    }
}

/// Run `script` at `pos`.
///
/// Returns the cursor after the record, or `pos` itself with `None` when
/// any required field is missing. Layout tokens before every field but
/// the first are skipped.
pub fn read_record(reader: &Reader<'_>, pos: usize, script: &[Step]) -> (usize, Option<RawRecord>) {
    let mut raw = RawRecord::default();
    let mut cursor = pos;

    for (n, step) in script.iter().enumerate() {
        let at = if n == 0 { cursor } else { reader.skip_layout(cursor) };
        let ok = match step {
            Step::TxnDate => take(reader.read_date(at), &mut cursor, &mut raw.date),
            Step::PostDate { required } => {
                take(reader.read_date(at), &mut cursor, &mut raw.post_date) || !required
            }
            Step::Ref { required } => {
                take(reader.read_ref(at), &mut cursor, &mut raw.reference) || !required
            }
            Step::Literal { text, required } => {
                let mut marker = None;
                take(reader.read_literal(at, text), &mut cursor, &mut marker) || !required
            }
            Step::Description => take(reader.read_description(at), &mut cursor, &mut raw.description),
            Step::Amount => take(reader.read_amount(at), &mut cursor, &mut raw.amount),
            Step::IndentedAmount(columns) => take(
                reader.read_indented_amount(at, columns),
                &mut cursor,
                &mut raw.amount,
            ),
        };
        if !ok {
            trace!(pos, step = ?step, "record abandoned");
            return (pos, None);
        }
    }

    if raw.date.is_none() || raw.description.is_none() || raw.amount.is_none() {
        return (pos, None);
    }
    (cursor, Some(raw))
}

fn take<T>(read: (usize, Option<T>), cursor: &mut usize, slot: &mut Option<T>) -> bool {
    match read {
        (next, Some(v)) => {
            *cursor = next;
            *slot = Some(v);
            true
        }
        (_, None) => false,
    }
}

/// Trim, collapse runs of whitespace, optionally upper-case.
pub fn clean_label(text: &str, uppercase: bool) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if uppercase {
        collapsed.to_uppercase()
    } else {
        collapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::lexicon::Lexicon;
    use crate::content::tokenizer::Tokenizer;
    use rust_decimal_macros::dec;

    fn run(lines: &[&str], script: &[Step]) -> (usize, Option<RawRecord>) {
        let tok = Tokenizer::from_lines(lines.iter().copied(), &Lexicon::default());
        let reader = Reader::new(&tok);
        read_record(&reader, 0, script)
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let (next, raw) = run(&["(12/05) Tj", "(GROCER) Tj", "($9.99) Tj"], &default_script());
        let raw = raw.unwrap();
        assert_eq!(next, 3);
        assert_eq!(raw.post_date, None);
        assert_eq!(raw.reference, None);
        assert_eq!(raw.amount, Some(dec!(-9.99)));
    }

    #[test]
    fn layout_noise_between_fields_is_skipped() {
        let (next, raw) = run(
            &[
                "(12/05) Tj",
                "ET",
                "BT",
                "/F1 8 Tf",
                "(12/06) Tj",
                "(2469216302310001X) Tj",
                "(GROCER) Tj",
                "12 0 Td",
                "($9.99) Tj",
            ],
            &default_script(),
        );
        let raw = raw.unwrap();
        assert_eq!(next, 9);
        assert_eq!(raw.reference.as_deref(), Some("2469216302310001X"));
        assert_eq!(raw.post_date, MonthDay::new(12, 6));
    }

    #[test]
    fn required_field_missing_restores_position() {
        let script = vec![
            Step::TxnDate,
            Step::Ref { required: true },
            Step::Description,
            Step::Amount,
        ];
        assert_eq!(run(&["(12/05) Tj", "(GROCER) Tj", "($9.99) Tj"], &script), (0, None));
        assert_eq!(run(&["(12/05) Tj", "(GROCER) Tj", "(TOTAL) Tj"], &default_script()), (0, None));
    }

    #[test]
    fn literal_marker_is_consumed_when_present() {
        let script = vec![
            Step::TxnDate,
            Step::Literal {
                text: "S".to_string(),
                required: false,
            },
            Step::Description,
            Step::Amount,
        ];
        let (next, raw) = run(&["(12/05) Tj", "/F2 8 Tf", "(S) Tj", "(ATM) Tj", "($20.00) Tj"], &script);
        assert_eq!(next, 5);
        assert_eq!(raw.unwrap().description.as_deref(), Some("ATM"));

        let (next, raw) = run(&["(12/05) Tj", "(ATM) Tj", "($20.00) Tj"], &script);
        assert_eq!(next, 3);
        assert_eq!(raw.unwrap().description.as_deref(), Some("ATM"));
    }

    #[test]
    fn label_cleaning() {
        assert_eq!(clean_label("  Corner   store \t#12 ", true), "CORNER STORE #12");
        assert_eq!(clean_label("Corner  store", false), "Corner store");
    }

    #[test]
    fn script_deserializes_from_config() {
        let json = r#"["txn_date", {"post_date": {"required": true}}, "description",
            {"indented_amount": {"credit": [0, 470], "debit": [470, 520], "skip": null}}]"#;
        let script: Vec<Step> = serde_json::from_str(json).unwrap();
        assert_eq!(script[1], Step::PostDate { required: true });
        assert!(matches!(script[3], Step::IndentedAmount(ref c) if c.debit == Some((470.0, 520.0))));
    }
}
