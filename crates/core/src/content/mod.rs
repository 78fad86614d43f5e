//! Content-stream strategy: tokenize a decompressed PDF line by line and
//! read transaction records with positional heuristics.

mod format;
mod lexicon;
mod reader;
mod record;
mod statement;
mod token;
mod tokenizer;

pub use format::{
    DEFAULT_CLOSING_LABEL, DEFAULT_LOOKBACK_DAYS, FormatConfig, RangeRule, StatementFormat,
    default_range_rules,
};
pub use lexicon::{Dialect, Lexicon, PatternConfig};
pub use reader::{IndentColumns, Reader};
pub use record::{RawRecord, Step, TransactionRecord, clean_label, default_script, read_record};
pub use statement::{Statement, Transactions};
pub use token::{LayoutOp, Token, TokenKind, parse_amount, unescape_pdf_string};
pub use tokenizer::Tokenizer;
