//! Line-oriented tokenizer over a decompressed content stream.

use super::lexicon::Lexicon;
use super::token::{LayoutOp, Token};

/// One token per input line, randomly indexable.
///
/// Indexing past the end yields an `eof` token, so readers never need
/// bounds checks.
#[derive(Clone, Debug)]
pub struct Tokenizer {
    tokens: Vec<Token>,
    eof: Token,
}

impl Tokenizer {
    pub fn new(source: &str, lexicon: &Lexicon) -> Self {
        let mut tokens = Vec::new();
        let mut x_offset: Option<f64> = None;

        for raw in source.split('\n') {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            let (kind, groups) = lexicon.classify(line);
            let mut token = Token::new(kind, groups, line);

            if token.is_layout_op(LayoutOp::Bt) {
                x_offset = None;
            } else if let Some(m) = token.matrix() {
                x_offset = Some(m[4]);
            }
            token.set_x_offset(x_offset);
            tokens.push(token);
        }
        Self {
            tokens,
            eof: Token::eof(),
        }
    }

    pub fn from_lines<'a, I>(lines: I, lexicon: &Lexicon) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let joined: Vec<&str> = lines.into_iter().collect();
        Self::new(&joined.join("\n"), lexicon)
    }

    pub fn tok(&self, pos: usize) -> &Token {
        self.tokens.get(pos).unwrap_or(&self.eof)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Whether some line equals `marker` exactly.
    pub fn contains_line(&self, marker: &str) -> bool {
        self.tokens.iter().any(|t| t.line() == marker)
    }
}
