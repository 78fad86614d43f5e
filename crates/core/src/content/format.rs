//! Statement formats: one engine, configured by a lexicon and a script.

use std::io::Read;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{LedgridError, Result};

use super::lexicon::{Dialect, Lexicon, PatternConfig};
use super::record::{Step, default_script};

pub const DEFAULT_CLOSING_LABEL: &str = "Statement Closing Date";
pub const DEFAULT_LOOKBACK_DAYS: i64 = 60;

/// How the statement's covering date range is discovered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeRule {
    /// The first `date_range` token.
    DateRange,
    /// A text token equal to `label`, then the next `full_date` token as
    /// the closing date; the range opens `lookback_days` earlier.
    ClosingDate { label: String, lookback_days: i64 },
}

pub fn default_range_rules() -> Vec<RangeRule> {
    vec![
        RangeRule::DateRange,
        RangeRule::ClosingDate {
            label: DEFAULT_CLOSING_LABEL.to_string(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        },
    ]
}

#[derive(Clone, Debug)]
pub struct StatementFormat {
    pub lexicon: Lexicon,
    pub script: Vec<Step>,
    pub range_rules: Vec<RangeRule>,
    /// A line that must be present for the statement to hold records.
    pub marker: Option<String>,
    pub uppercase_labels: bool,
    /// Removed from labels before cleaning.
    pub label_filters: Vec<Regex>,
    pub drop_zero_amounts: bool,
}

impl StatementFormat {
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self {
            lexicon: Lexicon::preset(dialect),
            script: default_script(),
            range_rules: default_range_rules(),
            marker: None,
            uppercase_labels: true,
            label_filters: Vec::new(),
            drop_zero_amounts: false,
        }
    }

    /// `(text) Tj` statements.
    pub fn tj_strings() -> Self {
        Self::for_dialect(Dialect::Strings)
    }

    /// `[(text)] TJ` statements.
    pub fn tj_arrays() -> Self {
        Self::for_dialect(Dialect::Arrays)
    }

    pub fn from_config(config: &FormatConfig) -> Result<Self> {
        let mut format = Self::for_dialect(config.dialect);
        if !config.lexicon.is_empty() {
            format.lexicon = Lexicon::from_config(&config.lexicon)?;
        }
        if let Some(script) = &config.script {
            format.script = script.clone();
        }
        if let Some(rules) = &config.range {
            format.range_rules = rules.clone();
        }
        format.marker = config.marker.clone();
        format.uppercase_labels = config.uppercase_labels;
        format.drop_zero_amounts = config.drop_zero_amounts;
        format.label_filters = config
            .strip_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|source| LedgridError::InvalidPattern {
                    kind: "label filter".to_string(),
                    source,
                })
            })
            .collect::<Result<_>>()?;
        Ok(format)
    }

    pub fn from_json<R: Read>(reader: R) -> Result<Self> {
        let config: FormatConfig = serde_json::from_reader(reader)?;
        Self::from_config(&config)
    }
}

impl Default for StatementFormat {
    fn default() -> Self {
        Self::tj_strings()
    }
}

fn default_true() -> bool {
    true
}

/// Serialized form of a [`StatementFormat`].
///
/// An empty `lexicon` keeps the dialect preset; absent `script` and
/// `range` keep the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormatConfig {
    #[serde(default)]
    pub dialect: Dialect,
    #[serde(default)]
    pub lexicon: Vec<PatternConfig>,
    #[serde(default)]
    pub script: Option<Vec<Step>>,
    #[serde(default)]
    pub range: Option<Vec<RangeRule>>,
    #[serde(default)]
    pub marker: Option<String>,
    #[serde(default = "default_true")]
    pub uppercase_labels: bool,
    #[serde(default)]
    pub strip_patterns: Vec<String>,
    #[serde(default)]
    pub drop_zero_amounts: bool,
}
