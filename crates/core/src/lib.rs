//! ledgrid - table and transaction extraction from PDF statements.
//!
//! Two strategies over one decompressed document:
//!
//! - [`grid`] rebuilds tables from ruling lines and text boxes supplied by
//!   a [`LayoutAnalyzer`](page::LayoutAnalyzer).
//! - [`content`] tokenizes content-stream lines and reads transaction
//!   records positionally, resolving year-less dates with [`date`].

pub mod content;
pub mod date;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod normalize;
pub mod page;

pub use content::{Statement, StatementFormat, TransactionRecord};
pub use date::{MonthDay, closest_date};
pub use error::{LedgridError, Result};
pub use grid::{Table, TableSettings, extract_table, extract_tables};
pub use normalize::{InflateStreams, MutoolClean, Normalizer};
pub use page::{LayoutAnalyzer, PageLayout, PrecomputedLayout, Segment, TextFragment};
