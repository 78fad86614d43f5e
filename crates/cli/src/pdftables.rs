//! pdftables - Rebuild ruled tables from PDF page layouts
//!
//! Reads layout dumps (page height, drawing segments and positioned text
//! per page, as JSON) and prints each page's reconstructed table as a JSON
//! array of rows, one page per line.

mod logging;

use clap::{ArgAction, Parser};
use ledgrid_core::error::Result;
use ledgrid_core::grid::{TableSettings, extract_tables_par};
use ledgrid_core::PrecomputedLayout;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "pdftables")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// One or more layout JSON files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// Coordinates closer than this are treated as equal
    #[arg(short = 't', long, default_value = "2.0")]
    tolerance: f64,

    /// Keep multi-line text fragments whole instead of one entry per line
    #[arg(long = "no-split", action = ArgAction::SetTrue)]
    no_split: bool,

    /// Also print rows whose cells received no text
    #[arg(long = "keep-empty", action = ArgAction::SetTrue)]
    keep_empty: bool,
}

fn settings(args: &Args) -> TableSettings {
    TableSettings {
        tolerance: args.tolerance,
        split_text_lines: !args.no_split,
        keep_empty_rows: args.keep_empty,
    }
}

fn process_file<W: Write>(path: &Path, output: &mut W, settings: &TableSettings) -> Result<()> {
    let layout = PrecomputedLayout::from_json(BufReader::new(File::open(path)?))?;
    for table in extract_tables_par(layout.pages(), settings) {
        serde_json::to_writer(&mut *output, &table)?;
        writeln!(output)?;
    }
    Ok(())
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init(args.debug);

    let settings = settings(&args);
    let mut output = BufWriter::new(io::stdout());

    for path in &args.files {
        if !path.exists() {
            eprintln!("Error: File not found: {}", path.display());
            std::process::exit(1);
        }

        if let Err(e) = process_file(path, &mut output, &settings) {
            eprintln!("Error processing {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }

    output.flush()?;

    Ok(())
}
