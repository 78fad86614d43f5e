//! stmt2json - Extract transactions from statement PDFs
//!
//! Normalizes each PDF's content streams, scans them with a statement
//! format and prints one JSON transaction record per line.

mod logging;

use clap::{ArgAction, Parser, ValueEnum};
use ledgrid_core::error::Result;
use ledgrid_core::{InflateStreams, MutoolClean, Normalizer, Statement, StatementFormat};
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Built-in statement formats.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum Preset {
    /// `(text) Tj` show strings (default)
    #[default]
    Strings,
    /// `[(text)] TJ` show arrays
    Arrays,
}

#[derive(Parser, Debug)]
#[command(name = "stmt2json")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// One or more statement PDFs
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// Statement format config (JSON); overrides --preset
    #[arg(short = 'f', long)]
    format: Option<PathBuf>,

    /// Built-in format to use when no config is given
    #[arg(short = 'p', long, value_enum, default_value = "strings")]
    preset: Preset,

    /// Decompress with `mutool clean -d` instead of in-process inflate
    #[arg(short = 'm', long)]
    mutool: Option<PathBuf>,
}

fn load_format(args: &Args) -> Result<StatementFormat> {
    match &args.format {
        Some(path) => StatementFormat::from_json(BufReader::new(File::open(path)?)),
        None => Ok(match args.preset {
            Preset::Strings => StatementFormat::tj_strings(),
            Preset::Arrays => StatementFormat::tj_arrays(),
        }),
    }
}

fn normalizer(args: &Args) -> Box<dyn Normalizer> {
    match &args.mutool {
        Some(program) => Box::new(MutoolClean::new(program)),
        None => Box::new(InflateStreams),
    }
}

fn process_file<W: Write>(
    path: &Path,
    output: &mut W,
    normalizer: &dyn Normalizer,
    format: &StatementFormat,
) -> Result<()> {
    let file = File::open(path)?;
    // SAFETY: the mapping is read-only and dropped before returning.
    let mmap = unsafe { Mmap::map(&file) }?;
    let statement = Statement::parse(&mmap, normalizer, format)?;

    let mut count = 0usize;
    for record in statement.transactions()? {
        serde_json::to_writer(&mut *output, &record?)?;
        writeln!(output)?;
        count += 1;
    }
    debug!(path = %path.display(), records = count, "statement done");
    Ok(())
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init(args.debug);

    let format = match load_format(&args) {
        Ok(format) => format,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let normalizer = normalizer(&args);
    let mut output = BufWriter::new(io::stdout());

    for path in &args.files {
        if !path.exists() {
            eprintln!("Error: File not found: {}", path.display());
            std::process::exit(1);
        }

        if let Err(e) = process_file(path, &mut output, normalizer.as_ref(), &format) {
            eprintln!("Error processing {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }

    output.flush()?;

    Ok(())
}
