//! PDF normalization: undo stream compression so content-stream
//! operators can be matched line by line.

use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::Command;

use flate2::read::ZlibDecoder;
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use tempfile::NamedTempFile;
use tracing::{debug, trace};

use crate::error::{LedgridError, Result};

const PDF_SIGNATURE: &[u8] = b"%PDF";

static STREAM_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?-u:\b)stream(?:\r\n|\n|\r)").expect("static pattern"));

/// Fail fast on buffers that are not PDF documents at all.
pub fn check_signature(pdf: &[u8]) -> Result<()> {
    if pdf.starts_with(PDF_SIGNATURE) {
        Ok(())
    } else {
        Err(LedgridError::NotPdf)
    }
}

/// Removes internal stream compression from a PDF.
pub trait Normalizer {
    fn decompress(&self, pdf: &[u8]) -> Result<Vec<u8>>;
}

/// Runs `mutool clean -d` on a scoped pair of temporary files.
#[derive(Clone, Debug)]
pub struct MutoolClean {
    program: PathBuf,
    temp_dir: Option<PathBuf>,
}

impl MutoolClean {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            temp_dir: None,
        }
    }

    /// Create the temporary files under `dir` instead of the system
    /// temp directory.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    fn temp_pdf(&self) -> Result<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("ledgrid-").suffix(".pdf");
        Ok(match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        })
    }
}

impl Default for MutoolClean {
    fn default() -> Self {
        Self::new("mutool")
    }
}

impl Normalizer for MutoolClean {
    fn decompress(&self, pdf: &[u8]) -> Result<Vec<u8>> {
        check_signature(pdf)?;

        // Both files are unlinked on drop, including on the error paths below.
        let mut input = self.temp_pdf()?;
        input.write_all(pdf)?;
        input.flush()?;
        let output = self.temp_pdf()?;

        let program = self.program.display().to_string();
        debug!(program = %program, bytes = pdf.len(), "running external normalizer");
        let result = Command::new(&self.program)
            .arg("clean")
            .arg("-d")
            .arg(input.path())
            .arg(output.path())
            .output()?;

        if !result.status.success() {
            return Err(LedgridError::Normalizer {
                program,
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        Ok(std::fs::read(output.path())?)
    }
}

/// In-process normalizer: inflates every `/FlateDecode` stream body.
///
/// The result is meant for text scanning. Dictionaries keep their
/// original `/Filter` and `/Length` entries.
#[derive(Clone, Copy, Debug, Default)]
pub struct InflateStreams;

impl Normalizer for InflateStreams {
    fn decompress(&self, pdf: &[u8]) -> Result<Vec<u8>> {
        check_signature(pdf)?;

        let mut out = Vec::with_capacity(pdf.len() * 2);
        let mut copied = 0;
        let mut inflated = 0usize;
        let mut search_from = 0;

        while let Some(m) = STREAM_START.find_at(pdf, search_from) {
            let body_start = m.end();
            let Some(rel_end) = find(&pdf[body_start..], b"endstream") else {
                break;
            };
            let body_end = body_start + rel_end;
            search_from = body_end + b"endstream".len();

            let dict_start = rfind(&pdf[copied..m.start()], b"obj").map_or(copied, |p| copied + p);
            if find(&pdf[dict_start..m.start()], b"/FlateDecode").is_none() {
                continue;
            }

            match inflate(trim_eol(&pdf[body_start..body_end])) {
                Some(data) => {
                    out.extend_from_slice(&pdf[copied..body_start]);
                    out.extend_from_slice(&data);
                    out.push(b'\n');
                    copied = body_end;
                    inflated += 1;
                }
                None => trace!(offset = body_start, "stream failed to inflate, kept as-is"),
            }
        }
        out.extend_from_slice(&pdf[copied..]);
        debug!(streams = inflated, "inflated pdf streams");
        Ok(out)
    }
}

fn inflate(body: &[u8]) -> Option<Vec<u8>> {
    let mut data = Vec::new();
    ZlibDecoder::new(body).read_to_end(&mut data).ok()?;
    Some(data)
}

fn trim_eol(body: &[u8]) -> &[u8] {
    let mut end = body.len();
    while end > 0 && matches!(body[end - 1], b'\r' | b'\n') {
        end -= 1;
    }
    &body[..end]
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}
