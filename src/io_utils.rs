//! Output plumbing for report serialization.
//!
//! All report output flows through this module:
//!
//! - **Delimiter resolution**: extension-based (`.csv` → comma, `.tsv` →
//!   tab) with manual override support.
//! - **Encoding**: output transcoding via `encoding_rs`, defaulting to UTF-8.
//! - **stdout**: the `-` path convention routes through the standard stream.
//! - **Quoting**: CSV output uses `QuoteStyle::Always` so item names with
//!   commas or quotes survive a round trip.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use csv::QuoteStyle;
use encoding_rs::{Encoding, UTF_8};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_output_delimiter(path: Option<&Path>, provided: Option<u8>, fallback: u8) -> u8 {
    if let Some(delim) = provided {
        return delim;
    }
    if let Some(path) = path {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") => return DEFAULT_TSV_DELIMITER,
            Some(ext) if ext.eq_ignore_ascii_case("csv") => return DEFAULT_CSV_DELIMITER,
            _ => {}
        }
    }
    fallback
}

pub fn open_csv_writer(
    path: Option<&Path>,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<csv::Writer<Box<dyn Write>>> {
    let base: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(std::io::stdout()),
    };

    let writer: Box<dyn Write> = if encoding == UTF_8 {
        base
    } else {
        Box::new(TranscodingWriter::new(base, encoding))
    };

    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Always)
        .double_quote(true);
    Ok(builder.from_writer(writer))
}

/// Writes pre-rendered records (header row included) as delimited text.
pub fn write_records(
    path: Option<&Path>,
    delimiter: u8,
    encoding: &'static Encoding,
    records: &[Vec<String>],
) -> Result<()> {
    let mut writer = open_csv_writer(path, delimiter, encoding)?;
    for record in records {
        writer.write_record(record).context("Writing report row")?;
    }
    writer.flush().context("Flushing report output")?;
    Ok(())
}

/// Renders records to an in-memory CSV string, for callers that want the
/// report as text rather than a file.
pub fn render_csv(records: &[Vec<String>], delimiter: u8) -> Result<String> {
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Always)
        .double_quote(true);
    let mut writer = builder.from_writer(Vec::new());
    for record in records {
        writer.write_record(record).context("Writing report row")?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow!("Finalizing CSV buffer: {err}"))?;
    String::from_utf8(bytes).context("CSV buffer is not valid UTF-8")
}

/// Buffers UTF-8 output and emits it in the target encoding on flush.
/// Reports are bounded by the request set, so holding the rendered bytes
/// until flush is acceptable.
struct TranscodingWriter<W: Write> {
    inner: W,
    encoding: &'static Encoding,
    pending: Vec<u8>,
}

impl<W: Write> TranscodingWriter<W> {
    fn new(inner: W, encoding: &'static Encoding) -> Self {
        Self {
            inner,
            encoding,
            pending: Vec::new(),
        }
    }
}

impl<W: Write> Write for TranscodingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let text = std::str::from_utf8(&self.pending).map_err(|err| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("Invalid UTF-8 sequence in output stream: {err}"),
                )
            })?;
            let (encoded, _, had_errors) = self.encoding.encode(text);
            if had_errors {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("Failed to encode text using {}", self.encoding.name()),
                ));
            }
            self.inner.write_all(encoded.as_ref())?;
            self.pending.clear();
        }
        self.inner.flush()
    }
}
