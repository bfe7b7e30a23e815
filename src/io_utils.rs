//! Input decoding, CSV-to-row conversion, and report writers.
//!
//! All file I/O in csv-profiler flows through this module:
//!
//! - **Delimiter resolution**: `.tsv` → tab, anything else → comma, unless overridden.
//! - **Decoding**: byte-order marks are sniffed and stripped before the header is
//!   parsed; invalid sequences are either replaced with U+FFFD or rejected,
//!   depending on the [`DecodePolicy`].
//! - **Rows**: the first record names the columns; every later record becomes a
//!   [`Row`] keyed by those names.
//! - **stdin**: the `-` path reads standard input.
//! - **Output**: JSON and text writers create missing parent directories.

use std::{
    collections::HashMap,
    fs,
    io::{self, Read},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use clap::ValueEnum;
use encoding_rs::{Encoding, UTF_8};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{error::ProfileError, profile::Row};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

/// What to do with byte sequences that are invalid in the input encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[value(rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum DecodePolicy {
    /// Fail the whole input.
    Strict,
    /// Replace each invalid sequence with U+FFFD and carry on.
    #[default]
    Substitute,
}

#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    pub delimiter: u8,
    pub encoding: &'static Encoding,
    pub decode: DecodePolicy,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_CSV_DELIMITER,
            encoding: UTF_8,
            decode: DecodePolicy::default(),
        }
    }
}

/// Rows read from one source, plus the header order they were keyed by.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

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

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

/// Display label for an input path; stdin is shown as `stdin`.
pub fn source_label(path: &Path) -> String {
    if is_dash(path) {
        "stdin".to_string()
    } else {
        path.display().to_string()
    }
}

pub fn read_input_bytes(path: &Path) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    if is_dash(path) {
        io::stdin()
            .lock()
            .read_to_end(&mut bytes)
            .context("Reading input from stdin")?;
    } else {
        bytes = fs::read(path).with_context(|| format!("Opening input file {path:?}"))?;
    }
    Ok(bytes)
}

/// Decodes `bytes`, letting a byte-order mark override `encoding`.
///
/// The mark itself never reaches the returned text.
pub fn decode_text(
    bytes: &[u8],
    encoding: &'static Encoding,
    policy: DecodePolicy,
    input: &str,
) -> Result<String, ProfileError> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((sniffed, bom_len)) => {
            debug!("Byte-order mark found in '{input}' ({})", sniffed.name());
            (sniffed, &bytes[bom_len..])
        }
        None => (encoding, bytes),
    };
    let (text, had_errors) = encoding.decode_without_bom_handling(body);
    if had_errors {
        match policy {
            DecodePolicy::Strict => {
                return Err(ProfileError::Decode {
                    input: input.to_string(),
                    encoding: encoding.name(),
                });
            }
            DecodePolicy::Substitute => warn!(
                "Replaced invalid {} sequences in '{input}' with U+FFFD",
                encoding.name()
            ),
        }
    }
    Ok(text.into_owned())
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

/// Splits decoded text into rows keyed by the header record.
///
/// Short records carry the remaining keys with no value; fields past the
/// header width are dropped. Repeated header names collapse into one key that
/// holds the last value.
pub fn parse_rows(text: &str, delimiter: u8) -> Result<Dataset> {
    let mut reader = open_csv_reader(text.as_bytes(), delimiter);
    let raw_headers = reader.headers().context("Reading header row")?.clone();

    // One slot per distinct name, fed from the last raw column carrying it.
    let mut headers: Vec<String> = Vec::with_capacity(raw_headers.len());
    let mut sources: Vec<usize> = Vec::with_capacity(raw_headers.len());
    let mut slots: HashMap<&str, usize> = HashMap::with_capacity(raw_headers.len());
    for (col, name) in raw_headers.iter().enumerate() {
        match slots.get(name) {
            Some(&slot) => sources[slot] = col,
            None => {
                slots.insert(name, headers.len());
                headers.push(name.to_string());
                sources.push(col);
            }
        }
    }

    let mut rows = Vec::new();
    let mut overlong = 0usize;
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", idx + 2))?;
        if record.len() > raw_headers.len() {
            overlong += 1;
        }
        let fields = headers
            .iter()
            .zip(&sources)
            .map(|(name, &col)| (name.clone(), record.get(col).map(str::to_string)))
            .collect();
        rows.push(Row::from_fields(fields));
    }
    if overlong > 0 {
        warn!(
            "Dropped fields beyond the {} header column(s) in {overlong} row(s)",
            raw_headers.len()
        );
    }
    Ok(Dataset { headers, rows })
}

pub fn read_rows(path: &Path, options: &ReadOptions) -> Result<Dataset> {
    let label = source_label(path);
    let bytes = read_input_bytes(path)?;
    let text = decode_text(&bytes, options.encoding, options.decode, &label)?;
    parse_rows(&text, options.delimiter).with_context(|| format!("Parsing CSV from {label}"))
}

pub fn write_text(path: &Path, text: &str) -> Result<()> {
    ensure_parent_dir(path)?;
    fs::write(path, text).with_context(|| format!("Writing {path:?}"))
}

pub fn write_json<T>(path: &Path, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let mut text = serde_json::to_string_pretty(value).context("Serializing JSON")?;
    text.push('\n');
    write_text(path, &text)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Creating output directory {parent:?}"))?;
    }
    Ok(())
}
