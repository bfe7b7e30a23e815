use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{config::Overrides, io_utils::DecodePolicy, profile::EmptyInputPolicy};

#[derive(Debug, Parser)]
#[command(author, version, about = "Profile the columns of a CSV file", long_about = None)]
pub struct Cli {
    /// YAML file supplying defaults for any option below
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a JSON and a Markdown column profile for a CSV file
    Profile(ProfileArgs),
    /// Show an interactive-style summary of a CSV file in the terminal
    Inspect(InspectArgs),
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "encoding")]
    pub encoding: Option<String>,
    /// How to treat bytes that are invalid in the input encoding
    #[arg(long = "decode", value_enum)]
    pub decode: Option<DecodePolicy>,
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    /// Input CSV file to profile ('-' reads stdin)
    pub input: PathBuf,
    /// Directory receiving the report files
    #[arg(long = "out-dir")]
    pub out_dir: Option<PathBuf>,
    /// Base name of the report files (<name>.json, <name>.md)
    #[arg(long = "report-name")]
    pub report_name: Option<String>,
    /// Whether an input with no data rows is reported or rejected
    #[arg(long = "on-empty", value_enum)]
    pub on_empty: Option<EmptyInputPolicy>,
    #[command(flatten)]
    pub input_options: InputArgs,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Input CSV file to inspect ('-' reads stdin)
    pub input: PathBuf,
    /// Number of data rows shown in the preview (5-200)
    #[arg(long = "preview-rows")]
    pub preview_rows: Option<usize>,
    /// Hide the raw data preview
    #[arg(long = "no-preview")]
    pub no_preview: bool,
    /// Print the JSON profile of every column
    #[arg(long)]
    pub details: bool,
    /// Print the Markdown report after the dashboard
    #[arg(long)]
    pub markdown: bool,
    /// Also write <name>.json and <name>.md into this directory
    #[arg(long = "export-dir")]
    pub export_dir: Option<PathBuf>,
    /// Base name of exported report files
    #[arg(long = "report-name")]
    pub report_name: Option<String>,
    /// Width in characters of the longest bar in the insight charts
    #[arg(long = "bar-width", default_value_t = 30)]
    pub bar_width: usize,
    #[command(flatten)]
    pub input_options: InputArgs,
}

impl ProfileArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            delimiter: self.input_options.delimiter,
            encoding: self.input_options.encoding.clone(),
            decode: self.input_options.decode,
            on_empty: self.on_empty,
            out_dir: self.out_dir.clone(),
            report_name: self.report_name.clone(),
            preview_rows: None,
        }
    }
}

impl InspectArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            delimiter: self.input_options.delimiter,
            encoding: self.input_options.encoding.clone(),
            decode: self.input_options.decode,
            // inspect never renders an empty upload
            on_empty: Some(EmptyInputPolicy::Reject),
            out_dir: self.export_dir.clone(),
            report_name: self.report_name.clone(),
            preview_rows: self.preview_rows,
        }
    }
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
