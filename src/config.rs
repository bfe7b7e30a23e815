//! YAML configuration and settings resolution.
//!
//! Every setting can come from three places. An explicit command-line flag wins,
//! then the `--config` file, then the built-in default. The resolved
//! [`Settings`] value is handed to the command handlers explicitly.
//!
//! ```yaml
//! delimiter: tab
//! encoding: windows-1252
//! decode: strict
//! on_empty: reject
//! out_dir: build/reports
//! report_name: nightly
//! preview_rows: 50
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};

use crate::{
    cli::parse_delimiter,
    io_utils::{self, DecodePolicy, ReadOptions},
    profile::EmptyInputPolicy,
};

pub const DEFAULT_OUT_DIR: &str = "outputs";
pub const DEFAULT_REPORT_NAME: &str = "report";
pub const DEFAULT_PREVIEW_ROWS: usize = 25;
pub const MIN_PREVIEW_ROWS: usize = 5;
pub const MAX_PREVIEW_ROWS: usize = 200;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfilerConfig {
    pub delimiter: Option<String>,
    pub encoding: Option<String>,
    pub decode: Option<DecodePolicy>,
    pub on_empty: Option<EmptyInputPolicy>,
    pub out_dir: Option<PathBuf>,
    pub report_name: Option<String>,
    pub preview_rows: Option<usize>,
}

impl ProfilerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("Opening config file {path:?}"))?;
        Self::from_yaml_str(&text).with_context(|| format!("Parsing config file {path:?}"))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

/// Values supplied on the command line; `None` defers to the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub delimiter: Option<u8>,
    pub encoding: Option<String>,
    pub decode: Option<DecodePolicy>,
    pub on_empty: Option<EmptyInputPolicy>,
    pub out_dir: Option<PathBuf>,
    pub report_name: Option<String>,
    pub preview_rows: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub read: ReadOptions,
    pub on_empty: EmptyInputPolicy,
    pub out_dir: PathBuf,
    pub report_name: String,
    pub preview_rows: usize,
}

impl Settings {
    pub fn resolve(input: &Path, overrides: &Overrides, config: &ProfilerConfig) -> Result<Self> {
        let configured_delimiter = config
            .delimiter
            .as_deref()
            .map(parse_delimiter)
            .transpose()
            .map_err(|err| anyhow!("Invalid delimiter in config: {err}"))?;
        let delimiter =
            io_utils::resolve_input_delimiter(input, overrides.delimiter.or(configured_delimiter));

        let encoding_label = overrides.encoding.as_deref().or(config.encoding.as_deref());
        let encoding = io_utils::resolve_encoding(encoding_label)?;

        let report_name = overrides
            .report_name
            .clone()
            .or_else(|| config.report_name.clone())
            .unwrap_or_else(|| DEFAULT_REPORT_NAME.to_string());
        if report_name.trim().is_empty() {
            bail!("Report name cannot be empty");
        }

        let preview_rows = overrides
            .preview_rows
            .or(config.preview_rows)
            .unwrap_or(DEFAULT_PREVIEW_ROWS)
            .clamp(MIN_PREVIEW_ROWS, MAX_PREVIEW_ROWS);

        Ok(Self {
            read: ReadOptions {
                delimiter,
                encoding,
                decode: overrides.decode.or(config.decode).unwrap_or_default(),
            },
            on_empty: overrides.on_empty.or(config.on_empty).unwrap_or_default(),
            out_dir: overrides
                .out_dir
                .clone()
                .or_else(|| config.out_dir.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR)),
            report_name,
            preview_rows,
        })
    }

    pub fn json_path(&self) -> PathBuf {
        self.out_dir.join(format!("{}.json", self.report_name))
    }

    pub fn markdown_path(&self) -> PathBuf {
        self.out_dir.join(format!("{}.md", self.report_name))
    }
}
