pub mod cli;
pub mod config;
pub mod error;
pub mod infer;
pub mod inspect;
pub mod io_utils;
pub mod missing;
pub mod profile;
pub mod report;
pub mod table;

use std::{
    env,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands},
    config::{ProfilerConfig, Settings},
    report::Report,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_profiler", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = ProfilerConfig::load_optional(cli.config.as_deref())?;
    debug!("Loaded configuration: {config:?}");
    match cli.command {
        Commands::Profile(args) => handle_profile(&args, &config),
        Commands::Inspect(args) => inspect::execute(&args, &config),
    }
}

fn handle_profile(args: &cli::ProfileArgs, config: &ProfilerConfig) -> Result<()> {
    let settings = Settings::resolve(&args.input, &args.overrides(), config)?;
    debug!("Resolved settings: {settings:?}");
    let label = io_utils::source_label(&args.input);
    info!(
        "Profiling '{}' with delimiter '{}'",
        label,
        printable_delimiter(settings.read.delimiter)
    );

    let dataset = io_utils::read_rows(&args.input, &settings.read)
        .with_context(|| format!("Reading rows from {label}"))?;
    profile::check_rows(&label, &dataset.rows, settings.on_empty)?;

    let profiles = profile::profile_columns(&dataset.rows);
    info!(
        "Profiled {} column(s) across {} row(s)",
        profiles.len(),
        dataset.rows.len()
    );
    let (report, markdown) = report::build_report(&label, &dataset.rows, &profiles);
    let (json_path, markdown_path) = write_artifacts(&settings, &report, &markdown)?;

    println!("Wrote: {}", json_path.display());
    println!("Wrote: {}", markdown_path.display());
    Ok(())
}

/// Writes `<name>.json` and `<name>.md` into the configured output directory.
pub fn write_artifacts(
    settings: &Settings,
    report: &Report,
    markdown: &str,
) -> Result<(PathBuf, PathBuf)> {
    let json_path = settings.json_path();
    let markdown_path = settings.markdown_path();
    io_utils::write_json(&json_path, report)
        .with_context(|| format!("Writing JSON report to {json_path:?}"))?;
    io_utils::write_text(&markdown_path, markdown)
        .with_context(|| format!("Writing Markdown report to {markdown_path:?}"))?;
    info!(
        "Report for {} column(s) written to {}",
        report.columns.len(),
        display_dir(&settings.out_dir)
    );
    Ok((json_path, markdown_path))
}

fn display_dir(path: &Path) -> String {
    if path.as_os_str().is_empty() {
        ".".to_string()
    } else {
        path.display().to_string()
    }
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
