//! Terminal dashboard for a single CSV file.
//!
//! Shows headline metrics, a raw-data preview, the column summary ordered by
//! missing percentage, bar charts for missing % and unique counts, and the
//! type distribution. Everything that varies per session lives in
//! [`DashboardOptions`]; rendering is a pure function of its inputs.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use itertools::Itertools;
use log::{info, warn};

use crate::{
    cli::InspectArgs,
    config::{ProfilerConfig, Settings},
    infer::ColumnKind,
    io_utils::{self, Dataset},
    profile::{self, ColumnRecord},
    report::{self, Report, group_thousands},
    table::{self, Align},
    write_artifacts,
};

/// Maximum number of columns drawn in each insight chart.
pub const INSIGHT_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardOptions {
    pub show_preview: bool,
    pub preview_rows: usize,
    pub show_details: bool,
    pub show_markdown: bool,
    pub bar_width: usize,
}

impl DashboardOptions {
    pub fn from_args(args: &InspectArgs, settings: &Settings) -> Self {
        Self {
            show_preview: !args.no_preview,
            preview_rows: settings.preview_rows,
            show_details: args.details,
            show_markdown: args.markdown,
            bar_width: args.bar_width.max(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub rows: usize,
    pub columns: usize,
    pub total_missing: usize,
    pub missing_rate: f64,
    pub number_columns: usize,
    pub text_columns: usize,
}

impl Metrics {
    pub fn from_report(report: &Report) -> Self {
        let columns = report.columns.len();
        let total_missing = report.columns.iter().map(|c| c.missing).sum();
        let missing_rate = if report.rows == 0 {
            0.0
        } else {
            100.0 * total_missing as f64 / (report.rows * columns.max(1)) as f64
        };
        let count_kind = |kind: ColumnKind| report.columns.iter().filter(|c| c.kind == kind).count();
        Self {
            rows: report.rows,
            columns,
            total_missing,
            missing_rate,
            number_columns: count_kind(ColumnKind::Number),
            text_columns: count_kind(ColumnKind::Text),
        }
    }
}

pub fn execute(args: &InspectArgs, config: &ProfilerConfig) -> Result<()> {
    let settings = Settings::resolve(&args.input, &args.overrides(), config)?;
    let label = io_utils::source_label(&args.input);
    info!("Inspecting '{label}'");
    let dataset = io_utils::read_rows(&args.input, &settings.read)?;

    if let Err(err) = profile::check_rows(&label, &dataset.rows, settings.on_empty) {
        let message = format!("{err}; upload a file with at least one data row");
        warn!("{message}");
        // The dashboard owes the user this message whatever the log level.
        eprintln!("warning: {message}");
        return Ok(());
    }

    let profiles = profile::profile_columns(&dataset.rows);
    let (report, markdown) = report::build_report(&label, &dataset.rows, &profiles);
    let options = DashboardOptions::from_args(args, &settings);
    let rendered = render_dashboard(&dataset, &report, &markdown, &options)?;
    print!("{rendered}");

    if args.export_dir.is_some() {
        let (json_path, markdown_path) = write_artifacts(&settings, &report, &markdown)?;
        println!("Wrote: {}", json_path.display());
        println!("Wrote: {}", markdown_path.display());
    }
    info!(
        "Inspected {} row(s) across {} column(s)",
        report.rows,
        report.columns.len()
    );
    Ok(())
}

pub fn render_dashboard(
    dataset: &Dataset,
    report: &Report,
    markdown: &str,
    options: &DashboardOptions,
) -> Result<String> {
    let mut out = String::new();
    let _ = writeln!(out, "CSV Profiler: {}", report.source);
    let _ = writeln!(out);
    out.push_str(&render_metrics(&Metrics::from_report(report)));

    section(&mut out, "Preview");
    if options.show_preview {
        out.push_str(&render_preview(dataset, options.preview_rows));
    } else {
        let _ = writeln!(out, "(preview disabled)");
    }

    section(&mut out, "Columns Summary");
    out.push_str(&render_summary(&report.columns));

    section(&mut out, "Missing % by column");
    let by_missing = report
        .columns
        .iter()
        .sorted_by(|a, b| b.missing_pct.total_cmp(&a.missing_pct))
        .take(INSIGHT_LIMIT)
        .map(|c| (c.name.clone(), c.missing_pct))
        .collect::<Vec<_>>();
    out.push_str(&table::render_bars(&by_missing, options.bar_width, |v| {
        format!("{v:.1}%")
    }));

    section(&mut out, "Top unique counts");
    let by_unique = report
        .columns
        .iter()
        .sorted_by(|a, b| b.unique.cmp(&a.unique))
        .take(INSIGHT_LIMIT)
        .map(|c| (c.name.clone(), c.unique as f64))
        .collect::<Vec<_>>();
    out.push_str(&table::render_bars(&by_unique, options.bar_width, |v| {
        group_thousands(v as usize)
    }));

    section(&mut out, "Type distribution");
    out.push_str(&render_type_distribution(&report.columns));

    if options.show_details {
        section(&mut out, "Per-column Details");
        for column in report
            .columns
            .iter()
            .sorted_by(|a, b| b.missing_pct.total_cmp(&a.missing_pct))
        {
            let json = serde_json::to_string_pretty(column)
                .with_context(|| format!("Serializing profile for column '{}'", column.name))?;
            let _ = writeln!(out, "{}:", column.name);
            let _ = writeln!(out, "{json}");
        }
    }

    if options.show_markdown {
        section(&mut out, "Markdown Report Preview");
        out.push_str(markdown);
    }
    Ok(out)
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out);
    let _ = writeln!(out, "== {title} ==");
}

fn render_metrics(metrics: &Metrics) -> String {
    let entries = [
        ("Rows", group_thousands(metrics.rows)),
        ("Columns", group_thousands(metrics.columns)),
        ("Total Missing", group_thousands(metrics.total_missing)),
        ("Missing Rate", format!("{:.2}%", metrics.missing_rate)),
        (
            "Types",
            format!(
                "{} number \u{2022} {} text",
                metrics.number_columns, metrics.text_columns
            ),
        ),
    ];
    let mut out = String::new();
    for (label, value) in entries {
        let _ = writeln!(out, "{label:<15}{value}");
    }
    out
}

fn render_preview(dataset: &Dataset, limit: usize) -> String {
    let rows = dataset
        .rows
        .iter()
        .take(limit)
        .map(|row| {
            dataset
                .headers
                .iter()
                .map(|name| row.get(name).flatten().unwrap_or_default().to_string())
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    let mut out = table::render_table(&dataset.headers, &rows);
    if dataset.rows.len() > limit {
        let _ = writeln!(
            out,
            "... {} more row(s)",
            group_thousands(dataset.rows.len() - limit)
        );
    }
    out
}

fn render_summary(columns: &[ColumnRecord]) -> String {
    let headers = ["name", "type", "total", "missing", "missing_pct", "unique"]
        .map(String::from)
        .to_vec();
    let rows = columns
        .iter()
        .sorted_by(|a, b| b.missing_pct.total_cmp(&a.missing_pct))
        .map(|c| {
            vec![
                c.name.clone(),
                c.kind.to_string(),
                c.total.to_string(),
                c.missing.to_string(),
                format!("{:.2}", c.missing_pct),
                c.unique.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    let aligns = [
        Align::Left,
        Align::Left,
        Align::Right,
        Align::Right,
        Align::Right,
        Align::Right,
    ];
    table::render_aligned_table(&headers, &rows, &aligns)
}

fn render_type_distribution(columns: &[ColumnRecord]) -> String {
    let rows = columns
        .iter()
        .map(|c| c.kind)
        .counts()
        .into_iter()
        .sorted_by(|(kind_a, count_a), (kind_b, count_b)| {
            count_b.cmp(count_a).then_with(|| kind_a.as_str().cmp(kind_b.as_str()))
        })
        .map(|(kind, count)| vec![kind.to_string(), count.to_string()])
        .collect::<Vec<_>>();
    let headers = vec!["type".to_string(), "count".to_string()];
    table::render_aligned_table(&headers, &rows, &[Align::Left, Align::Right])
}
