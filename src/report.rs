//! Report assembly and Markdown rendering.
//!
//! A [`Report`] is built once per invocation from the column profiles and is
//! never mutated afterwards. The same value backs both renderings: JSON via
//! `serde`, and Markdown via [`Report::render_markdown()`].

use std::fmt::Write as _;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::{ColumnProfile, ColumnRecord, Row};

pub const REPORT_TITLE: &str = "CSV Profiling Report";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub source: String,
    #[serde(with = "timestamp")]
    pub generated_at: DateTime<Utc>,
    pub rows: usize,
    pub columns: Vec<ColumnRecord>,
}

/// Builds the structured report and its Markdown rendering, stamped with the current time.
pub fn build_report(source: &str, rows: &[Row], profiles: &[ColumnProfile]) -> (Report, String) {
    build_report_at(source, rows.len(), profiles, Utc::now())
}

pub fn build_report_at(
    source: &str,
    row_count: usize,
    profiles: &[ColumnProfile],
    generated_at: DateTime<Utc>,
) -> (Report, String) {
    let report = Report {
        source: source.to_string(),
        generated_at: generated_at.trunc_subsecs(0),
        rows: row_count,
        columns: profiles.iter().map(ColumnProfile::to_record).collect(),
    };
    let rendered = report.render_markdown();
    (report, rendered)
}

impl Report {
    pub fn generated_at_label(&self) -> String {
        self.generated_at.format(timestamp::FORMAT).to_string()
    }

    pub fn render_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# {REPORT_TITLE}");
        let _ = writeln!(out);
        let _ = writeln!(out, "- Source: {}", self.source);
        let _ = writeln!(out, "- Generated: {}", self.generated_at_label());
        let _ = writeln!(out);

        let _ = writeln!(out, "## Summary");
        let _ = writeln!(out);
        let _ = writeln!(out, "- Rows: {}", group_thousands(self.rows));
        let _ = writeln!(out, "- Columns: {}", group_thousands(self.columns.len()));
        let _ = writeln!(out);

        let _ = writeln!(out, "## Columns");
        let _ = writeln!(out);
        let _ = writeln!(out, "| Column | Type | Missing | Unique |");
        let _ = writeln!(out, "|---|---:|---:|---:|");
        for column in &self.columns {
            let _ = writeln!(
                out,
                "| {} | {} | {} ({:.1}%) | {} |",
                escape_cell(&column.name),
                column.kind,
                column.missing,
                column.missing_pct,
                column.unique
            );
        }
        let _ = writeln!(out);
        out
    }
}

/// Formats `value` with `,` between each group of three digits.
pub fn group_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn escape_cell(value: &str) -> String {
    value
        .replace('|', "\\|")
        .replace(['\n', '\r'], " ")
}

mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(|err| de::Error::custom(format!("invalid timestamp '{raw}': {err}")))
    }
}
