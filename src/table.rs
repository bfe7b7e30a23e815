//! Plain-text tables and bar charts for terminal output.

use std::borrow::Cow;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Right,
}

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    render_aligned_table(headers, rows, &[])
}

/// Renders an aligned table; columns without an entry in `aligns` are left-aligned.
pub fn render_aligned_table(headers: &[String], rows: &[Vec<String>], aligns: &[Align]) -> String {
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();

    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(display_width(&sanitize_cell(cell)));
        }
    }

    for width in &mut widths {
        *width = (*width).max(3);
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths, aligns));
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&rule, &widths, &[]));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths, aligns));
    }
    output
}

/// Renders `(label, value)` pairs as horizontal bars scaled so that the largest
/// value spans `width` cells. `describe` formats the number printed after each bar.
pub fn render_bars<F>(items: &[(String, f64)], width: usize, describe: F) -> String
where
    F: Fn(f64) -> String,
{
    if items.is_empty() {
        return String::new();
    }
    let label_width = items
        .iter()
        .map(|(label, _)| display_width(&sanitize_cell(label)))
        .max()
        .unwrap_or(0);
    let peak = items
        .iter()
        .map(|(_, value)| *value)
        .fold(0.0_f64, f64::max);

    let mut output = String::new();
    for (label, value) in items {
        let cells = bar_cells(*value, peak, width);
        let label = sanitize_cell(label);
        let padding = label_width.saturating_sub(display_width(&label));
        let line = format!(
            "{label}{}  {}{}  {}",
            " ".repeat(padding),
            "#".repeat(cells),
            " ".repeat(width.saturating_sub(cells)),
            describe(*value)
        );
        let _ = writeln!(output, "{}", line.trim_end());
    }
    output
}

fn bar_cells(value: f64, peak: f64, width: usize) -> usize {
    if peak <= 0.0 || !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let scaled = (value / peak * width as f64).round() as usize;
    // Any non-zero value stays visible.
    scaled.clamp(1, width.max(1))
}

fn format_row(values: &[String], widths: &[usize], aligns: &[Align]) -> String {
    let mut cells = Vec::with_capacity(values.len());
    for (idx, value) in values.iter().enumerate() {
        let Some(width) = widths.get(idx).copied() else {
            break;
        };
        let sanitized = sanitize_cell(value);
        let padding = " ".repeat(width.saturating_sub(display_width(&sanitized)));
        let cell = match aligns.get(idx).copied().unwrap_or_default() {
            Align::Left => format!("{sanitized}{padding}"),
            Align::Right => format!("{padding}{sanitized}"),
        };
        cells.push(cell);
    }
    let mut line = cells.join("  ");
    while line.ends_with(' ') {
        line.pop();
    }
    line
}

fn display_width(value: &str) -> usize {
    let mut width = 0usize;
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            // skip ANSI escape sequence
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
