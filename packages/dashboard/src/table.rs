//! Ranking table rendering.
//!
//! Column layout depends on the rank type: injury columns appear for
//! `weighted` and `dangerous`, the average score only for `dangerous`.
//! Missing numbers render as `0`.

use std::fmt::Write as _;

use crash_map_crash_models::{GroupBy, RankType};
use crash_map_dashboard_models::RankingRow;

/// Rendered ranking table: header labels and cell text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingTable {
    /// Column headings.
    pub headers: Vec<&'static str>,
    /// One entry per hot spot, in rank order.
    pub rows: Vec<Vec<String>>,
}

impl RankingTable {
    /// Lays out `rows` for the given ranking mode.
    #[must_use]
    pub fn build(rank_type: RankType, group_by: GroupBy, rows: &[RankingRow]) -> Self {
        let mut headers = vec!["#", group_by.name_header(), "Crashes", "Per Month"];
        if rank_type.has_injury_columns() {
            headers.extend(["Fatal", "Incapacitating", "Non-Incap.", "Injury Score"]);
        }
        if rank_type.has_average_score() {
            headers.push("Avg Score");
        }

        let rows = rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let mut cells = vec![
                    (index + 1).to_string(),
                    row.name.clone().unwrap_or_default(),
                    format_number(row.count),
                    format_fixed(row.crashes_per_month, 2),
                ];
                if rank_type.has_injury_columns() {
                    cells.extend([
                        format_number(row.injuries_fatal),
                        format_number(row.injuries_incapacitating),
                        format_number(row.injuries_non_incapacitating),
                        format_fixed(row.injury_score, 1),
                    ]);
                }
                if rank_type.has_average_score() {
                    cells.push(format_fixed(row.average_injury_score, 3));
                }
                cells
            })
            .collect();

        Self { headers, rows }
    }

    /// Renders the table as aligned plain text: the name column is
    /// left-aligned, every other column right-aligned.
    #[must_use]
    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        write_line(&mut out, &widths, self.headers.iter().copied());
        let rule_len = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        out.push_str(&"-".repeat(rule_len));
        out.push('\n');
        for row in &self.rows {
            write_line(&mut out, &widths, row.iter().map(String::as_str));
        }
        out
    }
}

fn write_line<'a>(out: &mut String, widths: &[usize], cells: impl Iterator<Item = &'a str>) {
    let line = cells
        .zip(widths)
        .enumerate()
        .map(|(column, (cell, &width))| {
            if column == 1 {
                format!("{cell:<width$}")
            } else {
                format!("{cell:>width$}")
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{}", line.trim_end());
}

/// Formats a raw numeric column: integral values without decimals.
#[must_use]
pub fn format_number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() && v.fract() == 0.0 => format!("{v:.0}"),
        Some(v) if v.is_finite() => v.to_string(),
        _ => "0".to_string(),
    }
}

/// Formats a column with a fixed number of decimals.
#[must_use]
pub fn format_fixed(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.decimals$}"),
        _ => "0".to_string(),
    }
}

/// Formats a count with `,` thousands separators.
#[must_use]
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
