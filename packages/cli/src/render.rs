//! Plain-text rendering of the dashboard.

use std::fmt::Write as _;

use chrono::NaiveDate;
use crash_map_dashboard::map_frame::FrameUpdate;
use crash_map_dashboard::results::{LOADING_PLACEHOLDER, RankingDisplay, ResultsView};
use crash_map_dashboard::table::format_thousands;

/// Renders the title, the dataset total, the map frame line and, when the
/// panel is open, the rankings.
#[must_use]
pub fn render_view(results: &ResultsView) -> String {
    let mut out = String::new();
    let title = results.title();
    let _ = writeln!(out, "\n{title}");
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
    out.push_str(&render_total(results));

    let filters = &results.inputs().filters;
    let day = |date: Option<NaiveDate>| date.map_or_else(|| "any".to_string(), |d| format!("{d}"));
    let _ = writeln!(
        out,
        "Dates: {} to {}",
        day(filters.date_start),
        day(filters.date_end)
    );
    let selected = filters.selected();
    if !selected.is_empty() {
        let labels: Vec<&str> = selected.iter().map(|v| v.label()).collect();
        let _ = writeln!(out, "Filters: {}", labels.join(", "));
    }

    if let Some(frame) = results.map_frame() {
        let marker = match results.last_frame_update() {
            FrameUpdate::Recreated { .. } => " (reloaded)",
            FrameUpdate::Created | FrameUpdate::Unchanged => "",
        };
        let _ = writeln!(out, "Map #{}: {}{marker}", frame.generation, frame.src);
    }

    let _ = writeln!(out, "[{}]", results.panel_label());
    if results.panel_open() {
        out.push_str(&render_rankings(results));
    }
    out
}

/// The dataset total of the last successful fetch, shown whatever the
/// fetch state.
#[must_use]
pub fn render_total(results: &ResultsView) -> String {
    format!(
        "Total crashes in dataset: {}\n",
        format_thousands(results.total_crashes())
    )
}

/// Renders the rankings panel body.
#[must_use]
pub fn render_rankings(results: &ResultsView) -> String {
    let mut out = String::new();
    match results.display() {
        RankingDisplay::Loading => {
            let _ = writeln!(out, "{LOADING_PLACEHOLDER}");
        }
        RankingDisplay::Error(message) => {
            let _ = writeln!(out, "Error: {message}");
        }
        RankingDisplay::Table(table) => {
            let rank_type = results.inputs().rank_type;
            let _ = writeln!(
                out,
                "{} ({})\n",
                rank_type.label(),
                rank_type.description()
            );
            if let Some(notice) = results.notice() {
                let _ = writeln!(out, "{notice}");
            }
            out.push_str(&table.render());
        }
    }
    out
}
