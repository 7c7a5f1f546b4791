//! Formatted terminal output.
//!
//! We keep formatting code in one place so the drawing code stays clean and
//! output changes are localized.

use std::path::Path;

use crate::domain::FigureConfig;
use crate::report::PanelSummary;

/// Format the run summary printed after the figure is saved.
pub fn format_figure_summary(
    summaries: &[PanelSummary],
    config: &FigureConfig,
    output: &Path,
    export: Option<&Path>,
) -> String {
    let mut out = String::new();

    out.push_str("=== growth-fig - GP growth curves ===\n");
    out.push_str(&format!("Model: {}\n", config.model.display_name()));
    out.push_str(&format!("Isolate: {} | PM {}\n", config.isolate, config.pm));
    out.push_str(&format!("Plates: {}\n", config.plates.join(", ")));
    if !config.extra_criteria.is_empty() {
        out.push_str(&format!("Filter: {}\n", config.extra_criteria));
    }
    out.push('\n');

    out.push_str(&format_panel_table(summaries));
    out.push('\n');

    out.push_str(&format!("Figure: {}\n", output.display()));
    if let Some(path) = export {
        out.push_str(&format!("Curves: {}\n", path.display()));
    }

    out
}

fn format_panel_table(rows: &[PanelSummary]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<20} {:>6} {:>6} {:>16} {:>16}",
            "panel", "points", "wells", "max ln OD (h)", "max rate (h)"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<20} {:-<6} {:-<6} {:-<16} {:-<16}", "", "", "", "", "").trim_end());
    out.push('\n');

    for r in rows {
        out.push_str(
            format!(
                "{:<20} {:>6} {:>6} {:>16} {:>16}",
                truncate(&r.title, 20),
                r.prediction_points,
                r.raw_wells,
                fmt_peak(r.peak_growth),
                fmt_peak(r.peak_rate),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn fmt_peak(peak: Option<(f64, f64)>) -> String {
    match peak {
        Some((time, value)) => format!("{value:.3} ({time:.1})"),
        None => "-".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
