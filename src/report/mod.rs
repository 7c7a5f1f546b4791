//! Reporting utilities: per-panel growth summaries.

use crate::domain::LatentCurve;
use crate::plot::ComposedPanel;

pub mod format;

pub use format::*;

/// Headline numbers of one drawn panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSummary {
    pub title: String,
    pub prediction_points: usize,
    pub raw_wells: usize,
    /// Largest mean `ln OD` and when it is reached.
    pub peak_growth: Option<(f64, f64)>,
    /// Largest mean growth rate and when it is reached.
    pub peak_rate: Option<(f64, f64)>,
}

/// Summarize every drawn panel, left to right.
pub fn summarize_panels(panels: &[ComposedPanel]) -> Vec<PanelSummary> {
    panels
        .iter()
        .map(|p| PanelSummary {
            title: p.title.clone(),
            prediction_points: p.report.value.len(),
            raw_wells: p.report.wells.len(),
            peak_growth: peak(&p.report.value),
            peak_rate: peak(&p.report.rate),
        })
        .collect()
}

/// `(time, mean)` at the largest finite mean; the first one wins ties.
fn peak(curve: &LatentCurve) -> Option<(f64, f64)> {
    curve
        .time
        .iter()
        .zip(&curve.mean)
        .filter(|(t, m)| t.is_finite() && m.is_finite())
        .fold(None, |best: Option<(f64, f64)>, (&t, &m)| match best {
            Some((_, bm)) if bm >= m => best,
            _ => Some((t, m)),
        })
}
