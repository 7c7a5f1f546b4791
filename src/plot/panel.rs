//! Model-vs-data panel renderer.
//!
//! One call draws one experimental condition onto a pair of surfaces:
//!
//! - top: the latent growth function `ln OD(t)` (noise included in the band),
//!   optionally overlaid with every matching well's raw trace
//! - bottom: the growth rate `d/dt ln OD(t)`
//!
//! Each latent function is one mean line plus one shaded band.

use crate::data::{Criteria, RawMeasurements, Table, matching_rows, subset};
use crate::domain::{LatentCurve, LatentOrder, TIME_COLUMN};
use crate::error::AppError;
use crate::math::latent_function;
use crate::plot::surface::{Axes, Figure, Rgba, Stroke, Surface};

/// Mean of a latent function.
pub const MEAN_STROKE: Stroke = Stroke::new(Rgba::new(0, 0, 0, 0.8), 5.0);
/// Confidence band of a latent function.
pub const BAND_FILL: Rgba = Rgba::new(0, 0, 0, 0.075);
/// Raw per-well growth trace.
pub const RAW_STROKE: Stroke = Stroke::new(Rgba::new(255, 0, 0, 0.5), 2.0);
/// Tick label size applied to both surfaces.
pub const TICK_FONT_SIZE: u32 = 20;

/// The tables a panel is drawn from.
#[derive(Debug, Clone, Copy)]
pub struct PanelData<'a> {
    pub predictions: &'a Table,
    pub raw: &'a RawMeasurements,
    pub summary: &'a Table,
}

/// What a panel call drew.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelReport {
    pub value: LatentCurve,
    pub rate: LatentCurve,
    /// Wells whose raw traces were overlaid (empty when raw is off).
    pub wells: Vec<String>,
}

/// Draw one condition onto `surfaces[0]` (growth) and `surfaces[1]` (rate).
///
/// A slice that is not exactly two surfaces is a caller mistake: it is
/// logged and nothing is drawn (`Ok(None)`), so the rest of a figure still
/// renders.
pub fn plot_model<S: Surface>(
    data: PanelData<'_>,
    criteria: &Criteria,
    surfaces: &mut [&mut S],
    plot_raw: bool,
) -> Result<Option<PanelReport>, AppError> {
    let count = surfaces.len();
    let [growth, rate] = surfaces else {
        log::error!("axis must have size 2x1 (got {count} surfaces)");
        return Ok(None);
    };

    let fit = subset(data.predictions, criteria).sorted_by(TIME_COLUMN)?;
    if fit.is_empty() {
        log::warn!("no predictions match {criteria}");
    }

    let value = latent_function(&fit, LatentOrder::Value, true)?;
    draw_latent(&mut **growth, &value);

    let rate_curve = latent_function(&fit, LatentOrder::Rate, false)?;
    draw_latent(&mut **rate, &rate_curve);

    let mut wells = Vec::new();
    if plot_raw {
        // Summary rows and raw columns are aligned by position.
        let positions = matching_rows(data.summary, criteria);
        wells = positions.iter().map(|&i| data.summary.index()[i].clone()).collect();
        let traces = data.raw.log_growth_traces(&positions)?;
        growth.plot_traces(&traces, RAW_STROKE);
    }

    growth.set_tick_font_size(TICK_FONT_SIZE);
    rate.set_tick_font_size(TICK_FONT_SIZE);

    log::info!(
        "panel {criteria}: {} prediction points, {} raw wells",
        value.len(),
        wells.len()
    );

    Ok(Some(PanelReport {
        value,
        rate: rate_curve,
        wells,
    }))
}

/// Draw one condition on a fresh 2x1 figure (5 x 10 in, shared x axis).
pub fn plot_model_standalone(
    data: PanelData<'_>,
    criteria: &Criteria,
    plot_raw: bool,
) -> Result<(Figure, PanelReport), AppError> {
    let mut figure = Figure::new(2, 1, (500, 1000)).with_shared_x();
    let report = {
        let mut column = figure.column_mut(0);
        plot_model::<Axes>(data, criteria, &mut column, plot_raw)?
            .ok_or_else(|| AppError::output("Standalone figure did not provide two axes."))?
    };
    Ok((figure, report))
}

fn draw_latent<S: Surface + ?Sized>(surface: &mut S, curve: &LatentCurve) {
    surface.plot(&curve.time, &curve.mean, MEAN_STROKE);
    surface.fill_between(&curve.time, &curve.lower, &curve.upper, BAND_FILL);
}
