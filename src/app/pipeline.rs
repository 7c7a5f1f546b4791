//! Shared "figure pipeline" logic.
//!
//! Keeping this in one place avoids duplicating the core workflow between the
//! binary and the tests:
//! load tables -> assemble raw traces -> compose panels -> (caller saves)

use crate::domain::FigureConfig;
use crate::error::AppError;
use crate::io::{GrowthData, load_growth_data};
use crate::plot::{ComposedPanel, Figure, compose_growth_figure};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub data: GrowthData,
    pub figure: Figure,
    pub panels: Vec<ComposedPanel>,
}

/// Load every input named by `config` and compose the figure.
pub fn run_figure(config: &FigureConfig) -> Result<RunOutput, AppError> {
    let data = load_growth_data(config)?;
    run_figure_with_data(config, data)
}

/// Compose the figure from tables that are already loaded.
pub fn run_figure_with_data(config: &FigureConfig, data: GrowthData) -> Result<RunOutput, AppError> {
    let (figure, panels) = compose_growth_figure(&data, config)?;
    log::info!(
        "composed {} panel column(s) from the {} predictions",
        panels.len(),
        config.model.display_name()
    );

    Ok(RunOutput { data, figure, panels })
}
