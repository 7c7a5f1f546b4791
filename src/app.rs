//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - loads the tables and composes the figure
//! - writes the figure (PDF or SVG) and optional curve export
//! - prints a short summary

use clap::Parser;

use crate::cli::Cli;
use crate::data::Criteria;
use crate::domain::FigureConfig;
use crate::error::AppError;
use crate::plot::FigureFormat;

pub mod pipeline;

/// Entry point for the `growth-fig` binary.
pub fn run() -> Result<(), AppError> {
    // `RUST_LOG` may come from a `.env` next to the data.
    dotenvy::dotenv().ok();
    // A second init (e.g. from an embedding test) is harmless.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();

    let cli = Cli::parse();
    let config = figure_config_from_args(&cli)?;
    log::debug!("figure config: {config:?}");

    let run = pipeline::run_figure(&config)?;

    let output = config.output_path();
    let format = crate::plot::save_figure(&run.figure, &output)?;
    log::info!("saved {format:?} figure to '{}'", output.display());

    let export = config.export_path();
    if let Some(path) = &export {
        crate::io::write_curves_tsv(path, &run.panels)?;
        log::info!("exported latent curves to '{}'", path.display());
    }

    let summaries = crate::report::summarize_panels(&run.panels);
    println!(
        "{}",
        crate::report::format_figure_summary(&summaries, &config, &output, export.as_deref())
    );

    Ok(())
}

/// Build the run configuration from parsed flags.
pub fn figure_config_from_args(cli: &Cli) -> Result<FigureConfig, AppError> {
    let extra_criteria = cli
        .filters
        .iter()
        .map(|entry| Criteria::parse_entry(entry))
        .collect::<Result<Criteria, AppError>>()?;
    // Reject an unknown output format before any input is read.
    FigureFormat::from_path(&cli.output)?;

    Ok(FigureConfig {
        root: cli.root.clone(),
        plates: cli.plates.clone(),
        model: cli.model,
        substrates: cli.substrates.clone(),
        isolate: cli.isolate.clone(),
        pm: cli.pm,
        extra_criteria,
        plot_raw: !cli.no_raw,
        output: cli.output.clone(),
        export_curves: cli.export_curves.clone(),
        width: cli.width,
        height: cli.height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CriterionValue;

    #[test]
    fn config_from_default_flags() {
        let cli = Cli::parse_from(["growth-fig"]);
        let config = figure_config_from_args(&cli).unwrap();
        let default = FigureConfig::default();
        assert_eq!(config.plates, default.plates);
        assert_eq!(config.substrates, default.substrates);
        assert_eq!(config.output, default.output);
        assert!(config.plot_raw);
        assert!(config.extra_criteria.is_empty());
    }

    #[test]
    fn filters_become_extra_criteria() {
        let cli = Cli::parse_from(["growth-fig", "--filter", "Replicate=1,2", "--no-raw"]);
        let config = figure_config_from_args(&cli).unwrap();
        assert!(!config.plot_raw);
        assert_eq!(
            config.extra_criteria.get("Replicate"),
            Some([CriterionValue::parse("1"), CriterionValue::parse("2")].as_slice())
        );
        assert_eq!(config.panels()[0].criteria.len(), 4);
    }

    #[test]
    fn unknown_output_extension_is_an_input_error() {
        let cli = Cli::parse_from(["growth-fig", "--output", "figure.png"]);
        assert_eq!(figure_config_from_args(&cli).unwrap_err().exit_code(), 2);

        let cli = Cli::parse_from(["growth-fig", "--output", "figure.svg"]);
        assert!(figure_config_from_args(&cli).is_ok());
    }

    #[test]
    fn malformed_filter_is_an_input_error() {
        let cli = Cli::parse_from(["growth-fig", "--filter", "Replicate"]);
        let err = figure_config_from_args(&cli).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
