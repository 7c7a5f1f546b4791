//! Command-line parsing for the growth-curve figure builder.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! table shaping and drawing code. Defaults reproduce the published figure.

use std::path::PathBuf;

use clap::Parser;

use crate::domain::ModelChoice;

/// Top-level CLI.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "growth-fig",
    version,
    about = "Draw GP-modelled microbial growth curves with raw plate-reader traces"
)]
pub struct Cli {
    /// Project directory holding `biolog/` (outputs are resolved against it too).
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Plate identifiers, concatenated column-wise in this order.
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = ["CD2015_PM1-1".to_string(), "CD2015_PM1-2".to_string()]
    )]
    pub plates: Vec<String>,

    /// Which GP model's predictions to draw.
    #[arg(long, value_enum, default_value_t = ModelChoice::Pooled)]
    pub model: ModelChoice,

    /// Substrates to draw, one figure column each.
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = [
            "L-Threonine".to_string(),
            "D-Sorbitol".to_string(),
            "D-Fructose".to_string(),
        ]
    )]
    pub substrates: Vec<String>,

    /// Isolate shown in every panel.
    #[arg(long, default_value = "CD2015")]
    pub isolate: String,

    /// Phenotype MicroArray plate number.
    #[arg(long, default_value_t = 1)]
    pub pm: u32,

    /// Extra row filter applied to every panel (repeatable), e.g. `--filter Replicate=1,2`.
    #[arg(long = "filter", value_name = "COLUMN=VALUE[,VALUE]")]
    pub filters: Vec<String>,

    /// Skip the raw per-well traces.
    #[arg(long)]
    pub no_raw: bool,

    /// Output figure path; the extension picks the format (`.pdf` or `.svg`).
    #[arg(short, long, default_value = "figures/Midani_AMiGA_Supp_Figure_4.pdf")]
    pub output: PathBuf,

    /// Also write the plotted latent curves as TSV.
    #[arg(long = "export-curves", value_name = "TSV")]
    pub export_curves: Option<PathBuf>,

    /// Canvas width (pixels).
    #[arg(long, default_value_t = 1400)]
    pub width: u32,

    /// Canvas height (pixels).
    #[arg(long, default_value_t = 900)]
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_published_figure() {
        let cli = Cli::parse_from(["growth-fig"]);
        assert_eq!(cli.plates, vec!["CD2015_PM1-1", "CD2015_PM1-2"]);
        assert_eq!(cli.substrates, vec!["L-Threonine", "D-Sorbitol", "D-Fructose"]);
        assert_eq!(cli.model, ModelChoice::Pooled);
        assert_eq!(cli.pm, 1);
        assert!(!cli.no_raw);
        assert!(cli.filters.is_empty());
        assert_eq!((cli.width, cli.height), (1400, 900));
    }

    #[test]
    fn list_flags_split_on_commas() {
        let cli = Cli::parse_from([
            "growth-fig",
            "--substrates",
            "D-Glucose,D-Fructose",
            "--model",
            "split",
            "--filter",
            "Replicate=1,2",
            "--filter",
            "Plate=A",
            "--no-raw",
        ]);
        assert_eq!(cli.substrates, vec!["D-Glucose", "D-Fructose"]);
        assert_eq!(cli.model, ModelChoice::Split);
        assert_eq!(cli.filters, vec!["Replicate=1,2", "Plate=A"]);
        assert!(cli.no_raw);
    }
}
