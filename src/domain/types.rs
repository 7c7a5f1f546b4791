//! Shared domain types.
//!
//! These are plain data: the run configuration derived from CLI flags, the
//! panel layout of the figure, and the latent curves extracted from GP
//! predictions.

use std::path::PathBuf;

use clap::ValueEnum;

use crate::data::Criteria;

/// Column holding the prediction time axis.
pub const TIME_COLUMN: &str = "Time";
/// Mean of the latent growth function.
pub const MU_COLUMN: &str = "mu";
/// Variance of the latent growth function.
pub const SIGMA_COLUMN: &str = "Sigma";
/// Mean of the first derivative (growth rate).
pub const MU1_COLUMN: &str = "mu1";
/// Variance of the first derivative.
pub const SIGMA1_COLUMN: &str = "Sigma1";
/// Estimated measurement noise variance.
pub const NOISE_COLUMN: &str = "Noise";

pub const SUBSTRATE_COLUMN: &str = "Substrate";
pub const ISOLATE_COLUMN: &str = "Isolate";
pub const PLATE_COLUMN: &str = "PM";

/// Which GP prediction table feeds the figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelChoice {
    /// Replicates pooled by isolate (`pooled_by_isolate_gp_data.txt`).
    Pooled,
    /// One model per well (`split_gp_data.txt`).
    Split,
}

impl ModelChoice {
    pub fn display_name(self) -> &'static str {
        match self {
            ModelChoice::Pooled => "pooled by isolate",
            ModelChoice::Split => "split",
        }
    }
}

/// Derivative order of a latent function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatentOrder {
    /// `ln OD(t)` itself (order 0).
    Value,
    /// `d/dt ln OD(t)` (order 1).
    Rate,
}

impl LatentOrder {
    pub fn from_order(order: u8) -> Option<Self> {
        match order {
            0 => Some(LatentOrder::Value),
            1 => Some(LatentOrder::Rate),
            _ => None,
        }
    }

    pub fn order(self) -> u8 {
        match self {
            LatentOrder::Value => 0,
            LatentOrder::Rate => 1,
        }
    }

    pub fn mean_column(self) -> &'static str {
        match self {
            LatentOrder::Value => MU_COLUMN,
            LatentOrder::Rate => MU1_COLUMN,
        }
    }

    pub fn variance_column(self) -> &'static str {
        match self {
            LatentOrder::Value => SIGMA_COLUMN,
            LatentOrder::Rate => SIGMA1_COLUMN,
        }
    }
}

/// Time, mean and confidence bounds of a latent function, index-aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatentCurve {
    pub time: Vec<f64>,
    pub mean: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl LatentCurve {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// One figure column: a title and the criteria selecting its rows.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSpec {
    pub title: String,
    pub criteria: Criteria,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults that reproduce the
/// published figure).
#[derive(Debug, Clone)]
pub struct FigureConfig {
    /// Directory holding `biolog/` and receiving relative outputs.
    pub root: PathBuf,
    /// Plate identifiers, in column-concatenation order.
    pub plates: Vec<String>,
    pub model: ModelChoice,
    /// One figure column per substrate.
    pub substrates: Vec<String>,
    pub isolate: String,
    pub pm: u32,
    /// Extra criteria applied to every panel.
    pub extra_criteria: Criteria,
    pub plot_raw: bool,
    pub output: PathBuf,
    pub export_curves: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
}

impl FigureConfig {
    pub fn split_predictions_path(&self) -> PathBuf {
        self.root.join("biolog/derived/split_gp_data.txt")
    }

    pub fn pooled_predictions_path(&self) -> PathBuf {
        self.root.join("biolog/derived/pooled_by_isolate_gp_data.txt")
    }

    pub fn raw_path(&self, plate: &str) -> PathBuf {
        self.root.join("biolog/derived").join(format!("{plate}.tsv"))
    }

    pub fn summary_path(&self, plate: &str) -> PathBuf {
        self.root.join("biolog/summary").join(format!("{plate}.txt"))
    }

    /// Output path, resolved against `root` when relative.
    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.output)
    }

    pub fn export_path(&self) -> Option<PathBuf> {
        self.export_curves.as_ref().map(|p| self.root.join(p))
    }

    /// The figure columns, left to right.
    pub fn panels(&self) -> Vec<PanelSpec> {
        self.substrates
            .iter()
            .map(|substrate| PanelSpec {
                title: substrate.clone(),
                criteria: Criteria::new()
                    .with(SUBSTRATE_COLUMN, substrate.as_str())
                    .with(ISOLATE_COLUMN, self.isolate.as_str())
                    .with(PLATE_COLUMN, self.pm)
                    .merged(&self.extra_criteria),
            })
            .collect()
    }
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            plates: vec!["CD2015_PM1-1".to_string(), "CD2015_PM1-2".to_string()],
            model: ModelChoice::Pooled,
            substrates: vec![
                "L-Threonine".to_string(),
                "D-Sorbitol".to_string(),
                "D-Fructose".to_string(),
            ],
            isolate: "CD2015".to_string(),
            pm: 1,
            extra_criteria: Criteria::new(),
            plot_raw: true,
            output: PathBuf::from("figures/Midani_AMiGA_Supp_Figure_4.pdf"),
            export_curves: None,
            width: 1400,
            height: 900,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CriterionValue;

    #[test]
    fn latent_order_columns() {
        assert_eq!(LatentOrder::from_order(0), Some(LatentOrder::Value));
        assert_eq!(LatentOrder::from_order(2), None);
        assert_eq!(LatentOrder::Rate.mean_column(), "mu1");
        assert_eq!(LatentOrder::Rate.variance_column(), "Sigma1");
        assert_eq!(LatentOrder::Value.variance_column(), "Sigma");
    }

    #[test]
    fn default_panels_follow_substrates() {
        let config = FigureConfig::default();
        let panels = config.panels();
        assert_eq!(panels.len(), 3);
        assert_eq!(panels[1].title, "D-Sorbitol");
        assert_eq!(
            panels[0].criteria.get(PLATE_COLUMN),
            Some([CriterionValue::Number(1.0)].as_slice())
        );
        assert_eq!(panels[2].criteria.len(), 3);
    }

    #[test]
    fn paths_resolve_under_root() {
        let config = FigureConfig {
            root: PathBuf::from("/data"),
            ..FigureConfig::default()
        };
        assert_eq!(
            config.raw_path("CD2015_PM1-1"),
            PathBuf::from("/data/biolog/derived/CD2015_PM1-1.tsv")
        );
        assert_eq!(
            config.summary_path("CD2015_PM1-2"),
            PathBuf::from("/data/biolog/summary/CD2015_PM1-2.txt")
        );
        assert_eq!(
            config.output_path(),
            PathBuf::from("/data/figures/Midani_AMiGA_Supp_Figure_4.pdf")
        );
    }
}
