//! Layout of the growth-curve supplementary figure.
//!
//! Two rows (growth, growth rate) by one column per substrate. Styling
//! mirrors the published figure: shared x axis in hours, fixed y ranges per
//! row, hidden spines, zero reference lines, large tick labels, substrate
//! titles on top and bold panel letters.

use crate::domain::{FigureConfig, PanelSpec};
use crate::error::AppError;
use crate::io::GrowthData;
use crate::plot::panel::{PanelData, PanelReport, plot_model};
use crate::plot::surface::{Axes, Figure, Rgba, Stroke, Surface, TickLabels, linspace};

pub const X_LIMITS: (f64, f64) = (-1.0, 25.0);
pub const GROWTH_Y_LIMITS: (f64, f64) = (-0.3, 3.3);
pub const RATE_Y_LIMITS: (f64, f64) = (-0.4, 0.8);
pub const X_LABEL: &str = "Time (hours)";
pub const GROWTH_LABEL: &str = "ln OD(t)";
pub const RATE_LABEL: &str = "d/dt ln OD(t)";

const LABEL_FONT_SIZE: u32 = 20;
const LETTER_FONT_SIZE: u32 = 30;
const ZERO_LINE: Stroke = Stroke::new(Rgba::BLACK, 2.0);

/// One drawn figure column.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedPanel {
    pub title: String,
    pub report: PanelReport,
}

/// Draw every configured panel into a fresh `2 x n` figure.
pub fn compose_growth_figure(
    data: &GrowthData,
    config: &FigureConfig,
) -> Result<(Figure, Vec<ComposedPanel>), AppError> {
    let specs = config.panels();
    if specs.is_empty() {
        return Err(AppError::input("At least one substrate is required."));
    }

    let mut figure = Figure::new(2, specs.len(), (config.width, config.height)).with_shared_x();
    let panel_data = PanelData {
        predictions: data.predictions(config.model),
        raw: &data.raw,
        summary: &data.summary,
    };

    let mut panels = Vec::with_capacity(specs.len());
    for (col, spec) in specs.iter().enumerate() {
        let mut column = figure.column_mut(col);
        if let Some(report) = plot_model::<Axes>(panel_data, &spec.criteria, &mut column, config.plot_raw)? {
            panels.push(ComposedPanel {
                title: spec.title.clone(),
                report,
            });
        }
    }

    style_figure(&mut figure, &specs);
    Ok((figure, panels))
}

/// Apply limits, ticks, labels and decorations to a drawn figure.
pub fn style_figure(figure: &mut Figure, specs: &[PanelSpec]) {
    if let Some(ax) = figure.axes_mut(0, 0) {
        ax.style.xlim = Some(X_LIMITS);
        ax.style.xticks = Some(linspace(0.0, 24.0, 4));
    }

    let share_x = figure.shares_x();
    let growth_ticks = linspace(0.0, 3.0, 4);
    let growth_labels: Vec<String> = growth_ticks.iter().map(|v| format!("{v:.1}")).collect();
    for (col, ax) in figure.row_mut(0).into_iter().enumerate() {
        ax.style.ylim = Some(GROWTH_Y_LIMITS);
        ax.style.yticks = Some(growth_ticks.clone());
        ax.style.ytick_labels = if col == 0 {
            TickLabels::Fixed(growth_labels.clone())
        } else {
            TickLabels::Hidden
        };
        if share_x {
            ax.style.xtick_labels = TickLabels::Hidden;
        }
        ax.style.title = specs.get(col).map(|s| s.title.clone());
        ax.style.panel_letter = Some(panel_letter(col));
    }

    for (col, ax) in figure.row_mut(1).into_iter().enumerate() {
        ax.style.ylim = Some(RATE_Y_LIMITS);
        ax.style.yticks = Some(linspace(-0.4, 0.8, 4));
        if col > 0 {
            ax.style.ytick_labels = TickLabels::Hidden;
        }
        ax.style.xlabel = Some(X_LABEL.to_string());
    }

    if let Some(ax) = figure.axes_mut(0, 0) {
        ax.style.row_label = Some(GROWTH_LABEL.to_string());
    }
    if let Some(ax) = figure.axes_mut(1, 0) {
        ax.style.row_label = Some(RATE_LABEL.to_string());
    }

    for ax in figure.all_axes_mut() {
        ax.style.spine_width = 0.0;
        ax.style.label_font_size = LABEL_FONT_SIZE;
        ax.style.title_font_size = LABEL_FONT_SIZE;
        ax.style.letter_font_size = LETTER_FONT_SIZE;
        ax.axhline(0.0, ZERO_LINE);
        ax.axvline(0.0, ZERO_LINE);
    }
}

/// `A`, `B`, ... `Z`, then `AA`, `AB`, ...
fn panel_letter(index: usize) -> String {
    let mut n = index;
    let mut out = Vec::new();
    loop {
        out.push(char::from(b'A' + (n % 26) as u8));
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    out.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RawMeasurements;
    use crate::io::parse_table;
    use crate::plot::surface::Mark;
    use crate::plot::{MEAN_STROKE, RAW_STROKE};

    const POOLED: &str = "\
\tTime\tmu\tSigma\tmu1\tSigma1\tNoise\tSubstrate\tIsolate\tPM
0\t0\t0.0\t0.01\t0.2\t0.001\t0.001\tL-Threonine\tCD2015\t1
1\t12\t1.5\t0.01\t0.1\t0.001\t0.001\tL-Threonine\tCD2015\t1
2\t24\t2.5\t0.01\t0.0\t0.001\t0.001\tL-Threonine\tCD2015\t1
3\t0\t0.0\t0.01\t0.0\t0.001\t0.001\tD-Sorbitol\tCD2015\t1
4\t24\t0.1\t0.01\t0.0\t0.001\t0.001\tD-Sorbitol\tCD2015\t1
";
    const SPLIT: &str = "\
\tTime\tmu\tSigma\tmu1\tSigma1\tNoise\tSubstrate\tIsolate\tPM
0\t0\t0.0\t0.01\t0.2\t0.001\t0.001\tL-Threonine\tCD2015\t1
";
    const SUMMARY: &str = "\
Well\tSubstrate\tIsolate\tPM
A1\tL-Threonine\tCD2015\t1
A2\tL-Threonine\tCD2015\t1
A3\tD-Sorbitol\tCD2015\t1
A4\tD-Fructose\tCD2015\t1
";

    fn growth_data() -> GrowthData {
        GrowthData {
            split: parse_table(SPLIT.as_bytes()).unwrap(),
            pooled: parse_table(POOLED.as_bytes()).unwrap(),
            raw: RawMeasurements::new(
                vec![0.0, 3600.0, 7200.0],
                ["A1", "A2", "A3", "A4"].map(String::from).to_vec(),
                vec![vec![0.1, 0.1, 0.3]; 4],
            )
            .unwrap(),
            summary: parse_table(SUMMARY.as_bytes()).unwrap(),
        }
    }

    #[test]
    fn composes_two_rows_by_three_columns() {
        let (figure, panels) = compose_growth_figure(&growth_data(), &FigureConfig::default()).unwrap();
        assert_eq!((figure.rows(), figure.cols()), (2, 3));
        assert_eq!(figure.size_px(), (1400, 900));
        assert_eq!(panels.len(), 3);
        assert_eq!(panels[0].report.wells.len(), 2);
        assert_eq!(panels[1].report.wells.len(), 1);
        assert!(panels[2].report.value.is_empty());
        assert_eq!(panels[2].report.wells, vec!["A4".to_string()]);
    }

    #[test]
    fn every_panel_has_one_mean_and_one_band() {
        let (figure, _) = compose_growth_figure(&growth_data(), &FigureConfig::default()).unwrap();
        for row in 0..2 {
            for col in 0..3 {
                let ax = figure.axes(row, col).unwrap();
                assert_eq!(ax.band_count(), 1, "panel ({row}, {col})");
                assert_eq!(ax.lines_with(MEAN_STROKE).len(), 1, "panel ({row}, {col})");
            }
        }
        assert_eq!(figure.axes(0, 0).unwrap().lines_with(RAW_STROKE).len(), 2);
        assert_eq!(figure.axes(1, 0).unwrap().lines_with(RAW_STROKE).len(), 0);
    }

    #[test]
    fn styling_matches_published_layout() {
        let (figure, _) = compose_growth_figure(&growth_data(), &FigureConfig::default()).unwrap();

        assert_eq!(figure.effective_xlim(1, 2), Some(X_LIMITS));
        assert_eq!(figure.effective_xticks(1, 2), Some(vec![0.0, 8.0, 16.0, 24.0]));

        let top_left = figure.axes(0, 0).unwrap();
        assert_eq!(top_left.style.ylim, Some(GROWTH_Y_LIMITS));
        assert_eq!(top_left.style.row_label.as_deref(), Some(GROWTH_LABEL));
        assert_eq!(top_left.style.title.as_deref(), Some("L-Threonine"));
        assert_eq!(top_left.style.panel_letter.as_deref(), Some("A"));
        assert_eq!(
            top_left.style.ytick_labels,
            TickLabels::Fixed(["0.0", "1.0", "2.0", "3.0"].map(String::from).to_vec())
        );

        assert_eq!(top_left.style.xtick_labels, TickLabels::Hidden);
        assert_eq!(bottom_labels(&figure), vec![TickLabels::Auto; 3]);

        let top_right = figure.axes(0, 2).unwrap();
        assert_eq!(top_right.style.ytick_labels, TickLabels::Hidden);
        assert_eq!(top_right.style.panel_letter.as_deref(), Some("C"));

        let bottom_left = figure.axes(1, 0).unwrap();
        assert_eq!(bottom_left.style.ylim, Some(RATE_Y_LIMITS));
        assert_eq!(bottom_left.style.ytick_labels, TickLabels::Auto);
        assert_eq!(bottom_left.style.xlabel.as_deref(), Some(X_LABEL));
        assert_eq!(bottom_left.style.row_label.as_deref(), Some(RATE_LABEL));
        assert_eq!(figure.axes(1, 1).unwrap().style.ytick_labels, TickLabels::Hidden);

        for row in 0..2 {
            for col in 0..3 {
                let ax = figure.axes(row, col).unwrap();
                assert_eq!(ax.style.spine_width, 0.0);
                assert!(ax.marks().contains(&Mark::HLine { y: 0.0, stroke: ZERO_LINE }));
                assert!(ax.marks().contains(&Mark::VLine { x: 0.0, stroke: ZERO_LINE }));
            }
        }
    }

    fn bottom_labels(figure: &Figure) -> Vec<TickLabels> {
        (0..figure.cols())
            .map(|col| figure.axes(1, col).unwrap().style.xtick_labels.clone())
            .collect()
    }

    #[test]
    fn unshared_figure_keeps_top_row_x_labels() {
        let mut figure = Figure::new(2, 1, (500, 900));
        let panels = [PanelSpec {
            title: "D-Sorbitol".to_string(),
            criteria: crate::data::Criteria::new(),
        }];
        style_figure(&mut figure, &panels);
        assert_eq!(figure.axes(0, 0).unwrap().style.xtick_labels, TickLabels::Auto);
    }

    #[test]
    fn split_model_and_raw_toggle() {
        let config = FigureConfig {
            model: crate::domain::ModelChoice::Split,
            plot_raw: false,
            substrates: vec!["L-Threonine".to_string()],
            ..FigureConfig::default()
        };
        let (figure, panels) = compose_growth_figure(&growth_data(), &config).unwrap();
        assert_eq!(figure.cols(), 1);
        assert_eq!(panels[0].report.value.len(), 1);
        assert!(panels[0].report.wells.is_empty());
        assert_eq!(figure.axes(0, 0).unwrap().line_count(), 1);
    }

    #[test]
    fn no_substrates_is_an_error() {
        let config = FigureConfig {
            substrates: Vec::new(),
            ..FigureConfig::default()
        };
        assert!(compose_growth_figure(&growth_data(), &config).is_err());
    }

    #[test]
    fn panel_letters_continue_past_z() {
        assert_eq!(panel_letter(0), "A");
        assert_eq!(panel_letter(25), "Z");
        assert_eq!(panel_letter(26), "AA");
        assert_eq!(panel_letter(27), "AB");
    }
}
