//! Figure drawing.
//!
//! - `surface`: explicit `Axes`/`Figure` surfaces that record marks and styling
//! - `panel`: model-vs-data panel renderer for one condition
//! - `figure`: the two-row substrate comparison figure
//! - `svg`: Plotters SVG output
//! - `output`: figure files, PDF (via SVG) or SVG by extension

pub mod figure;
pub mod output;
pub mod panel;
pub mod surface;
pub mod svg;

pub use figure::{ComposedPanel, compose_growth_figure, style_figure};
pub use output::{FigureFormat, render_pdf, save_figure, save_pdf};
pub use panel::{
    BAND_FILL, MEAN_STROKE, PanelData, PanelReport, RAW_STROKE, TICK_FONT_SIZE, plot_model,
    plot_model_standalone,
};
pub use surface::{Axes, AxesStyle, Figure, Mark, Rgba, Stroke, Surface, TickLabels};
pub use svg::{render_svg_string, save_svg};
