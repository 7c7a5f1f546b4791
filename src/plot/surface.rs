//! Explicit plotting surfaces.
//!
//! Drawing code never touches a global "current figure". It receives
//! `&mut` surfaces and records marks on them; a `Figure` owns a grid of
//! `Axes` and is rendered to a file in one call by a backend.
//!
//! The `Axes` is a render-only description: marks plus styling. Keeping it
//! data-driven means the panel logic can be tested by counting marks, and
//! the SVG backend stays focused on drawing.

/// sRGB colour with alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 1.0);
}

/// Line colour and width (points).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f64,
}

impl Stroke {
    pub const fn new(color: Rgba, width: f64) -> Self {
        Self { color, width }
    }
}

/// A recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Line {
        points: Vec<(f64, f64)>,
        stroke: Stroke,
    },
    /// Filled region between two curves sharing x values.
    Band {
        x: Vec<f64>,
        lower: Vec<f64>,
        upper: Vec<f64>,
        fill: Rgba,
    },
    HLine {
        y: f64,
        stroke: Stroke,
    },
    VLine {
        x: f64,
        stroke: Stroke,
    },
}

/// How tick positions are labelled.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TickLabels {
    /// Format the tick value.
    #[default]
    Auto,
    /// One label per tick position, in order.
    Fixed(Vec<String>),
    /// Ticks without labels.
    Hidden,
}

impl TickLabels {
    /// Label for tick `index` at `value`.
    pub fn label(&self, index: usize, value: f64) -> String {
        match self {
            TickLabels::Auto => format_tick(value),
            TickLabels::Fixed(labels) => labels.get(index).cloned().unwrap_or_default(),
            TickLabels::Hidden => String::new(),
        }
    }
}

/// Styling of one set of axes.
#[derive(Debug, Clone, PartialEq)]
pub struct AxesStyle {
    pub xlim: Option<(f64, f64)>,
    pub ylim: Option<(f64, f64)>,
    pub xticks: Option<Vec<f64>>,
    pub yticks: Option<Vec<f64>>,
    pub xtick_labels: TickLabels,
    pub ytick_labels: TickLabels,
    pub xlabel: Option<String>,
    /// Rotated label drawn left of the tick labels.
    pub row_label: Option<String>,
    pub title: Option<String>,
    /// Bold letter in the top-left corner.
    pub panel_letter: Option<String>,
    /// Width of the frame around the plot area (0 hides it).
    pub spine_width: f64,
    pub tick_font_size: u32,
    pub label_font_size: u32,
    pub title_font_size: u32,
    pub letter_font_size: u32,
    /// Light grid at the tick positions.
    pub grid: bool,
}

impl Default for AxesStyle {
    fn default() -> Self {
        Self {
            xlim: None,
            ylim: None,
            xticks: None,
            yticks: None,
            xtick_labels: TickLabels::Auto,
            ytick_labels: TickLabels::Auto,
            xlabel: None,
            row_label: None,
            title: None,
            panel_letter: None,
            spine_width: 1.0,
            tick_font_size: 10,
            label_font_size: 10,
            title_font_size: 12,
            letter_font_size: 30,
            grid: true,
        }
    }
}

/// Anything the panel renderer can draw on.
pub trait Surface {
    /// One line through `(x[i], y[i])`.
    fn plot(&mut self, x: &[f64], y: &[f64], stroke: Stroke);

    /// One line per trace.
    fn plot_traces(&mut self, traces: &[Vec<(f64, f64)>], stroke: Stroke) {
        for trace in traces {
            let (x, y): (Vec<f64>, Vec<f64>) = trace.iter().copied().unzip();
            self.plot(&x, &y, stroke);
        }
    }

    /// Shade the region between `lower` and `upper`.
    fn fill_between(&mut self, x: &[f64], lower: &[f64], upper: &[f64], fill: Rgba);

    fn axhline(&mut self, y: f64, stroke: Stroke);

    fn axvline(&mut self, x: f64, stroke: Stroke);

    fn set_tick_font_size(&mut self, size: u32);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Axes {
    marks: Vec<Mark>,
    pub style: AxesStyle,
}

impl Axes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    pub fn line_count(&self) -> usize {
        self.marks.iter().filter(|m| matches!(m, Mark::Line { .. })).count()
    }

    pub fn band_count(&self) -> usize {
        self.marks.iter().filter(|m| matches!(m, Mark::Band { .. })).count()
    }

    /// Lines drawn with exactly this stroke.
    pub fn lines_with(&self, stroke: Stroke) -> Vec<&[(f64, f64)]> {
        self.marks
            .iter()
            .filter_map(|m| match m {
                Mark::Line { points, stroke: s } if *s == stroke => Some(points.as_slice()),
                _ => None,
            })
            .collect()
    }

    /// Data extent of the recorded lines and bands, ignoring non-finite values.
    pub fn data_bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let mut xs = Extent::default();
        let mut ys = Extent::default();
        for mark in &self.marks {
            match mark {
                Mark::Line { points, .. } => {
                    for &(x, y) in points {
                        xs.add(x);
                        ys.add(y);
                    }
                }
                Mark::Band { x, lower, upper, .. } => {
                    x.iter().for_each(|&v| xs.add(v));
                    lower.iter().chain(upper).for_each(|&v| ys.add(v));
                }
                Mark::HLine { .. } | Mark::VLine { .. } => {}
            }
        }
        Some((xs.range()?, ys.range()?))
    }
}

impl Surface for Axes {
    fn plot(&mut self, x: &[f64], y: &[f64], stroke: Stroke) {
        let points = x.iter().copied().zip(y.iter().copied()).collect();
        self.marks.push(Mark::Line { points, stroke });
    }

    fn fill_between(&mut self, x: &[f64], lower: &[f64], upper: &[f64], fill: Rgba) {
        let n = x.len().min(lower.len()).min(upper.len());
        self.marks.push(Mark::Band {
            x: x[..n].to_vec(),
            lower: lower[..n].to_vec(),
            upper: upper[..n].to_vec(),
            fill,
        });
    }

    fn axhline(&mut self, y: f64, stroke: Stroke) {
        self.marks.push(Mark::HLine { y, stroke });
    }

    fn axvline(&mut self, x: f64, stroke: Stroke) {
        self.marks.push(Mark::VLine { x, stroke });
    }

    fn set_tick_font_size(&mut self, size: u32) {
        self.style.tick_font_size = size;
    }
}

#[derive(Debug, Default)]
struct Extent {
    lo: Option<f64>,
    hi: Option<f64>,
}

impl Extent {
    fn add(&mut self, v: f64) {
        if !v.is_finite() {
            return;
        }
        self.lo = Some(self.lo.map_or(v, |lo| lo.min(v)));
        self.hi = Some(self.hi.map_or(v, |hi| hi.max(v)));
    }

    fn range(&self) -> Option<(f64, f64)> {
        Some((self.lo?, self.hi?))
    }
}

/// Grid of axes sharing one canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    rows: usize,
    cols: usize,
    axes: Vec<Axes>,
    size_px: (u32, u32),
    share_x: bool,
}

impl Figure {
    /// `rows x cols` empty axes on a `size_px` canvas.
    pub fn new(rows: usize, cols: usize, size_px: (u32, u32)) -> Self {
        Self {
            rows,
            cols,
            axes: vec![Axes::new(); rows * cols],
            size_px,
            share_x: false,
        }
    }

    /// All axes use the x limits and ticks of the first axes that sets them.
    pub fn with_shared_x(mut self) -> Self {
        self.share_x = true;
        self
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn size_px(&self) -> (u32, u32) {
        self.size_px
    }

    pub fn axes(&self, row: usize, col: usize) -> Option<&Axes> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.axes.get(row * self.cols + col)
    }

    pub fn axes_mut(&mut self, row: usize, col: usize) -> Option<&mut Axes> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.axes.get_mut(row * self.cols + col)
    }

    /// Every axes in row-major order.
    pub fn all_axes_mut(&mut self) -> impl Iterator<Item = &mut Axes> {
        self.axes.iter_mut()
    }

    /// The axes of one row, left to right.
    pub fn row_mut(&mut self, row: usize) -> Vec<&mut Axes> {
        let cols = self.cols;
        self.axes
            .iter_mut()
            .enumerate()
            .filter(|(i, _)| i / cols == row)
            .map(|(_, a)| a)
            .collect()
    }

    /// The axes of one column, top to bottom.
    pub fn column_mut(&mut self, col: usize) -> Vec<&mut Axes> {
        let cols = self.cols;
        self.axes
            .iter_mut()
            .enumerate()
            .filter(|(i, _)| i % cols == col)
            .map(|(_, a)| a)
            .collect()
    }

    /// x limits in effect for an axes, honouring a shared x axis.
    pub fn effective_xlim(&self, row: usize, col: usize) -> Option<(f64, f64)> {
        let own = self.axes(row, col)?.style.xlim;
        if own.is_some() || !self.share_x {
            return own;
        }
        self.axes.iter().find_map(|a| a.style.xlim)
    }

    /// x ticks in effect for an axes, honouring a shared x axis.
    pub fn effective_xticks(&self, row: usize, col: usize) -> Option<Vec<f64>> {
        let own = self.axes(row, col)?.style.xticks.clone();
        if own.is_some() || !self.share_x {
            return own;
        }
        self.axes.iter().find_map(|a| a.style.xticks.clone())
    }

    /// Data bounds across all axes (for shared autoscaling).
    pub fn shared_x_bounds(&self) -> Option<(f64, f64)> {
        self.axes
            .iter()
            .filter_map(|a| a.data_bounds().map(|(x, _)| x))
            .reduce(|(a0, a1), (b0, b1)| (a0.min(b0), a1.max(b1)))
    }

    pub fn shares_x(&self) -> bool {
        self.share_x
    }
}

/// Format a tick value the way the figure prints plain numbers.
pub fn format_tick(value: f64) -> String {
    let rounded = (value * 1e6).round() / 1e6;
    if rounded == 0.0 {
        return "0".to_string();
    }
    if rounded.fract() == 0.0 && rounded.abs() < 1e15 {
        return format!("{rounded:.0}");
    }
    let text = format!("{rounded:.6}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// `n` evenly spaced values from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Stroke = Stroke::new(Rgba::new(255, 0, 0, 0.5), 2.0);

    #[test]
    fn axes_records_marks_in_order() {
        let mut ax = Axes::new();
        ax.plot(&[0.0, 1.0], &[0.0, 1.0], RED);
        ax.fill_between(&[0.0, 1.0], &[-1.0, 0.0], &[1.0, 2.0], Rgba::BLACK);
        ax.axhline(0.0, RED);
        assert_eq!(ax.marks().len(), 3);
        assert_eq!(ax.line_count(), 1);
        assert_eq!(ax.band_count(), 1);
        assert_eq!(ax.lines_with(RED).len(), 1);
    }

    #[test]
    fn plot_traces_draws_one_line_per_trace() {
        let mut ax = Axes::new();
        ax.plot_traces(&[vec![(0.0, 1.0)], vec![(0.0, 2.0)], vec![]], RED);
        assert_eq!(ax.line_count(), 3);
    }

    #[test]
    fn data_bounds_skip_non_finite_values() {
        let mut ax = Axes::new();
        ax.plot(&[0.0, 2.0, 3.0], &[1.0, f64::NAN, -1.0], RED);
        ax.fill_between(&[1.0], &[-4.0], &[5.0], Rgba::BLACK);
        assert_eq!(ax.data_bounds(), Some(((0.0, 3.0), (-4.0, 5.0))));
        assert_eq!(Axes::new().data_bounds(), None);
    }

    #[test]
    fn shared_x_falls_back_to_first_configured_axes() {
        let mut fig = Figure::new(2, 3, (1400, 900)).with_shared_x();
        fig.axes_mut(0, 0).unwrap().style.xlim = Some((-1.0, 25.0));
        assert_eq!(fig.effective_xlim(1, 2), Some((-1.0, 25.0)));

        let mut own = Figure::new(1, 2, (100, 100));
        own.axes_mut(0, 0).unwrap().style.xlim = Some((0.0, 1.0));
        assert_eq!(own.effective_xlim(0, 1), None);
    }

    #[test]
    fn column_and_row_views() {
        let mut fig = Figure::new(2, 3, (1400, 900));
        assert_eq!(fig.column_mut(1).len(), 2);
        assert_eq!(fig.row_mut(0).len(), 3);
        assert!(fig.axes(2, 0).is_none());
    }

    #[test]
    fn tick_formatting_and_linspace() {
        assert_eq!(format_tick(8.0), "8");
        assert_eq!(format_tick(-0.4), "-0.4");
        assert_eq!(format_tick(1e-12), "0");
        let ticks = linspace(-0.4, 0.8, 4);
        assert_eq!(ticks.len(), 4);
        assert!((ticks[1] - 0.0).abs() < 1e-12);
        assert!((ticks[3] - 0.8).abs() < 1e-12);
        assert_eq!(TickLabels::Hidden.label(0, 1.0), "");
        assert_eq!(TickLabels::Fixed(vec!["0.0".into()]).label(0, 0.0), "0.0");
    }
}
