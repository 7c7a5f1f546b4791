//! Plotters-powered SVG output for a `Figure`.
//!
//! All marks and styling are recorded on `Axes` beforehand; this module only
//! translates them into Plotters primitives:
//!
//! - one `ChartBuilder` per grid cell; grid, frame and tick labels drawn at
//!   the recorded tick positions
//! - lines clipped to the axes limits, bands clamped into them
//! - row labels, panel letters and titles as plain SVG text
//!
//! Sizes on `Axes` are in points (1/72 in) and the canvas is 100 px per inch.

use std::fs::create_dir_all;
use std::path::Path;

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::error::AppError;
use crate::plot::surface::{Axes, Figure, Mark, Rgba, Stroke, TickLabels};

/// Canvas resolution.
pub const PX_PER_INCH: f64 = 100.0;
const PX_PER_POINT: f64 = PX_PER_INCH / 72.0;
const FONT: &str = "sans-serif";
const GRID_COLOR: RGBColor = RGBColor(224, 224, 224);
/// Fraction of the data span added on each side when autoscaling.
const AUTO_MARGIN: f64 = 0.05;

type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Render `figure` to an SVG file, creating parent directories as needed.
pub fn save_svg(figure: &Figure, path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)
            .map_err(|e| AppError::output(format!("Failed to create '{}': {e}", parent.display())))?;
    }

    let root = SVGBackend::new(path, figure.size_px()).into_drawing_area();
    draw_figure(&root, figure).map_err(|e| AppError::output(format!("Failed to render figure: {e}")))?;
    root.present()
        .map_err(|e| AppError::output(format!("Failed to write figure '{}': {e}", path.display())))?;
    Ok(())
}

/// Render `figure` to an SVG document in memory.
pub fn render_svg_string(figure: &Figure) -> Result<String, AppError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, figure.size_px()).into_drawing_area();
        draw_figure(&root, figure).map_err(|e| AppError::output(format!("Failed to render figure: {e}")))?;
        root.present()
            .map_err(|e| AppError::output(format!("Failed to finish SVG document: {e}")))?;
    }
    Ok(svg)
}

/// Limits and ticks resolved for one axes.
#[derive(Debug, Clone, PartialEq)]
struct AxesFrame {
    x: (f64, f64),
    y: (f64, f64),
    xticks: Vec<f64>,
    yticks: Vec<f64>,
}

impl AxesFrame {
    fn resolve(figure: &Figure, row: usize, col: usize, ax: &Axes) -> Self {
        let bounds = ax.data_bounds();

        let x = figure.effective_xlim(row, col).unwrap_or_else(|| {
            let data_x = if figure.shares_x() {
                figure.shared_x_bounds()
            } else {
                bounds.map(|(x, _)| x)
            };
            padded(data_x)
        });
        let y = ax.style.ylim.unwrap_or_else(|| padded(bounds.map(|(_, y)| y)));

        let xticks = figure
            .effective_xticks(row, col)
            .unwrap_or_else(|| auto_ticks(x.0, x.1));
        let yticks = ax.style.yticks.clone().unwrap_or_else(|| auto_ticks(y.0, y.1));

        Self { x, y, xticks, yticks }
    }
}

fn draw_figure<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, figure: &Figure) -> DrawResult<DB> {
    root.fill(&WHITE)?;

    let cells = root.split_evenly((figure.rows(), figure.cols()));
    for (i, cell) in cells.iter().enumerate() {
        let (row, col) = (i / figure.cols(), i % figure.cols());
        if let Some(ax) = figure.axes(row, col) {
            let frame = AxesFrame::resolve(figure, row, col, ax);
            draw_axes(cell, ax, &frame)?;
        }
    }
    Ok(())
}

fn draw_axes<DB: DrawingBackend>(cell: &DrawingArea<DB, Shift>, ax: &Axes, frame: &AxesFrame) -> DrawResult<DB> {
    let style = &ax.style;
    let (_, height) = cell.dim_in_pixel();

    let tick_px = px(f64::from(style.tick_font_size));
    let label_px = px(f64::from(style.label_font_size));
    let letter_px = px(f64::from(style.letter_font_size));

    let left_pad = if style.row_label.is_some() { label_px * 2 } else { 10 };
    let top_pad = if style.panel_letter.is_some() { letter_px + 6 } else { 10 };

    if let Some(label) = &style.row_label {
        let text = TextStyle::from((FONT, label_px).into_font())
            .transform(FontTransform::Rotate270)
            .pos(Pos::new(HPos::Center, VPos::Center))
            .color(&BLACK);
        cell.draw(&Text::new(label.as_str(), (label_px * 2 / 3, height as i32 / 2), text))?;
    }

    if let Some(letter) = &style.panel_letter {
        let text = TextStyle::from((FONT, letter_px).into_font().style(FontStyle::Bold))
            .pos(Pos::new(HPos::Left, VPos::Top))
            .color(&BLACK);
        cell.draw(&Text::new(letter.as_str(), (left_pad, 2), text))?;
    }

    let plot_area = cell.margin(top_pad, 10, left_pad, 10);

    let y_label_area = match style.ytick_labels {
        TickLabels::Hidden => 10,
        _ => tick_px * 3,
    };
    let x_tick_area = match style.xtick_labels {
        TickLabels::Hidden => 0,
        _ => tick_px * 3 / 2,
    };
    let x_label_area = 10 + x_tick_area + if style.xlabel.is_some() { label_px * 3 / 2 } else { 0 };

    let mut builder = ChartBuilder::on(&plot_area);
    builder
        .x_label_area_size(x_label_area)
        .y_label_area_size(y_label_area);
    if let Some(title) = &style.title {
        builder.caption(title, (FONT, px(f64::from(style.title_font_size))));
    }

    let (x0, x1) = frame.x;
    let (y0, y1) = frame.y;
    let mut chart = builder.build_cartesian_2d(x0..x1, y0..y1)?;

    // Ticks sit at fixed positions, so grid, frame and labels are drawn here
    // rather than through the mesh.
    let xticks: Vec<(usize, f64)> = visible_ticks(&frame.xticks, frame.x);
    let yticks: Vec<(usize, f64)> = visible_ticks(&frame.yticks, frame.y);

    if style.grid {
        for &(_, t) in &xticks {
            chart.draw_series(std::iter::once(PathElement::new(
                vec![(t, y0), (t, y1)],
                GRID_COLOR.stroke_width(1),
            )))?;
        }
        for &(_, t) in &yticks {
            chart.draw_series(std::iter::once(PathElement::new(
                vec![(x0, t), (x1, t)],
                GRID_COLOR.stroke_width(1),
            )))?;
        }
    }

    if style.spine_width > 0.0 {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)],
            shape(Stroke::new(Rgba::BLACK, style.spine_width)),
        )))?;
    }

    let tick_font = (FONT, tick_px).into_font();
    let below = TextStyle::from(tick_font.clone())
        .pos(Pos::new(HPos::Center, VPos::Top))
        .color(&BLACK);
    let beside = TextStyle::from(tick_font)
        .pos(Pos::new(HPos::Right, VPos::Center))
        .color(&BLACK);

    for &(i, t) in &xticks {
        let label = style.xtick_labels.label(i, t);
        if !label.is_empty() {
            chart.draw_series(std::iter::once(
                EmptyElement::at((t, y0)) + Text::new(label, (0, 6), below.clone()),
            ))?;
        }
    }
    for &(i, t) in &yticks {
        let label = style.ytick_labels.label(i, t);
        if !label.is_empty() {
            chart.draw_series(std::iter::once(
                EmptyElement::at((x0, t)) + Text::new(label, (-6, 0), beside.clone()),
            ))?;
        }
    }

    if let Some(xlabel) = &style.xlabel {
        let desc = TextStyle::from((FONT, label_px).into_font())
            .pos(Pos::new(HPos::Center, VPos::Top))
            .color(&BLACK);
        chart.draw_series(std::iter::once(
            EmptyElement::at(((x0 + x1) / 2.0, y0)) + Text::new(xlabel.clone(), (0, 8 + x_tick_area), desc),
        ))?;
    }

    for mark in ax.marks() {
        match mark {
            Mark::Band { x, lower, upper, fill } => {
                let outline = band_outline(x, lower, upper, frame.x, frame.y);
                if outline.len() >= 3 {
                    chart.draw_series(std::iter::once(Polygon::new(outline, rgba(*fill).filled())))?;
                }
            }
            Mark::Line { points, stroke } => {
                for run in clip_polyline(points, frame.x, frame.y) {
                    chart.draw_series(LineSeries::new(run, shape(*stroke)))?;
                }
            }
            Mark::HLine { y, stroke } => {
                if *y >= y0 && *y <= y1 {
                    chart.draw_series(std::iter::once(PathElement::new(
                        vec![(x0, *y), (x1, *y)],
                        shape(*stroke),
                    )))?;
                }
            }
            Mark::VLine { x, stroke } => {
                if *x >= x0 && *x <= x1 {
                    chart.draw_series(std::iter::once(PathElement::new(
                        vec![(*x, y0), (*x, y1)],
                        shape(*stroke),
                    )))?;
                }
            }
        }
    }

    Ok(())
}

fn px(points: f64) -> i32 {
    (points * PX_PER_POINT).round() as i32
}

fn rgba(color: Rgba) -> RGBAColor {
    RGBAColor(color.r, color.g, color.b, color.a)
}

fn shape(stroke: Stroke) -> ShapeStyle {
    ShapeStyle {
        color: rgba(stroke.color),
        filled: false,
        stroke_width: (stroke.width * PX_PER_POINT).round().max(0.0) as u32,
    }
}

/// `(index, value)` of the ticks inside `[lo, hi]`; the index keeps fixed labels aligned.
fn visible_ticks(ticks: &[f64], (lo, hi): (f64, f64)) -> Vec<(usize, f64)> {
    let slack = 1e-9 * (hi - lo).abs();
    ticks
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, t)| t.is_finite() && *t >= lo - slack && *t <= hi + slack)
        .collect()
}

fn padded(bounds: Option<(f64, f64)>) -> (f64, f64) {
    match bounds {
        Some((lo, hi)) if hi > lo => {
            let pad = (hi - lo) * AUTO_MARGIN;
            (lo - pad, hi + pad)
        }
        Some((v, _)) => (v - 0.5, v + 0.5),
        None => (0.0, 1.0),
    }
}

/// Roughly five ticks on a 1-2-5 step inside `[lo, hi]`.
fn auto_ticks(lo: f64, hi: f64) -> Vec<f64> {
    if !(lo.is_finite() && hi.is_finite()) || hi <= lo {
        return Vec::new();
    }

    let raw = (hi - lo) / 5.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|&s| s >= raw)
        .unwrap_or(10.0 * magnitude);

    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

/// Liang-Barsky clip of one segment to the box.
fn clip_segment(
    a: (f64, f64),
    b: (f64, f64),
    (xmin, xmax): (f64, f64),
    (ymin, ymax): (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    for (p, q) in [(-dx, a.0 - xmin), (dx, xmax - a.0), (-dy, a.1 - ymin), (dy, ymax - a.1)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some(((a.0 + t0 * dx, a.1 + t0 * dy), (a.0 + t1 * dx, a.1 + t1 * dy)))
}

/// Split a polyline into the runs visible inside the box.
///
/// Non-finite points break the line, as they do in the published figure.
fn clip_polyline(points: &[(f64, f64)], x: (f64, f64), y: (f64, f64)) -> Vec<Vec<(f64, f64)>> {
    fn flush(runs: &mut Vec<Vec<(f64, f64)>>, current: &mut Vec<(f64, f64)>) {
        if current.len() >= 2 {
            runs.push(std::mem::take(current));
        } else {
            current.clear();
        }
    }

    let finite = |p: &(f64, f64)| p.0.is_finite() && p.1.is_finite();
    let mut runs = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();

    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if !finite(&a) || !finite(&b) {
            flush(&mut runs, &mut current);
            continue;
        }
        match clip_segment(a, b, x, y) {
            Some((start, end)) => {
                if current.last() != Some(&start) {
                    flush(&mut runs, &mut current);
                    current.push(start);
                }
                current.push(end);
                if end != b {
                    flush(&mut runs, &mut current);
                }
            }
            None => flush(&mut runs, &mut current),
        }
    }
    flush(&mut runs, &mut current);
    runs
}

/// Closed outline of a band (upper left to right, lower right to left),
/// skipping non-finite points and clamping into the box.
fn band_outline(
    x: &[f64],
    lower: &[f64],
    upper: &[f64],
    (xmin, xmax): (f64, f64),
    (ymin, ymax): (f64, f64),
) -> Vec<(f64, f64)> {
    let kept: Vec<(f64, f64, f64)> = x
        .iter()
        .zip(lower)
        .zip(upper)
        .map(|((&x, &lo), &hi)| (x, lo, hi))
        .filter(|(x, lo, hi)| x.is_finite() && lo.is_finite() && hi.is_finite())
        .map(|(x, lo, hi)| (x.clamp(xmin, xmax), lo.clamp(ymin, ymax), hi.clamp(ymin, ymax)))
        .collect();

    let mut outline: Vec<(f64, f64)> = kept.iter().map(|&(x, _, hi)| (x, hi)).collect();
    outline.extend(kept.iter().rev().map(|&(x, lo, _)| (x, lo)));
    outline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Criteria;
    use crate::domain::PanelSpec;
    use crate::plot::surface::Surface;
    use crate::plot::{BAND_FILL, MEAN_STROKE, style_figure};

    fn has_text(svg: &str, text: &str) -> bool {
        svg.contains(&format!(">{text}<")) || svg.lines().any(|l| l.trim() == text)
    }

    #[test]
    fn clip_keeps_inside_segments_whole() {
        let runs = clip_polyline(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.5)], (0.0, 2.0), (0.0, 1.0));
        assert_eq!(runs, vec![vec![(0.0, 0.0), (1.0, 1.0), (2.0, 0.5)]]);
    }

    #[test]
    fn clip_splits_at_box_exit_and_reentry() {
        let runs = clip_polyline(&[(0.0, 0.0), (1.0, 2.0), (2.0, 0.0)], (0.0, 2.0), (0.0, 1.0));
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], vec![(0.0, 0.0), (0.5, 1.0)]);
        assert_eq!(runs[1], vec![(1.5, 1.0), (2.0, 0.0)]);
    }

    #[test]
    fn clip_breaks_on_non_finite_points() {
        let runs = clip_polyline(
            &[(0.0, 0.5), (0.5, 0.5), (1.0, f64::NEG_INFINITY), (1.5, 0.5), (2.0, 0.5)],
            (0.0, 2.0),
            (0.0, 1.0),
        );
        assert_eq!(runs.len(), 2);
    }

    #[test]
    fn clip_drops_segments_outside() {
        assert!(clip_polyline(&[(0.0, 5.0), (1.0, 6.0)], (0.0, 2.0), (0.0, 1.0)).is_empty());
    }

    #[test]
    fn band_outline_clamps_and_closes() {
        let outline = band_outline(&[0.0, 1.0], &[-1.0, 0.2], &[0.5, 3.0], (0.0, 1.0), (0.0, 1.0));
        assert_eq!(outline, vec![(0.0, 0.5), (1.0, 1.0), (1.0, 0.2), (0.0, 0.0)]);
    }

    #[test]
    fn auto_ticks_use_round_steps() {
        assert_eq!(auto_ticks(0.0, 10.0), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(auto_ticks(-0.3, 3.3), vec![0.0, 1.0, 2.0, 3.0]);
        assert!(auto_ticks(1.0, 1.0).is_empty());
    }

    #[test]
    fn visible_ticks_keep_their_label_index() {
        let ticks = [-1.0, 0.0, 8.0, 16.0, 24.0, 30.0];
        assert_eq!(
            visible_ticks(&ticks, (-0.5, 25.0)),
            vec![(1, 0.0), (2, 8.0), (3, 16.0), (4, 24.0)]
        );
        assert!(visible_ticks(&[f64::NAN], (0.0, 1.0)).is_empty());
    }

    #[test]
    fn stroke_widths_convert_points_to_pixels() {
        assert_eq!(shape(MEAN_STROKE).stroke_width, 7);
        assert_eq!(shape(Stroke::new(Rgba::BLACK, 0.0)).stroke_width, 0);
    }

    #[test]
    fn renders_text_and_shapes_to_svg() {
        let mut figure = Figure::new(1, 1, (400, 300));
        {
            let ax = figure.axes_mut(0, 0).unwrap();
            ax.plot(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.5], MEAN_STROKE);
            ax.fill_between(&[0.0, 1.0, 2.0], &[-0.1, 0.9, 0.4], &[0.1, 1.1, 0.6], BAND_FILL);
            ax.style.title = Some("D-Fructose".to_string());
            ax.style.panel_letter = Some("C".to_string());
        }

        let svg = render_svg_string(&figure).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("D-Fructose"));
        assert!(has_text(&svg, "C"));
        assert!(svg.contains("<polygon"));
        assert!(svg.contains("<polyline"));
    }

    #[test]
    fn save_svg_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("figures/out.svg");
        let figure = Figure::new(2, 1, (300, 600)).with_shared_x();

        save_svg(&figure, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("</svg>"));
    }

    #[test]
    fn fixed_tick_labels_are_rendered() {
        let mut figure = Figure::new(2, 1, (500, 900)).with_shared_x();
        let panels = [PanelSpec {
            title: "L-Threonine".to_string(),
            criteria: Criteria::new(),
        }];
        style_figure(&mut figure, &panels);

        let svg = render_svg_string(&figure).unwrap();
        for label in ["0.0", "1.0", "2.0", "3.0", "0", "8", "16", "24", "-0.4", "0.8"] {
            assert!(has_text(&svg, label), "missing tick label {label}");
        }
        assert!(has_text(&svg, "Time (hours)"));
    }

    #[test]
    fn hidden_tick_labels_are_not_rendered() {
        let mut figure = Figure::new(1, 1, (300, 300));
        {
            let ax = figure.axes_mut(0, 0).unwrap();
            ax.style.xlim = Some((0.0, 1.0));
            ax.style.ylim = Some((0.0, 1.0));
            ax.style.xticks = Some(vec![0.25, 0.75]);
            ax.style.yticks = Some(vec![0.5]);
            ax.style.xtick_labels = TickLabels::Hidden;
            ax.style.ytick_labels = TickLabels::Fixed(vec!["half".to_string()]);
        }

        let svg = render_svg_string(&figure).unwrap();
        assert!(has_text(&svg, "half"));
        assert!(!has_text(&svg, "0.25"));
        assert!(!has_text(&svg, "0.75"));
    }
}
