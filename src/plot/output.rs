//! Figure files.
//!
//! The figure is always drawn to SVG first. A `.pdf` output converts that
//! document with `svg2pdf` (parsed by `usvg`, text laid out with the system
//! fonts); a `.svg` output writes it as is.

use std::fs::{create_dir_all, write};
use std::path::Path;

use svg2pdf::usvg;

use crate::error::AppError;
use crate::plot::surface::Figure;
use crate::plot::svg::{PX_PER_INCH, render_svg_string, save_svg};

/// File format picked from the output extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureFormat {
    Pdf,
    Svg,
}

impl FigureFormat {
    /// `.pdf` or `.svg` (case-insensitive); anything else is an input error.
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("pdf") => Ok(Self::Pdf),
            Some("svg") => Ok(Self::Svg),
            _ => Err(AppError::input(format!(
                "Unsupported figure format for '{}': use a .pdf or .svg file name.",
                path.display()
            ))),
        }
    }
}

/// Write `figure` in the format named by the extension of `path`.
pub fn save_figure(figure: &Figure, path: &Path) -> Result<FigureFormat, AppError> {
    let format = FigureFormat::from_path(path)?;
    match format {
        FigureFormat::Pdf => save_pdf(figure, path)?,
        FigureFormat::Svg => save_svg(figure, path)?,
    }
    Ok(format)
}

/// Render `figure` to a PDF file, creating parent directories as needed.
pub fn save_pdf(figure: &Figure, path: &Path) -> Result<(), AppError> {
    let pdf = render_pdf(figure)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)
            .map_err(|e| AppError::output(format!("Failed to create '{}': {e}", parent.display())))?;
    }
    write(path, pdf).map_err(|e| AppError::output(format!("Failed to write figure '{}': {e}", path.display())))
}

/// Render `figure` to PDF bytes; one page the size of the canvas.
pub fn render_pdf(figure: &Figure) -> Result<Vec<u8>, AppError> {
    let svg = render_svg_string(figure)?;

    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(&svg, &options)
        .map_err(|e| AppError::output(format!("Failed to parse rendered SVG: {e}")))?;

    let mut page = svg2pdf::PageOptions::default();
    page.dpi = PX_PER_INCH as f32;
    svg2pdf::to_pdf(&tree, svg2pdf::ConversionOptions::default(), page)
        .map_err(|e| AppError::output(format!("Failed to convert figure to PDF: {e}")))
}
