//! Export the drawn latent curves to TSV.
//!
//! One row per panel, derivative order and time point, so the exact numbers
//! behind each line and band can be checked or replotted elsewhere.

use std::fs::{File, create_dir_all};
use std::path::Path;

use serde::Serialize;

use crate::domain::{LatentCurve, LatentOrder};
use crate::error::AppError;
use crate::plot::ComposedPanel;

#[derive(Debug, Serialize)]
struct CurveRow<'a> {
    panel: &'a str,
    order: u8,
    time: f64,
    mean: f64,
    lower: f64,
    upper: f64,
}

/// Write every panel's latent curves to a tab-separated file.
pub fn write_curves_tsv(path: &Path, panels: &[ComposedPanel]) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)
            .map_err(|e| AppError::output(format!("Failed to create '{}': {e}", parent.display())))?;
    }

    let file = File::create(path)
        .map_err(|e| AppError::output(format!("Failed to create export TSV '{}': {e}", path.display())))?;
    let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_writer(file);

    for panel in panels {
        write_curve(&mut writer, &panel.title, LatentOrder::Value, &panel.report.value)?;
        write_curve(&mut writer, &panel.title, LatentOrder::Rate, &panel.report.rate)?;
    }

    writer
        .flush()
        .map_err(|e| AppError::output(format!("Failed to flush export TSV: {e}")))?;
    Ok(())
}

fn write_curve<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    panel: &str,
    order: LatentOrder,
    curve: &LatentCurve,
) -> Result<(), AppError> {
    for i in 0..curve.len() {
        writer
            .serialize(CurveRow {
                panel,
                order: order.order(),
                time: curve.time[i],
                mean: curve.mean[i],
                lower: curve.lower[i],
                upper: curve.upper[i],
            })
            .map_err(|e| AppError::output(format!("Failed to write export TSV row: {e}")))?;
    }
    Ok(())
}
