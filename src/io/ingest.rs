//! TSV ingest and raw-data assembly.
//!
//! Every input shares one convention: tab-separated, a header row, and the
//! first column used as the row index. This module turns those files into
//! `Table`s and stitches the per-plate raw files into one `RawMeasurements`.
//!
//! Design goals:
//! - **No implicit schema**: prediction columns are read by name later, when
//!   the latent function needs them
//! - **Clear errors** with the offending path (exit code 2)
//! - **Separation of concerns**: no filtering or plotting here

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::data::{RawMeasurements, Table};
use crate::domain::{FigureConfig, ModelChoice, TIME_COLUMN};
use crate::error::AppError;

/// Everything the figure is drawn from.
#[derive(Debug, Clone)]
pub struct GrowthData {
    /// Per-well GP predictions.
    pub split: Table,
    /// GP predictions with replicates pooled by isolate.
    pub pooled: Table,
    /// Per-well OD traces of every plate, labelled by well id.
    pub raw: RawMeasurements,
    /// Per-well annotations of every plate, stacked in plate order.
    pub summary: Table,
}

impl GrowthData {
    pub fn predictions(&self, model: ModelChoice) -> &Table {
        match model {
            ModelChoice::Pooled => &self.pooled,
            ModelChoice::Split => &self.split,
        }
    }
}

/// Load the prediction, raw and summary tables named by `config`.
pub fn load_growth_data(config: &FigureConfig) -> Result<GrowthData, AppError> {
    if config.plates.is_empty() {
        return Err(AppError::input("At least one plate is required."));
    }

    let split = read_table(&config.split_predictions_path())?;
    let pooled = read_table(&config.pooled_predictions_path())?;

    let mut raw_tables = Vec::with_capacity(config.plates.len());
    let mut summary: Option<Table> = None;
    for plate in &config.plates {
        raw_tables.push(read_table(&config.raw_path(plate))?);

        let plate_summary = read_table(&config.summary_path(plate))?;
        match summary.as_mut() {
            Some(stacked) => stacked.append_rows(&plate_summary).map_err(|e| {
                AppError::input(format!("Summary table for plate `{plate}` does not line up: {e}"))
            })?,
            None => summary = Some(plate_summary),
        }
    }
    let summary = summary.ok_or_else(|| AppError::input("No summary tables were read."))?;

    let raw = assemble_raw(&raw_tables, &summary)?;
    log::debug!(
        "assembled raw data: {} time points x {} wells",
        raw.n_times(),
        raw.wells().len()
    );

    Ok(GrowthData {
        split,
        pooled,
        raw,
        summary,
    })
}

/// Read one tab-separated file with a header row and an index column.
pub fn read_table(path: &Path) -> Result<Table, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open '{}': {e}", path.display())))?;
    let table = parse_table(file)
        .map_err(|e| AppError::input(format!("Failed to read '{}': {e}", path.display())))?;

    log::debug!(
        "read '{}': {} rows x {} columns",
        path.display(),
        table.n_rows(),
        table.n_cols()
    );
    Ok(table)
}

/// Parse TSV text from any reader.
pub fn parse_table<R: Read>(reader: R) -> Result<Table, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read headers: {e}")))?
        .clone();

    let mut names = headers.iter().map(normalize_header_name);
    let index_name = names
        .next()
        .ok_or_else(|| AppError::input("Empty header row."))?;
    let columns: Vec<String> = names.collect();

    let mut index = Vec::new();
    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header, lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::input(format!("Line {line}: TSV parse error: {e}")))?;
        if record.iter().all(str::is_empty) {
            continue;
        }

        let mut fields = record.iter().map(str::to_string);
        index.push(fields.next().unwrap_or_default());
        rows.push(fields.collect());
    }

    Table::new(index_name, columns, index, rows)
}

/// Stitch per-plate raw tables into labelled per-well traces.
///
/// Plates are placed side by side (rows aligned by position). The first
/// plate's `Time` column becomes the time axis, every `Time` column is then
/// dropped, and the remaining columns are labelled in order with the well
/// ids of the stacked `summary` table.
pub fn assemble_raw(plates: &[Table], summary: &Table) -> Result<RawMeasurements, AppError> {
    let first = plates
        .first()
        .ok_or_else(|| AppError::input("No raw tables to assemble."))?;

    let n_times = first.n_rows();
    if let Some(other) = plates.iter().find(|t| t.n_rows() != n_times) {
        return Err(AppError::input(format!(
            "Raw tables disagree on the number of time points ({n_times} vs {}).",
            other.n_rows()
        )));
    }

    if first.n_cols() == 0 {
        return Err(AppError::input("Raw table has no columns."));
    }
    let time_s = first.column_f64_at(0)?;

    let mut od = Vec::new();
    for plate in plates {
        for (col, name) in plate.columns().iter().enumerate() {
            if name == TIME_COLUMN {
                continue;
            }
            od.push(plate.column_f64_at(col)?);
        }
    }

    let wells = summary.index().to_vec();
    if wells.len() != od.len() {
        return Err(AppError::input(format!(
            "Raw tables hold {} well columns but the summary tables list {} wells.",
            od.len(),
            wells.len()
        )));
    }

    RawMeasurements::new(time_s, wells, od)
}

fn normalize_header_name(name: &str) -> String {
    // UTF-8 exports sometimes carry a BOM on the first header; without
    // stripping it the index name would never match.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLATE_1: &str = "\tTime\tA1\tA2\n0\t0\t0.10\t0.20\n1\t600\t0.11\t0.21\n2\t1200\t0.13\t0.25\n";
    const PLATE_2: &str = "\tTime\tA1\n0\t0\t0.30\n1\t600\t0.31\n2\t1200\t0.35\n";
    const SUMMARY_1: &str = "Well\tSubstrate\tIsolate\tPM\nP1_A1\tL-Threonine\tCD2015\t1\nP1_A2\tD-Sorbitol\tCD2015\t1\n";
    const SUMMARY_2: &str = "Well\tSubstrate\tIsolate\tPM\nP2_A1\tL-Threonine\tCD2015\t1\n";

    #[test]
    fn parse_table_uses_first_column_as_index() {
        let table = parse_table(SUMMARY_1.as_bytes()).unwrap();
        assert_eq!(table.index_name(), "Well");
        assert_eq!(table.columns(), ["Substrate", "Isolate", "PM"].map(String::from).as_slice());
        assert_eq!(table.index(), ["P1_A1", "P1_A2"].map(String::from).as_slice());
        assert_eq!(table.column_str("Substrate").unwrap(), vec!["L-Threonine", "D-Sorbitol"]);
    }

    #[test]
    fn parse_table_strips_bom_and_blank_lines() {
        let text = "\u{feff}Well\tPM\nA1\t1\n\nA2\t2\n";
        let table = parse_table(text.as_bytes()).unwrap();
        assert_eq!(table.index_name(), "Well");
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.column_f64("PM").unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn assemble_raw_relabels_columns_with_summary_wells() {
        let plates = [
            parse_table(PLATE_1.as_bytes()).unwrap(),
            parse_table(PLATE_2.as_bytes()).unwrap(),
        ];
        let mut summary = parse_table(SUMMARY_1.as_bytes()).unwrap();
        summary.append_rows(&parse_table(SUMMARY_2.as_bytes()).unwrap()).unwrap();

        let raw = assemble_raw(&plates, &summary).unwrap();
        assert_eq!(raw.time_s(), &[0.0, 600.0, 1200.0]);
        assert_eq!(raw.wells(), ["P1_A1", "P1_A2", "P2_A1"].map(String::from).as_slice());
        assert_eq!(raw.trace_at(2), Some([0.30, 0.31, 0.35].as_slice()));
    }

    #[test]
    fn assemble_raw_rejects_well_count_mismatch() {
        let plates = [parse_table(PLATE_1.as_bytes()).unwrap()];
        let summary = parse_table(SUMMARY_2.as_bytes()).unwrap();
        let err = assemble_raw(&plates, &summary).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn assemble_raw_rejects_misaligned_plates() {
        let short = "\tTime\tA1\n0\t0\t0.30\n";
        let plates = [
            parse_table(PLATE_1.as_bytes()).unwrap(),
            parse_table(short.as_bytes()).unwrap(),
        ];
        let summary = parse_table(SUMMARY_1.as_bytes()).unwrap();
        assert!(assemble_raw(&plates, &summary).is_err());
    }

    #[test]
    fn read_table_reports_missing_file() {
        let err = read_table(Path::new("/definitely/not/here.tsv")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("not/here.tsv"));
    }
}
