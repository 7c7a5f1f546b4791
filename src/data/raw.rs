//! Raw optical-density measurements, one trace per well.
//!
//! Plate files are assembled into a single `RawMeasurements` (see
//! `io::ingest::assemble_raw`): a shared time axis in seconds and one OD
//! column per well, labelled with the well identifiers from the summary
//! tables.

use crate::error::AppError;

const SECONDS_PER_HOUR: f64 = 3600.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RawMeasurements {
    time_s: Vec<f64>,
    wells: Vec<String>,
    od: Vec<Vec<f64>>,
}

impl RawMeasurements {
    /// `od[w]` is the trace of `wells[w]` and must have one value per time point.
    pub fn new(time_s: Vec<f64>, wells: Vec<String>, od: Vec<Vec<f64>>) -> Result<Self, AppError> {
        if wells.len() != od.len() {
            return Err(AppError::input(format!(
                "{} well labels for {} OD columns.",
                wells.len(),
                od.len()
            )));
        }
        if let Some((well, trace)) = wells.iter().zip(&od).find(|(_, t)| t.len() != time_s.len()) {
            return Err(AppError::input(format!(
                "Well `{well}` has {} readings but the time axis has {}.",
                trace.len(),
                time_s.len()
            )));
        }
        Ok(Self { time_s, wells, od })
    }

    pub fn time_s(&self) -> &[f64] {
        &self.time_s
    }

    pub fn wells(&self) -> &[String] {
        &self.wells
    }

    pub fn n_times(&self) -> usize {
        self.time_s.len()
    }

    /// Trace of the well at column `pos` (the row of that well in the stacked summary).
    ///
    /// Well ids repeat across plates, so traces are addressed by position.
    pub fn trace_at(&self, pos: usize) -> Option<&[f64]> {
        self.od.get(pos).map(Vec::as_slice)
    }

    /// Growth traces for the wells at `positions`, ready to overlay on the
    /// latent function.
    ///
    /// The time-zero row is dropped, time is converted to hours, OD is
    /// log-transformed, and each trace is shifted so its first remaining
    /// point sits at zero. A position past the last well is an input error.
    pub fn log_growth_traces(&self, positions: &[usize]) -> Result<Vec<Vec<(f64, f64)>>, AppError> {
        let hours: Vec<f64> = self
            .time_s
            .iter()
            .skip(1)
            .map(|t| t / SECONDS_PER_HOUR)
            .collect();

        positions
            .iter()
            .map(|&pos| {
                let trace = self.trace_at(pos).ok_or_else(|| {
                    AppError::input(format!(
                        "Well position {pos} has no raw measurements ({} wells loaded).",
                        self.wells.len()
                    ))
                })?;

                let logs: Vec<f64> = trace.iter().skip(1).map(|od| od.ln()).collect();
                let baseline = logs.first().copied().unwrap_or(0.0);

                Ok(hours
                    .iter()
                    .zip(&logs)
                    .map(|(&t, &y)| (t, y - baseline))
                    .collect())
            })
            .collect()
    }
}
