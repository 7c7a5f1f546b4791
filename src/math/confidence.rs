//! Two-sided normal confidence intervals.
//!
//! A GP posterior is Gaussian at every time point, so the band around the
//! mean is `mean ± z * sqrt(variance)` with
//!
//! ```text
//! z = Φ⁻¹(1 - α/2),   α = 1 - confidence
//! ```
//!
//! At the default 95% level `z ≈ 1.959963984540054`.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::AppError;

/// Confidence level used for every band in the figure.
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Two-sided standard-normal critical value for `confidence` in `(0, 1)`.
pub fn z_score(confidence: f64) -> Result<f64, AppError> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(AppError::input(format!(
            "Confidence level must be in (0, 1), got {confidence}."
        )));
    }

    let alpha = 1.0 - confidence;
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::input(format!("Standard normal distribution error: {e}")))?;
    Ok(normal.inverse_cdf(1.0 - alpha / 2.0))
}

/// Lower and upper bounds `mean ∓ z·sqrt(variance)`.
pub fn symmetric_bounds(mean: &[f64], variance: &[f64], z: f64) -> (Vec<f64>, Vec<f64>) {
    mean.iter()
        .zip(variance)
        .map(|(&m, &v)| {
            let half = z * v.sqrt();
            (m - half, m + half)
        })
        .unzip()
}
