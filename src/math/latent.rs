//! Latent growth function extraction from GP prediction tables.
//!
//! The prediction table carries, per time point, the posterior mean and
//! variance of the growth function (`mu`, `Sigma`), of its first derivative
//! (`mu1`, `Sigma1`), and the estimated measurement noise (`Noise`). Columns
//! are read by name; a table missing one surfaces as an input error when the
//! column is first needed.

use crate::data::Table;
use crate::domain::{LatentCurve, LatentOrder, NOISE_COLUMN, TIME_COLUMN};
use crate::error::AppError;
use crate::math::confidence::{DEFAULT_CONFIDENCE, symmetric_bounds, z_score};

/// Time, mean and 95% bounds for the requested derivative order.
///
/// `table` is expected to be filtered to one condition and sorted by time.
/// With `add_noise`, the `Noise` variance is added to the order-0 variance
/// before the bounds are computed; it is ignored for order 1.
pub fn latent_function(table: &Table, order: LatentOrder, add_noise: bool) -> Result<LatentCurve, AppError> {
    latent_function_at(table, order, add_noise, DEFAULT_CONFIDENCE)
}

/// Same as [`latent_function`] at an explicit confidence level.
pub fn latent_function_at(
    table: &Table,
    order: LatentOrder,
    add_noise: bool,
    confidence: f64,
) -> Result<LatentCurve, AppError> {
    let time = table.column_f64(TIME_COLUMN)?;
    let mean = table.column_f64(order.mean_column())?;
    let mut variance = table.column_f64(order.variance_column())?;

    if add_noise && order == LatentOrder::Value {
        let noise = table.column_f64(NOISE_COLUMN)?;
        for (v, n) in variance.iter_mut().zip(noise) {
            *v += n;
        }
    }

    let z = z_score(confidence)?;
    let (lower, upper) = symmetric_bounds(&mean, &variance, z);

    Ok(LatentCurve {
        time,
        mean,
        lower,
        upper,
    })
}
