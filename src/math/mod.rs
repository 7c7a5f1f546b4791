//! Numerical utilities: normal confidence intervals and latent curve extraction.

pub mod confidence;
pub mod latent;

pub use confidence::*;
pub use latent::*;
