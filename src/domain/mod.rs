//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - prediction column names (`mu`, `Sigma`, ...)
//! - run configuration (`FigureConfig`, `ModelChoice`, `PanelSpec`)
//! - latent function outputs (`LatentOrder`, `LatentCurve`)

pub mod types;

pub use types::*;
