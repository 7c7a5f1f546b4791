//! `growth-curves` library crate.
//!
//! The binary (`growth-fig`) is a thin wrapper around this library so that:
//!
//! - table shaping and the confidence-band math are testable without files
//! - drawing targets explicit `Axes` values that tests can inspect
//! - the figure layout can be reused for other substrate panels

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
