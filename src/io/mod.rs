//! Input/output helpers.
//!
//! - TSV ingest + raw-data assembly (`ingest`)
//! - latent curve export (`export`)
//! - SVG figure output lives with the renderer in `plot::svg`

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
