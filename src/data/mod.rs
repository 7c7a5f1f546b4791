//! In-memory tables and the operations that shape them.
//!
//! - `table`: header + index + string cells, parsed to numbers on demand
//! - `filter`: row selection by categorical criteria
//! - `raw`: assembled per-well OD traces and their log/baseline transform

pub mod filter;
pub mod raw;
pub mod table;

pub use filter::*;
pub use raw::*;
pub use table::*;
