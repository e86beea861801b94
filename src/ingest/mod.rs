//! Input readers.
//!
//! Submodules:
//! - `table`: date-indexed CSV tables and plain numeric samples.

pub mod table;

pub use table::{load_sample, load_table, parse_sample, parse_table};
