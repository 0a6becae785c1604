//! Batch input and order output formats used by the CLI.

pub mod csv;
pub mod json;
