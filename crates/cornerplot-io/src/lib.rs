//! cornerplot-io - Sample table I/O
//!
//! Reads posterior samples stored as delimited text, one sample per row and
//! one parameter per column:
//!
//! - **CSV**: comma-separated values with a header row
//! - **TSV**: tab-separated values with a header row
//!
//! Lines starting with `#` are treated as comments.
//!
//! # Design
//!
//! All readers implement the `DataReader` trait and produce a `SampleTable`
//! whose column names become axis labels.

pub mod reader;
pub mod table;

#[cfg(feature = "csv")]
pub mod csv_reader;

pub use reader::*;
pub use table::*;
