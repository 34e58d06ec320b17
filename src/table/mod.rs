//! Flat tables built from nested JSON records
//!
//! Records are flattened into dotted field paths, accumulated per table and
//! finally turned into column-ordered output tables.

pub mod types;
pub mod flatten;
pub mod writer;

pub use types::{Record, RecordSet, Table};
pub use flatten::{flatten_record, PATH_SEPARATOR};
pub use writer::{OutputFormat, TableWriter};
