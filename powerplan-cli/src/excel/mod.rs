//! Spreadsheet import/export for catalog extracts and power plan assignments

mod error;
mod reader;
mod writer;

pub use reader::read_catalog_rows;
pub use writer::{OutputFormat, WriteOptions, write_assignments};
