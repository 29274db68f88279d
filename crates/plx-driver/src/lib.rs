#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod render_delimited;
pub mod report;

pub use config::{MissingPrice, WriterConfig};
pub use error::DriverError;
pub use render_delimited::{DelimitedWriter, FIELD_NAMES, WriteStats, render_records};
pub use report::render_unmatched;
