#![warn(clippy::pedantic)]

pub mod error;
pub mod header;
pub mod layout;

pub use error::WireError;
pub use header::{RecordFlag, RecordHeader};
pub use layout::{FieldLayout, LayoutClass, RawFields};
