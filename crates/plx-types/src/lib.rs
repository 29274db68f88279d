#![warn(clippy::pedantic)]

pub mod error;
pub mod price;
pub mod record;
pub mod text;

pub use error::TypeError;
pub use price::Price;
pub use record::{DecodedRecord, UnmatchedFlag};
