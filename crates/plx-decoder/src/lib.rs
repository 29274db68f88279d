#![warn(clippy::pedantic)]

pub mod decoder;
pub mod error;
pub mod index;
pub mod sink;
pub mod stream;

pub use decoder::{DecodedExport, ExportDecoder, LocatedRecord};
pub use error::DecodeError;
pub use index::{RecordIndex, RecordSpan, decode_span};
pub use sink::{DecodeSink, NullSink, TracingSink};
pub use stream::{DecodeSummary, Progress, RecordEvent, RecordStream, StopReason};
