use plx_types::DecodedRecord;
use plx_wire::RecordFlag;

use crate::error::DecodeError;
use crate::sink::{DecodeSink, NullSink};
use crate::stream::{DecodeSummary, RecordEvent, RecordStream};

/// A decoded record together with where it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocatedRecord {
    pub offset: usize,
    pub flag: RecordFlag,
    pub record: DecodedRecord,
}

/// Everything one pass over an export produced.
///
/// ```text
/// ┌──────────────────────────────────────────────────────────┐
/// │ DecodedExport                                            │
/// │   records:  Vec<LocatedRecord> ← known layouts, in order │
/// │   failures: Vec<DecodeError>   ← record-level errors     │
/// │   summary:  DecodeSummary      ← counters, unmatched set │
/// └──────────────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodedExport {
    pub records: Vec<LocatedRecord>,
    pub failures: Vec<DecodeError>,
    pub summary: DecodeSummary,
}

/// Decodes a whole in-memory export in one call.
///
/// This drives a [`RecordStream`] to the end and collects its output. Use
/// the stream directly to process records one at a time.
///
/// # Example
///
/// ```rust
/// use plx_decoder::ExportDecoder;
///
/// let buf = [
///     0x0C, 0x00, 0x01, 0xB0, 0x02, b'N', b'M',
///     0x88, 0x13, 0x00, 0x00, b'O', b'K', 0x00,
/// ];
/// let decoded = ExportDecoder::decode(&buf);
/// assert_eq!(decoded.records.len(), 1);
/// assert!(decoded.failures.is_empty());
/// assert!(decoded.summary.unmatched_flags.is_empty());
/// ```
pub struct ExportDecoder;

impl ExportDecoder {
    pub fn decode(buf: &[u8]) -> DecodedExport {
        Self::decode_with_sink(buf, NullSink)
    }

    /// Decode `buf`, reporting every event to `sink`.
    pub fn decode_with_sink<S: DecodeSink>(buf: &[u8], sink: S) -> DecodedExport {
        let mut stream = RecordStream::with_sink(buf, sink);
        let mut records = Vec::new();
        let mut failures = Vec::new();

        for item in stream.by_ref() {
            match item {
                Ok(RecordEvent::Decoded {
                    offset,
                    flag,
                    record,
                }) => records.push(LocatedRecord {
                    offset,
                    flag,
                    record,
                }),
                Ok(RecordEvent::Unmatched { .. }) => {}
                Err(e) => failures.push(e),
            }
        }

        DecodedExport {
            records,
            failures,
            summary: stream.finish(),
        }
    }
}
