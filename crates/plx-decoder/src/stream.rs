use std::collections::BTreeSet;
use std::fmt;
use std::iter::FusedIterator;

use plx_types::{DecodedRecord, UnmatchedFlag};
use plx_wire::{FieldLayout, LayoutClass, RecordFlag, RecordHeader};
use serde::Serialize;

use crate::error::DecodeError;
use crate::sink::{DecodeSink, NullSink};

/// One classified record, as yielded by [`RecordStream`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordEvent {
    /// A record with a known layout was decoded.
    Decoded {
        offset: usize,
        flag: RecordFlag,
        record: DecodedRecord,
    },

    /// The record's flag has no known layout; it was skipped.
    Unmatched { offset: usize, flag: UnmatchedFlag },
}

impl RecordEvent {
    pub fn offset(&self) -> usize {
        match self {
            Self::Decoded { offset, .. } | Self::Unmatched { offset, .. } => *offset,
        }
    }

    /// Collapse the event into the decoded record or the unmatched flag.
    ///
    /// # Errors
    ///
    /// Returns the [`UnmatchedFlag`] for records without a known layout.
    pub fn into_result(self) -> Result<DecodedRecord, UnmatchedFlag> {
        match self {
            Self::Decoded { record, .. } => Ok(record),
            Self::Unmatched { flag, .. } => Err(flag),
        }
    }
}

/// Why a stream stopped producing events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The cursor reached the end of the buffer.
    #[default]
    EndOfBuffer,
    /// Fewer than five bytes were left for the next header.
    HeaderTruncated,
    /// A header declared a length running past the buffer end.
    RecordOverrun,
    /// The caller's stop predicate ended the run.
    StoppedByCaller,
}

impl StopReason {
    /// Short snake_case label, the same spelling the JSON summary uses.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::EndOfBuffer => "end_of_buffer",
            Self::HeaderTruncated => "header_truncated",
            Self::RecordOverrun => "record_overrun",
            Self::StoppedByCaller => "stopped_by_caller",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Counters for one decoding pass.
///
/// `bytes_consumed` is where the cursor ended up. On a clean run it equals
/// `total_bytes`; when a bad header stops the stream it is the offset of
/// that header, i.e. how far decoding got.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DecodeSummary {
    pub records_decoded: usize,
    pub records_unmatched: usize,
    pub records_failed: usize,
    pub unmatched_flags: BTreeSet<UnmatchedFlag>,
    pub bytes_consumed: usize,
    pub total_bytes: usize,
    pub stop: StopReason,
}

impl DecodeSummary {
    /// Records visited, whatever their outcome.
    pub fn records_seen(&self) -> usize {
        self.records_decoded + self.records_unmatched + self.records_failed
    }
}

/// Position handed to a stop predicate before each record is read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub offset: usize,
    pub records_seen: usize,
}

type StopPredicate<'a> = Box<dyn FnMut(&Progress) -> bool + 'a>;

/// Lazy, forward-only decoder over an in-memory export.
///
/// Each call to [`next`](Iterator::next) reads one record at the cursor,
/// classifies it by flag, extracts its fields and advances the cursor by
/// `length + 2`. The advance happens for unmatched and failed records too,
/// so the walk stays aligned as long as headers are readable.
///
/// ```text
///   cursor ──▶ read 5-byte preamble ──▶ length fits? ──▶ classify flag
///                    │ no                  │ no             │
///              HeaderTruncated       RecordOverrun    known ─┴─ unknown
///               (stream ends)        (stream ends)      │          │
///                                                 extract fields   record flag
///                                                       │          │
///                                   cursor += length + 2 ◀─────────┘
/// ```
///
/// Events are also reported to the stream's [`DecodeSink`], which lives
/// exactly as long as the pass. Call [`finish`](Self::finish) to close the
/// pass and obtain the [`DecodeSummary`].
///
/// # Example
///
/// ```rust
/// use plx_decoder::RecordStream;
///
/// // length=12, flag=0xB001, name "NM", price 5000, discount "OK", 1 pad byte
/// let buf = [
///     0x0C, 0x00, 0x01, 0xB0, 0x02, b'N', b'M',
///     0x88, 0x13, 0x00, 0x00, b'O', b'K', 0x00,
/// ];
/// let mut stream = RecordStream::new(&buf);
/// let record = stream.next().unwrap().unwrap().into_result().unwrap();
/// assert_eq!(record.name, "NM");
/// assert_eq!(record.price.unwrap().to_string(), "50.00");
/// assert!(stream.next().is_none());
/// assert_eq!(stream.finish().bytes_consumed, buf.len());
/// ```
pub struct RecordStream<'a, S = NullSink> {
    buf: &'a [u8],
    cursor: usize,
    sink: S,
    stop_when: Option<StopPredicate<'a>>,
    stopped: Option<StopReason>,
    summary: DecodeSummary,
}

impl<'a> RecordStream<'a, NullSink> {
    /// Stream over `buf` without reporting.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_sink(buf, NullSink)
    }
}

impl<'a, S: DecodeSink> RecordStream<'a, S> {
    /// Stream over `buf`, reporting every event to `sink`.
    #[must_use]
    pub fn with_sink(buf: &'a [u8], sink: S) -> Self {
        Self {
            buf,
            cursor: 0,
            sink,
            stop_when: None,
            stopped: None,
            summary: DecodeSummary {
                total_bytes: buf.len(),
                ..DecodeSummary::default()
            },
        }
    }

    /// End the stream early once `predicate` returns true.
    ///
    /// The predicate runs before each record is read. A stopped stream
    /// reports [`StopReason::StoppedByCaller`].
    #[must_use]
    pub fn stop_when(mut self, predicate: impl FnMut(&Progress) -> bool + 'a) -> Self {
        self.stop_when = Some(Box::new(predicate));
        self
    }

    /// Offset of the next record to be read.
    pub fn offset(&self) -> usize {
        self.cursor
    }

    /// Flags seen so far without a known layout.
    pub fn unmatched_flags(&self) -> &BTreeSet<UnmatchedFlag> {
        &self.summary.unmatched_flags
    }

    /// Close the pass.
    ///
    /// Records not yet pulled are still decoded so that the summary and
    /// the sink cover the whole buffer; their events are dropped. The sink
    /// receives [`DecodeSink::finished`] exactly once.
    pub fn finish(mut self) -> DecodeSummary {
        while self.next().is_some() {}
        self.summary.bytes_consumed = self.cursor;
        self.summary.stop = self.stopped.unwrap_or_default();
        self.sink.finished(&self.summary);
        self.summary
    }

    fn halt(&mut self, reason: StopReason) {
        self.stopped = Some(reason);
    }

    fn fail(&mut self, error: DecodeError) -> Option<Result<RecordEvent, DecodeError>> {
        self.summary.records_failed += 1;
        self.sink.record_failed(&error);
        Some(Err(error))
    }

    fn read_next(&mut self) -> Option<Result<RecordEvent, DecodeError>> {
        let buf = self.buf;
        let offset = self.cursor;
        let remaining = &buf[offset..];

        let Ok(header) = RecordHeader::read_from(remaining) else {
            self.halt(StopReason::HeaderTruncated);
            return self.fail(DecodeError::HeaderTruncated {
                offset,
                remaining: remaining.len(),
            });
        };

        let size = header.record_size();
        if size > remaining.len() {
            self.halt(StopReason::RecordOverrun);
            return self.fail(DecodeError::RecordOverrun {
                offset,
                declared: size,
                available: remaining.len(),
            });
        }

        // From here on the next offset is known, whatever happens to the
        // fields.
        self.cursor = offset + size;

        match decode_record(buf, offset, &header) {
            Ok(event) => {
                match &event {
                    RecordEvent::Decoded { record, flag, .. } => {
                        self.summary.records_decoded += 1;
                        let raw = &remaining[..size];
                        self.sink.record_decoded(offset, *flag, raw, record);
                    }
                    RecordEvent::Unmatched { flag, .. } => {
                        self.summary.records_unmatched += 1;
                        let first_seen = self.summary.unmatched_flags.insert(*flag);
                        self.sink.flag_unmatched(offset, *flag, first_seen);
                    }
                }
                Some(Ok(event))
            }
            Err(e) => self.fail(e),
        }
    }
}

impl<S: DecodeSink> Iterator for RecordStream<'_, S> {
    type Item = Result<RecordEvent, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stopped.is_some() {
            return None;
        }

        if self.cursor >= self.buf.len() {
            self.halt(StopReason::EndOfBuffer);
            return None;
        }

        if let Some(predicate) = self.stop_when.as_mut() {
            let progress = Progress {
                offset: self.cursor,
                records_seen: self.summary.records_seen(),
            };
            if predicate(&progress) {
                self.halt(StopReason::StoppedByCaller);
                return None;
            }
        }

        self.read_next()
    }
}

impl<S: DecodeSink> FusedIterator for RecordStream<'_, S> {}

/// Classify and decode the record at `offset`, given its parsed header.
///
/// Field ranges are checked against the whole buffer rather than the
/// record's declared length, so a record whose trailing fields spill past
/// its own length still decodes when the bytes exist.
pub(crate) fn decode_record(
    buf: &[u8],
    offset: usize,
    header: &RecordHeader,
) -> Result<RecordEvent, DecodeError> {
    let flag = header.flag;
    let class = LayoutClass::classify(flag);

    let Some(layout) = FieldLayout::for_record(class, flag, header.name_len) else {
        return Ok(RecordEvent::Unmatched {
            offset,
            flag: UnmatchedFlag(flag),
        });
    };

    let fields = layout
        .extract(&buf[offset..])
        .map_err(|source| DecodeError::FieldExtraction {
            offset,
            flag,
            source,
        })?;

    let record = DecodedRecord::try_from_fields(&fields)
        .map_err(|source| DecodeError::Type { offset, source })?;

    Ok(RecordEvent::Decoded {
        offset,
        flag,
        record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use plx_wire::WireError;

    /// Build one record with the given flag and name, `price` in cents,
    /// and the discount bytes, sized so the next record follows directly.
    fn record(flag: u16, name: &[u8], price: Option<u32>, gap: bool, discount: &[u8; 2]) -> Vec<u8> {
        let mut body = vec![u8::try_from(name.len()).unwrap()];
        body.extend_from_slice(name);
        if gap {
            body.extend_from_slice(&[0; 4]);
        }
        if let Some(cents) = price {
            body.extend_from_slice(&cents.to_le_bytes());
        }
        body.extend_from_slice(discount);

        // length counts flag + body
        let length = u16::try_from(body.len() + 2).unwrap();
        let mut out = length.to_le_bytes().to_vec();
        out.extend_from_slice(&flag.to_le_bytes());
        out.extend_from_slice(&body);
        out
    }

    fn unknown(flag: u16, length: u16) -> Vec<u8> {
        let mut out = length.to_le_bytes().to_vec();
        out.extend_from_slice(&flag.to_le_bytes());
        out.resize(usize::from(length) + 2, 0);
        out
    }

    #[test]
    fn empty_buffer_yields_nothing() {
        let mut stream = RecordStream::new(&[]);
        assert!(stream.next().is_none());
        let summary = stream.finish();
        assert_eq!(summary, DecodeSummary::default());
    }

    #[test]
    fn decodes_each_layout() {
        let mut buf = record(0xF001, b"ABC", Some(12345), true, b"XY");
        buf.extend(record(0xB001, b"NM", Some(5000), false, b"OK"));
        buf.extend(record(0xB401, b"Q", Some(0), false, b" A"));
        buf.extend(record(0xA001, b"Nut", Some(7), false, b"\r\n"));

        let records: Vec<_> = RecordStream::new(&buf)
            .map(|r| r.unwrap().into_result().unwrap())
            .collect();

        let rows: Vec<_> = records
            .iter()
            .map(|r| {
                (
                    r.name.as_str(),
                    r.discount_code.as_str(),
                    r.price.unwrap().to_string(),
                )
            })
            .collect();
        assert_eq!(
            rows,
            vec![
                ("ABC", "XY", "123.45".to_string()),
                ("NM", "OK", "50.00".to_string()),
                ("Q", "A", "0.00".to_string()),
                ("Nut", "", "0.07".to_string()),
            ]
        );
    }

    #[test]
    fn unmatched_flag_is_skipped_and_collected_once() {
        let mut buf = unknown(0x1234, 6);
        buf.extend(record(0xB001, b"NM", Some(5000), false, b"OK"));
        buf.extend(unknown(0x1234, 10));
        buf.extend(unknown(0x00FF, 3));

        let mut stream = RecordStream::new(&buf);
        let events: Vec<_> = stream.by_ref().map(Result::unwrap).collect();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], RecordEvent::Unmatched { offset: 0, .. }));
        assert!(matches!(events[1], RecordEvent::Decoded { offset: 8, .. }));

        let summary = stream.finish();
        assert_eq!(summary.records_decoded, 1);
        assert_eq!(summary.records_unmatched, 3);
        assert_eq!(
            summary.unmatched_flags.into_iter().collect::<Vec<_>>(),
            vec![UnmatchedFlag::from(0x00FF), UnmatchedFlag::from(0x1234)]
        );
        assert_eq!(summary.bytes_consumed, buf.len());
    }

    #[test]
    fn truncated_header_ends_stream() {
        let mut buf = record(0xB001, b"NM", Some(5000), false, b"OK");
        let good = buf.len();
        buf.extend_from_slice(&[0x05, 0x00, 0x01]);

        let mut stream = RecordStream::new(&buf);
        assert!(stream.next().unwrap().is_ok());
        assert_eq!(
            stream.next().unwrap(),
            Err(DecodeError::HeaderTruncated {
                offset: good,
                remaining: 3
            })
        );
        assert!(stream.next().is_none());

        let summary = stream.finish();
        assert_eq!(summary.stop, StopReason::HeaderTruncated);
        assert_eq!(summary.bytes_consumed, good);
        assert_eq!(summary.records_failed, 1);
    }

    #[test]
    fn overrun_reports_how_far_it_got() {
        let mut buf = record(0xB001, b"NM", Some(5000), false, b"OK");
        let good = buf.len();
        // Claims 200 bytes; only 6 follow the length field.
        buf.extend_from_slice(&[200, 0, 0x01, 0xB0, 0x01, b'Z', 0, 0]);

        let mut stream = RecordStream::new(&buf);
        assert!(stream.next().unwrap().is_ok());
        let err = stream.next().unwrap().unwrap_err();
        assert_eq!(
            err,
            DecodeError::RecordOverrun {
                offset: good,
                declared: 202,
                available: 8
            }
        );
        assert!(err.ends_stream());

        let summary = stream.finish();
        assert_eq!(summary.stop, StopReason::RecordOverrun);
        assert_eq!(summary.bytes_consumed, good);
    }

    #[test]
    fn field_failure_skips_to_next_record() {
        // Header says 4 bytes follow the length field, but the name length
        // byte claims 250 bytes of name.
        let mut buf = vec![0x04, 0x00, 0x01, 0xB0, 250, 0x00];
        buf.extend(record(0xB001, b"NM", Some(5000), false, b"OK"));

        let mut stream = RecordStream::new(&buf);
        let err = stream.next().unwrap().unwrap_err();
        assert_eq!(
            err,
            DecodeError::FieldExtraction {
                offset: 0,
                flag: RecordFlag::B001,
                source: WireError::FieldOutOfBounds {
                    field: "name",
                    end: 255,
                    available: buf.len()
                }
            }
        );
        assert!(!err.ends_stream());

        let next = stream.next().unwrap().unwrap();
        assert_eq!(next.offset(), 6);
        assert!(stream.next().is_none());

        let summary = stream.finish();
        assert_eq!(summary.records_failed, 1);
        assert_eq!(summary.records_decoded, 1);
        assert_eq!(summary.bytes_consumed, buf.len());
    }

    #[test]
    fn fields_may_spill_past_declared_length() {
        // length=3 covers only the flag and the name-length byte plus one
        // byte; price and discount lie beyond the record but inside the
        // buffer.
        let mut buf = vec![0x03, 0x00, 0x01, 0xB0, 0x01, b'N'];
        buf.extend_from_slice(&100u32.to_le_bytes());
        buf.extend_from_slice(b"DC");

        let header = RecordHeader::read_from(&buf).unwrap();
        assert_eq!(header.record_size(), 5);

        let record = decode_record(&buf, 0, &header)
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(record.name, "N");
        assert_eq!(record.price.unwrap().cents(), 100);
        assert_eq!(record.discount_code, "DC");
    }

    #[test]
    fn stop_predicate_ends_early() {
        let mut buf = Vec::new();
        for _ in 0..5 {
            buf.extend(record(0xB001, b"NM", Some(1), false, b"OK"));
        }

        let mut stream = RecordStream::new(&buf).stop_when(|p| p.records_seen == 2);
        assert_eq!(stream.by_ref().count(), 2);
        let summary = stream.finish();
        assert_eq!(summary.stop, StopReason::StoppedByCaller);
        assert_eq!(summary.records_decoded, 2);
        assert_eq!(summary.bytes_consumed, buf.len() / 5 * 2);
    }

    #[test]
    fn finish_drains_remaining_records() {
        let mut buf = record(0xB001, b"NM", Some(1), false, b"OK");
        buf.extend(unknown(0x4242, 4));

        let summary = RecordStream::new(&buf).finish();
        assert_eq!(summary.records_decoded, 1);
        assert_eq!(summary.records_unmatched, 1);
        assert_eq!(summary.stop, StopReason::EndOfBuffer);
    }

    #[test]
    fn stop_reason_label_matches_json() {
        for stop in [
            StopReason::EndOfBuffer,
            StopReason::HeaderTruncated,
            StopReason::RecordOverrun,
            StopReason::StoppedByCaller,
        ] {
            let json = serde_json::to_value(stop).unwrap();
            assert_eq!(json.as_str(), Some(stop.label()));
            assert_eq!(stop.to_string(), stop.label());
        }
    }
}
