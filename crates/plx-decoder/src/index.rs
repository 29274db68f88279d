use plx_wire::{LayoutClass, RecordHeader};

use crate::error::DecodeError;
use crate::stream::{RecordEvent, decode_record};

/// Location of one record inside an export buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordSpan {
    pub offset: usize,
    pub header: RecordHeader,
}

impl RecordSpan {
    /// Bytes the record occupies, header included.
    pub fn size(&self) -> usize {
        self.header.record_size()
    }

    pub fn class(&self) -> LayoutClass {
        LayoutClass::classify(self.header.flag)
    }
}

/// Record boundaries found by a header-only pass.
///
/// Boundaries are only discoverable by reading headers in order, so this
/// scan has to be sequential. It touches five bytes per record and no
/// fields; once it is done, spans can be split across workers and decoded
/// independently with [`decode_span`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordIndex {
    pub spans: Vec<RecordSpan>,
    /// The error that ended the scan early, if any.
    pub tail: Option<DecodeError>,
}

impl RecordIndex {
    pub fn scan(buf: &[u8]) -> Self {
        let mut index = Self::default();
        let mut offset = 0;

        while offset < buf.len() {
            let remaining = &buf[offset..];
            let Ok(header) = RecordHeader::read_from(remaining) else {
                index.tail = Some(DecodeError::HeaderTruncated {
                    offset,
                    remaining: remaining.len(),
                });
                break;
            };

            let size = header.record_size();
            if size > remaining.len() {
                index.tail = Some(DecodeError::RecordOverrun {
                    offset,
                    declared: size,
                    available: remaining.len(),
                });
                break;
            }

            index.spans.push(RecordSpan { offset, header });
            offset += size;
        }

        index
    }

    /// Split the spans into at most `parts` contiguous groups of similar
    /// size. Returns no groups when `parts` is zero or there are no spans.
    pub fn partition(&self, parts: usize) -> Vec<&[RecordSpan]> {
        if parts == 0 || self.spans.is_empty() {
            return Vec::new();
        }
        let per_part = self.spans.len().div_ceil(parts);
        self.spans.chunks(per_part).collect()
    }

    /// Bytes covered by the indexed spans.
    pub fn bytes_indexed(&self) -> usize {
        self.spans.last().map_or(0, |s| s.offset + s.size())
    }
}

/// Decode one indexed record.
///
/// # Errors
///
/// Returns [`DecodeError::FieldExtraction`] or [`DecodeError::Type`] when
/// the record's fields cannot be read.
pub fn decode_span(buf: &[u8], span: &RecordSpan) -> Result<RecordEvent, DecodeError> {
    decode_record(buf, span.offset, &span.header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::RecordStream;

    fn sample() -> Vec<u8> {
        let one = [0x0C, 0x00, 0x01, 0xB0, 0x02, b'N', b'M', 0x88, 0x13, 0x00, 0x00, b'O', b'K', 0x00];
        let unknown = [0x04, 0x00, 0x99, 0x00, 0x00, 0x00];
        let mut buf = Vec::new();
        for _ in 0..3 {
            buf.extend_from_slice(&one);
            buf.extend_from_slice(&unknown);
        }
        buf
    }

    #[test]
    fn scan_finds_every_boundary() {
        let buf = sample();
        let index = RecordIndex::scan(&buf);
        let offsets: Vec<_> = index.spans.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0, 14, 20, 34, 40, 54]);
        assert_eq!(index.bytes_indexed(), buf.len());
        assert!(index.tail.is_none());
        assert_eq!(index.spans[1].class(), LayoutClass::Unmatched);
    }

    #[test]
    fn scan_records_tail_error() {
        let mut buf = sample();
        buf.extend_from_slice(&[0xFF, 0x00, 0x01, 0xB0, 0x00]);
        let index = RecordIndex::scan(&buf);
        assert_eq!(index.spans.len(), 6);
        assert!(matches!(
            index.tail,
            Some(DecodeError::RecordOverrun { offset: 60, declared: 257, available: 5 })
        ));
    }

    #[test]
    fn partitioned_decode_matches_sequential() {
        let buf = sample();
        let index = RecordIndex::scan(&buf);

        let groups = index.partition(4);
        assert_eq!(groups.len(), 3);

        let partitioned: Vec<_> = groups
            .iter()
            .flat_map(|group| group.iter().map(|span| decode_span(&buf, span).unwrap()))
            .collect();
        let sequential: Vec<_> = RecordStream::new(&buf).map(Result::unwrap).collect();
        assert_eq!(partitioned, sequential);
    }

    #[test]
    fn partition_edge_cases() {
        let index = RecordIndex::scan(&[]);
        assert!(index.partition(3).is_empty());
        let buf = sample();
        assert!(RecordIndex::scan(&buf).partition(0).is_empty());
        assert_eq!(RecordIndex::scan(&buf).partition(1).len(), 1);
    }
}
