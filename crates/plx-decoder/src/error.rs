use plx_types::TypeError;
use plx_wire::{RecordFlag, WireError};

/// Errors raised while walking an export buffer.
///
/// Every variant is scoped to a single record and carries the absolute
/// offset of that record's first byte. Two of them also end the stream,
/// because once a header cannot be trusted there is no reliable offset
/// for the next record:
///
/// ```text
/// ┌──────────────────┬───────────────┬──────────────────────────────────────────┐
/// │ Variant          │ Stream        │ Cause                                    │
/// ├──────────────────┼───────────────┼──────────────────────────────────────────┤
/// │ HeaderTruncated  │ ends          │ fewer than 5 bytes left at the cursor    │
/// │ RecordOverrun    │ ends          │ declared length runs past the buffer     │
/// │ FieldExtraction  │ continues     │ layout-derived field past the buffer     │
/// │ Type             │ continues     │ field bytes of the wrong width           │
/// └──────────────────┴───────────────┴──────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Not enough bytes left to read the header and name-length byte.
    #[error("truncated record header at offset {offset}: {remaining} bytes remain, need 5")]
    HeaderTruncated { offset: usize, remaining: usize },

    /// The header's length field claims more bytes than the buffer holds.
    #[error("record at offset {offset} declares {declared} bytes but only {available} remain")]
    RecordOverrun {
        offset: usize,
        declared: usize,
        available: usize,
    },

    /// The header was readable but a field range derived from it is not.
    #[error("cannot extract {flag} record at offset {offset}: {source}")]
    FieldExtraction {
        offset: usize,
        flag: RecordFlag,
        #[source]
        source: WireError,
    },

    /// Field bytes were sliced but could not be typed.
    #[error("invalid field in record at offset {offset}: {source}")]
    Type {
        offset: usize,
        #[source]
        source: TypeError,
    },
}

impl DecodeError {
    /// Absolute offset of the record the error belongs to.
    pub fn offset(&self) -> usize {
        match self {
            Self::HeaderTruncated { offset, .. }
            | Self::RecordOverrun { offset, .. }
            | Self::FieldExtraction { offset, .. }
            | Self::Type { offset, .. } => *offset,
        }
    }

    /// Whether the stream stops after this error.
    pub fn ends_stream(&self) -> bool {
        matches!(
            self,
            Self::HeaderTruncated { .. } | Self::RecordOverrun { .. }
        )
    }
}
