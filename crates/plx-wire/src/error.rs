/// Byte-level failures while reading a record out of an export buffer.
///
/// Both variants carry offsets relative to the slice handed to the reader,
/// so callers add the record's absolute offset when reporting.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// Fewer bytes were available than the fixed-size read needed.
    #[error("unexpected end of input at offset {offset}: needed {needed} bytes")]
    UnexpectedEof { offset: usize, needed: usize },

    /// A field's byte range derived from the layout runs past the end of
    /// the buffer.
    #[error("{field} field ends at byte {end} but only {available} bytes are available")]
    FieldOutOfBounds {
        field: &'static str,
        end: usize,
        available: usize,
    },
}

// {flag:#06X} in callers renders e.g. 0xF001: the # adds the 0x prefix and
// the width of 6 counts that prefix, so every u16 prints as four digits.
