/// Errors raised while turning raw field bytes into typed values.
///
/// Text fields never produce an error: invalid bytes are replaced (name)
/// or dropped (discount). Only fixed-width numeric fields can fail, and
/// only when handed a slice of the wrong size.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    /// A fixed-width field was given the wrong number of bytes.
    #[error("{field} field must be {expected} bytes, got {actual}")]
    FieldWidth {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}
