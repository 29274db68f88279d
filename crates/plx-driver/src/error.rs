/// Errors raised while writing decoded rows as delimited text.
///
/// ```text
/// ┌──────────────────┬──────────────────────────────────────────────────┐
/// │ Variant          │ Cause                                            │
/// ├──────────────────┼──────────────────────────────────────────────────┤
/// │ InvalidDelimiter │ Delimiter collides with quoting or line breaks   │
/// │ MissingPrice     │ Row without price under MissingPrice::Fail       │
/// │ Io               │ Underlying writer failed                         │
/// └──────────────────┴──────────────────────────────────────────────────┘
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("delimiter {0:?} cannot be used: it is a quote or line-break character")]
    InvalidDelimiter(char),

    #[error("record {name:?} has no price")]
    MissingPrice { name: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
