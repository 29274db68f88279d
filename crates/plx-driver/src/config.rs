/// Output settings for [`DelimitedWriter`](crate::DelimitedWriter).
///
/// ```text
/// ┌─────────────────┬─────────┬──────────────────────────────────────────┐
/// │ Field           │ Default │ Purpose                                  │
/// ├─────────────────┼─────────┼──────────────────────────────────────────┤
/// │ delimiter       │ ';'     │ Field separator                          │
/// │ write_header    │ true    │ Emit `name;discount;price` first         │
/// │ line_terminator │ "\r\n"  │ Appended after every row                 │
/// │ missing_price   │ Empty   │ What to do with rows that have no price  │
/// └─────────────────┴─────────┴──────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriterConfig {
    pub delimiter: char,
    pub write_header: bool,
    pub line_terminator: String,
    pub missing_price: MissingPrice,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            delimiter: ';',
            write_header: true,
            line_terminator: "\r\n".to_string(),
            missing_price: MissingPrice::default(),
        }
    }
}

/// Handling for records whose layout carried no price field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingPrice {
    /// Write the row with an empty price cell.
    #[default]
    Empty,
    /// Leave the row out.
    Skip,
    /// Stop with [`DriverError::MissingPrice`](crate::DriverError::MissingPrice).
    Fail,
}
