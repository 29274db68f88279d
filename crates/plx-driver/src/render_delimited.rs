use std::io::Write;

use plx_types::DecodedRecord;

use crate::config::{MissingPrice, WriterConfig};
use crate::error::DriverError;

/// Column names, in output order.
pub const FIELD_NAMES: [&str; 3] = ["name", "discount", "price"];

/// Row counts reported by [`DelimitedWriter::finish`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteStats {
    pub rows_written: usize,
    pub rows_skipped: usize,
}

/// Streams decoded records as delimited text, one row per record.
///
/// Fields are quoted only when they contain the delimiter, a double quote,
/// or a line break; embedded quotes are doubled. Prices are written as
/// `units.cents`.
///
/// ```text
/// name;discount;price\r\n
/// Bolt M8;A;12.50\r\n
/// "Nut; hex";B;\r\n          ← quoted name, price absent
/// ```
pub struct DelimitedWriter<W: Write> {
    out: W,
    config: WriterConfig,
    stats: WriteStats,
    line: String,
}

impl<W: Write> DelimitedWriter<W> {
    /// Create a writer and, if configured, emit the header row.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::InvalidDelimiter`] if the delimiter is a
    /// double quote or a line-break character, or [`DriverError::Io`] if
    /// the header cannot be written.
    pub fn new(out: W, config: WriterConfig) -> Result<Self, DriverError> {
        if matches!(config.delimiter, '"' | '\r' | '\n') {
            return Err(DriverError::InvalidDelimiter(config.delimiter));
        }

        let mut writer = Self {
            out,
            config,
            stats: WriteStats::default(),
            line: String::new(),
        };
        if writer.config.write_header {
            writer.write_row(&FIELD_NAMES)?;
        }
        Ok(writer)
    }

    /// Write one record. Returns `false` if the row was skipped under
    /// [`MissingPrice::Skip`].
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::MissingPrice`] for a price-less record under
    /// [`MissingPrice::Fail`], or [`DriverError::Io`] on write failure.
    pub fn write_record(&mut self, record: &DecodedRecord) -> Result<bool, DriverError> {
        let price = match (record.price, self.config.missing_price) {
            (Some(price), _) => price.to_string(),
            (None, MissingPrice::Empty) => String::new(),
            (None, MissingPrice::Skip) => {
                tracing::debug!(name = %record.name, "skipping row without price");
                self.stats.rows_skipped += 1;
                return Ok(false);
            }
            (None, MissingPrice::Fail) => {
                return Err(DriverError::MissingPrice {
                    name: record.name.clone(),
                });
            }
        };

        self.write_row(&[&record.name, &record.discount_code, &price])?;
        self.stats.rows_written += 1;
        Ok(true)
    }

    pub fn stats(&self) -> WriteStats {
        self.stats
    }

    /// Flush the output and return the row counts.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Io`] if flushing fails.
    pub fn finish(mut self) -> Result<WriteStats, DriverError> {
        self.out.flush()?;
        Ok(self.stats)
    }

    fn write_row(&mut self, fields: &[&str]) -> Result<(), DriverError> {
        self.line.clear();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                self.line.push(self.config.delimiter);
            }
            push_field(&mut self.line, field, self.config.delimiter);
        }
        self.line.push_str(&self.config.line_terminator);
        self.out.write_all(self.line.as_bytes())?;
        Ok(())
    }
}

fn push_field(line: &mut String, field: &str, delimiter: char) {
    let needs_quotes = field
        .chars()
        .any(|c| c == delimiter || matches!(c, '"' | '\r' | '\n'));
    if !needs_quotes {
        line.push_str(field);
        return;
    }

    line.push('"');
    for c in field.chars() {
        if c == '"' {
            line.push('"');
        }
        line.push(c);
    }
    line.push('"');
}

/// Render a batch of records into a string.
///
/// # Errors
///
/// Same as [`DelimitedWriter::new`] and [`DelimitedWriter::write_record`].
pub fn render_records<'a>(
    records: impl IntoIterator<Item = &'a DecodedRecord>,
    config: WriterConfig,
) -> Result<String, DriverError> {
    let mut writer = DelimitedWriter::new(Vec::new(), config)?;
    for record in records {
        writer.write_record(record)?;
    }
    let out = writer.out;
    Ok(String::from_utf8_lossy(&out).into_owned())
}
