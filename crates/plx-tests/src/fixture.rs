//! Synthetic export builder.
//!
//! Production code never writes the record format, so tests build their
//! inputs here. The builder lays fields out from the flag independently of
//! `plx-wire`'s layout tables, which keeps the two honest against each
//! other.
//!
//! ```text
//! ExportBuilder::new()
//!     .record(RecordFlag::B001, "Bolt M8", 1250, b"A ")
//!     .unmatched(0x1234, 3)
//!     .raw(&[0x09, 0x00])          ← trailing garbage
//!     .build()
//! ```

use plx_wire::RecordFlag;
use plx_wire::header::LENGTH_FIELD_SIZE;

/// Encode one record with a known layout.
///
/// The price goes wherever the flag's layout puts it. Flags without a known
/// layout get the name/price/discount shape of `0xB001`.
///
/// # Panics
///
/// Panics if `name` is longer than 255 bytes or the record exceeds the
/// 16-bit length field.
pub fn encode_record(flag: RecordFlag, name: &[u8], cents: u32, discount: &[u8; 2]) -> Vec<u8> {
    let name_len = u8::try_from(name.len()).expect("name longer than 255 bytes");

    let mut body = vec![name_len];
    body.extend_from_slice(name);
    match flag {
        RecordFlag::F001 => {
            body.extend_from_slice(&[0; 4]);
            if flag.has_price() {
                body.extend_from_slice(&cents.to_le_bytes());
            }
        }
        RecordFlag::A001 if !flag.has_price() => body.extend_from_slice(&[0; 4]),
        _ => body.extend_from_slice(&cents.to_le_bytes()),
    }
    body.extend_from_slice(discount);

    frame(flag.raw(), &body)
}

/// Prefix `body` (everything after the flag word) with a header whose
/// length covers exactly the flag and the body.
///
/// # Panics
///
/// Panics if the record exceeds the 16-bit length field.
pub fn frame(flag: u16, body: &[u8]) -> Vec<u8> {
    let length = u16::try_from(LENGTH_FIELD_SIZE + body.len()).expect("record too long");
    let mut out = Vec::with_capacity(4 + body.len());
    out.extend_from_slice(&length.to_le_bytes());
    out.extend_from_slice(&flag.to_le_bytes());
    out.extend_from_slice(body);
    out
}

/// Builds an export buffer record by record.
#[derive(Debug, Default)]
pub struct ExportBuilder {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl ExportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record with a known layout.
    #[must_use]
    pub fn record(self, flag: RecordFlag, name: &str, cents: u32, discount: &[u8; 2]) -> Self {
        let bytes = encode_record(flag, name.as_bytes(), cents, discount);
        self.push(&bytes)
    }

    /// Append a record whose flag has no known layout. The body is
    /// `body_len` zero bytes, at least one so the name-length byte exists.
    #[must_use]
    pub fn unmatched(self, flag: u16, body_len: usize) -> Self {
        let bytes = frame(flag, &vec![0; body_len.max(1)]);
        self.push(&bytes)
    }

    /// Append bytes as they are, without framing.
    #[must_use]
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    fn push(mut self, record: &[u8]) -> Self {
        self.offsets.push(self.buf.len());
        self.buf.extend_from_slice(record);
        self
    }

    /// Start offset of every framed record appended so far.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

/// A deterministic export of `records` records cycling through the known
/// flags, with an unmatched record every seventh slot.
pub fn synthetic_export(records: usize) -> Vec<u8> {
    let mut builder = ExportBuilder::new();
    for i in 0..records {
        let cents = u32::try_from(i).unwrap_or(u32::MAX).wrapping_mul(137);
        let name = format!("Item {i:05}");
        builder = match i % 7 {
            6 => builder.unmatched(0x1000 + u16::try_from(i % 3).unwrap_or(0), 9),
            slot => {
                let flag = RecordFlag::KNOWN[slot % RecordFlag::KNOWN.len()];
                let discount = [b'A' + u8::try_from(i % 26).unwrap_or(0), b' '];
                builder.record(flag, &name, cents, &discount)
            }
        };
    }
    builder.build()
}
