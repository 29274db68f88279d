use std::fmt;

use crate::error::WireError;

/// Size of the fixed record header: `length` (u16 LE) + `flag` (u16 LE).
pub const HEADER_SIZE: usize = 4;

/// Bytes that must be readable before a record can be classified: the
/// header plus the name-length byte that follows it.
pub const PREAMBLE_SIZE: usize = HEADER_SIZE + 1;

/// The `length` field does not count its own two bytes, so a record spans
/// `length + LENGTH_FIELD_SIZE` bytes from its first byte.
pub const LENGTH_FIELD_SIZE: usize = 2;

/// Record flag word.
///
/// Four values are known layouts. Bit 13 (`0x2000`) marks a record that
/// carries a price field; every known value has it set, but the layout
/// rules still consult it rather than assuming so.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordFlag(u16);

impl RecordFlag {
    /// Name, four reserved bytes, optional price, discount.
    pub const F001: Self = Self(0xF001);

    /// Name, price, discount.
    pub const B001: Self = Self(0xB001);

    /// Same layout as [`Self::B001`].
    pub const B401: Self = Self(0xB401);

    /// Name and discount, with the price slot governed by the price bit.
    pub const A001: Self = Self(0xA001);

    /// Price-present bit.
    pub const PRICE_BIT: u16 = 0x2000;

    /// The flag values with a known layout, in classification order.
    pub const KNOWN: [Self; 4] = [Self::F001, Self::B001, Self::B401, Self::A001];

    pub fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u16 {
        self.0
    }

    pub fn has_price(self) -> bool {
        self.0 & Self::PRICE_BIT != 0
    }

    pub fn is_known(self) -> bool {
        Self::KNOWN.contains(&self)
    }
}

impl fmt::Display for RecordFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06X}", self.0)
    }
}

/// Record header plus the name-length byte, read from the first five bytes
/// of a record.
///
/// ```text
/// ┌────────┬─────────┬───────────────────────────────────────────┐
/// │ Offset │ Size    │ Description                               │
/// ├────────┼─────────┼───────────────────────────────────────────┤
/// │ 0x00   │ 2 bytes │ length (u16 LE), bytes after this field   │
/// │ 0x02   │ 2 bytes │ flag   (u16 LE), selects the field layout │
/// │ 0x04   │ 1 byte  │ name length                               │
/// │ 0x05   │ n bytes │ name, then layout-specific fields         │
/// └────────┴─────────┴───────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordHeader {
    pub length: u16,
    pub flag: RecordFlag,
    pub name_len: u8,
}

impl RecordHeader {
    /// Parse the preamble from the start of `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::UnexpectedEof`] if `buf` is shorter than
    /// [`PREAMBLE_SIZE`] (5 bytes).
    pub fn read_from(buf: &[u8]) -> Result<Self, WireError> {
        if buf.len() < PREAMBLE_SIZE {
            return Err(WireError::UnexpectedEof {
                offset: buf.len(),
                needed: PREAMBLE_SIZE,
            });
        }

        let length = u16::from_le_bytes([buf[0], buf[1]]);
        let flag = RecordFlag::from_raw(u16::from_le_bytes([buf[2], buf[3]]));
        let name_len = buf[4];

        Ok(Self {
            length,
            flag,
            name_len,
        })
    }

    /// Total bytes this record occupies, i.e. the distance to the next
    /// record's header.
    pub fn record_size(&self) -> usize {
        usize::from(self.length) + LENGTH_FIELD_SIZE
    }
}
