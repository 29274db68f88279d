use std::fmt;

use plx_wire::layout::PRICE_SIZE;

use crate::error::TypeError;

/// A price held as an integer number of cents.
///
/// The wire stores an unsigned 32-bit little-endian count of cents.
/// Display divides by 100 with integer arithmetic and always prints two
/// fraction digits, so `12345` renders as `123.45` and `0` as `0.00`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(u32);

impl Price {
    pub fn from_cents(cents: u32) -> Self {
        Self(cents)
    }

    pub fn from_le_bytes(bytes: [u8; PRICE_SIZE]) -> Self {
        Self(u32::from_le_bytes(bytes))
    }

    /// Build a price from an arbitrary slice.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::FieldWidth`] unless `bytes` is exactly four
    /// bytes long.
    pub fn from_le_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        let raw: [u8; PRICE_SIZE] = bytes.try_into().map_err(|_| TypeError::FieldWidth {
            field: "price",
            expected: PRICE_SIZE,
            actual: bytes.len(),
        })?;
        Ok(Self::from_le_bytes(raw))
    }

    pub fn cents(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl serde::Serialize for Price {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
