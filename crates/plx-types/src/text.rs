//! Lenient decoding for the export's text fields.
//!
//! The export predates any declared encoding, so both fields are read as
//! UTF-8 and neither may fail a record. The two fields differ in what
//! happens to bytes that are not valid UTF-8:
//!
//! - name: each maximal invalid sequence becomes U+FFFD
//! - discount: invalid sequences are dropped

/// Characters removed from a discount code after decoding.
const DISCOUNT_STRIP: [char; 3] = ['\r', '\n', ' '];

/// Decode an item name, substituting U+FFFD for invalid sequences.
pub fn decode_name(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Decode a discount code, dropping invalid sequences, then strip CR, LF
/// and space.
pub fn decode_discount(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.extend(chunk.valid().chars().filter(|c| !DISCOUNT_STRIP.contains(c)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_replaces_invalid_bytes() {
        assert_eq!(decode_name(b"AB\xFFC"), "AB\u{FFFD}C");
        assert_eq!(decode_name(b"\xFF\xFE"), "\u{FFFD}\u{FFFD}");
    }

    #[test]
    fn name_keeps_multibyte_text() {
        assert_eq!(decode_name("Käse".as_bytes()), "Käse");
    }

    #[test]
    fn discount_strips_whitespace() {
        assert_eq!(decode_discount(b" A\r\n"), "A");
        assert_eq!(decode_discount(b"\r\n"), "");
    }

    #[test]
    fn discount_drops_invalid_bytes() {
        assert_eq!(decode_discount(b"\xFFB"), "B");
        assert_eq!(decode_discount(b"\xC3"), "");
    }

    #[test]
    fn discount_keeps_tabs_and_nul() {
        // Only CR, LF and space are stripped.
        assert_eq!(decode_discount(b"\tX"), "\tX");
        assert_eq!(decode_discount(b"X\0"), "X\0");
    }
}
