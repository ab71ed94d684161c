//! Byte/text conversion used by both the receive and the send path.
//!
//! The wire policy is fixed: text is UTF-8. Decoding is permissive — byte
//! sequences that are not valid UTF-8 are decoded with U+FFFD replacement
//! characters rather than failing, so a misbehaving server can never panic
//! the receive loop.

/// Decode a byte sequence to text.
///
/// Invalid UTF-8 is replaced with U+FFFD; this never fails.
///
/// # Examples
///
/// ```
/// use nodesock_core::codec::bytes_to_string;
///
/// assert_eq!(bytes_to_string(b"hello"), "hello");
/// assert_eq!(bytes_to_string(&[0xff, 0xfe]), "\u{fffd}\u{fffd}");
/// ```
#[must_use]
pub fn bytes_to_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Encode text to its UTF-8 byte representation.
///
/// # Examples
///
/// ```
/// use nodesock_core::codec::string_to_bytes;
///
/// assert_eq!(string_to_bytes("abc"), b"abc");
/// ```
#[must_use]
pub fn string_to_bytes(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_text() {
        let samples = ["", "a", "hello world", "ação liberada", "日本語\n"];
        for s in samples {
            assert_eq!(bytes_to_string(&string_to_bytes(s)), s);
        }
    }

    #[test]
    fn round_trip_valid_utf8_bytes() {
        let bytes = "payload with ünïcode".as_bytes();
        assert_eq!(string_to_bytes(&bytes_to_string(bytes)), bytes);
    }

    #[test]
    fn invalid_utf8_decodes_lossily() {
        let bytes = [b'o', b'k', 0xc3, 0x28, b'!'];
        let decoded = bytes_to_string(&bytes);
        assert!(decoded.starts_with("ok"));
        assert!(decoded.contains('\u{fffd}'));
        assert!(decoded.ends_with('!'));
    }

    #[test]
    fn empty_input() {
        assert_eq!(bytes_to_string(&[]), "");
        assert!(string_to_bytes("").is_empty());
    }
}
