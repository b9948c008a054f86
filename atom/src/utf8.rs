//! UTF-8 primitives used by the atom iterators.
//!
//! Every multi-byte access in this workspace goes through these functions;
//! nothing indexes into the middle of a multi-byte sequence by hand.

use crate::char_traits::{as_hex, is_hex};

/// Return the width in bytes of a UTF-8 sequence, judging by its first octet.
///
/// Returns 0 for continuation octets and invalid leading octets.
#[inline]
#[must_use]
pub fn width_by_first_octet(b: u8) -> usize {
    if b & 0x80 == 0x00 {
        1
    } else if b & 0xe0 == 0xc0 {
        2
    } else if b & 0xf0 == 0xe0 {
        3
    } else if b & 0xf8 == 0xf0 {
        4
    } else {
        0
    }
}

/// Check whether the code point is valid (not a surrogate, not above U+10FFFF).
#[inline]
#[must_use]
pub fn is_valid(c: u32) -> bool {
    !(0xd800..=0xdfff).contains(&c) && c < 0x11_0000
}

/// Decode the first code point of `bytes`.
///
/// # Return
/// Returns the code point and its width in bytes, or `None` if the slice is
/// empty, truncated or not valid UTF-8.
#[must_use]
pub fn decode(bytes: &[u8]) -> Option<(char, usize)> {
    let first = *bytes.first()?;

    // single byte (hot path)
    if first & 0x80 == 0 {
        return Some((char::from(first), 1));
    }

    let width = width_by_first_octet(first);
    if width == 0 || bytes.len() < width {
        return None;
    }

    let mut value = u32::from(first & (0x7f >> width));
    for &b in &bytes[1..width] {
        if b & 0xc0 != 0x80 {
            return None;
        }
        value = (value << 6) | u32::from(b & 0x3f);
    }

    // reject overlong encodings alongside surrogates and out-of-range values
    let min = match width {
        2 => 0x80,
        3 => 0x800,
        _ => 0x1_0000,
    };
    if value < min || !is_valid(value) {
        return None;
    }

    char::from_u32(value).map(|c| (c, width))
}

/// Encode `c` into `buf`, returning the number of bytes written.
///
/// # Return
/// Returns `None` when the buffer is too small for the encoded sequence.
#[must_use]
pub fn encode(c: char, buf: &mut [u8]) -> Option<usize> {
    if buf.len() < c.len_utf8() {
        return None;
    }
    Some(c.encode_utf8(buf).len())
}

/// Count the code points of `bytes`, stopping at the first malformed sequence.
#[must_use]
pub fn count(bytes: &[u8]) -> usize {
    let mut n = 0;
    let mut i = 0;
    while i < bytes.len() {
        let w = width_by_first_octet(bytes[i]);
        if w == 0 || i + w > bytes.len() {
            break;
        }
        i += w;
        n += 1;
    }
    n
}

/// Parse a YAML double-quoted escape sequence starting at a backslash.
///
/// Handles the named escapes (`\0 \a \b \t \n \v \f \r \e`, an escaped space,
/// `\" \/ \\`, and `\N \_ \L \P`), and the hexadecimal forms `\xHH`, `\uHHHH`
/// and `\UHHHHHHHH`.
///
/// # Return
/// Returns the decoded code point and the total number of bytes consumed
/// (including the backslash), or `None` when the sequence is malformed or
/// resolves to an invalid code point.
#[must_use]
pub fn parse_escape(bytes: &[u8]) -> Option<(char, usize)> {
    if bytes.len() < 2 || bytes[0] != b'\\' {
        return None;
    }

    let (c, consumed) = match bytes[1] {
        b'0' => ('\0', 2),
        b'a' => ('\x07', 2),
        b'b' => ('\x08', 2),
        b't' | b'\t' => ('\t', 2),
        b'n' => ('\n', 2),
        b'v' => ('\x0b', 2),
        b'f' => ('\x0c', 2),
        b'r' => ('\r', 2),
        b'e' => ('\x1b', 2),
        b' ' => (' ', 2),
        b'"' => ('"', 2),
        b'/' => ('/', 2),
        b'\\' => ('\\', 2),
        b'N' => ('\u{85}', 2),
        b'_' => ('\u{a0}', 2),
        b'L' => ('\u{2028}', 2),
        b'P' => ('\u{2029}', 2),
        b'x' => return parse_hex_escape(bytes, 2),
        b'u' => return parse_hex_escape(bytes, 4),
        b'U' => return parse_hex_escape(bytes, 8),
        _ => return None,
    };
    Some((c, consumed))
}

/// Parse the `digits` hexadecimal digits of a `\x`/`\u`/`\U` escape.
fn parse_hex_escape(bytes: &[u8], digits: usize) -> Option<(char, usize)> {
    if bytes.len() < 2 + digits {
        return None;
    }
    let mut value: u32 = 0;
    for &b in &bytes[2..2 + digits] {
        let c = char::from(b);
        if !is_hex(c) {
            return None;
        }
        value = (value << 4) | as_hex(c);
    }
    if !is_valid(value) {
        return None;
    }
    char::from_u32(value).map(|c| (c, 2 + digits))
}

#[cfg(test)]
mod test {
    use super::{count, decode, encode, parse_escape, width_by_first_octet};

    #[test]
    fn widths() {
        assert_eq!(width_by_first_octet(b'a'), 1);
        assert_eq!(width_by_first_octet(0xc3), 2);
        assert_eq!(width_by_first_octet(0xe2), 3);
        assert_eq!(width_by_first_octet(0xf0), 4);
        assert_eq!(width_by_first_octet(0x80), 0);
    }

    #[test]
    fn decode_roundtrip() {
        for c in ['a', 'é', '\u{2028}', '\u{1f600}'] {
            let mut buf = [0u8; 4];
            let n = encode(c, &mut buf).unwrap();
            assert_eq!(decode(&buf[..n]), Some((c, n)));
        }
    }

    #[test]
    fn decode_rejects_truncation() {
        assert_eq!(decode(b""), None);
        assert_eq!(decode(&[0xe2, 0x80]), None);
        assert_eq!(decode(&[0x80]), None);
    }

    #[test]
    fn decode_rejects_overlong() {
        // U+0000 encoded on two bytes.
        assert_eq!(decode(&[0xc0, 0x80]), None);
    }

    #[test]
    fn count_code_points() {
        assert_eq!(count("aé\u{2028}".as_bytes()), 3);
    }

    #[test]
    fn named_escapes() {
        assert_eq!(parse_escape(b"\\t"), Some(('\t', 2)));
        assert_eq!(parse_escape(b"\\0"), Some(('\0', 2)));
        assert_eq!(parse_escape(b"\\L"), Some(('\u{2028}', 2)));
        assert_eq!(parse_escape(b"\\ "), Some((' ', 2)));
        assert_eq!(parse_escape(b"\\q"), None);
    }

    #[test]
    fn hex_escapes() {
        assert_eq!(parse_escape(b"\\x41"), Some(('A', 4)));
        assert_eq!(parse_escape(b"\\u2028"), Some(('\u{2028}', 6)));
        assert_eq!(parse_escape(b"\\U0001F600"), Some(('\u{1f600}', 10)));
        // Surrogates are not code points.
        assert_eq!(parse_escape(b"\\ud800"), None);
        // Truncated digit runs are malformed.
        assert_eq!(parse_escape(b"\\u20"), None);
    }
}
