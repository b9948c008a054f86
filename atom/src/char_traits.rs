//! Holds functions to determine if a character belongs to a specific character set.

/// Check whether the character is a space (` `).
#[inline]
#[must_use]
pub fn is_space(c: char) -> bool {
    c == ' '
}

/// Check whether the character is a tab (`\t`).
#[inline]
#[must_use]
pub fn is_tab(c: char) -> bool {
    c == '\t'
}

/// Check whether the character is a YAML whitespace (` ` or `\t`).
#[inline]
#[must_use]
pub fn is_ws(c: char) -> bool {
    is_space(c) || is_tab(c)
}

/// Check whether the character is a line break (`\r` or `\n`).
#[inline]
#[must_use]
pub fn is_lb(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// Check whether the character is a line break in the wider sense.
///
/// Covers `\n`, `\r`, and the Unicode breaks NEL (U+0085), LS (U+2028) and PS
/// (U+2029). The emitter counts columns with this set; the scalar line
/// analysis only ever sees `\n`/`\r`.
#[inline]
#[must_use]
pub fn is_generic_lb(c: char) -> bool {
    is_lb(c) || matches!(c, '\u{0085}' | '\u{2028}' | '\u{2029}')
}

/// Check whether the character is a whitespace or a line break.
#[inline]
#[must_use]
pub fn is_ws_or_lb(c: char) -> bool {
    is_ws(c) || is_lb(c)
}

/// Check whether the character belongs to the YAML printable set.
///
/// See [5.1 Character Set](https://yaml.org/spec/1.2.2/#51-character-set).
#[inline]
#[must_use]
pub fn is_printable(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\x20'..='\x7e'
        | '\u{0085}'
        | '\u{00a0}'..='\u{d7ff}'
        | '\u{e000}'..='\u{fffd}'
        | '\u{10000}'..='\u{10ffff}')
}

/// Check whether the character is a hexadecimal digit (case insensitive).
#[inline]
#[must_use]
pub fn is_hex(c: char) -> bool {
    c.is_ascii_hexdigit()
}

/// Convert the hexadecimal digit to an integer.
///
/// # Panics
/// Panics if the character is not a hexadecimal digit.
#[inline]
#[must_use]
pub fn as_hex(c: char) -> u32 {
    match c {
        '0'..='9' => (c as u32) - ('0' as u32),
        'a'..='f' => (c as u32) - ('a' as u32) + 10,
        'A'..='F' => (c as u32) - ('A' as u32) + 10,
        _ => unreachable!(),
    }
}

#[cfg(test)]
mod test {
    use super::{as_hex, is_generic_lb, is_printable, is_ws};

    #[test]
    fn whitespace_is_space_or_tab() {
        assert!(is_ws(' '));
        assert!(is_ws('\t'));
        assert!(!is_ws('\n'));
        assert!(!is_ws('\u{a0}'));
    }

    #[test]
    fn generic_breaks_include_unicode_breaks() {
        assert!(is_generic_lb('\n'));
        assert!(is_generic_lb('\r'));
        assert!(is_generic_lb('\u{85}'));
        assert!(is_generic_lb('\u{2028}'));
        assert!(is_generic_lb('\u{2029}'));
        assert!(!is_generic_lb(' '));
    }

    #[test]
    fn printable_excludes_c0_controls() {
        assert!(is_printable('a'));
        assert!(is_printable('\t'));
        assert!(is_printable('\u{2028}'));
        assert!(!is_printable('\x07'));
        assert!(!is_printable('\u{fffe}'));
    }

    #[test]
    fn hex_digits() {
        assert_eq!(as_hex('0'), 0);
        assert_eq!(as_hex('a'), 10);
        assert_eq!(as_hex('F'), 15);
    }
}
