//! Scalar text analysis for style selection.

use yarrow_atom::char_traits::{is_generic_lb, is_lb, is_printable};

/// Check whether the text can be emitted as a plain scalar without changing
/// its meaning.
///
/// Plain scalars cannot start with an indicator, contain characters that
/// read as structure, span lines, or spell one of the values the core schema
/// resolves specially (booleans, nulls, numbers, dates).
#[must_use]
pub(crate) fn is_plain_safe(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    if text.starts_with(|c: char| {
        matches!(
            c,
            ' ' | '&' | '*' | '?' | '|' | '-' | '<' | '>' | '=' | '!' | '%' | '@'
        )
    }) || text.ends_with(' ')
    {
        return false;
    }
    if text.contains(|c: char| {
        matches!(c, ':'
            | '{'
            | '}'
            | '['
            | ']'
            | ','
            | '#'
            | '`'
            | '\"'
            | '\''
            | '\\')
            || is_generic_lb(c)
            || !is_printable(c)
    }) {
        return false;
    }
    if [
        // http://yaml.org/type/bool.html
        // Note: `y`, `Y`, `n`, `N` are not quoted deliberately, as in
        // libyaml. PyYAML also parses them as strings, not booleans,
        // although that violates the YAML 1.1 specification.
        "yes", "Yes", "YES", "no", "No", "NO", "True", "TRUE", "true", "False", "FALSE", "false",
        "on", "On", "ON", "off", "Off", "OFF",
        // http://yaml.org/type/null.html
        "null", "Null", "NULL", "~",
    ]
    .contains(&text)
    {
        return false;
    }
    if text.starts_with('.') || text.starts_with("0x") {
        return false;
    }
    text.parse::<i64>().is_err() && text.parse::<f64>().is_err()
}

/// Check whether the text can stand as a simple mapping key (no `?` marker).
///
/// A simple key must fit on one line and stay reasonably short.
#[must_use]
pub(crate) fn is_simple_key(text: &str) -> bool {
    !has_lb(text) && text.chars().count() <= 128
}

/// Check whether the text contains a line break.
#[must_use]
pub(crate) fn has_lb(text: &str) -> bool {
    text.contains(is_lb)
}

/// Check whether the text contains a non-printable character.
#[must_use]
pub(crate) fn has_non_printable(text: &str) -> bool {
    text.contains(|c: char| !is_printable(c))
}

/// Check whether the text is one of the scalars JSON can hold unquoted.
#[must_use]
pub(crate) fn is_json_plain(text: &str) -> bool {
    matches!(text, "true" | "false" | "null") || is_json_number(text)
}

/// Check whether the text reads as a JSON-style number.
#[must_use]
pub(crate) fn is_json_number(text: &str) -> bool {
    let mut rest = text.strip_prefix(['+', '-']).unwrap_or(text);
    let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    rest = &rest[int_len..];
    let mut digits = int_len;

    if let Some(frac) = rest.strip_prefix('.') {
        let frac_len = frac.bytes().take_while(u8::is_ascii_digit).count();
        digits += frac_len;
        rest = &frac[frac_len..];
    }
    if digits == 0 {
        return false;
    }

    if let Some(exp) = rest.strip_prefix(['e', 'E']) {
        let exp = exp.strip_prefix(['+', '-']).unwrap_or(exp);
        let exp_len = exp.bytes().take_while(u8::is_ascii_digit).count();
        if exp_len == 0 {
            return false;
        }
        rest = &exp[exp_len..];
    }

    rest.is_empty()
}

#[cfg(test)]
mod test {
    use super::{is_json_number, is_json_plain, is_plain_safe, is_simple_key};

    #[test]
    fn plain_safety() {
        assert!(is_plain_safe("hello world"));
        assert!(is_plain_safe("x"));
        assert!(!is_plain_safe(""));
        assert!(!is_plain_safe("true"));
        assert!(!is_plain_safe("~"));
        assert!(!is_plain_safe("12"));
        assert!(!is_plain_safe("2.5"));
        assert!(!is_plain_safe("a: b"));
        assert!(!is_plain_safe("*coffee"));
        assert!(!is_plain_safe("has\nbreak"));
        assert!(!is_plain_safe(" leading"));
        assert!(!is_plain_safe("trailing "));
        assert!(!is_plain_safe("0x10"));
    }

    #[test]
    fn simple_keys() {
        assert!(is_simple_key("a0 bb"));
        assert!(!is_simple_key("two\nlines"));
        assert!(!is_simple_key(&"x".repeat(200)));
    }

    #[test]
    fn json_numbers() {
        assert!(is_json_number("0"));
        assert!(is_json_number("-12.5"));
        assert!(is_json_number("+3"));
        assert!(is_json_number("12e7"));
        assert!(is_json_number("1.5E-3"));
        assert!(!is_json_number(""));
        assert!(!is_json_number("+"));
        assert!(!is_json_number("1e"));
        assert!(!is_json_number("1.2.3"));
        assert!(!is_json_number("0x10"));
    }

    #[test]
    fn json_plain_values() {
        assert!(is_json_plain("true"));
        assert!(is_json_plain("null"));
        assert!(is_json_plain("42"));
        assert!(!is_json_plain("yes"));
        assert!(!is_json_plain("~"));
    }
}
