//! The atom: a contiguous input byte range plus scalar-style metadata.

use std::cell::Cell;
use std::cmp::Ordering;

use crate::{iter::AtomIter, AtomError, Input, Mark};

/// The scalar style an atom was scanned with.
///
/// The style decides how the iterator unfolds the raw bytes into logical
/// text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomStyle {
    /// A plain (unquoted) scalar.
    Plain,
    /// A single-quoted scalar; `''` collapses to `'`.
    SingleQuoted,
    /// A double-quoted scalar; backslash escapes are decoded.
    DoubleQuoted,
    /// A literal block scalar (`|`).
    Literal,
    /// A folded block scalar (`>`).
    Folded,
    /// A URI; `%HH` percent escapes are decoded.
    Uri,
    /// Text to be re-encoded with double-quote escapes on output.
    DoubleQuotedManual,
    /// A comment, possibly spanning multiple lines.
    Comment,
}

impl AtomStyle {
    /// Whether the style is one of the quoted styles.
    #[inline]
    #[must_use]
    pub fn is_quoted(self) -> bool {
        matches!(self, Self::SingleQuoted | Self::DoubleQuoted)
    }

    /// Whether the style is one of the block styles.
    #[inline]
    #[must_use]
    pub fn is_block(self) -> bool {
        matches!(self, Self::Literal | Self::Folded)
    }
}

/// The chomping rule for trailing line breaks of block scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chomp {
    /// Drop every trailing line break.
    Strip,
    /// Keep exactly one trailing line break if the final content line had one.
    Clip,
    /// Keep every trailing line break.
    Keep,
}

/// A scalar descriptor: a byte range of an [`Input`] plus style, chomping and
/// a set of precomputed content flags.
///
/// The producer fills the flags when the atom is built; the iterator reads
/// them but never mutates them. The only interior mutability is the cached
/// storage hint, the length of the unfolded text once it has been computed.
#[derive(Debug, Clone)]
pub struct Atom<'input> {
    input: &'input Input,
    start_mark: Mark,
    end_mark: Mark,
    style: AtomStyle,
    chomp: Chomp,
    increment: usize,
    storage_hint: Cell<Option<usize>>,
    flags: AtomFlags,
}

/// The content flags of an atom, derived from the raw bytes when the atom is
/// built.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct AtomFlags {
    pub direct_output: bool,
    pub empty: bool,
    pub has_lb: bool,
    pub has_ws: bool,
    pub starts_with_ws: bool,
    pub starts_with_lb: bool,
    pub ends_with_ws: bool,
    pub ends_with_lb: bool,
    pub trailing_lb: bool,
    pub size0: bool,
}

impl AtomFlags {
    /// Scan the raw bytes and fill in every content flag.
    ///
    /// This stands in for the scanner, which computes the same flags as a
    /// by-product of tokenization. `direct_output` is conservative: it is set
    /// only when unfolding the slice is guaranteed to be the identity.
    fn derive(data: &[u8], style: AtomStyle) -> Self {
        let is_ws = |b: u8| b == b' ' || b == b'\t';
        let is_lb = |b: u8| b == b'\n' || b == b'\r';

        let mut flags = Self {
            size0: data.is_empty(),
            empty: data.iter().all(|&b| is_ws(b) || is_lb(b)),
            has_lb: data.iter().any(|&b| is_lb(b)),
            has_ws: data.iter().any(|&b| is_ws(b)),
            ..Self::default()
        };
        if let Some(&first) = data.first() {
            flags.starts_with_ws = is_ws(first);
            flags.starts_with_lb = is_lb(first);
        }
        if let Some(&last) = data.last() {
            flags.ends_with_ws = is_ws(last);
            flags.ends_with_lb = is_lb(last);
        }
        let trailing = data.iter().rev().take_while(|&&b| is_lb(b)).count();
        flags.trailing_lb = trailing > 1;

        let single_line = !flags.has_lb && !flags.starts_with_ws && !flags.ends_with_ws;
        flags.direct_output = match style {
            AtomStyle::Plain | AtomStyle::Comment => single_line,
            AtomStyle::Uri => single_line && !data.contains(&b'%'),
            AtomStyle::SingleQuoted => single_line && !data.contains(&b'\''),
            AtomStyle::DoubleQuoted => single_line && !data.contains(&b'\\'),
            AtomStyle::DoubleQuotedManual => {
                single_line
                    && !data.contains(&b'"')
                    && !data.contains(&b'\\')
                    && std::str::from_utf8(data)
                        .is_ok_and(|s| s.chars().all(crate::char_traits::is_printable))
            }
            AtomStyle::Literal | AtomStyle::Folded => false,
        };
        flags
    }
}

impl<'input> Atom<'input> {
    /// Build an atom over `input` between two marks, deriving its content
    /// flags from the raw bytes.
    ///
    /// The style defaults the chomping rule to clip and the block indent
    /// indicator to none; use [`with_chomp`] and [`with_increment`] to adjust
    /// them for block styles.
    ///
    /// # Panics
    /// Panics if the marks are out of order or out of bounds.
    ///
    /// [`with_chomp`]: Self::with_chomp
    /// [`with_increment`]: Self::with_increment
    #[must_use]
    pub fn new(input: &'input Input, start_mark: Mark, end_mark: Mark, style: AtomStyle) -> Self {
        assert!(start_mark.index <= end_mark.index);
        assert!(end_mark.index <= input.len());
        let flags = AtomFlags::derive(&input.data()[start_mark.index..end_mark.index], style);
        Self {
            input,
            start_mark,
            end_mark,
            style,
            chomp: Chomp::Clip,
            increment: 0,
            storage_hint: Cell::new(None),
            flags,
        }
    }

    /// Build an atom over a byte range of `input`, deriving the marks by
    /// scanning.
    ///
    /// # Panics
    /// Panics if the range is out of order or out of bounds.
    #[must_use]
    pub fn over(
        input: &'input Input,
        range: std::ops::Range<usize>,
        style: AtomStyle,
    ) -> Self {
        Self::new(
            input,
            Mark::at(input, range.start),
            Mark::at(input, range.end),
            style,
        )
    }

    /// Set the chomping rule.
    #[must_use]
    pub fn with_chomp(mut self, chomp: Chomp) -> Self {
        self.chomp = chomp;
        self
    }

    /// Set the explicit block indent indicator (the chomp column).
    #[must_use]
    pub fn with_increment(mut self, increment: usize) -> Self {
        self.increment = increment;
        self
    }

    /// The raw bytes of the atom.
    #[inline]
    #[must_use]
    pub fn data(&self) -> &'input [u8] {
        &self.input.data()[self.start_mark.index..self.end_mark.index]
    }

    /// The length of the raw byte range.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.end_mark.index - self.start_mark.index
    }

    /// Whether the atom covers no bytes at all.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.size0
    }

    /// The style of the atom.
    #[inline]
    #[must_use]
    pub fn style(&self) -> AtomStyle {
        self.style
    }

    /// The chomping rule of the atom.
    #[inline]
    #[must_use]
    pub fn chomp(&self) -> Chomp {
        self.chomp
    }

    /// The explicit block indent indicator; 0 when none was given.
    #[inline]
    #[must_use]
    pub fn increment(&self) -> usize {
        self.increment
    }

    /// The mark of the first byte of the atom.
    #[inline]
    #[must_use]
    pub fn start_mark(&self) -> Mark {
        self.start_mark
    }

    /// The mark one past the last byte of the atom.
    #[inline]
    #[must_use]
    pub fn end_mark(&self) -> Mark {
        self.end_mark
    }

    /// Whether the raw slice already is the logical text.
    #[inline]
    #[must_use]
    pub fn direct_output(&self) -> bool {
        self.flags.direct_output
    }

    /// Whether the atom holds only whitespace and line breaks.
    #[inline]
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.flags.empty
    }

    /// Whether the atom contains at least one line break.
    #[inline]
    #[must_use]
    pub fn has_lb(&self) -> bool {
        self.flags.has_lb
    }

    /// Whether the atom contains at least one whitespace.
    #[inline]
    #[must_use]
    pub fn has_ws(&self) -> bool {
        self.flags.has_ws
    }

    /// Whether the atom starts with a whitespace.
    #[inline]
    #[must_use]
    pub fn starts_with_ws(&self) -> bool {
        self.flags.starts_with_ws
    }

    /// Whether the atom starts with a line break.
    #[inline]
    #[must_use]
    pub fn starts_with_lb(&self) -> bool {
        self.flags.starts_with_lb
    }

    /// Whether the atom ends with a whitespace.
    #[inline]
    #[must_use]
    pub fn ends_with_ws(&self) -> bool {
        self.flags.ends_with_ws
    }

    /// Whether the atom ends with a line break.
    #[inline]
    #[must_use]
    pub fn ends_with_lb(&self) -> bool {
        self.flags.ends_with_lb
    }

    /// Whether the atom ends with more than one line break.
    #[inline]
    #[must_use]
    pub fn trailing_lb(&self) -> bool {
        self.flags.trailing_lb
    }

    /// The length of the unfolded text in bytes.
    ///
    /// The result is cached on the atom, so only the first call iterates.
    ///
    /// # Errors
    /// Returns an error when the atom cannot be decoded (e.g. an invalid
    /// escape in a double-quoted atom).
    pub fn text_len(&self) -> Result<usize, AtomError> {
        if let Some(hint) = self.storage_hint.get() {
            return Ok(hint);
        }
        let mut len = 0;
        let mut iter = AtomIter::new(self);
        while let Some(chunk) = iter.next_chunk()? {
            len += chunk.len();
        }
        self.storage_hint.set(Some(len));
        Ok(len)
    }

    /// The unfolded text of the atom.
    ///
    /// Borrows the raw slice when the atom is marked for direct output and
    /// collects through the iterator otherwise.
    ///
    /// # Errors
    /// Returns an error when the atom cannot be decoded.
    pub fn text(&self) -> Result<std::borrow::Cow<'input, str>, AtomError> {
        if self.flags.direct_output {
            return std::str::from_utf8(self.data())
                .map(std::borrow::Cow::Borrowed)
                .map_err(|_| AtomError::InvalidUtf8);
        }
        let mut out = Vec::new();
        let mut iter = AtomIter::new(self);
        while let Some(chunk) = iter.next_chunk()? {
            out.extend_from_slice(chunk);
        }
        String::from_utf8(out)
            .map(std::borrow::Cow::Owned)
            .map_err(|_| AtomError::InvalidUtf8)
    }

    /// Compare the unfolded text of the atom against a byte string.
    ///
    /// Direct-output atoms are compared without iterating.
    #[must_use]
    pub fn cmp_bytes(&self, other: &[u8]) -> Ordering {
        if self.flags.direct_output {
            return self.data().cmp(other);
        }

        let mut iter = AtomIter::new(self);
        let mut rest = other;
        loop {
            match (iter.getc(), rest.first()) {
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some(a), Some(&b)) => match a.cmp(&b) {
                    Ordering::Equal => rest = &rest[1..],
                    other => return other,
                },
            }
        }
    }

    /// Whether the unfolded text of the atom equals `s`.
    #[must_use]
    pub fn eq_str(&self, s: &str) -> bool {
        self.cmp_bytes(s.as_bytes()) == Ordering::Equal
    }

    /// Compare the unfolded texts of two atoms.
    #[must_use]
    pub fn cmp_atom(&self, other: &Atom<'_>) -> Ordering {
        match (self.flags.direct_output, other.flags.direct_output) {
            (true, true) => self.data().cmp(other.data()),
            (false, true) => self.cmp_bytes(other.data()),
            (true, false) => other.cmp_bytes(self.data()).reverse(),
            (false, false) => {
                let mut a = AtomIter::new(self);
                let mut b = AtomIter::new(other);
                loop {
                    match (a.getc(), b.getc()) {
                        (None, None) => return Ordering::Equal,
                        (None, Some(_)) => return Ordering::Less,
                        (Some(_), None) => return Ordering::Greater,
                        (Some(ca), Some(cb)) => match ca.cmp(&cb) {
                            Ordering::Equal => {}
                            other => return other,
                        },
                    }
                }
            }
        }
    }

    /// Whether the unfolded text forms a JSON-style number.
    ///
    /// Accepts an optional sign, an integer part, an optional fraction and an
    /// optional exponent; at least one digit is required.
    #[must_use]
    pub fn is_number(&self) -> bool {
        if self.flags.size0 {
            return false;
        }

        let mut iter = AtomIter::new(self);
        let mut digits = 0usize;

        if matches!(iter.peekc(), Some(b'+' | b'-')) {
            iter.getc();
        }
        while matches!(iter.peekc(), Some(b'0'..=b'9')) {
            iter.getc();
            digits += 1;
        }
        if iter.peekc() == Some(b'.') {
            iter.getc();
            while matches!(iter.peekc(), Some(b'0'..=b'9')) {
                iter.getc();
                digits += 1;
            }
        }
        if matches!(iter.peekc(), Some(b'e' | b'E')) {
            iter.getc();
            if matches!(iter.peekc(), Some(b'+' | b'-')) {
                iter.getc();
            }
            let mut exp_digits = 0usize;
            while matches!(iter.peekc(), Some(b'0'..=b'9')) {
                iter.getc();
                exp_digits += 1;
            }
            if exp_digits == 0 {
                return false;
            }
        }

        // everything must be consumed, and something must have been
        iter.peekc().is_none() && digits > 0 && iter.error().is_none()
    }
}
