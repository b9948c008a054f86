//! Scalar tokens: the unit the scalar renderers work on.

use std::borrow::Cow;

use yarrow_atom::{
    char_traits::{is_generic_lb, is_lb, is_ws},
    Atom, AtomError, AtomIter,
};

/// The style a scalar asks to be rendered with.
///
/// [`Any`] lets the emitter choose between plain and double-quoted based on
/// the text; the other styles are honored unless the mode forbids them.
///
/// [`Any`]: ScalarStyle::Any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalarStyle {
    /// Let the emitter pick.
    #[default]
    Any,
    /// Plain (unquoted).
    Plain,
    /// Single-quoted.
    SingleQuoted,
    /// Double-quoted.
    DoubleQuoted,
    /// Literal block scalar (`|`).
    Literal,
    /// Folded block scalar (`>`).
    Folded,
}

/// Where a comment sits relative to its node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentPlacement {
    /// On the line(s) before the node.
    Top,
    /// After the node, on the same line.
    Right,
    /// On the line(s) after the node.
    Bottom,
}

/// The comments attached to a node or token, by placement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comments<'input> {
    /// Comment emitted on its own line(s) before the node.
    pub top: Option<Cow<'input, str>>,
    /// Comment emitted after the node on the same line.
    pub right: Option<Cow<'input, str>>,
    /// Comment emitted on its own line(s) after the node.
    pub bottom: Option<Cow<'input, str>>,
}

impl<'input> Comments<'input> {
    /// The comment at the given placement, if any.
    #[must_use]
    pub fn get(&self, placement: CommentPlacement) -> Option<&str> {
        match placement {
            CommentPlacement::Top => self.top.as_deref(),
            CommentPlacement::Right => self.right.as_deref(),
            CommentPlacement::Bottom => self.bottom.as_deref(),
        }
    }

    /// Whether no comment is attached at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.right.is_none() && self.bottom.is_none()
    }
}

/// Where a scalar token's text comes from.
#[derive(Debug, Clone)]
enum ScalarSource<'input> {
    /// Logical text, already unfolded.
    Text(Cow<'input, str>),
    /// A raw atom; the iterator unfolds it on demand.
    Atom(Atom<'input>),
}

/// A scalar to emit: its text (as logical text or as a raw atom), the style
/// it asks for, and any attached comments.
#[derive(Debug, Clone)]
pub struct ScalarToken<'input> {
    source: ScalarSource<'input>,
    style: ScalarStyle,
    comments: Comments<'input>,
}

impl<'input> ScalarToken<'input> {
    /// Build a token over logical text.
    #[must_use]
    pub fn new(text: impl Into<Cow<'input, str>>, style: ScalarStyle) -> Self {
        Self {
            source: ScalarSource::Text(text.into()),
            style,
            comments: Comments::default(),
        }
    }

    /// Build a token over a raw atom; the style is taken from the atom.
    #[must_use]
    pub fn from_atom(atom: Atom<'input>) -> Self {
        use yarrow_atom::AtomStyle;
        let style = match atom.style() {
            AtomStyle::SingleQuoted => ScalarStyle::SingleQuoted,
            AtomStyle::DoubleQuoted | AtomStyle::DoubleQuotedManual => ScalarStyle::DoubleQuoted,
            AtomStyle::Literal => ScalarStyle::Literal,
            AtomStyle::Folded => ScalarStyle::Folded,
            AtomStyle::Plain | AtomStyle::Uri | AtomStyle::Comment => ScalarStyle::Plain,
        };
        Self {
            source: ScalarSource::Atom(atom),
            style,
            comments: Comments::default(),
        }
    }

    /// Override the requested style.
    #[must_use]
    pub fn with_style(mut self, style: ScalarStyle) -> Self {
        self.style = style;
        self
    }

    /// Attach comments to the token.
    #[must_use]
    pub fn with_comments(mut self, comments: Comments<'input>) -> Self {
        self.comments = comments;
        self
    }

    /// The requested style.
    #[must_use]
    pub fn style(&self) -> ScalarStyle {
        self.style
    }

    /// The attached comments.
    #[must_use]
    pub fn comments(&self) -> &Comments<'input> {
        &self.comments
    }

    /// The logical text of the scalar.
    ///
    /// # Errors
    /// Returns an error when an atom-backed token cannot be decoded.
    pub fn text(&self) -> Result<Cow<'_, str>, AtomError> {
        match &self.source {
            ScalarSource::Text(t) => Ok(Cow::Borrowed(t.as_ref())),
            ScalarSource::Atom(atom) => atom.text(),
        }
    }

    /// Whether the scalar has no text at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.source {
            ScalarSource::Text(t) => t.is_empty(),
            ScalarSource::Atom(atom) => atom.is_empty(),
        }
    }

    /// The text to write verbatim, when writing it verbatim is the identity.
    ///
    /// For atom-backed tokens this is the raw slice of atoms marked for
    /// direct output; for text tokens, the text itself when it is single
    /// line with no surrounding whitespace. Writers with escaping rules
    /// apply their own further checks.
    #[must_use]
    pub(crate) fn direct_output(&self) -> Option<&str> {
        match &self.source {
            ScalarSource::Text(t) => {
                let first_ok = !t.starts_with(|c: char| is_ws(c) || is_lb(c));
                let last_ok = !t.ends_with(|c: char| is_ws(c) || is_lb(c));
                (first_ok && last_ok && !t.contains(is_generic_lb)).then_some(t.as_ref())
            }
            ScalarSource::Atom(atom) => {
                if !atom.direct_output() {
                    return None;
                }
                std::str::from_utf8(atom.data()).ok()
            }
        }
    }

    /// Whether the logical text starts with whitespace or a line break.
    ///
    /// Decides whether a block scalar needs an explicit indent indicator.
    #[must_use]
    pub(crate) fn starts_with_ws_or_lb(&self) -> bool {
        match &self.source {
            ScalarSource::Text(t) => t.starts_with(|c: char| is_ws(c) || is_lb(c)),
            ScalarSource::Atom(atom) => atom.starts_with_ws() || atom.starts_with_lb(),
        }
    }

    /// Whether the logical text ends with a line break.
    #[must_use]
    pub(crate) fn ends_with_lb(&self) -> bool {
        match &self.source {
            ScalarSource::Text(t) => t.ends_with(is_lb),
            ScalarSource::Atom(atom) => atom.ends_with_lb(),
        }
    }

    /// Whether the logical text ends with more than one line break.
    #[must_use]
    pub(crate) fn trailing_lb(&self) -> bool {
        match &self.source {
            ScalarSource::Text(t) => t.chars().rev().take_while(|&c| is_lb(c)).count() > 1,
            ScalarSource::Atom(atom) => atom.trailing_lb(),
        }
    }

    /// A code-point cursor over the logical text.
    #[must_use]
    pub(crate) fn chars(&self) -> TokenChars<'_, 'input> {
        match &self.source {
            ScalarSource::Text(t) => TokenChars::Str(t.chars().peekable()),
            ScalarSource::Atom(atom) => TokenChars::Iter(AtomIter::new(atom)),
        }
    }
}

impl Default for ScalarToken<'_> {
    fn default() -> Self {
        Self::new("", ScalarStyle::Any)
    }
}

impl PartialEq for ScalarToken<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.text().ok() == other.text().ok()
    }
}

impl Eq for ScalarToken<'_> {}

impl std::hash::Hash for ScalarToken<'_> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.text().ok().hash(state);
    }
}

/// A unified code-point cursor over either token source.
pub(crate) enum TokenChars<'a, 'input> {
    Str(std::iter::Peekable<std::str::Chars<'a>>),
    Iter(AtomIter<'a, 'input>),
}

impl TokenChars<'_, '_> {
    /// The next code point, or `None` at the end (or on a decode error,
    /// which [`finish`] reports).
    ///
    /// [`finish`]: Self::finish
    pub(crate) fn next(&mut self) -> Option<char> {
        match self {
            TokenChars::Str(chars) => chars.next(),
            TokenChars::Iter(iter) => iter.utf8_get(),
        }
    }

    /// The next code point without consuming it.
    pub(crate) fn peek(&mut self) -> Option<char> {
        match self {
            TokenChars::Str(chars) => chars.peek().copied(),
            TokenChars::Iter(iter) => iter.utf8_peek(),
        }
    }

    /// Report any decode error hit while iterating.
    pub(crate) fn finish(self) -> Result<(), AtomError> {
        match self {
            TokenChars::Str(_) => Ok(()),
            TokenChars::Iter(iter) => match iter.error() {
                Some(e) => Err(e),
                None => Ok(()),
            },
        }
    }
}
