//! The YAML/JSON emitter.
//!
//! The emitter serialises either a pre-built [`Document`] tree (through
//! [`Emitter::emit_document`] / [`Emitter::emit_node`]) or a live stream of
//! [`EmitterEvent`]s (through [`Emitter::on_event`]). Both paths share the
//! same renderers, so their output is byte-identical.

use std::collections::VecDeque;
use std::fmt;

use smallvec::SmallVec;
use yarrow_atom::{
    char_traits::{is_generic_lb, is_lb},
    utf8,
};

use crate::{
    config::{EmitterConfig, Presentation},
    emitter::container::SaveCtx,
    emitter::event::{EmitterEvent, StreamState},
    error::{EmitError, EmitResult},
    node::{Document, DocumentState, Node, Tag},
    token::{CommentPlacement, Comments},
};

pub(crate) mod container;
pub(crate) mod event;
pub(crate) mod scalar;

/// What kind of output a write carries; handed to the [`EmitOutput`] sink so
/// colourisers and post-processors can tell content apart from structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum WriteKind {
    /// A separating whitespace.
    Whitespace,
    /// Indentation whitespace at the start of a line.
    Indent,
    /// A structural indicator character.
    Indicator,
    /// An anchor name.
    Anchor,
    /// A tag.
    Tag,
    /// A line break.
    Linebreak,
    /// A plain scalar.
    PlainScalar,
    /// A plain scalar in key position.
    PlainScalarKey,
    /// A single-quoted scalar.
    SingleQuotedScalar,
    /// A single-quoted scalar in key position.
    SingleQuotedScalarKey,
    /// A double-quoted scalar.
    DoubleQuotedScalar,
    /// A double-quoted scalar in key position.
    DoubleQuotedScalarKey,
    /// A literal block scalar body.
    LiteralScalar,
    /// A folded block scalar body.
    FoldedScalar,
    /// An alias name.
    Alias,
    /// A `%TAG` directive.
    TagDirective,
    /// A `%YAML` directive.
    VersionDirective,
    /// A `---` or `...` document indicator.
    DocumentIndicator,
    /// A comment.
    Comment,
    /// A terminating NUL, for sinks that want one.
    TerminatingZero,
}

/// An output sink for the emitter.
///
/// `String` is a sink that accepts every byte; [`FmtSink`] adapts any other
/// [`fmt::Write`]. Custom sinks can refuse bytes by reporting a short count:
/// the emitter then marks its sticky output error and keeps going
/// best-effort, so the caller can check once at the end.
pub trait EmitOutput {
    /// Write `data` of the given kind.
    ///
    /// # Return
    /// The number of bytes accepted.
    ///
    /// # Errors
    /// Returns an error when the sink cannot take output at all.
    fn write(&mut self, kind: WriteKind, data: &str) -> Result<usize, fmt::Error>;
}

impl EmitOutput for String {
    fn write(&mut self, _kind: WriteKind, data: &str) -> Result<usize, fmt::Error> {
        self.push_str(data);
        Ok(data.len())
    }
}

/// Adapter making any [`fmt::Write`] an [`EmitOutput`] sink.
pub struct FmtSink<W>(
    /// The wrapped writer.
    pub W,
);

impl<W: fmt::Write> EmitOutput for FmtSink<W> {
    fn write(&mut self, _kind: WriteKind, data: &str) -> Result<usize, fmt::Error> {
        self.0.write_str(data).map(|()| data.len())
    }
}

/// The emitter's running presentation bits.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct EmitFlags {
    /// The last byte written was a whitespace.
    pub whitespace: bool,
    /// The write position sits at a fresh indent.
    pub indentation: bool,
    /// The last block scalar was emitted with keep chomping.
    pub open_ended: bool,
    /// A `---` was written for the current document.
    pub had_document_start: bool,
    /// A `...` was written after the previous document.
    pub had_document_end: bool,
    /// At least one document was fully written.
    pub had_document_output: bool,
}

impl EmitFlags {
    /// The flags after a line break: fresh indent, everything else cleared.
    pub(crate) fn fresh_line() -> Self {
        Self {
            whitespace: true,
            indentation: true,
            ..Self::default()
        }
    }
}

/// Per-node rendering flags threaded through the renderers.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct NodeFlags {
    /// The node is the document root.
    pub root: bool,
    /// Inside a sequence item.
    pub seq: bool,
    /// Inside a mapping pair.
    pub map: bool,
    /// In simple-key position.
    pub simple: bool,
    /// In simple-key position with a scalar key.
    pub simple_scalar_key: bool,
    /// Inside a flow container.
    pub flow: bool,
    /// Block sequence items align with their parent instead of indenting.
    pub indentless: bool,
}

impl NodeFlags {
    /// Flags for a document root node.
    pub(crate) fn root() -> Self {
        Self {
            root: true,
            ..Self::default()
        }
    }
}

/// The structural indicator characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Indicator {
    QuestionMark,
    Colon,
    Dash,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Comma,
    Bar,
    Greater,
    SingleQuoteStart,
    SingleQuoteEnd,
    DoubleQuoteStart,
    DoubleQuoteEnd,
    Ampersand,
    Star,
}

/// The default `%YAML` version written when the directive is forced on.
const DEFAULT_VERSION: (u32, u32) = (1, 2);

/// The YAML serializer.
///
/// ```
/// use yarrow::{Document, Emitter, EmitterConfig, Node, ScalarStyle, ScalarToken};
///
/// let doc = Document::new(Node::sequence(vec![
///     Node::scalar(ScalarToken::new("1", ScalarStyle::Plain)),
///     Node::scalar(ScalarToken::new("2", ScalarStyle::Plain)),
/// ]));
///
/// let mut out = String::new();
/// Emitter::new(&mut out, EmitterConfig::new()).emit_document(&doc).unwrap();
/// assert_eq!(out, "- 1\n- 2\n");
/// ```
pub struct Emitter<'out, 'input> {
    cfg: EmitterConfig,
    out: &'out mut dyn EmitOutput,
    pub(crate) line: usize,
    pub(crate) column: usize,
    pub(crate) flow_level: usize,
    pub(crate) output_error: bool,
    pub(crate) flags: EmitFlags,
    // event-stream state
    pub(crate) state: StreamState,
    pub(crate) state_stack: SmallVec<[StreamState; 16]>,
    pub(crate) sc_stack: SmallVec<[SaveCtx<'input>; 4]>,
    pub(crate) sc: SaveCtx<'input>,
    pub(crate) queued: VecDeque<EmitterEvent<'input>>,
    pub(crate) s_flags: NodeFlags,
    pub(crate) s_indent: i32,
}

impl<'out, 'input> Emitter<'out, 'input> {
    /// Create a new emitter writing into `out` with the given configuration.
    pub fn new(out: &'out mut dyn EmitOutput, cfg: EmitterConfig) -> Self {
        let mut emit = Self {
            cfg,
            out,
            line: 0,
            column: 0,
            flow_level: 0,
            output_error: false,
            flags: EmitFlags::default(),
            state: StreamState::None,
            state_stack: SmallVec::new(),
            sc_stack: SmallVec::new(),
            sc: SaveCtx::default(),
            queued: VecDeque::new(),
            s_flags: NodeFlags::default(),
            s_indent: -1,
        };
        emit.reset();
        emit
    }

    /// The configuration the emitter was built with.
    #[must_use]
    pub fn config(&self) -> &EmitterConfig {
        &self.cfg
    }

    /// The current output column, in printable code points since the last
    /// line break.
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }

    /// The current output line.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Whether the sink refused output at some point.
    #[must_use]
    pub fn output_error(&self) -> bool {
        self.output_error
    }

    /// Whether the last block scalar went out with keep chomping, leaving
    /// the stream open ended.
    #[must_use]
    pub fn open_ended(&self) -> bool {
        self.flags.open_ended
    }

    /// Reset the presentation state for a new document or stream.
    ///
    /// Starts as if a previous document ended with an explicit mark, which
    /// lets implicit documents start without an indicator.
    pub(crate) fn reset(&mut self) {
        self.line = 0;
        self.column = 0;
        self.flow_level = 0;
        self.output_error = false;
        self.flags = EmitFlags {
            whitespace: true,
            indentation: true,
            had_document_end: true,
            ..EmitFlags::default()
        };
        self.state = StreamState::None;
        self.s_indent = -1;
        self.s_flags = NodeFlags::root();
        self.state_stack.clear();
        self.sc_stack.clear();
        self.sc = SaveCtx::default();
    }

    // --- writer primitives -------------------------------------------------

    /// Write `s` to the sink and account for lines and columns.
    ///
    /// CRLF counts as a single break; NEL/LS/PS break like LF. ANSI CSI
    /// colour sequences (ESC `[` ... `m`) pass through without advancing the
    /// column.
    pub(crate) fn write(&mut self, kind: WriteKind, s: &str) {
        if s.is_empty() {
            return;
        }

        match self.out.write(kind, s) {
            Ok(n) if n == s.len() => {}
            _ => self.output_error = true,
        }

        let bytes = s.as_bytes();
        let mut i = 0;
        while let Some((c, w)) = utf8::decode(&bytes[i..]) {
            if c == '\r' && bytes.get(i + 1) == Some(&b'\n') {
                i += 2;
                self.column = 0;
                self.line += 1;
                continue;
            }

            if is_generic_lb(c) {
                self.column = 0;
                self.line += 1;
                i += w;
                continue;
            }

            // pass ANSI colour escapes through without corrupting the column
            if c == '\x1b' && bytes.get(i + 1) == Some(&b'[') {
                if let Some(m) = memchr::memchr(b'm', &bytes[i..]) {
                    i += m + 1;
                    continue;
                }
            }

            self.column += 1;
            i += w;
        }
    }

    /// Write a single code point.
    pub(crate) fn putc(&mut self, kind: WriteKind, c: char) {
        let mut buf = [0u8; 4];
        let s: &str = c.encode_utf8(&mut buf);
        self.write(kind, s);
    }

    /// Write a separating space.
    pub(crate) fn write_ws(&mut self) {
        self.putc(WriteKind::Whitespace, ' ');
        self.flags.whitespace = true;
    }

    /// Move to a fresh line indented to `indent`, unless already there.
    pub(crate) fn write_indent(&mut self, indent: i32) {
        let indent = usize::try_from(indent).unwrap_or(0);

        if !self.flags.indentation
            || self.column > indent
            || (self.column == indent && !self.flags.whitespace)
        {
            self.putc(WriteKind::Linebreak, '\n');
        }

        const SPACES: &str = "                                                                ";
        while self.column < indent {
            let pad = (indent - self.column).min(SPACES.len());
            self.write(WriteKind::Indent, &SPACES[..pad]);
        }

        self.flags.whitespace = true;
        self.flags.indentation = true;
    }

    /// Write a structural indicator, with its pre- and post-conditions.
    pub(crate) fn write_indicator(
        &mut self,
        indicator: Indicator,
        flags: NodeFlags,
        indent: i32,
        kind: WriteKind,
    ) {
        match indicator {
            Indicator::QuestionMark => {
                if !self.flags.whitespace {
                    self.write_ws();
                }
                self.putc(kind, '?');
                self.flags.whitespace = false;
                self.flags.open_ended = false;
            }
            Indicator::Colon => {
                if !flags.simple {
                    if self.flow_level == 0 && !self.cfg.is_oneline() {
                        self.write_indent(indent);
                    }
                    if !self.flags.whitespace {
                        self.write_ws();
                    }
                }
                self.putc(kind, ':');
                self.flags.whitespace = false;
                self.flags.open_ended = false;
            }
            Indicator::Dash => {
                if !self.flags.whitespace {
                    self.write_ws();
                }
                self.putc(kind, '-');
                self.flags.whitespace = false;
                self.flags.open_ended = false;
            }
            Indicator::LeftBracket | Indicator::LeftBrace => {
                self.flow_level += 1;
                if !self.flags.whitespace {
                    self.write_ws();
                }
                self.putc(
                    kind,
                    if indicator == Indicator::LeftBracket {
                        '['
                    } else {
                        '{'
                    },
                );
                self.flags.whitespace = true;
                self.flags.indentation = false;
                self.flags.open_ended = false;
            }
            Indicator::RightBracket | Indicator::RightBrace => {
                self.flow_level -= 1;
                self.putc(
                    kind,
                    if indicator == Indicator::RightBracket {
                        ']'
                    } else {
                        '}'
                    },
                );
                self.flags.whitespace = false;
                self.flags.indentation = false;
                self.flags.open_ended = false;
            }
            Indicator::Comma => {
                self.putc(kind, ',');
                self.flags.whitespace = false;
                self.flags.indentation = false;
                self.flags.open_ended = false;
            }
            Indicator::Bar | Indicator::Greater => {
                if !self.flags.whitespace {
                    self.write_ws();
                }
                self.putc(kind, if indicator == Indicator::Bar { '|' } else { '>' });
                self.flags.whitespace = false;
                self.flags.indentation = false;
                self.flags.open_ended = false;
            }
            Indicator::SingleQuoteStart | Indicator::DoubleQuoteStart => {
                if !self.flags.whitespace {
                    self.write_ws();
                }
                self.putc(
                    kind,
                    if indicator == Indicator::SingleQuoteStart {
                        '\''
                    } else {
                        '"'
                    },
                );
                self.flags.whitespace = false;
                self.flags.indentation = false;
                self.flags.open_ended = false;
            }
            Indicator::SingleQuoteEnd | Indicator::DoubleQuoteEnd => {
                self.putc(
                    kind,
                    if indicator == Indicator::SingleQuoteEnd {
                        '\''
                    } else {
                        '"'
                    },
                );
                self.flags.whitespace = false;
                self.flags.indentation = false;
                self.flags.open_ended = false;
            }
            Indicator::Ampersand => {
                if !self.flags.whitespace {
                    self.write_ws();
                }
                self.putc(kind, '&');
                self.flags.whitespace = false;
                self.flags.indentation = false;
            }
            Indicator::Star => {
                if !self.flags.whitespace {
                    self.write_ws();
                }
                self.putc(kind, '*');
                self.flags.whitespace = false;
                self.flags.indentation = false;
            }
        }
    }

    /// The indent of a child of a node rendered at `indent`.
    pub(crate) fn increase_indent(&self, flags: NodeFlags, indent: i32) -> i32 {
        if indent < 0 {
            return if flags.flow { self.cfg.indent_step() } else { 0 };
        }
        if flags.indentless {
            indent
        } else {
            indent + self.cfg.indent_step()
        }
    }

    /// The configured line width.
    pub(crate) fn width(&self) -> usize {
        self.cfg.width_limit()
    }

    // --- comments ----------------------------------------------------------

    /// Whether comment output is on and a comment exists at `placement`.
    pub(crate) fn has_comment(
        &self,
        comments: Option<&Comments<'_>>,
        placement: CommentPlacement,
    ) -> bool {
        self.cfg.output_comments() && comments.is_some_and(|c| c.get(placement).is_some())
    }

    /// Write a (possibly multi-line) comment, re-indented at the current
    /// column.
    fn write_comment_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        if !self.flags.whitespace {
            self.write_ws();
        }
        let indent = i32::try_from(self.column).unwrap_or(0);

        let bytes = text.as_bytes();
        let mut run_start = 0;
        let mut i = 0;
        let mut breaks = false;
        while let Some((c, w)) = utf8::decode(&bytes[i..]) {
            if is_lb(c) {
                self.write(WriteKind::Comment, &text[run_start..i]);
                run_start = i + w;
                self.write_indent(indent);
                self.flags.indentation = true;
                breaks = true;
            } else {
                if breaks {
                    self.write(WriteKind::Comment, &text[run_start..i]);
                    run_start = i;
                    self.write_indent(indent);
                }
                self.flags.indentation = false;
                breaks = false;
            }
            i += w;
        }
        self.write(WriteKind::Comment, &text[run_start..i]);

        self.flags.whitespace = true;
        self.flags.indentation = true;
    }

    /// Emit the comment of `comments` at `placement`, if comment output is
    /// on.
    pub(crate) fn emit_comment(
        &mut self,
        comments: Option<&Comments<'_>>,
        _flags: NodeFlags,
        indent: i32,
        placement: CommentPlacement,
    ) {
        if !self.cfg.output_comments() {
            return;
        }
        let Some(text) = comments.and_then(|c| c.get(placement)) else {
            return;
        };

        if matches!(placement, CommentPlacement::Top | CommentPlacement::Bottom) {
            self.write_indent(indent);
            self.flags.whitespace = true;
        }

        self.write_comment_text(text);
        self.flags.indentation = false;

        if matches!(placement, CommentPlacement::Top | CommentPlacement::Bottom) {
            self.write_indent(indent);
            self.flags.whitespace = true;
        }
    }

    // --- node preamble -----------------------------------------------------

    /// Write a node's anchor and tag, and break the line before a decorated
    /// root.
    pub(crate) fn common_node_preamble(
        &mut self,
        anchor: Option<&str>,
        tag: Option<&Tag<'_>>,
        flags: NodeFlags,
        indent: i32,
    ) {
        if !self.cfg.is_json_mode() {
            let anchor = if self.cfg.strips_labels() { None } else { anchor };
            let tag = if self.cfg.strips_tags() { None } else { tag };

            if let Some(anchor) = anchor {
                self.write_indicator(Indicator::Ampersand, flags, indent, WriteKind::Anchor);
                self.write(WriteKind::Anchor, anchor);
            }

            if let Some(tag) = tag {
                if !self.flags.whitespace {
                    self.write_ws();
                }
                if tag.handle.is_empty() {
                    self.write(WriteKind::Tag, &format!("!<{}>", tag.suffix));
                } else {
                    self.write(WriteKind::Tag, &format!("{}{}", tag.handle, tag.suffix));
                }
                self.flags.whitespace = false;
                self.flags.indentation = false;
            }
        }

        // content for the root always starts on a new line
        if flags.root && self.column != 0 && !self.flags.had_document_start {
            self.putc(WriteKind::Linebreak, '\n');
            self.flags = EmitFlags::fresh_line();
        }
    }

    // --- document boundaries -----------------------------------------------

    /// Write the document preamble: separating `...`, `%YAML`, `%TAG`s and
    /// the `---` mark, as configuration and document state ask.
    pub(crate) fn common_document_start(
        &mut self,
        state: &DocumentState<'_>,
        root_decorated: bool,
    ) {
        let json = self.cfg.is_json_mode();
        let strip_doc = self.cfg.strips_doc();

        let vd = match self.cfg.version_directive_mode() {
            Presentation::Auto => state.version.is_some(),
            Presentation::On => true,
            Presentation::Off => false,
        } && !strip_doc;
        let td = match self.cfg.tag_directive_mode() {
            Presentation::Auto => !state.tags.is_empty(),
            Presentation::On => true,
            Presentation::Off => false,
        } && !strip_doc;

        // directives must be separated from a previous unterminated document
        if !json && (vd || td) && !self.flags.had_document_end {
            if self.column != 0 {
                self.putc(WriteKind::Linebreak, '\n');
            }
            if !strip_doc {
                self.write(WriteKind::DocumentIndicator, "...");
                self.flags.whitespace = false;
                self.flags.had_document_end = true;
            }
        }

        if !json && vd {
            let (major, minor) = state.version.unwrap_or(DEFAULT_VERSION);
            if self.column != 0 {
                self.putc(WriteKind::Linebreak, '\n');
            }
            self.write(WriteKind::VersionDirective, &format!("%YAML {major}.{minor}"));
            self.putc(WriteKind::Linebreak, '\n');
            self.flags = EmitFlags::fresh_line();
        }

        let mut had_non_default_tag = false;
        if !json && td {
            for directive in &state.tags {
                if directive.is_default() {
                    continue;
                }
                had_non_default_tag = true;

                if self.column != 0 {
                    self.putc(WriteKind::Linebreak, '\n');
                }
                self.write(
                    WriteKind::TagDirective,
                    &format!("%TAG {} {}", directive.handle, directive.prefix),
                );
                self.putc(WriteKind::Linebreak, '\n');
                self.flags = EmitFlags::fresh_line();
            }
        }

        // the document start indicator is written when:
        // - the start was explicit
        // - the document carries directives
        // - the root has a tag or an anchor
        let mut dsm = match self.cfg.doc_start_mark_mode() {
            Presentation::Auto => {
                !state.start_implicit
                    || state.version.is_some()
                    || !state.tags.is_empty()
                    || had_non_default_tag
                    || root_decorated
            }
            Presentation::On => true,
            Presentation::Off => false,
        };

        // or when a previous document went out without an end mark
        if !dsm && self.flags.had_document_output && !self.flags.had_document_end {
            dsm = true;
        }

        if !json && dsm {
            if self.column != 0 {
                self.putc(WriteKind::Linebreak, '\n');
            }
            if !strip_doc {
                self.write(WriteKind::DocumentIndicator, "---");
                self.flags.whitespace = false;
                self.flags.had_document_start = true;
            }
        } else {
            self.flags.had_document_start = false;
        }

        self.flags.had_document_end = false;
    }

    /// Close a document: final line break and the `...` mark when asked.
    pub(crate) fn common_document_end(&mut self, end_implicit: bool) {
        if self.column != 0 {
            self.putc(WriteKind::Linebreak, '\n');
            self.flags = EmitFlags::fresh_line();
        }

        let dem = match self.cfg.doc_end_mark_mode() {
            Presentation::Auto => !end_implicit,
            Presentation::On => true,
            Presentation::Off => false,
        } && !self.cfg.strips_doc();

        if !self.cfg.is_json_mode() && dem {
            self.write(WriteKind::DocumentIndicator, "...");
            self.putc(WriteKind::Linebreak, '\n');
            self.flags = EmitFlags::fresh_line();
            self.flags.had_document_end = true;
        } else {
            self.flags.had_document_end = false;
        }

        // remember that a document went out
        self.flags.had_document_output = true;
    }

    // --- document-tree emission --------------------------------------------

    /// Emit a whole document: preamble, root node with its comments, end.
    ///
    /// # Errors
    /// Returns an error when a scalar fails to decode or the sink refused
    /// output.
    pub fn emit_document(&mut self, doc: &Document<'input>) -> EmitResult {
        let root_decorated = doc
            .root
            .as_ref()
            .is_some_and(|root| root.anchor().is_some() || root.tag().is_some());

        self.common_document_start(&doc.state, root_decorated);

        if let Some(root) = &doc.root {
            let comments = root.comments();
            self.emit_comment(comments, NodeFlags::root(), -1, CommentPlacement::Top);
            self.emit_node_internal(root, NodeFlags::root(), -1)?;
            self.emit_comment(comments, NodeFlags::root(), -1, CommentPlacement::Right);
            self.emit_comment(comments, NodeFlags::root(), -1, CommentPlacement::Bottom);
        }

        self.common_document_end(doc.state.end_implicit);

        if self.output_error {
            return Err(EmitError::Output);
        }
        Ok(())
    }

    /// Emit a bare node, with no document preamble or end.
    ///
    /// # Errors
    /// Returns an error when a scalar fails to decode or the sink refused
    /// output.
    pub fn emit_node(&mut self, node: &Node<'input>) -> EmitResult {
        self.emit_node_internal(node, NodeFlags::root(), -1)?;
        if self.output_error {
            return Err(EmitError::Output);
        }
        Ok(())
    }

    /// Emit one node of the tree.
    pub(crate) fn emit_node_internal(
        &mut self,
        node: &Node<'input>,
        flags: NodeFlags,
        indent: i32,
    ) -> EmitResult {
        self.common_node_preamble(node.anchor(), node.tag(), flags, indent);

        if !matches!(node, Node::Scalar(_) | Node::Alias(_)) && flags.root && self.column != 0 {
            self.putc(WriteKind::Linebreak, '\n');
            self.flags = EmitFlags::fresh_line();
        }

        match node {
            Node::Scalar(scalar) => {
                self.emit_token_scalar(&scalar.token, scalar.tag.as_ref(), flags, indent)
            }
            Node::Alias(alias) => {
                self.write_alias(&alias.anchor, flags, indent);
                Ok(())
            }
            Node::Sequence(seq) => self.emit_sequence(seq, flags, indent),
            Node::Mapping(map) => self.emit_mapping(map, flags, indent),
        }
    }

    /// Write an alias reference.
    pub(crate) fn write_alias(&mut self, anchor: &str, flags: NodeFlags, indent: i32) {
        self.write_indicator(Indicator::Star, flags, indent, WriteKind::Alias);
        self.write(WriteKind::Alias, anchor);
    }
}

/// Emit a document to a fresh string.
///
/// # Errors
/// Returns an error when a scalar fails to decode.
pub fn emit_document_to_string(
    doc: &Document<'_>,
    cfg: EmitterConfig,
) -> Result<String, EmitError> {
    let mut out = String::new();
    Emitter::new(&mut out, cfg).emit_document(doc)?;
    Ok(out)
}

/// Emit a bare node to a fresh string, with no document preamble or end.
///
/// # Errors
/// Returns an error when a scalar fails to decode.
pub fn emit_node_to_string(node: &Node<'_>, cfg: EmitterConfig) -> Result<String, EmitError> {
    let mut out = String::new();
    Emitter::new(&mut out, cfg).emit_node(node)?;
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::{Emitter, WriteKind};
    use crate::EmitterConfig;

    fn column_after(s: &str) -> usize {
        let mut out = String::new();
        let mut emitter = Emitter::new(&mut out, EmitterConfig::new());
        emitter.write(WriteKind::PlainScalar, s);
        emitter.column()
    }

    #[test]
    fn column_counts_code_points() {
        assert_eq!(column_after("abc"), 3);
        assert_eq!(column_after("héllo"), 5);
        assert_eq!(column_after("日本語"), 3);
    }

    #[test]
    fn crlf_collapses_to_one_break() {
        let mut out = String::new();
        let mut emitter = Emitter::new(&mut out, EmitterConfig::new());
        emitter.write(WriteKind::PlainScalar, "ab\r\ncd");
        assert_eq!(emitter.line(), 1);
        assert_eq!(emitter.column(), 2);
    }

    #[test]
    fn unicode_breaks_reset_the_column() {
        for brk in ['\n', '\r', '\u{85}', '\u{2028}', '\u{2029}'] {
            assert_eq!(column_after(&format!("abcd{brk}xy")), 2, "break {brk:?}");
        }
    }

    #[test]
    fn ansi_csi_sequences_do_not_advance_the_column() {
        // The escape passes through to the sink but the column ignores it.
        let mut out = String::new();
        let mut emitter = Emitter::new(&mut out, EmitterConfig::new());
        emitter.write(WriteKind::PlainScalar, "a\x1b[31mb\x1b[0mc");
        assert_eq!(emitter.column(), 3);
        assert!(out.contains("\x1b[31m"));
    }

    #[test]
    fn short_writes_set_the_sticky_error() {
        struct Stingy;
        impl super::EmitOutput for Stingy {
            fn write(&mut self, _kind: WriteKind, data: &str) -> Result<usize, std::fmt::Error> {
                Ok(data.len().saturating_sub(1))
            }
        }

        let mut sink = Stingy;
        let mut emitter = Emitter::new(&mut sink, EmitterConfig::new());
        assert!(!emitter.output_error());
        emitter.write(WriteKind::PlainScalar, "xyz");
        assert!(emitter.output_error());
    }
}

