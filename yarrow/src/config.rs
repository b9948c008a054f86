//! Emitter configuration.

/// The overall output mode of the emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Block containers wherever possible.
    #[default]
    Block,
    /// Flow containers everywhere.
    Flow,
    /// Flow containers, everything on one line.
    FlowOneline,
    /// JSON-compatible output.
    Json,
    /// JSON-compatible output, but scalars carrying a core-schema non-string
    /// tag stay plain.
    JsonTaggedPlain,
    /// JSON-compatible output on one line.
    JsonOneline,
}

/// A tri-state presentation choice for directives and document marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presentation {
    /// Emit when the document asks for it.
    #[default]
    Auto,
    /// Always emit.
    On,
    /// Never emit.
    Off,
}

/// Configuration of an [`Emitter`].
///
/// Built with chained setters:
///
/// ```
/// use yarrow::{EmitterConfig, Mode};
///
/// let cfg = EmitterConfig::new().mode(Mode::Json).width(120).sort_keys(true);
/// assert!(cfg.is_json_mode());
/// ```
///
/// [`Emitter`]: crate::Emitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmitterConfig {
    mode: Mode,
    indent: u32,
    width: u32,
    comments: bool,
    strip_labels: bool,
    strip_tags: bool,
    strip_doc: bool,
    sort_keys: bool,
    version_directive: Presentation,
    tag_directive: Presentation,
    doc_start_mark: Presentation,
    doc_end_mark: Presentation,
}

impl EmitterConfig {
    /// The default configuration: block mode, indent 2, width 80.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output mode.
    #[must_use]
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the indentation step. Values outside 1..=9 select the default of 2.
    #[must_use]
    pub fn indent(mut self, indent: u32) -> Self {
        self.indent = indent;
        self
    }

    /// Set the preferred line width. 0 selects the default of 80; values of
    /// 254 and above disable wrapping altogether.
    #[must_use]
    pub fn width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Output comments attached to nodes and tokens.
    #[must_use]
    pub fn comments(mut self, comments: bool) -> Self {
        self.comments = comments;
        self
    }

    /// Strip anchors and aliases from the output.
    #[must_use]
    pub fn strip_labels(mut self, strip: bool) -> Self {
        self.strip_labels = strip;
        self
    }

    /// Strip tags from the output.
    #[must_use]
    pub fn strip_tags(mut self, strip: bool) -> Self {
        self.strip_tags = strip;
        self
    }

    /// Strip document directives and marks from the output.
    #[must_use]
    pub fn strip_doc(mut self, strip: bool) -> Self {
        self.strip_doc = strip;
        self
    }

    /// Emit mapping keys in sorted order instead of insertion order.
    #[must_use]
    pub fn sort_keys(mut self, sort: bool) -> Self {
        self.sort_keys = sort;
        self
    }

    /// Control emission of the `%YAML` directive.
    #[must_use]
    pub fn version_directive(mut self, p: Presentation) -> Self {
        self.version_directive = p;
        self
    }

    /// Control emission of `%TAG` directives.
    #[must_use]
    pub fn tag_directive(mut self, p: Presentation) -> Self {
        self.tag_directive = p;
        self
    }

    /// Control emission of the `---` document start mark.
    #[must_use]
    pub fn doc_start_mark(mut self, p: Presentation) -> Self {
        self.doc_start_mark = p;
        self
    }

    /// Control emission of the `...` document end mark.
    #[must_use]
    pub fn doc_end_mark(mut self, p: Presentation) -> Self {
        self.doc_end_mark = p;
        self
    }

    /// Whether the mode is one of the JSON modes.
    #[inline]
    #[must_use]
    pub fn is_json_mode(&self) -> bool {
        matches!(
            self.mode,
            Mode::Json | Mode::JsonTaggedPlain | Mode::JsonOneline
        )
    }

    /// Whether the mode is one of the flow modes.
    #[inline]
    #[must_use]
    pub fn is_flow_mode(&self) -> bool {
        matches!(self.mode, Mode::Flow | Mode::FlowOneline)
    }

    /// Whether the mode is the block mode.
    #[inline]
    #[must_use]
    pub fn is_block_mode(&self) -> bool {
        self.mode == Mode::Block
    }

    /// Whether the mode keeps everything on one line.
    #[inline]
    #[must_use]
    pub fn is_oneline(&self) -> bool {
        matches!(self.mode, Mode::FlowOneline | Mode::JsonOneline)
    }

    /// Whether scalars with a core-schema non-string tag stay plain in JSON.
    #[inline]
    #[must_use]
    pub(crate) fn is_json_tagged_plain(&self) -> bool {
        self.mode == Mode::JsonTaggedPlain
    }

    /// The effective indentation step.
    #[must_use]
    pub(crate) fn indent_step(&self) -> i32 {
        if (1..=9).contains(&self.indent) {
            self.indent as i32
        } else {
            2
        }
    }

    /// The effective line width; `usize::MAX` when wrapping is off.
    #[must_use]
    pub(crate) fn width_limit(&self) -> usize {
        match self.width {
            0 => 80,
            w if w >= 254 => usize::MAX,
            w => w as usize,
        }
    }

    pub(crate) fn output_comments(&self) -> bool {
        self.comments
    }

    pub(crate) fn strips_labels(&self) -> bool {
        self.strip_labels
    }

    pub(crate) fn strips_tags(&self) -> bool {
        self.strip_tags
    }

    pub(crate) fn strips_doc(&self) -> bool {
        self.strip_doc
    }

    pub(crate) fn sorts_keys(&self) -> bool {
        self.sort_keys
    }

    pub(crate) fn version_directive_mode(&self) -> Presentation {
        self.version_directive
    }

    pub(crate) fn tag_directive_mode(&self) -> Presentation {
        self.tag_directive
    }

    pub(crate) fn doc_start_mark_mode(&self) -> Presentation {
        self.doc_start_mark
    }

    pub(crate) fn doc_end_mark_mode(&self) -> Presentation {
        self.doc_end_mark
    }
}

#[cfg(test)]
mod test {
    use super::{EmitterConfig, Mode};

    #[test]
    fn indent_clamps_to_default() {
        assert_eq!(EmitterConfig::new().indent_step(), 2);
        assert_eq!(EmitterConfig::new().indent(4).indent_step(), 4);
        assert_eq!(EmitterConfig::new().indent(10).indent_step(), 2);
    }

    #[test]
    fn width_sentinels() {
        assert_eq!(EmitterConfig::new().width_limit(), 80);
        assert_eq!(EmitterConfig::new().width(40).width_limit(), 40);
        assert_eq!(EmitterConfig::new().width(254).width_limit(), usize::MAX);
    }

    #[test]
    fn mode_predicates() {
        assert!(EmitterConfig::new().is_block_mode());
        assert!(EmitterConfig::new().mode(Mode::JsonOneline).is_json_mode());
        assert!(EmitterConfig::new().mode(Mode::JsonOneline).is_oneline());
        assert!(EmitterConfig::new().mode(Mode::Flow).is_flow_mode());
        assert!(!EmitterConfig::new().mode(Mode::Flow).is_oneline());
    }
}
