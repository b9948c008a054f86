//! Container rendering: sequence and mapping prologs, items and epilogs.
//!
//! These functions are shared between the document-tree walkers below and
//! the event-stream state machine, which is what keeps the two emission
//! modes byte-identical.

use crate::{
    analyze,
    emitter::{Emitter, Indicator, NodeFlags, WriteKind},
    error::EmitResult,
    token::{CommentPlacement, Comments},
    MappingNode, Node, SequenceNode,
};

/// The per-container state snapshot stacked while rendering nested
/// containers.
#[derive(Debug, Clone, Default)]
pub(crate) struct SaveCtx<'input> {
    /// Render flags of the container.
    pub flags: NodeFlags,
    /// Indent of the container's items.
    pub indent: i32,
    /// Indent the container itself sits at; closing indicators align here.
    pub old_indent: i32,
    /// Whether the container renders in flow form.
    pub flow: bool,
    /// Whether the container's source was written in flow form.
    pub flow_token: bool,
    /// Whether the container has no children.
    pub empty: bool,
    /// Streaming flags to restore when the container is popped.
    pub s_flags: NodeFlags,
    /// Streaming indent to restore when the container is popped.
    pub s_indent: i32,
    /// Whether the pending mapping key was an alias.
    pub last_key_is_alias: bool,
    /// Comments of the pending mapping key, for its epilog.
    pub last_key_comments: Option<Comments<'input>>,
    /// Comments of the pending sequence item, for its epilog.
    pub last_item_comments: Option<Comments<'input>>,
    /// Comments of the pending mapping value, for its epilog.
    pub last_value_comments: Option<Comments<'input>>,
}

impl<'input> Emitter<'_, 'input> {
    // --- sequences ---------------------------------------------------------

    /// Open a sequence: decide flow or block, write `[` when flow.
    pub(crate) fn sequence_prolog(&mut self, sc: &mut SaveCtx<'input>) {
        let json = self.config().is_json_mode();
        let oneline = self.config().is_oneline();

        sc.old_indent = sc.indent;
        if json {
            sc.flags.flow = true;
            sc.flags.indentless = false;
            self.write_indicator(
                Indicator::LeftBracket,
                sc.flags,
                sc.indent,
                WriteKind::Indicator,
            );
        } else {
            sc.flow = if self.config().is_flow_mode() {
                true
            } else if self.config().is_block_mode() {
                false
            } else {
                self.flow_level > 0 || sc.flow_token || sc.empty
            };

            if sc.flow {
                if self.flow_level == 0 {
                    sc.indent = self.increase_indent(sc.flags, sc.indent);
                    sc.old_indent = sc.indent;
                }
                sc.flags.flow = true;
                sc.flags.indentless = false;
                self.write_indicator(
                    Indicator::LeftBracket,
                    sc.flags,
                    sc.indent,
                    WriteKind::Indicator,
                );
            } else {
                sc.flags.flow = false;
                // in a mapping value position the dashes align with the key
                sc.flags.indentless = sc.flags.map;
            }
        }

        if !oneline {
            sc.indent = self.increase_indent(sc.flags, sc.indent);
        }
        sc.flags.root = false;
    }

    /// Close a sequence: `]` aligned to the old indent when flow.
    pub(crate) fn sequence_epilog(&mut self, sc: &mut SaveCtx<'input>) {
        if sc.flow || self.config().is_json_mode() {
            if !self.config().is_oneline() && !sc.empty {
                self.write_indent(sc.old_indent);
            }
            self.write_indicator(
                Indicator::RightBracket,
                sc.flags,
                sc.old_indent,
                WriteKind::Indicator,
            );
        }
    }

    /// Start one sequence item: indent, `-` in block, the item's top
    /// comment.
    pub(crate) fn sequence_item_prolog(
        &mut self,
        sc: &mut SaveCtx<'input>,
        comments: Option<&Comments<'_>>,
    ) {
        sc.flags.seq = true;

        if !self.config().is_oneline() {
            self.write_indent(sc.indent);
        }

        if !sc.flow && !self.config().is_json_mode() {
            self.write_indicator(Indicator::Dash, sc.flags, sc.indent, WriteKind::Indicator);
        }

        if self.has_comment(comments, CommentPlacement::Top) {
            let mut tmp_indent = sc.indent;
            if !sc.flow && !self.config().is_json_mode() {
                tmp_indent = self.increase_indent(sc.flags, sc.indent);
            }
            self.emit_comment(comments, sc.flags, tmp_indent, CommentPlacement::Top);
        }
    }

    /// Finish one sequence item: `,` unless last, right comment, closing
    /// indent.
    pub(crate) fn sequence_item_epilog(
        &mut self,
        sc: &mut SaveCtx<'input>,
        last: bool,
        comments: Option<&Comments<'_>>,
    ) {
        let json = self.config().is_json_mode();

        if (sc.flow || json) && !last {
            self.write_indicator(Indicator::Comma, sc.flags, sc.indent, WriteKind::Indicator);
        }

        self.emit_comment(comments, sc.flags, sc.indent, CommentPlacement::Right);

        if last && (sc.flow || json) && !self.config().is_oneline() && !sc.empty {
            self.write_indent(sc.old_indent);
        }

        sc.flags.seq = false;
    }

    /// Walk a sequence node of the document tree.
    pub(crate) fn emit_sequence(
        &mut self,
        seq: &SequenceNode<'input>,
        flags: NodeFlags,
        indent: i32,
    ) -> EmitResult {
        let mut sc = SaveCtx {
            flags,
            indent,
            old_indent: indent,
            flow_token: seq.flow,
            empty: seq.items.is_empty(),
            ..SaveCtx::default()
        };

        self.sequence_prolog(&mut sc);

        let count = seq.items.len();
        for (i, item) in seq.items.iter().enumerate() {
            let last = i + 1 == count;
            let comments = item.comments();
            self.sequence_item_prolog(&mut sc, comments);
            // items are not mapping values; the map bit must not leak into
            // nested containers or they would render indentless
            let item_flags = NodeFlags {
                map: false,
                ..sc.flags
            };
            self.emit_node_internal(item, item_flags, sc.indent)?;
            self.sequence_item_epilog(&mut sc, last, comments);
        }

        self.sequence_epilog(&mut sc);
        Ok(())
    }

    // --- mappings ----------------------------------------------------------

    /// Open a mapping: decide flow or block, write `{` when flow.
    pub(crate) fn mapping_prolog(&mut self, sc: &mut SaveCtx<'input>) {
        let json = self.config().is_json_mode();
        let oneline = self.config().is_oneline();

        sc.old_indent = sc.indent;
        if json {
            sc.flags.flow = true;
            sc.flags.indentless = false;
            self.write_indicator(
                Indicator::LeftBrace,
                sc.flags,
                sc.indent,
                WriteKind::Indicator,
            );
        } else {
            sc.flow = if self.config().is_flow_mode() {
                true
            } else if self.config().is_block_mode() {
                false
            } else {
                self.flow_level > 0 || sc.flow_token || sc.empty
            };

            if sc.flow {
                if self.flow_level == 0 {
                    sc.indent = self.increase_indent(sc.flags, sc.indent);
                    sc.old_indent = sc.indent;
                }
                sc.flags.flow = true;
                sc.flags.indentless = false;
                self.write_indicator(
                    Indicator::LeftBrace,
                    sc.flags,
                    sc.indent,
                    WriteKind::Indicator,
                );
            } else {
                sc.flags.flow = false;
                sc.flags.indentless = false;
            }
        }

        if !oneline && !sc.empty {
            sc.indent = self.increase_indent(sc.flags, sc.indent);
        }
        sc.flags.root = false;
    }

    /// Close a mapping: `}` aligned to the old indent when flow.
    pub(crate) fn mapping_epilog(&mut self, sc: &mut SaveCtx<'input>) {
        if sc.flow || self.config().is_json_mode() {
            if !self.config().is_oneline() && !sc.empty {
                self.write_indent(sc.old_indent);
            }
            self.write_indicator(
                Indicator::RightBrace,
                sc.flags,
                sc.old_indent,
                WriteKind::Indicator,
            );
        }
    }

    /// Start a mapping key: indent, `?` for complex keys.
    pub(crate) fn mapping_key_prolog(
        &mut self,
        sc: &mut SaveCtx<'input>,
        simple_key: bool,
        key_is_scalar: bool,
    ) {
        sc.flags = NodeFlags {
            map: true,
            ..NodeFlags::default()
        };
        if simple_key {
            sc.flags.simple = true;
            if key_is_scalar {
                sc.flags.simple_scalar_key = true;
            }
        }

        if !self.config().is_oneline() {
            self.write_indent(sc.indent);
        }

        if !sc.flags.simple {
            self.write_indicator(
                Indicator::QuestionMark,
                sc.flags,
                sc.indent,
                WriteKind::Indicator,
            );
        }
    }

    /// Finish a mapping key: the `:` indicator and the key's right comment.
    pub(crate) fn mapping_key_epilog(
        &mut self,
        sc: &mut SaveCtx<'input>,
        key_comments: Option<&Comments<'_>>,
        key_is_alias: bool,
    ) {
        // an alias key always gets an extra whitespace before the colon
        if key_is_alias {
            self.write_ws();
        }

        sc.flags.map = false;

        self.write_indicator(Indicator::Colon, sc.flags, sc.indent, WriteKind::Indicator);

        if self.has_comment(key_comments, CommentPlacement::Right) {
            let mut tmp_indent = sc.indent;
            if !sc.flow && !self.config().is_json_mode() {
                tmp_indent = self.increase_indent(sc.flags, sc.indent);
            }
            self.emit_comment(key_comments, sc.flags, tmp_indent, CommentPlacement::Right);
            self.write_indent(tmp_indent);
        }

        sc.flags = NodeFlags {
            map: true,
            ..NodeFlags::default()
        };
    }

    /// Finish a mapping value: `,` unless last, right comment, closing
    /// indent.
    pub(crate) fn mapping_value_epilog(
        &mut self,
        sc: &mut SaveCtx<'input>,
        last: bool,
        comments: Option<&Comments<'_>>,
    ) {
        let json = self.config().is_json_mode();

        if (sc.flow || json) && !last {
            self.write_indicator(Indicator::Comma, sc.flags, sc.indent, WriteKind::Indicator);
        }

        self.emit_comment(comments, sc.flags, sc.indent, CommentPlacement::Right);

        if last && (sc.flow || json) && !self.config().is_oneline() && !sc.empty {
            self.write_indent(sc.old_indent);
        }

        sc.flags.map = false;
    }

    /// Whether a key node can stand as a simple key.
    pub(crate) fn node_is_simple_key(key: &Node<'_>) -> bool {
        match key {
            Node::Scalar(s) => s
                .token
                .text()
                .is_ok_and(|text| analyze::is_simple_key(&text)),
            Node::Sequence(s) => s.items.is_empty(),
            Node::Mapping(m) => m.pairs.is_empty(),
            Node::Alias(_) => true,
        }
    }

    /// Walk a mapping node of the document tree.
    pub(crate) fn emit_mapping(
        &mut self,
        map: &MappingNode<'input>,
        flags: NodeFlags,
        indent: i32,
    ) -> EmitResult {
        let mut sc = SaveCtx {
            flags,
            indent,
            old_indent: indent,
            flow_token: map.flow,
            empty: map.pairs.is_empty(),
            ..SaveCtx::default()
        };

        self.mapping_prolog(&mut sc);

        let pairs: Vec<(&Node<'input>, &Node<'input>)> = if self.config().sorts_keys() {
            map.sorted_pairs()
        } else {
            map.pairs.iter().collect()
        };

        let count = pairs.len();
        for (i, (key, value)) in pairs.into_iter().enumerate() {
            let last = i + 1 == count;

            let simple_key = Self::node_is_simple_key(key);
            self.mapping_key_prolog(&mut sc, simple_key, matches!(key, Node::Scalar(_)));
            self.emit_node_internal(key, sc.flags, sc.indent)?;
            self.mapping_key_epilog(&mut sc, key.comments(), matches!(key, Node::Alias(_)));

            self.emit_node_internal(value, sc.flags, sc.indent)?;
            self.mapping_value_epilog(&mut sc, last, value.comments());
        }

        self.mapping_epilog(&mut sc);
        Ok(())
    }
}
