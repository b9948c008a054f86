//! The event-driven emitter state machine.
//!
//! Events are queued and only processed once enough lookahead is available
//! to make the flow-vs-block decision for the container being opened. The
//! handlers drive the same prolog/epilog renderers as the document-tree
//! walkers, so both modes produce identical bytes.

use std::borrow::Cow;

use crate::{
    analyze,
    emitter::{container::SaveCtx, EmitFlags, Emitter, NodeFlags, WriteKind},
    error::{EmitError, EmitResult},
    node::{DocumentState, Tag},
    token::{Comments, ScalarToken},
};

/// The states of the event-driven emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum StreamState {
    /// No event seen yet.
    #[default]
    None,
    /// Expecting the stream start.
    StreamStart,
    /// Expecting the first document start (or the stream end).
    FirstDocumentStart,
    /// Expecting a document start (or the stream end).
    DocumentStart,
    /// Expecting the document's root node.
    DocumentContent,
    /// Expecting the document end.
    DocumentEnd,
    /// Expecting the first item of a sequence (or its end).
    SequenceFirstItem,
    /// Expecting a further item of a sequence (or its end).
    SequenceItem,
    /// Expecting the first key of a mapping (or its end).
    MappingFirstKey,
    /// Expecting a further key of a mapping (or its end).
    MappingKey,
    /// Expecting the value of a simple key.
    MappingSimpleValue,
    /// Expecting the value of a complex key.
    MappingValue,
    /// The stream ended; no further event is accepted.
    End,
}

/// YAML events to feed the emitter.
///
/// ```
/// use yarrow::{Emitter, EmitterConfig, EmitterEvent, ScalarStyle, ScalarToken};
///
/// let mut out = String::new();
/// let mut emitter = Emitter::new(&mut out, EmitterConfig::new());
/// for event in [
///     EmitterEvent::StreamStart,
///     EmitterEvent::document_start(),
///     EmitterEvent::sequence_start(),
///     EmitterEvent::scalar(ScalarToken::new("a", ScalarStyle::Plain)),
///     EmitterEvent::scalar(ScalarToken::new("b", ScalarStyle::Plain)),
///     EmitterEvent::SequenceEnd,
///     EmitterEvent::DocumentEnd { explicit: false },
///     EmitterEvent::StreamEnd,
/// ] {
///     emitter.on_event(event).unwrap();
/// }
/// assert_eq!(out, "- a\n- b\n");
/// ```
#[derive(Debug, Clone)]
pub enum EmitterEvent<'input> {
    /// The stream started; must be the first event.
    StreamStart,
    /// The stream ended; no further event is accepted.
    StreamEnd,
    /// A document starts, with its directives and mark implicitness.
    DocumentStart {
        /// The directives and mark implicitness of the document.
        state: DocumentState<'input>,
    },
    /// The current document ends.
    DocumentEnd {
        /// Whether to write the `...` end mark.
        explicit: bool,
    },
    /// A scalar node.
    Scalar {
        /// The scalar token.
        token: ScalarToken<'input>,
        /// Optional anchor name.
        anchor: Option<Cow<'input, str>>,
        /// Optional tag.
        tag: Option<Tag<'input>>,
    },
    /// An alias node.
    Alias {
        /// The anchor name referred to.
        anchor: Cow<'input, str>,
    },
    /// A sequence starts.
    SequenceStart {
        /// Optional anchor name.
        anchor: Option<Cow<'input, str>>,
        /// Optional tag.
        tag: Option<Tag<'input>>,
        /// Whether the source wrote the sequence in flow form.
        flow: bool,
        /// Comments attached to the sequence.
        comments: Comments<'input>,
    },
    /// The current sequence ends.
    SequenceEnd,
    /// A mapping starts.
    MappingStart {
        /// Optional anchor name.
        anchor: Option<Cow<'input, str>>,
        /// Optional tag.
        tag: Option<Tag<'input>>,
        /// Whether the source wrote the mapping in flow form.
        flow: bool,
        /// Comments attached to the mapping.
        comments: Comments<'input>,
    },
    /// The current mapping ends.
    MappingEnd,
}

impl<'input> EmitterEvent<'input> {
    /// A document start with default (implicit) presentation.
    #[must_use]
    pub fn document_start() -> Self {
        Self::DocumentStart {
            state: DocumentState::default(),
        }
    }

    /// A scalar without anchor or tag.
    #[must_use]
    pub fn scalar(token: ScalarToken<'input>) -> Self {
        Self::Scalar {
            token,
            anchor: None,
            tag: None,
        }
    }

    /// A block sequence start without anchor or tag.
    #[must_use]
    pub fn sequence_start() -> Self {
        Self::SequenceStart {
            anchor: None,
            tag: None,
            flow: false,
            comments: Comments::default(),
        }
    }

    /// A block mapping start without anchor or tag.
    #[must_use]
    pub fn mapping_start() -> Self {
        Self::MappingStart {
            anchor: None,
            tag: None,
            flow: false,
            comments: Comments::default(),
        }
    }

    /// The comments attached to the event's node, if any.
    fn comments(&self) -> Option<&Comments<'input>> {
        match self {
            Self::Scalar { token, .. } => Some(token.comments()),
            Self::SequenceStart { comments, .. } | Self::MappingStart { comments, .. } => {
                Some(comments)
            }
            _ => None,
        }
    }

    /// Whether the event opens or closes a nesting level, for the lookahead
    /// scan.
    fn nesting(&self) -> i32 {
        match self {
            Self::StreamStart
            | Self::DocumentStart { .. }
            | Self::SequenceStart { .. }
            | Self::MappingStart { .. } => 1,
            Self::StreamEnd
            | Self::DocumentEnd { .. }
            | Self::SequenceEnd
            | Self::MappingEnd => -1,
            Self::Scalar { .. } | Self::Alias { .. } => 0,
        }
    }
}

impl<'input> Emitter<'_, 'input> {
    /// Feed one event into the emitter.
    ///
    /// Events are queued; output happens once enough lookahead is available.
    ///
    /// # Errors
    /// Returns an error when the event is incoherent with the preceding
    /// sequence of events or when a scalar fails to decode. After an error
    /// the emitter refuses further events.
    pub fn on_event(&mut self, event: EmitterEvent<'input>) -> EmitResult {
        if self.state == StreamState::None {
            self.state = StreamState::StreamStart;
        }

        self.queued.push_back(event);

        while let Some(event) = self.next_ready_event() {
            debug_println!("emit: {:?} <- {:?}", self.state, event);
            if let Err(err) = self.handle_event(event) {
                self.state = StreamState::End;
                return Err(err);
            }
        }

        Ok(())
    }

    /// Whether enough events are queued to process the head event.
    ///
    /// A document start needs one event of lookahead, a sequence start two
    /// and a mapping start three, unless the nesting closes earlier.
    fn ready(&self) -> bool {
        let Some(head) = self.queued.front() else {
            return false;
        };

        let need = match head {
            EmitterEvent::DocumentStart { .. } => 1,
            EmitterEvent::SequenceStart { .. } => 2,
            EmitterEvent::MappingStart { .. } => 3,
            _ => return true,
        };

        let mut level = 0i32;
        for (i, event) in self.queued.iter().enumerate() {
            if i + 1 > need {
                return true;
            }
            level += event.nesting();
            if level == 0 {
                return true;
            }
        }

        false
    }

    /// Pop the next event once the lookahead allows processing it.
    fn next_ready_event(&mut self) -> Option<EmitterEvent<'input>> {
        if !self.ready() {
            return None;
        }
        self.queued.pop_front()
    }

    /// Peek the next event, with the same lookahead gating as popping.
    fn peek_next_event(&self) -> Option<&EmitterEvent<'input>> {
        if !self.ready() {
            return None;
        }
        self.queued.front()
    }

    /// Whether the sequence being opened has no items.
    fn streaming_sequence_empty(&self) -> bool {
        matches!(self.peek_next_event(), None | Some(EmitterEvent::SequenceEnd))
    }

    /// Whether the mapping being opened has no pairs.
    fn streaming_mapping_empty(&self) -> bool {
        matches!(self.peek_next_event(), None | Some(EmitterEvent::MappingEnd))
    }

    fn push_state(&mut self, state: StreamState) {
        self.state_stack.push(state);
    }

    fn pop_state(&mut self) -> StreamState {
        self.state_stack.pop().unwrap_or(StreamState::None)
    }

    fn push_sc(&mut self) {
        let sc = std::mem::take(&mut self.sc);
        self.sc_stack.push(sc);
    }

    fn pop_sc(&mut self) -> Result<SaveCtx<'input>, EmitError> {
        self.sc_stack
            .pop()
            .ok_or(EmitError::EventError("container end without start"))
    }

    /// Dispatch one event according to the current state.
    fn handle_event(&mut self, event: EmitterEvent<'input>) -> EmitResult {
        match self.state {
            StreamState::StreamStart => self.handle_stream_start(&event),
            StreamState::FirstDocumentStart | StreamState::DocumentStart => {
                self.handle_document_start(event)
            }
            StreamState::DocumentContent => self.handle_document_content(event),
            StreamState::DocumentEnd => self.handle_document_end(&event),
            StreamState::SequenceFirstItem => self.handle_sequence_item(event, true),
            StreamState::SequenceItem => self.handle_sequence_item(event, false),
            StreamState::MappingFirstKey => self.handle_mapping_key(event, true),
            StreamState::MappingKey => self.handle_mapping_key(event, false),
            StreamState::MappingSimpleValue | StreamState::MappingValue => {
                self.handle_mapping_value(event)
            }
            StreamState::End => Err(EmitError::EventError("event after stream end")),
            StreamState::None => Err(EmitError::EventError("event before stream start")),
        }
    }

    fn handle_stream_start(&mut self, event: &EmitterEvent<'input>) -> EmitResult {
        let EmitterEvent::StreamStart = event else {
            return Err(EmitError::EventError("expected stream start"));
        };
        self.reset();
        self.state = StreamState::FirstDocumentStart;
        Ok(())
    }

    fn handle_document_start(&mut self, event: EmitterEvent<'input>) -> EmitResult {
        match event {
            EmitterEvent::StreamEnd => {
                self.state = StreamState::End;
                Ok(())
            }
            EmitterEvent::DocumentStart { state } => {
                self.common_document_start(&state, false);
                self.state = StreamState::DocumentContent;
                Ok(())
            }
            _ => Err(EmitError::EventError(
                "expected document start or stream end",
            )),
        }
    }

    fn handle_document_content(&mut self, event: EmitterEvent<'input>) -> EmitResult {
        self.push_state(StreamState::DocumentEnd);
        self.streaming_node(event, NodeFlags::root())
    }

    fn handle_document_end(&mut self, event: &EmitterEvent<'input>) -> EmitResult {
        let EmitterEvent::DocumentEnd { explicit } = event else {
            return Err(EmitError::EventError("expected document end"));
        };
        self.common_document_end(!explicit);
        self.reset();
        self.state = StreamState::DocumentStart;
        Ok(())
    }

    /// Render one node event, entering container states for nested
    /// containers.
    fn streaming_node(&mut self, event: EmitterEvent<'input>, flags: NodeFlags) -> EmitResult {
        // content for a container at the root starts on a new line
        if !matches!(
            event,
            EmitterEvent::Scalar { .. } | EmitterEvent::Alias { .. }
        ) && self.s_flags.root
            && self.column != 0
        {
            self.putc(WriteKind::Linebreak, '\n');
            self.flags = EmitFlags::fresh_line();
        }

        self.s_flags = flags;

        match event {
            EmitterEvent::Alias { anchor } => {
                self.write_alias(&anchor, self.s_flags, self.s_indent);
                self.state = self.pop_state();
                Ok(())
            }

            EmitterEvent::Scalar { token, anchor, tag } => {
                self.common_node_preamble(
                    anchor.as_deref(),
                    tag.as_ref(),
                    self.s_flags,
                    self.s_indent,
                );
                self.emit_token_scalar(&token, tag.as_ref(), self.s_flags, self.s_indent)?;
                self.state = self.pop_state();
                Ok(())
            }

            EmitterEvent::SequenceStart {
                anchor,
                tag,
                flow,
                comments: _,
            } => {
                self.push_sc();
                let s_flags = self.s_flags;
                let s_indent = self.s_indent;

                self.common_node_preamble(
                    anchor.as_deref(),
                    tag.as_ref(),
                    self.s_flags,
                    self.s_indent,
                );

                let mut sc = SaveCtx {
                    // the map bit carries through so a sequence in mapping
                    // value position renders indentless, as in tree mode
                    flags: NodeFlags {
                        seq: true,
                        root: self.s_flags.root,
                        map: self.s_flags.map,
                        ..NodeFlags::default()
                    },
                    indent: self.s_indent,
                    old_indent: self.s_indent,
                    empty: self.streaming_sequence_empty(),
                    flow_token: flow,
                    s_flags,
                    s_indent,
                    ..SaveCtx::default()
                };

                self.sequence_prolog(&mut sc);
                self.s_flags = sc.flags;
                self.s_indent = sc.indent;
                self.sc = sc;

                self.state = StreamState::SequenceFirstItem;
                Ok(())
            }

            EmitterEvent::MappingStart {
                anchor,
                tag,
                flow,
                comments: _,
            } => {
                self.push_sc();
                let s_flags = self.s_flags;
                let s_indent = self.s_indent;

                self.common_node_preamble(
                    anchor.as_deref(),
                    tag.as_ref(),
                    self.s_flags,
                    self.s_indent,
                );

                let mut sc = SaveCtx {
                    flags: NodeFlags {
                        map: true,
                        root: self.s_flags.root,
                        ..NodeFlags::default()
                    },
                    indent: self.s_indent,
                    old_indent: self.s_indent,
                    empty: self.streaming_mapping_empty(),
                    flow_token: flow,
                    s_flags,
                    s_indent,
                    ..SaveCtx::default()
                };

                self.mapping_prolog(&mut sc);
                self.s_flags = sc.flags;
                self.s_indent = sc.indent;
                self.sc = sc;

                self.state = StreamState::MappingFirstKey;
                Ok(())
            }

            _ => Err(EmitError::EventError(
                "expected alias, scalar, sequence start or mapping start",
            )),
        }
    }

    fn handle_sequence_item(&mut self, event: EmitterEvent<'input>, first: bool) -> EmitResult {
        match event {
            EmitterEvent::SequenceEnd => {
                let last_comments = self.sc.last_item_comments.take();
                let mut sc = std::mem::take(&mut self.sc);
                self.sequence_item_epilog(&mut sc, true, last_comments.as_ref());
                self.sequence_epilog(&mut sc);
                self.sc = self.pop_sc()?;
                self.state = self.pop_state();
                self.s_indent = self.sc.s_indent;
                self.s_flags = self.sc.s_flags;
                Ok(())
            }

            EmitterEvent::Alias { .. }
            | EmitterEvent::Scalar { .. }
            | EmitterEvent::SequenceStart { .. }
            | EmitterEvent::MappingStart { .. } => {
                self.push_state(StreamState::SequenceItem);

                // reset indent and flags for each item
                self.s_indent = self.sc.indent;
                self.s_flags = self.sc.flags;

                if !first {
                    let prev_comments = self.sc.last_item_comments.take();
                    let mut sc = std::mem::take(&mut self.sc);
                    self.sequence_item_epilog(&mut sc, false, prev_comments.as_ref());
                    self.sc = sc;
                }

                // keep the item's comments for its epilog, which only runs
                // once the next event tells whether the item was the last
                self.sc.last_item_comments = event.comments().cloned();

                {
                    let mut sc = std::mem::take(&mut self.sc);
                    self.sequence_item_prolog(&mut sc, event.comments());
                    self.sc = sc;
                }

                // items are not mapping values; see the tree walker
                let flags = NodeFlags {
                    map: false,
                    ..self.sc.flags
                };
                self.streaming_node(event, flags)
            }

            _ => Err(EmitError::EventError(
                "expected sequence end, alias, scalar, sequence start or mapping start",
            )),
        }
    }

    fn handle_mapping_key(&mut self, event: EmitterEvent<'input>, first: bool) -> EmitResult {
        self.sc.last_key_is_alias = false;
        self.sc.last_key_comments = None;

        match event {
            EmitterEvent::MappingEnd => {
                let last_comments = self.sc.last_value_comments.take();
                let mut sc = std::mem::take(&mut self.sc);
                self.mapping_value_epilog(&mut sc, true, last_comments.as_ref());
                self.mapping_epilog(&mut sc);
                self.sc = self.pop_sc()?;
                self.state = self.pop_state();
                self.s_indent = self.sc.s_indent;
                self.s_flags = self.sc.s_flags;
                Ok(())
            }

            EmitterEvent::Alias { .. }
            | EmitterEvent::Scalar { .. }
            | EmitterEvent::SequenceStart { .. }
            | EmitterEvent::MappingStart { .. } => {
                let simple_key = match &event {
                    EmitterEvent::Alias { .. } => true,
                    EmitterEvent::Scalar { token, .. } => {
                        analyze::is_simple_key(&token.text().map_err(EmitError::from)?)
                    }
                    EmitterEvent::SequenceStart { .. } => self.streaming_sequence_empty(),
                    EmitterEvent::MappingStart { .. } => self.streaming_mapping_empty(),
                    _ => false,
                };

                self.push_state(if simple_key {
                    StreamState::MappingSimpleValue
                } else {
                    StreamState::MappingValue
                });

                // reset indent and flags for each pair
                self.s_indent = self.sc.indent;
                self.s_flags = self.sc.flags;

                if !first {
                    let prev_comments = self.sc.last_value_comments.take();
                    let mut sc = std::mem::take(&mut self.sc);
                    self.mapping_value_epilog(&mut sc, false, prev_comments.as_ref());
                    self.sc = sc;
                }

                self.sc.last_key_is_alias = matches!(event, EmitterEvent::Alias { .. });
                self.sc.last_key_comments = event.comments().cloned();

                {
                    let key_is_scalar = matches!(event, EmitterEvent::Scalar { .. });
                    let mut sc = std::mem::take(&mut self.sc);
                    self.mapping_key_prolog(&mut sc, simple_key, key_is_scalar);
                    self.sc = sc;
                }

                let flags = self.sc.flags;
                self.streaming_node(event, flags)
            }

            _ => Err(EmitError::EventError(
                "expected mapping end, alias, scalar, sequence start or mapping start",
            )),
        }
    }

    fn handle_mapping_value(&mut self, event: EmitterEvent<'input>) -> EmitResult {
        match event {
            EmitterEvent::Alias { .. }
            | EmitterEvent::Scalar { .. }
            | EmitterEvent::SequenceStart { .. }
            | EmitterEvent::MappingStart { .. } => {
                self.push_state(StreamState::MappingKey);

                {
                    let mut sc = std::mem::take(&mut self.sc);
                    let comments = sc.last_key_comments.take();
                    let key_is_alias = sc.last_key_is_alias;
                    self.mapping_key_epilog(&mut sc, comments.as_ref(), key_is_alias);
                    self.sc = sc;
                }

                // keep the value's comments for its epilog, which only runs
                // once the next event tells whether the pair was the last
                self.sc.last_value_comments = event.comments().cloned();

                let flags = self.sc.flags;
                self.streaming_node(event, flags)
            }

            _ => Err(EmitError::EventError(
                "expected alias, scalar, sequence start or mapping start",
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;
    use std::fmt;
    use std::rc::Rc;

    use super::{EmitterEvent, StreamState};
    use crate::{EmitOutput, Emitter, EmitterConfig, ScalarStyle, ScalarToken, WriteKind};

    /// A sink that can be inspected while the emitter still holds it.
    #[derive(Default, Clone)]
    struct Recorder(Rc<RefCell<String>>);

    impl EmitOutput for Recorder {
        fn write(&mut self, _kind: WriteKind, data: &str) -> Result<usize, fmt::Error> {
            self.0.borrow_mut().push_str(data);
            Ok(data.len())
        }
    }

    fn scalar(text: &str) -> EmitterEvent<'_> {
        EmitterEvent::scalar(ScalarToken::new(text, ScalarStyle::Plain))
    }

    #[test]
    fn lookahead_delays_sequence_start() {
        let shared = Recorder::default();
        let mut sink = shared.clone();
        let mut emitter = Emitter::new(&mut sink, EmitterConfig::new());
        emitter.on_event(EmitterEvent::StreamStart).unwrap();
        emitter.on_event(EmitterEvent::document_start()).unwrap();
        emitter.on_event(EmitterEvent::sequence_start()).unwrap();
        // One lookahead event is not enough to decide flow-vs-block yet.
        assert!(shared.0.borrow().is_empty());
        emitter.on_event(scalar("a")).unwrap();
        emitter.on_event(scalar("b")).unwrap();
        assert_eq!(*shared.0.borrow(), "- a\n- b");
        emitter.on_event(EmitterEvent::SequenceEnd).unwrap();
        emitter
            .on_event(EmitterEvent::DocumentEnd { explicit: false })
            .unwrap();
        assert_eq!(*shared.0.borrow(), "- a\n- b\n");
    }

    #[test]
    fn event_sequence_violation_parks_the_emitter() {
        let mut out = String::new();
        let mut emitter = Emitter::new(&mut out, EmitterConfig::new());
        emitter.on_event(EmitterEvent::StreamStart).unwrap();
        emitter.on_event(EmitterEvent::document_start()).unwrap();
        // A sequence end arrives with no sequence open.
        emitter.on_event(EmitterEvent::SequenceEnd).unwrap_err();
        assert_eq!(emitter.state, StreamState::End);
        emitter.on_event(scalar("x")).unwrap_err();
    }
}
