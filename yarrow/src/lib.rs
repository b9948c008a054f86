// See the LICENSE file at the top-level directory of this distribution.

//! YAML 1.2 emitter in pure Rust, with document-tree and event-stream modes.
//!
//! # Usage
//!
//! Build a [`Document`] and dump it:
//!
//! ```
//! use yarrow::{Document, Emitter, EmitterConfig, Node, ScalarStyle, ScalarToken};
//!
//! let doc = Document::new(Node::mapping([
//!     (
//!         Node::scalar(ScalarToken::new("a", ScalarStyle::Plain)),
//!         Node::scalar(ScalarToken::new("1", ScalarStyle::Plain)),
//!     ),
//!     (
//!         Node::scalar(ScalarToken::new("b", ScalarStyle::Plain)),
//!         Node::scalar(ScalarToken::new("2", ScalarStyle::Plain)),
//!     ),
//! ]));
//!
//! let mut out = String::new();
//! Emitter::new(&mut out, EmitterConfig::new()).emit_document(&doc).unwrap();
//! assert_eq!(out, "a: 1\nb: 2\n");
//! ```
//!
//! Or drive the same renderers from a live stream of parse events with
//! [`Emitter::on_event`]; both modes produce identical bytes. The
//! [`EmitterConfig`] selects between block, flow and JSON output, the
//! indentation step, the line width, key sorting and the directive/document
//! mark presentation.
//!
//! Scalar text comes in as [`ScalarToken`]s, holding either logical text or
//! a raw [`Atom`] from the `yarrow-atom` text layer, which is decoded on the
//! fly while the scalar is written.
//!
//! # Features
//!
//! #### `debug_prints`
//! Enables state-transition prints in the event-driven emitter. Do not
//! enable when consuming the crate rather than working on it.
//!
//! [`Atom`]: yarrow_atom::Atom

#![warn(missing_docs, clippy::pedantic)]

#[macro_use]
mod debug;

mod accum;
mod analyze;
mod config;
mod emitter;
mod error;
mod node;
mod token;

pub use crate::config::{EmitterConfig, Mode, Presentation};
pub use crate::emitter::event::EmitterEvent;
pub use crate::emitter::{
    emit_document_to_string, emit_node_to_string, EmitOutput, Emitter, FmtSink, WriteKind,
};
pub use crate::error::{EmitError, EmitResult};
pub use crate::node::{
    AliasNode, Document, DocumentState, Mapping, MappingNode, Node, ScalarNode, SequenceNode, Tag,
    TagDirective,
};
pub use crate::token::{CommentPlacement, Comments, ScalarStyle, ScalarToken};

// Re-export the text layer types that appear in our public API so consumers
// can build atom-backed tokens without naming `yarrow-atom` themselves.
pub use yarrow_atom::{Atom, AtomError, AtomIter, AtomStyle, Chomp, Input, Mark};
