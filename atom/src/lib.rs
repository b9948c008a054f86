// See the LICENSE file at the top-level directory of this distribution.

//! Low-level YAML scalar atom decoding for the `yarrow` crates.
//!
//! **If you want to serialize YAML documents or event streams, use `yarrow`
//! instead of `yarrow-atom`. This crate contains only the text layer.**
//!
//! An [`Atom`] describes a contiguous byte range of an [`Input`] together
//! with the scalar style it was scanned with (plain, quoted, block, URI or
//! comment), its chomping rule and a set of precomputed content flags. The
//! [`AtomIter`] unfolds those raw bytes into the scalar's logical text as a
//! sequence of byte chunks, borrowing from the input whenever the style
//! allows it and copying only escape decodes.
//!
//! # Usage
//!
//! ```
//! use yarrow_atom::{Atom, AtomIter, AtomStyle, Input};
//!
//! let input = Input::new("foo\nbar");
//! let atom = Atom::over(&input, 0..7, AtomStyle::Plain);
//!
//! // Plain scalars fold their line breaks into separating spaces.
//! assert_eq!(atom.text().unwrap(), "foo bar");
//!
//! // The same text can be pulled chunk by chunk without allocating.
//! let mut iter = AtomIter::new(&atom);
//! let mut collected = Vec::new();
//! while let Some(chunk) = iter.next_chunk().unwrap() {
//!     collected.extend_from_slice(chunk);
//! }
//! assert_eq!(collected, b"foo bar");
//! ```
//!
//! # Features
//! This crate has no cargo features. Inputs are UTF-8 by construction;
//! decoding other encodings is the concern of whoever builds the [`Input`].

#![warn(missing_docs, clippy::pedantic)]

mod atom;
pub mod char_traits;
mod error;
mod input;
mod iter;
pub(crate) mod line;
mod mark;
pub mod utf8;

pub use crate::atom::{Atom, AtomStyle, Chomp};
pub use crate::error::AtomError;
pub use crate::input::Input;
pub use crate::iter::AtomIter;
pub use crate::mark::Mark;
