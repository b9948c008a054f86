//! Errors reported while decoding atoms.

use thiserror::Error;

/// An error encountered while unfolding an atom into its logical text.
///
/// Offsets are byte offsets into the atom's raw slice, not into the whole
/// input.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomError {
    /// A malformed backslash escape in a double-quoted atom.
    #[error("invalid escape sequence at byte {offset} of the atom")]
    InvalidEscape {
        /// Offset of the backslash within the atom.
        offset: usize,
    },

    /// A malformed `%HH` escape in a URI atom.
    #[error("invalid URI percent escape at byte {offset} of the atom")]
    InvalidUriEscape {
        /// Offset of the percent sign within the atom.
        offset: usize,
    },

    /// The decoded text was not valid UTF-8.
    #[error("atom text is not valid UTF-8")]
    InvalidUtf8,
}
