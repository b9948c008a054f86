//! Errors reported while emitting.

use thiserror::Error;
use yarrow_atom::AtomError;

/// An error when emitting YAML.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitError {
    /// The output sink refused bytes or failed.
    ///
    /// Writing is best-effort: the emitter keeps going after a short write
    /// and reports this once the caller checks, so partial bytes may already
    /// be in the sink.
    #[error("output error while writing")]
    Output,

    /// An error in the sequence of events the emitter received.
    ///
    /// After this, the emitter parks itself in its end state and refuses
    /// further events.
    #[error("bad event sequence: {0}")]
    EventError(&'static str),

    /// A scalar atom could not be decoded.
    #[error("scalar decode error: {0}")]
    Decode(#[from] AtomError),
}

/// A convenience alias for emitter functions that may fail without returning
/// a value.
pub type EmitResult = Result<(), EmitError>;
