//! The staging buffer the scalar writers accumulate runs of output into.

use yarrow_atom::char_traits::is_generic_lb;

use crate::emitter::{Emitter, WriteKind};

/// A growable staging buffer with column tracking.
///
/// Scalar writers accumulate code points here and flush whole runs to the
/// emitter writer, so the folding decisions can look at the would-be column
/// before anything is committed to the sink. Each writer owns its own
/// accumulator for the duration of one scalar.
pub(crate) struct EmitAccum {
    buf: String,
    kind: WriteKind,
    /// Code points since the last line break in the buffer.
    col: usize,
    /// Total code points in the buffer.
    count: usize,
    /// Whether the buffer contains a line break, anchoring the column to it.
    starts_line: bool,
}

impl EmitAccum {
    /// Start accumulating output of the given kind.
    pub(crate) fn new(kind: WriteKind) -> Self {
        Self {
            buf: String::new(),
            kind,
            col: 0,
            count: 0,
            starts_line: false,
        }
    }

    /// Append one code point.
    pub(crate) fn put(&mut self, c: char) {
        self.buf.push(c);
        self.count += 1;
        if is_generic_lb(c) {
            self.col = 0;
            self.starts_line = true;
        } else {
            self.col += 1;
        }
    }

    /// The column the emitter would be at after flushing the buffer.
    pub(crate) fn column(&self, emit: &Emitter<'_, '_>) -> usize {
        if self.starts_line {
            self.col
        } else {
            emit.column() + self.col
        }
    }

    /// The number of code points accumulated.
    pub(crate) fn len(&self) -> usize {
        self.count
    }

    /// Flush the buffer to the emitter writer and reset.
    pub(crate) fn output(&mut self, emit: &mut Emitter<'_, '_>) {
        if !self.buf.is_empty() {
            emit.write(self.kind, &self.buf);
        }
        self.buf.clear();
        self.col = 0;
        self.count = 0;
        self.starts_line = false;
    }
}
