//! The pull-based atom iterator.
//!
//! Unfolds an atom's raw bytes into its logical scalar text, style by style,
//! as a sequence of byte chunks. Chunks borrow the input wherever possible;
//! only escape decodes are copied, into small inline buffers.

use smallvec::SmallVec;

use crate::{
    char_traits::{as_hex, is_hex, is_printable},
    line::{analyze, LineInfo},
    utf8, Atom, AtomError, AtomStyle, Chomp,
};

/// Number of chunk slots that live inline before the FIFO spills to the heap.
const NR_STARTUP_CHUNKS: usize = 8;

/// Size of the inline copy buffer of a chunk.
///
/// Copied chunks are at most 10 bytes: the longest escape encoding produced
/// by the double-quoted-manual style (`U` plus eight hex digits).
const INLINE_CHUNK_SIZE: usize = 10;

/// Default tab stop width used by the line analysis.
const TABSIZE: usize = 8;

/// One entry of the chunk FIFO: either a borrowed slice of the atom's input
/// or a small inline copy.
#[derive(Debug, Clone)]
enum IterChunk<'input> {
    Slice(&'input [u8]),
    Inline { buf: [u8; INLINE_CHUNK_SIZE], off: u8, len: u8 },
}

impl IterChunk<'_> {
    fn as_bytes(&self) -> &[u8] {
        match self {
            IterChunk::Slice(s) => s,
            IterChunk::Inline { buf, off, len } => &buf[usize::from(*off)..usize::from(*len)],
        }
    }

    fn len(&self) -> usize {
        self.as_bytes().len()
    }

    fn consume(&mut self, n: usize) {
        match self {
            IterChunk::Slice(s) => *s = &s[n..],
            IterChunk::Inline { off, .. } => {
                *off += u8::try_from(n).unwrap_or(u8::MAX);
            }
        }
    }
}

/// A re-entrant chunked decoder over one atom.
///
/// The iterator owns a two-line sliding window of [`LineInfo`] records and a
/// FIFO of produced chunks. Formatting is lazy: chunks are produced one line
/// at a time, when a pull runs the staging FIFO dry.
///
/// Iteration is idempotent: two freshly built iterators over the same atom
/// produce the same byte sequence.
pub struct AtomIter<'a, 'input> {
    atom: &'a Atom<'input>,
    data: &'input [u8],
    /// The block chomp column.
    chomp: usize,
    tabsize: usize,
    single_line: bool,
    /// Whether a quote at column 0 ends the atom.
    dangling_end_quote: bool,
    /// Whether the whole atom is whitespace and breaks.
    empty: bool,
    /// Index of the current line in the window.
    current: bool,
    /// Set once the last line (for block styles) has been formatted.
    done: bool,
    li: [LineInfo; 2],
    chunks: SmallVec<[IterChunk<'input>; NR_STARTUP_CHUNKS]>,
    /// Index of the first unread chunk.
    read: usize,
    /// Whether the chunk at `read` was handed out by [`next_chunk`].
    ///
    /// [`next_chunk`]: Self::next_chunk
    primed: bool,
    unget_c: Option<u8>,
    unget_ch: Option<char>,
    err: Option<AtomError>,
}

impl<'a, 'input> AtomIter<'a, 'input> {
    /// Start iterating `atom` from the beginning.
    #[must_use]
    pub fn new(atom: &'a Atom<'input>) -> Self {
        let chomp = atom.increment();
        let mut li1 = analyze(atom, chomp, TABSIZE, 0);
        li1.first = true;

        Self {
            atom,
            data: atom.data(),
            chomp,
            tabsize: TABSIZE,
            single_line: atom.start_mark().line == atom.end_mark().line,
            dangling_end_quote: atom.end_mark().column == 0,
            empty: atom.is_blank(),
            current: false,
            done: false,
            li: [LineInfo::default(), li1],
            chunks: SmallVec::new(),
            read: 0,
            primed: false,
            unget_c: None,
            unget_ch: None,
            err: None,
        }
    }

    /// Make the next line of the window current and prepare its emit slice
    /// and glue flags.
    ///
    /// Returns the window index of the new current line, or `None` when the
    /// atom is exhausted.
    fn next_line(&mut self) -> Option<usize> {
        self.current = !self.current;
        let cur = usize::from(self.current);

        if self.li[cur].start >= self.data.len() {
            return None;
        }

        // scan the line after this one into the other window slot
        let end = self.li[cur].end;
        let next_start = if end < self.data.len() {
            end + utf8::width_by_first_octet(self.data[end]).max(1)
        } else {
            self.data.len()
        };
        self.li[1 - cur] = analyze(self.atom, self.chomp, self.tabsize, next_start);

        let nli = (self.li[1 - cur].start < self.data.len()).then(|| self.li[1 - cur]);

        let li = &mut self.li[cur];
        let style = self.atom.style();
        match style {
            // for quoted styles the first line keeps its leading whitespace
            // and the last its trailing whitespace
            AtomStyle::SingleQuoted | AtomStyle::DoubleQuoted => {
                li.s = if li.first { li.start } else { li.nws_start };
                li.e = if li.last { li.end } else { li.nws_end };
                if li.empty && li.first && li.last && !self.single_line {
                    li.s = li.e;
                }
            }
            AtomStyle::Literal | AtomStyle::Folded => {
                li.s = li.chomp_start;
                li.e = li.end;
                if li.empty && li.first && li.last && !self.single_line {
                    li.s = li.e;
                }
            }
            _ => {
                li.s = li.nws_start;
                li.e = li.nws_end;
            }
        }
        if li.s > li.e {
            li.s = li.e;
        }

        li.need_nl = false;
        li.need_sep = false;
        match style {
            AtomStyle::Plain | AtomStyle::Uri | AtomStyle::DoubleQuotedManual => {
                li.need_nl = !li.last && li.empty;
                li.need_sep = !li.need_nl && nli.is_some_and(|n| !n.empty);
            }
            AtomStyle::Comment => {
                li.need_nl = !li.is_final;
            }
            AtomStyle::SingleQuoted | AtomStyle::DoubleQuoted => {
                li.need_nl = (!li.last && !li.first && li.empty)
                    || (nli.is_some() && self.empty && !li.first);
                if !li.need_nl {
                    li.need_sep = nli.is_some_and(|n| !n.empty)
                        || (nli.is_none() && li.last && self.dangling_end_quote)
                        || nli.is_some_and(|n| n.is_final && n.empty);

                    // a backslash ending a double-quoted line eats the separator
                    if style == AtomStyle::DoubleQuoted
                        && li.need_sep
                        && li.nws_end > li.nws_start
                        && self.data[li.nws_end - 1] == b'\\'
                    {
                        li.need_sep = false;
                    }
                }
            }
            AtomStyle::Literal => {
                li.need_nl = true;
            }
            AtomStyle::Folded => {
                li.need_nl = !li.last
                    && (li.empty
                        || li.indented
                        || li.trailing_breaks_ws
                        || nli.is_some_and(|n| n.indented));
                if !li.need_nl {
                    li.need_sep = nli.is_some_and(|n| !n.indented && !n.empty);
                }
            }
        }

        Some(cur)
    }

    /// Push a borrowed chunk covering `s..e` of the atom's raw bytes.
    fn add_chunk(&mut self, s: usize, e: usize) {
        if e > s {
            self.chunks.push(IterChunk::Slice(&self.data[s..e]));
        }
    }

    /// Push a borrowed chunk over bytes from outside the atom (glue).
    fn add_chunk_static(&mut self, bytes: &'static [u8]) {
        if !bytes.is_empty() {
            self.chunks.push(IterChunk::Slice(bytes));
        }
    }

    /// Push a small copied chunk.
    fn add_chunk_copy(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        debug_assert!(bytes.len() <= INLINE_CHUNK_SIZE);
        let mut buf = [0u8; INLINE_CHUNK_SIZE];
        buf[..bytes.len()].copy_from_slice(bytes);
        self.chunks.push(IterChunk::Inline {
            buf,
            off: 0,
            len: u8::try_from(bytes.len()).unwrap_or(u8::MAX),
        });
    }

    fn chunk_reset(&mut self) {
        self.chunks.clear();
        self.read = 0;
    }

    /// Format the current line into chunks.
    ///
    /// Returns whether any further formatting is possible; `false` means the
    /// atom is exhausted.
    fn format(&mut self) -> Result<bool, AtomError> {
        let Some(cur) = self.next_line() else {
            self.done = true;
            return Ok(false);
        };
        if self.done {
            return Ok(false);
        }

        let li = self.li[cur];
        let (s0, e0) = (li.s, li.e);
        let style = self.atom.style();

        match style {
            AtomStyle::Literal | AtomStyle::Plain | AtomStyle::Folded | AtomStyle::Comment => {
                self.add_chunk(s0, e0);
            }

            AtomStyle::SingleQuoted => {
                let mut s = s0;
                while s < e0 {
                    let quote = memchr::memchr(b'\'', &self.data[s..e0]).map(|i| s + i);
                    self.add_chunk(s, quote.unwrap_or(e0));
                    let Some(q) = quote else {
                        break;
                    };
                    s = q;
                    // a quote pair collapses to a single quote
                    if e0 - s >= 2 && self.data[s + 1] == b'\'' {
                        self.add_chunk(s, s + 1);
                    }
                    s += 1;
                }
            }

            AtomStyle::DoubleQuoted => {
                let mut s = s0;
                while s < e0 {
                    let esc = memchr::memchr(b'\\', &self.data[s..e0]).map(|i| s + i);
                    self.add_chunk(s, esc.unwrap_or(e0));
                    let Some(t) = esc else {
                        break;
                    };
                    if e0 - t < 2 {
                        break;
                    }
                    let (c, consumed) = utf8::parse_escape(&self.data[t..e0])
                        .ok_or(AtomError::InvalidEscape { offset: t })?;
                    let mut buf = [0u8; 4];
                    let n = utf8::encode(c, &mut buf)
                        .ok_or(AtomError::InvalidEscape { offset: t })?;
                    self.add_chunk_copy(&buf[..n]);
                    s = t + consumed;
                }
            }

            AtomStyle::Uri => {
                let mut s = s0;
                while s < e0 {
                    let esc = memchr::memchr(b'%', &self.data[s..e0]).map(|i| s + i);
                    self.add_chunk(s, esc.unwrap_or(e0));
                    let Some(t) = esc else {
                        break;
                    };
                    let (buf, n, consumed) = uri_esc(&self.data[t..e0])
                        .ok_or(AtomError::InvalidUriEscape { offset: t })?;
                    self.add_chunk_copy(&buf[..n]);
                    s = t + consumed;
                }
            }

            AtomStyle::DoubleQuotedManual => {
                let mut s = s0;
                while let Some((c, w)) = utf8::decode(&self.data[s..e0]) {
                    if c != '"' && c != '\\' && is_printable(c) {
                        self.add_chunk(s, s + w);
                        s += w;
                        continue;
                    }

                    self.add_chunk_static(b"\\");
                    match c {
                        '\\' => self.add_chunk_static(b"\\"),
                        '"' => self.add_chunk_static(b"\""),
                        '\0' => self.add_chunk_static(b"0"),
                        '\x07' => self.add_chunk_static(b"a"),
                        '\x08' => self.add_chunk_static(b"b"),
                        '\t' => self.add_chunk_static(b"t"),
                        '\n' => self.add_chunk_static(b"n"),
                        '\x0b' => self.add_chunk_static(b"v"),
                        '\x0c' => self.add_chunk_static(b"f"),
                        '\r' => self.add_chunk_static(b"r"),
                        '\x1b' => self.add_chunk_static(b"e"),
                        '\u{85}' => self.add_chunk_static(b"N"),
                        '\u{a0}' => self.add_chunk_static(b"_"),
                        '\u{2028}' => self.add_chunk_static(b"L"),
                        '\u{2029}' => self.add_chunk_static(b"P"),
                        _ => {
                            let cp = u32::from(c);
                            let digits = if cp <= 0xff {
                                format!("x{cp:02x}")
                            } else if cp <= 0xffff {
                                format!("u{cp:04x}")
                            } else {
                                format!("U{cp:08x}")
                            };
                            self.add_chunk_copy(digits.as_bytes());
                        }
                    }
                    s += w;
                }
            }
        }

        if li.last && style.is_block() {
            match self.atom.chomp() {
                Chomp::Strip | Chomp::Clip => {
                    let mut pending_nl = usize::from(!li.empty);
                    while let Some(cur) = self.next_line() {
                        let l = self.li[cur];
                        if !self.empty && l.chomp_start < l.end {
                            while pending_nl > 0 {
                                self.add_chunk_static(b"\n");
                                pending_nl -= 1;
                            }
                            self.add_chunk(l.chomp_start, l.end);
                        }
                        if l.lb_end && !self.empty {
                            pending_nl += 1;
                        }
                    }
                    if self.atom.chomp() == Chomp::Clip && pending_nl > 0 {
                        self.add_chunk_static(b"\n");
                    }
                }
                Chomp::Keep => {
                    if li.lb_end {
                        self.add_chunk_static(b"\n");
                    }
                    while let Some(cur) = self.next_line() {
                        let l = self.li[cur];
                        if !self.empty && l.chomp_start < l.end {
                            self.add_chunk(l.chomp_start, l.end);
                        }
                        if l.lb_end {
                            self.add_chunk_static(b"\n");
                        }
                    }
                }
            }
            self.done = true;
        } else {
            if li.need_sep {
                self.add_chunk_static(b" ");
            }
            if li.need_nl {
                self.add_chunk_static(b"\n");
            }
        }

        Ok(true)
    }

    /// Return the chunk at the read cursor without consuming it.
    #[must_use]
    pub fn peek_chunk(&self) -> Option<&[u8]> {
        self.chunks.get(self.read).map(IterChunk::as_bytes)
    }

    /// Consume `len` bytes across chunks.
    ///
    /// Resets the staging FIFO once everything produced so far is consumed.
    pub fn advance(&mut self, mut len: usize) {
        self.primed = false;
        while len > 0 && self.read < self.chunks.len() {
            let chunk = &mut self.chunks[self.read];
            let run = len.min(chunk.len());
            chunk.consume(run);
            if chunk.len() == 0 {
                self.read += 1;
            }
            len -= run;
        }
        if self.read >= self.chunks.len() {
            self.chunk_reset();
        }
    }

    /// Pull the next chunk, advancing past the one previously returned.
    ///
    /// When the staging FIFO is dry, runs the per-line formatter until at
    /// least one chunk is produced or the atom ends.
    ///
    /// # Errors
    /// Returns an error when decoding fails (e.g. an invalid escape).
    pub fn next_chunk(&mut self) -> Result<Option<&[u8]>, AtomError> {
        if self.primed {
            if let Some(len) = self.chunks.get(self.read).map(IterChunk::len) {
                self.advance(len);
            }
            self.primed = false;
        }

        if self.chunks.get(self.read).is_none() {
            self.chunk_reset();
            loop {
                if !self.format()? {
                    return Ok(None);
                }
                if self.chunks.get(self.read).is_some() {
                    break;
                }
            }
        }

        self.primed = true;
        Ok(self.peek_chunk())
    }

    /// Read up to `buf.len()` bytes of decoded text.
    ///
    /// # Return
    /// The number of bytes read; 0 at the end of the atom.
    ///
    /// # Errors
    /// Returns an error when decoding fails.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, AtomError> {
        let mut nread = 0;
        while nread < buf.len() {
            if let Some(chunk) = self.peek_chunk() {
                let run = (buf.len() - nread).min(chunk.len());
                buf[nread..nread + run].copy_from_slice(&chunk[..run]);
                nread += run;
                self.advance(run);
                continue;
            }

            self.chunk_reset();
            loop {
                if !self.format()? {
                    return Ok(nread);
                }
                if self.peek_chunk().is_some() {
                    break;
                }
            }
        }
        Ok(nread)
    }

    /// Read a single octet of decoded text.
    ///
    /// Returns `None` at the end of the atom or on a decode error; the error
    /// is kept and can be retrieved with [`error`].
    ///
    /// [`error`]: Self::error
    pub fn getc(&mut self) -> Option<u8> {
        if let Some(c) = self.unget_c.take() {
            return Some(c);
        }
        let mut buf = [0u8; 1];
        match self.read(&mut buf) {
            Ok(1) => Some(buf[0]),
            Ok(_) => None,
            Err(e) => {
                self.err = Some(e);
                None
            }
        }
    }

    /// Push back one octet; only one octet can be pending at a time.
    ///
    /// # Return
    /// Returns `false` when the pushback slot is occupied.
    pub fn ungetc(&mut self, c: u8) -> bool {
        if self.unget_c.is_some() {
            return false;
        }
        self.unget_c = Some(c);
        true
    }

    /// Return the next octet without consuming it.
    pub fn peekc(&mut self) -> Option<u8> {
        let c = self.getc()?;
        self.ungetc(c);
        Some(c)
    }

    /// Read a single code point of decoded text.
    ///
    /// Returns `None` at the end of the atom or on a decode error; the error
    /// is kept and can be retrieved with [`error`].
    ///
    /// [`error`]: Self::error
    pub fn utf8_get(&mut self) -> Option<char> {
        if let Some(c) = self.unget_ch.take() {
            return Some(c);
        }

        let mut buf = [0u8; 4];
        match self.read(&mut buf[..1]) {
            Ok(1) => {}
            Ok(_) => return None,
            Err(e) => {
                self.err = Some(e);
                return None;
            }
        }
        let w = utf8::width_by_first_octet(buf[0]);
        if w == 0 {
            return None;
        }
        if w > 1 {
            match self.read(&mut buf[1..w]) {
                Ok(n) if n == w - 1 => {}
                Ok(_) => return None,
                Err(e) => {
                    self.err = Some(e);
                    return None;
                }
            }
        }
        utf8::decode(&buf[..w]).map(|(c, _)| c)
    }

    /// Push back one code point; only one can be pending at a time.
    ///
    /// # Return
    /// Returns `false` when the pushback slot is occupied.
    pub fn utf8_unget(&mut self, c: char) -> bool {
        if self.unget_ch.is_some() {
            return false;
        }
        self.unget_ch = Some(c);
        true
    }

    /// Return the next code point without consuming it.
    pub fn utf8_peek(&mut self) -> Option<char> {
        let c = self.utf8_get()?;
        self.utf8_unget(c);
        Some(c)
    }

    /// The decode error recorded by [`getc`]/[`utf8_get`], if any.
    ///
    /// [`getc`]: Self::getc
    /// [`utf8_get`]: Self::utf8_get
    #[must_use]
    pub fn error(&self) -> Option<AtomError> {
        self.err
    }
}

/// Decode the consecutive `%HH` escapes at the start of `bytes` that form a
/// single UTF-8 sequence.
///
/// # Return
/// The decoded bytes, their count, and the number of input bytes consumed.
fn uri_esc(bytes: &[u8]) -> Option<([u8; 4], usize, usize)> {
    let first = hex_octet(bytes, 0)?;
    let width = utf8::width_by_first_octet(first);
    if width == 0 {
        return None;
    }
    let mut buf = [0u8; 4];
    buf[0] = first;
    for (i, slot) in buf.iter_mut().enumerate().take(width).skip(1) {
        let octet = hex_octet(bytes, i * 3)?;
        if octet & 0xc0 != 0x80 {
            return None;
        }
        *slot = octet;
    }
    utf8::decode(&buf[..width])?;
    Some((buf, width, width * 3))
}

/// Parse one `%HH` group at offset `at` of `bytes`.
fn hex_octet(bytes: &[u8], at: usize) -> Option<u8> {
    if bytes.len() < at + 3 || bytes[at] != b'%' {
        return None;
    }
    let hi = char::from(bytes[at + 1]);
    let lo = char::from(bytes[at + 2]);
    if !is_hex(hi) || !is_hex(lo) {
        return None;
    }
    u8::try_from((as_hex(hi) << 4) | as_hex(lo)).ok()
}

#[cfg(test)]
mod test {
    use crate::{Atom, AtomError, AtomStyle, Chomp, Input};

    fn collect(atom: &Atom<'_>) -> String {
        let mut iter = super::AtomIter::new(atom);
        let mut out = Vec::new();
        while let Some(chunk) = iter.next_chunk().expect("decode") {
            out.extend_from_slice(chunk);
        }
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn plain_single_line_is_identity() {
        let input = Input::new("hello world");
        let atom = Atom::over(&input, 0..11, AtomStyle::Plain);
        assert!(atom.direct_output());
        assert_eq!(collect(&atom), "hello world");
    }

    #[test]
    fn plain_folds_lines_with_spaces() {
        let input = Input::new("foo\nbar\nbaz");
        let atom = Atom::over(&input, 0..11, AtomStyle::Plain);
        assert_eq!(collect(&atom), "foo bar baz");
    }

    #[test]
    fn plain_empty_line_becomes_newline() {
        let input = Input::new("foo\n\nbar");
        let atom = Atom::over(&input, 0..8, AtomStyle::Plain);
        assert_eq!(collect(&atom), "foo\nbar");
    }

    #[test]
    fn single_quoted_collapses_quote_pairs() {
        let input = Input::new("it''s");
        let atom = Atom::over(&input, 0..5, AtomStyle::SingleQuoted);
        assert_eq!(collect(&atom), "it's");
    }

    #[test]
    fn double_quoted_decodes_escapes() {
        let input = Input::new("a\\tb\u{2028}c\\U0001F600d");
        let atom = Atom::over(&input, 0..input.len(), AtomStyle::DoubleQuoted);
        assert_eq!(collect(&atom), "a\tb\u{2028}c\u{1f600}d");
    }

    #[test]
    fn double_quoted_invalid_escape_errors() {
        let input = Input::new(r"a\qb");
        let atom = Atom::over(&input, 0..4, AtomStyle::DoubleQuoted);
        let mut iter = super::AtomIter::new(&atom);
        let mut result = Ok(());
        loop {
            match iter.next_chunk() {
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }
        assert_eq!(result, Err(AtomError::InvalidEscape { offset: 1 }));
    }

    #[test]
    fn double_quoted_backslash_eats_separator() {
        // A backslash ending the line suppresses the folding space.
        let input = Input::new("ab\\\ncd");
        let atom = Atom::over(&input, 0..6, AtomStyle::DoubleQuoted);
        // The trailing backslash is dropped and no separator is emitted.
        assert_eq!(collect(&atom), "abcd");
    }

    #[test]
    fn uri_unescapes_percent_groups() {
        let input = Input::new("a%20b%C3%A9c");
        let atom = Atom::over(&input, 0..input.len(), AtomStyle::Uri);
        assert_eq!(collect(&atom), "a béc");
    }

    #[test]
    fn dq_manual_encodes_specials() {
        let input = Input::new("a\tb\u{2028}");
        let atom = Atom::over(&input, 0..input.len(), AtomStyle::DoubleQuotedManual);
        assert_eq!(collect(&atom), "a\\tb\\L");
    }

    #[test]
    fn comment_lines_rejoin_with_newlines() {
        let input = Input::new("# one\n# two");
        let atom = Atom::over(&input, 0..input.len(), AtomStyle::Comment);
        assert_eq!(collect(&atom), "# one\n# two");
    }

    #[test]
    fn literal_keeps_line_structure() {
        let input = Input::new("line1\nline2\n");
        let atom = Atom::over(&input, 0..12, AtomStyle::Literal).with_chomp(Chomp::Clip);
        assert_eq!(collect(&atom), "line1\nline2\n");
    }

    #[test]
    fn literal_chomp_strip_clip_keep() {
        let input = Input::new("line1\nline2\n\n");
        let raw = 0..13;
        let strip = Atom::over(&input, raw.clone(), AtomStyle::Literal).with_chomp(Chomp::Strip);
        assert_eq!(collect(&strip), "line1\nline2");
        let clip = Atom::over(&input, raw.clone(), AtomStyle::Literal).with_chomp(Chomp::Clip);
        assert_eq!(collect(&clip), "line1\nline2\n");
        let keep = Atom::over(&input, raw, AtomStyle::Literal).with_chomp(Chomp::Keep);
        assert_eq!(collect(&keep), "line1\nline2\n\n");
    }

    #[test]
    fn literal_strips_block_indentation() {
        let input = Input::new("  line1\n  line2\n");
        let atom = Atom::over(&input, 0..16, AtomStyle::Literal)
            .with_chomp(Chomp::Clip)
            .with_increment(2);
        assert_eq!(collect(&atom), "line1\nline2\n");
    }

    #[test]
    fn folded_joins_and_preserves_blanks() {
        let input = Input::new("aaa\nbbb\n\nccc\n");
        let atom = Atom::over(&input, 0..13, AtomStyle::Folded).with_chomp(Chomp::Clip);
        assert_eq!(collect(&atom), "aaa bbb\nccc\n");
    }

    #[test]
    fn folded_indented_lines_stay_verbatim() {
        let input = Input::new("aaa\n  bbb\nccc\n");
        let atom = Atom::over(&input, 0..14, AtomStyle::Folded)
            .with_chomp(Chomp::Clip)
            .with_increment(0);
        assert_eq!(collect(&atom), "aaa\n  bbb\nccc\n");
    }

    #[test]
    fn iteration_is_idempotent() {
        let input = Input::new("aaa\nbbb\n\nccc\n");
        let atom = Atom::over(&input, 0..13, AtomStyle::Folded).with_chomp(Chomp::Keep);
        assert_eq!(collect(&atom), collect(&atom));
    }

    #[test]
    fn read_and_getc_agree_with_chunks() {
        let input = Input::new("foo\nbar");
        let atom = Atom::over(&input, 0..7, AtomStyle::Plain);

        let mut iter = super::AtomIter::new(&atom);
        let mut buf = [0u8; 32];
        let n = iter.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"foo bar");

        let mut iter = super::AtomIter::new(&atom);
        let mut bytes = Vec::new();
        while let Some(c) = iter.getc() {
            bytes.push(c);
        }
        assert_eq!(bytes, b"foo bar");
    }

    #[test]
    fn unget_roundtrip() {
        let input = Input::new("ab");
        let atom = Atom::over(&input, 0..2, AtomStyle::Plain);
        let mut iter = super::AtomIter::new(&atom);
        assert_eq!(iter.peekc(), Some(b'a'));
        assert_eq!(iter.getc(), Some(b'a'));
        assert!(iter.ungetc(b'a'));
        assert!(!iter.ungetc(b'x'));
        assert_eq!(iter.getc(), Some(b'a'));
        assert_eq!(iter.getc(), Some(b'b'));
        assert_eq!(iter.getc(), None);
    }

    #[test]
    fn utf8_getters_decode_across_chunks() {
        let input = Input::new(r"caf\xe9");
        let atom = Atom::over(&input, 0..7, AtomStyle::DoubleQuoted);
        let mut iter = super::AtomIter::new(&atom);
        let mut chars = Vec::new();
        while let Some(c) = iter.utf8_get() {
            chars.push(c);
        }
        assert_eq!(chars, vec!['c', 'a', 'f', 'é']);
        assert_eq!(iter.error(), None);
    }
}
