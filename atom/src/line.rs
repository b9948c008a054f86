//! Per-line analysis of an atom's raw bytes.
//!
//! The iterator keeps a two-line sliding window of these records: the line
//! currently being formatted and the one after it, which several styles need
//! to decide their trailing glue.

use crate::{
    char_traits::{is_lb, is_space, is_tab, is_ws, is_ws_or_lb},
    utf8, Atom,
};

/// Everything the per-line formatter needs to know about one line of an atom.
///
/// All positions are byte offsets into the atom's raw slice. `s`/`e` are the
/// bounds of the text the formatter will emit for this line, fixed by the
/// iterator once the style is taken into account.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LineInfo {
    /// First byte of the raw line.
    pub start: usize,
    /// One past the last byte of the raw line (at the line break or the atom
    /// end).
    pub end: usize,
    /// First non-whitespace byte.
    pub nws_start: usize,
    /// One past the last non-whitespace byte.
    pub nws_end: usize,
    /// First byte at or past the block chomp column.
    pub chomp_start: usize,
    /// Width of the leading whitespace.
    pub start_ws: usize,
    /// Width of the trailing whitespace.
    pub end_ws: usize,
    /// Whether the byte just before `end` was a whitespace.
    pub trailing_ws: bool,
    /// Whether the line holds no content at all.
    pub empty: bool,
    /// Whether further line breaks follow this line's break.
    pub trailing_breaks: bool,
    /// Whether whitespace past the chomp column follows this line's break.
    pub trailing_breaks_ws: bool,
    /// Whether this is the first line of the atom.
    pub first: bool,
    /// Whether only whitespace and breaks follow this line.
    pub last: bool,
    /// Whether the analysis consumed the atom tail.
    pub is_final: bool,
    /// Whether the byte at the chomp column is a whitespace.
    pub indented: bool,
    /// Whether the line ends in a line break (rather than the atom end).
    pub lb_end: bool,
    /// Emit a newline after this line.
    pub need_nl: bool,
    /// Emit a separating space after this line.
    pub need_sep: bool,
    /// Start of the slice to emit.
    pub s: usize,
    /// End of the slice to emit.
    pub e: usize,
}

/// Analyse the line of `atom` starting at byte offset `start`.
///
/// `chomp` is the block chomp column and `tabsize` the tab stop width. The
/// caller owns the `first` flag; it is never set here.
pub(crate) fn analyze(atom: &Atom<'_>, chomp: usize, tabsize: usize, start: usize) -> LineInfo {
    let data = atom.data();
    let len = data.len();
    let is_block = atom.style().is_block();

    // short circuit non multiline, non ws atoms
    if atom.direct_output() && !atom.has_lb() && !atom.has_ws() {
        return LineInfo {
            start,
            end: len,
            nws_start: start,
            nws_end: len,
            chomp_start: start,
            empty: atom.is_blank(),
            is_final: true,
            lb_end: atom.ends_with_lb(),
            ..LineInfo::default()
        };
    }

    let mut li = LineInfo {
        start,
        empty: true,
        ..LineInfo::default()
    };

    let mut end = None;
    let mut nws_start = None;
    let mut nws_end = None;
    let mut chomp_start = None;
    let mut start_ws = None;

    let mut last_was_ws = false;
    let mut col = 0usize;
    // consecutive whitespace width
    let mut cws = 0usize;

    let mut ss = start;
    let mut broke = None;
    while let Some((c, w)) = utf8::decode(&data[ss..len]) {
        // mark start of chomp
        if is_block && chomp_start.is_none() && col >= chomp {
            chomp_start = Some(ss);
            // whitespace at the chomp point means the line is indented
            li.indented = is_ws(c);
        }

        if is_lb(c) {
            col = 0;
            if end.is_none() {
                end = Some(ss);
                li.trailing_ws = last_was_ws;
                li.end_ws = cws;
                li.lb_end = true;
            }

            // no chomp point hit, use whatever we have here
            if is_block && chomp_start.is_none() {
                chomp_start = Some(ss);
            }

            if !last_was_ws {
                cws = 0;
                nws_end = Some(ss);
                last_was_ws = true;
            }
        } else if is_ws(c) {
            let advws = if is_space(c) { 1 } else { tabsize - (col % tabsize) };
            col += advws;
            cws += advws;

            if !last_was_ws {
                nws_end = Some(ss);
                last_was_ws = true;
            }
        } else {
            if nws_start.is_none() {
                nws_start = Some(ss);
            }
            li.empty = false;
            if start_ws.is_none() {
                start_ws = Some(cws);
            }
            last_was_ws = false;
            col += 1;
        }

        if end.is_some() {
            broke = Some((c, w));
            break;
        }
        ss += w;
    }

    li.is_final = broke.is_none();

    if !last_was_ws {
        nws_end = Some(ss);
    }
    li.nws_start = nws_start.unwrap_or(ss);
    li.nws_end = nws_end.unwrap_or(ss);

    // if we haven't hit the chomp point, use where we are now
    li.chomp_start = if is_block {
        chomp_start.unwrap_or(ss)
    } else {
        chomp_start.unwrap_or(0)
    };
    li.start_ws = start_ws.unwrap_or(0);

    // no line break found: the line runs to the atom end
    let Some(line_end) = end else {
        li.end = len;
        li.trailing_ws = last_was_ws;
        li.last = true;
        li.end_ws = cws;
        li.lb_end = false;
        return li;
    };
    li.end = line_end;

    // step over the break that ended the line
    if let Some((c, w)) = broke {
        ss += w;
        if is_lb(c) {
            col = 0;
        } else if is_tab(c) {
            col += tabsize - (col % tabsize);
        } else {
            col += 1;
        }
    }

    if ss >= len {
        li.last = true;
        return li;
    }

    // find out whether trailing breaks exist afterwards
    while let Some((c, w)) = utf8::decode(&data[ss..len]) {
        if !is_ws_or_lb(c) {
            break;
        }
        if !li.trailing_breaks && is_lb(c) {
            li.trailing_breaks = true;
        }
        // indented whitespace past the chomp column counts as break content
        if !li.trailing_breaks_ws && is_block && col > chomp {
            li.trailing_breaks_ws = true;
        }
        if is_lb(c) {
            col = 0;
        } else if is_tab(c) {
            col += tabsize - (col % tabsize);
        } else {
            col += 1;
        }
        ss += w;
    }

    // last if only whitespace and breaks follow
    li.last = ss >= len;
    li
}

#[cfg(test)]
mod test {
    use super::analyze;
    use crate::{Atom, AtomStyle, Input};

    #[test]
    fn single_line_short_circuit() {
        let input = Input::new("hello");
        let atom = Atom::over(&input, 0..5, AtomStyle::Plain);
        let li = analyze(&atom, 0, 8, 0);
        assert!(li.is_final);
        assert_eq!((li.start, li.end), (0, 5));
        assert_eq!((li.nws_start, li.nws_end), (0, 5));
        assert!(!li.empty);
    }

    #[test]
    fn line_bounds_and_whitespace() {
        let input = Input::new("  foo  \nbar");
        let atom = Atom::over(&input, 0..11, AtomStyle::Plain);
        let li = analyze(&atom, 0, 8, 0);
        assert_eq!(li.end, 7);
        assert_eq!((li.nws_start, li.nws_end), (2, 5));
        assert_eq!(li.start_ws, 2);
        assert_eq!(li.end_ws, 2);
        assert!(li.trailing_ws);
        assert!(li.lb_end);
        assert!(!li.last);
        assert!(!li.empty);
    }

    #[test]
    fn trailing_breaks_detected() {
        let input = Input::new("foo\n\n\n");
        let atom = Atom::over(&input, 0..6, AtomStyle::Plain);
        let li = analyze(&atom, 0, 8, 0);
        assert!(li.lb_end);
        assert!(li.trailing_breaks);
        assert!(li.last);
    }

    #[test]
    fn block_chomp_column() {
        let input = Input::new("  foo\n");
        let atom = Atom::over(&input, 0..6, AtomStyle::Literal).with_increment(2);
        let li = analyze(&atom, 2, 8, 0);
        assert_eq!(li.chomp_start, 2);
        assert!(!li.indented);

        let atom = Atom::over(&input, 0..6, AtomStyle::Literal).with_increment(1);
        let li = analyze(&atom, 1, 8, 0);
        assert_eq!(li.chomp_start, 1);
        assert!(li.indented);
    }

    #[test]
    fn tabs_expand_to_tab_stops() {
        let input = Input::new("\tx\n");
        let atom = Atom::over(&input, 0..3, AtomStyle::Literal).with_increment(4);
        let li = analyze(&atom, 4, 8, 0);
        // The tab advances the column straight to 8, past the chomp column
        // of 4, so the chomp point lands on the byte after it.
        assert_eq!(li.chomp_start, 1);
        assert!(!li.indented);
    }
}
