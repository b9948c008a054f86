//! Scalar rendering: style selection and the per-style writers.

use yarrow_atom::char_traits::{is_generic_lb, is_lb, is_printable, is_space, is_ws};

use crate::{
    accum::EmitAccum,
    analyze,
    emitter::{Emitter, Indicator, NodeFlags, WriteKind},
    error::EmitResult,
    node::Tag,
    token::{ScalarStyle, ScalarToken},
};

/// The style a scalar actually renders with, after mode rules applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResolvedStyle {
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

impl<'input> Emitter<'_, 'input> {
    /// Emit a scalar token at the given indent.
    ///
    /// # Errors
    /// Returns an error when the token's atom fails to decode.
    pub(crate) fn emit_token_scalar(
        &mut self,
        token: &ScalarToken<'input>,
        tag: Option<&Tag<'_>>,
        flags: NodeFlags,
        indent: i32,
    ) -> EmitResult {
        let indent = self.increase_indent(flags, indent);

        if !self.flags.whitespace {
            self.write_ws();
        }

        match self.scalar_style(token, tag, flags)? {
            ResolvedStyle::Plain => self.write_plain(token, flags, indent),
            ResolvedStyle::SingleQuoted => self.write_quoted(token, flags, indent, '\''),
            ResolvedStyle::DoubleQuoted => self.write_quoted(token, flags, indent, '"'),
            ResolvedStyle::Literal => self.write_literal(token, flags, indent),
            ResolvedStyle::Folded => self.write_folded(token, flags, indent),
        }
    }

    /// Decide the output style of a scalar.
    ///
    /// JSON upgrades block styles to double-quoted and keeps plain only for
    /// the JSON literals; flow upgrades block styles to a quoted form; `Any`
    /// resolves through plain-scalar analysis.
    fn scalar_style(
        &self,
        token: &ScalarToken<'input>,
        tag: Option<&Tag<'_>>,
        flags: NodeFlags,
    ) -> Result<ResolvedStyle, crate::EmitError> {
        let mut style = token.style();

        // block styles are not allowed in flow context
        if flags.flow && matches!(style, ScalarStyle::Literal | ScalarStyle::Folded) {
            style = ScalarStyle::Any;
        }

        if self.config().is_json_mode() {
            if matches!(style, ScalarStyle::Literal | ScalarStyle::Folded) {
                return Ok(ResolvedStyle::DoubleQuoted);
            }
            if style == ScalarStyle::Plain {
                if token.is_empty() {
                    return Ok(ResolvedStyle::Plain);
                }
                let text = token.text()?;
                if analyze::is_json_plain(&text) {
                    return Ok(ResolvedStyle::Plain);
                }
                if self.config().is_json_tagged_plain() && tag.is_some_and(json_tagged_plain) {
                    return Ok(ResolvedStyle::Plain);
                }
            }
            return Ok(ResolvedStyle::DoubleQuoted);
        }

        if self.config().is_flow_mode() {
            // a bare empty plain reads as null; quote it
            if token.is_empty() {
                return Ok(ResolvedStyle::DoubleQuoted);
            }
            if matches!(
                style,
                ScalarStyle::Any | ScalarStyle::Literal | ScalarStyle::Folded
            ) {
                let text = token.text()?;
                if analyze::has_lb(&text) {
                    return Ok(ResolvedStyle::DoubleQuoted);
                }
                if !analyze::has_non_printable(&text) {
                    return Ok(ResolvedStyle::SingleQuoted);
                }
                return Ok(ResolvedStyle::DoubleQuoted);
            }
        }

        Ok(match style {
            ScalarStyle::Any => {
                if analyze::is_plain_safe(&token.text()?) {
                    ResolvedStyle::Plain
                } else {
                    ResolvedStyle::DoubleQuoted
                }
            }
            ScalarStyle::Plain => ResolvedStyle::Plain,
            ScalarStyle::SingleQuoted => ResolvedStyle::SingleQuoted,
            ScalarStyle::DoubleQuoted => ResolvedStyle::DoubleQuoted,
            ScalarStyle::Literal => ResolvedStyle::Literal,
            ScalarStyle::Folded => ResolvedStyle::Folded,
        })
    }

    /// Write a plain scalar, folding long lines at whitespace.
    fn write_plain(
        &mut self,
        token: &ScalarToken<'input>,
        flags: NodeFlags,
        indent: i32,
    ) -> EmitResult {
        let kind = if flags.simple_scalar_key {
            WriteKind::PlainScalarKey
        } else {
            WriteKind::PlainScalar
        };

        // simple case first (90% of cases)
        if let Some(direct) = token.direct_output() {
            self.write(kind, direct);
            self.flags.whitespace = false;
            self.flags.indentation = false;
            return Ok(());
        }

        let allow_breaks =
            !flags.simple && !self.config().is_json_mode() && !self.config().is_oneline();

        let mut spaces = false;
        let mut breaks = false;

        let mut chars = token.chars();
        let mut accum = EmitAccum::new(kind);
        while let Some(c) = chars.next() {
            if is_ws(c) {
                let should_indent =
                    allow_breaks && !spaces && accum.column(self) > self.width();

                if should_indent && !chars.peek().is_some_and(is_ws) {
                    accum.output(self);
                    self.flags.indentation = false;
                    self.write_indent(indent);
                } else {
                    accum.put(c);
                }
                spaces = true;
            } else if is_lb(c) {
                if !allow_breaks {
                    break;
                }

                // a logical line break renders as a blank line
                if !breaks {
                    accum.output(self);
                    self.write_indent(indent);
                }
                self.flags.indentation = false;
                self.write_indent(indent);

                breaks = true;
            } else {
                if breaks {
                    self.write_indent(indent);
                }
                accum.put(c);
                self.flags.indentation = false;
                spaces = false;
                breaks = false;
            }
        }
        accum.output(self);
        chars.finish()?;

        self.flags.whitespace = false;
        self.flags.indentation = false;
        Ok(())
    }

    /// Write a quoted scalar; `qc` selects single or double quotes.
    fn write_quoted(
        &mut self,
        token: &ScalarToken<'input>,
        flags: NodeFlags,
        indent: i32,
        qc: char,
    ) -> EmitResult {
        let kind = match (qc, flags.simple_scalar_key) {
            ('\'', true) => WriteKind::SingleQuotedScalarKey,
            ('\'', false) => WriteKind::SingleQuotedScalar,
            (_, true) => WriteKind::DoubleQuotedScalarKey,
            (_, false) => WriteKind::DoubleQuotedScalar,
        };

        self.write_indicator(
            if qc == '\'' {
                Indicator::SingleQuoteStart
            } else {
                Indicator::DoubleQuoteStart
            },
            flags,
            indent,
            kind,
        );

        // direct output only when nothing inside needs escaping
        let direct = token.direct_output().filter(|s| {
            if qc == '\'' {
                !s.contains('\'')
            } else {
                !s.contains(['"', '\\', '\t']) && s.chars().all(is_printable)
            }
        });

        if let Some(direct) = direct {
            self.write(kind, direct);
        } else {
            self.write_quoted_body(token, flags, indent, qc, kind)?;
        }

        self.write_indicator(
            if qc == '\'' {
                Indicator::SingleQuoteEnd
            } else {
                Indicator::DoubleQuoteEnd
            },
            flags,
            indent,
            kind,
        );
        Ok(())
    }

    fn write_quoted_body(
        &mut self,
        token: &ScalarToken<'input>,
        flags: NodeFlags,
        indent: i32,
        qc: char,
        kind: WriteKind,
    ) -> EmitResult {
        let allow_breaks =
            !flags.simple && !self.config().is_json_mode() && !self.config().is_oneline();

        let mut spaces = false;
        let mut breaks = false;

        // single-quoted folds at any whitespace; double-quoted folds only at
        // plain spaces and escapes tabs instead
        let foldable = |c: char| if qc == '\'' { is_ws(c) } else { is_space(c) };

        let mut chars = token.chars();
        let mut accum = EmitAccum::new(kind);
        while let Some(c) = chars.next() {
            if foldable(c) {
                let should_indent =
                    allow_breaks && !spaces && accum.column(self) > self.width();

                if should_indent
                    && ((qc == '\'' && chars.peek().is_some_and(is_ws)) || qc == '"')
                {
                    accum.output(self);

                    // protect the following whitespace from folding away
                    if qc == '"' && chars.peek().is_some_and(is_ws) {
                        self.putc(kind, '\\');
                    }

                    self.flags.indentation = false;
                    self.write_indent(indent);
                } else {
                    accum.put(c);
                }
                spaces = true;
                breaks = false;
            } else if qc == '\'' && is_lb(c) {
                if !allow_breaks {
                    break;
                }

                if !breaks {
                    accum.output(self);
                    self.write_indent(indent);
                }
                self.flags.indentation = false;
                self.write_indent(indent);

                breaks = true;
            } else {
                if breaks {
                    accum.output(self);
                    self.write_indent(indent);
                }

                if qc == '\'' && c == '\'' {
                    accum.put('\'');
                    accum.put('\'');
                } else if qc == '"'
                    && (!is_printable(c)
                        || c == '\u{feff}'
                        || is_generic_lb(c)
                        || c == '\t'
                        || c == '"'
                        || c == '\\')
                {
                    put_dq_escape(&mut accum, c);
                } else {
                    accum.put(c);
                }

                self.flags.indentation = false;
                spaces = false;
                breaks = false;
            }
        }
        accum.output(self);
        chars.finish()?;
        Ok(())
    }

    /// Write the block scalar header hints: the optional explicit indent
    /// digit and the chomping indicator.
    fn write_block_hints(&mut self, token: &ScalarToken<'input>) {
        if token.is_empty() {
            self.flags.open_ended = false;
            self.putc(WriteKind::Indicator, '-');
            return;
        }

        if token.starts_with_ws_or_lb() {
            let digit = b'0' + u8::try_from(self.config().indent_step()).unwrap_or(2);
            self.putc(WriteKind::Indicator, char::from(digit));
        }

        if !token.ends_with_lb() {
            self.flags.open_ended = false;
            self.putc(WriteKind::Indicator, '-');
        } else if token.trailing_lb() {
            self.flags.open_ended = true;
            self.putc(WriteKind::Indicator, '+');
        } else {
            self.flags.open_ended = false;
        }
    }

    /// Write a literal block scalar.
    fn write_literal(
        &mut self,
        token: &ScalarToken<'input>,
        flags: NodeFlags,
        mut indent: i32,
    ) -> EmitResult {
        self.write_indicator(Indicator::Bar, flags, indent, WriteKind::Indicator);
        self.write_block_hints(token);
        if flags.root {
            indent += self.config().indent_step();
        }

        self.putc(WriteKind::Linebreak, '\n');
        self.flags.whitespace = true;
        self.flags.indentation = true;

        let mut breaks = true;

        let mut chars = token.chars();
        let mut accum = EmitAccum::new(WriteKind::LiteralScalar);
        while let Some(c) = chars.next() {
            if breaks {
                self.write_indent(indent);
                breaks = false;
            }

            if is_lb(c) {
                accum.output(self);
                self.flags.indentation = false;
                breaks = true;
            } else {
                accum.put(c);
            }
        }
        accum.output(self);
        chars.finish()?;

        self.flags.indentation = false;
        Ok(())
    }

    /// Write a folded block scalar, collapsing runs of breaks.
    fn write_folded(
        &mut self,
        token: &ScalarToken<'input>,
        flags: NodeFlags,
        mut indent: i32,
    ) -> EmitResult {
        self.write_indicator(Indicator::Greater, flags, indent, WriteKind::Indicator);
        self.write_block_hints(token);
        if flags.root {
            indent += self.config().indent_step();
        }

        self.putc(WriteKind::Linebreak, '\n');
        self.flags.whitespace = true;
        self.flags.indentation = true;

        let mut breaks = true;
        let mut leading_spaces = true;

        let mut chars = token.chars();
        let mut accum = EmitAccum::new(WriteKind::FoldedScalar);
        while let Some(c) = chars.next() {
            if is_lb(c) {
                if accum.len() > 0 {
                    accum.output(self);
                    // no indent at the very end or on a leading-spaces line
                    if chars.peek().is_some() && !leading_spaces {
                        self.write_indent(indent);
                    }
                }

                // count the run of consecutive breaks
                let mut nrbreaks = 1usize;
                while chars.peek().is_some_and(is_lb) {
                    nrbreaks += 1;
                    chars.next();
                }

                // the number of represented breaks depends on what follows:
                // content keeps all of them, a blank line one less, the end
                // two less
                let nrbreakslim = match chars.peek() {
                    None => 2,
                    Some(c) if is_ws(c) => 1,
                    Some(_) => 0,
                };
                while nrbreaks > nrbreakslim {
                    self.flags.indentation = false;
                    self.write_indent(indent);
                    nrbreaks -= 1;
                }

                breaks = true;
            } else {
                if breaks {
                    self.write_indent(indent);
                    // lines that start with whitespace stay verbatim
                    leading_spaces = is_ws(c);
                }

                if !breaks
                    && is_space(c)
                    && !chars.peek().is_some_and(is_space)
                    && accum.column(self) > self.width()
                {
                    accum.output(self);
                    self.flags.indentation = false;
                    self.write_indent(indent);
                } else {
                    accum.put(c);
                }

                breaks = false;
            }
        }
        accum.output(self);
        chars.finish()?;
        Ok(())
    }
}

/// Append the double-quote escape for `c` to the accumulator.
fn put_dq_escape(accum: &mut EmitAccum, c: char) {
    accum.put('\\');
    match c {
        '\0' => accum.put('0'),
        '\x07' => accum.put('a'),
        '\x08' => accum.put('b'),
        '\t' => accum.put('t'),
        '\n' => accum.put('n'),
        '\x0b' => accum.put('v'),
        '\x0c' => accum.put('f'),
        '\r' => accum.put('r'),
        '\x1b' => accum.put('e'),
        '"' => accum.put('"'),
        '\\' => accum.put('\\'),
        '\u{85}' => accum.put('N'),
        '\u{a0}' => accum.put('_'),
        '\u{2028}' => accum.put('L'),
        '\u{2029}' => accum.put('P'),
        _ => {
            let cp = u32::from(c);
            let digits = if cp <= 0xff {
                accum.put('x');
                2
            } else if cp <= 0xffff {
                accum.put('u');
                4
            } else {
                accum.put('U');
                8
            };
            for i in (0..digits).rev() {
                let digit = (cp >> (i * 4)) & 15;
                accum.put(char::from_digit(digit, 16).unwrap_or('0').to_ascii_uppercase());
            }
        }
    }
}

/// Whether a tag marks a scalar that stays plain in tagged-plain JSON mode.
fn json_tagged_plain(tag: &Tag<'_>) -> bool {
    tag.is_core_schema() && matches!(tag.suffix.as_ref(), "int" | "float" | "bool" | "null")
}
