//! The core state machine that rewrites permissive JS-object text into
//! strict JSON text.

use crate::buffer::OutputBuffer;
use crate::error::TransformError;
use crate::options::TransformerOptions;
use crate::stack::{ContainerKind, NestingStack};
use crate::state::State;

/// The transformer's overall progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// More input remains to be consumed.
    Advancing,
    /// The current document rewrote successfully.
    Finished,
    /// The current document failed to rewrite.
    Error,
}

/// A single-pass, character-driven rewriter from permissive JS-object text
/// to strict JSON text.
///
/// Borrows its input for the transformer's lifetime; the output buffer and
/// nesting stack are owned and grow as needed. Drive it to completion with
/// [`Transformer::run`], or step it by hand with [`Transformer::advance`]
/// when interleaving with an external loop.
#[derive(Debug)]
pub struct Transformer<'a> {
    input: &'a [u8],
    pos: usize,
    output: OutputBuffer,
    stack: NestingStack,
    state: State,
    status: Status,
    is_key: bool,
    options: TransformerOptions,
    error: Option<TransformError>,
}

impl<'a> Transformer<'a> {
    /// Create a transformer over `input` with default options.
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_options(input, TransformerOptions::default())
    }

    /// Create a transformer over `input` with custom options.
    pub fn with_options(input: &'a [u8], options: TransformerOptions) -> Self {
        Transformer {
            input,
            pos: 0,
            output: OutputBuffer::with_input_capacity(input.len()),
            stack: NestingStack::new(),
            state: State::Opening,
            status: Status::Advancing,
            is_key: false,
            options,
            error: None,
        }
    }

    /// The current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// The current status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// The byte index the cursor is currently at.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// `true` while there is still unconsumed input.
    pub fn has_remaining_input(&self) -> bool {
        self.pos < self.input.len()
    }

    /// Step the state machine once.
    ///
    /// Invokes the current state's step function and stores its return
    /// value as the next state. The two terminal states are handled here,
    /// centrally, rather than in every step function: entering `Closing`
    /// appends the sentinel byte and flips the status to `Finished`;
    /// entering `Error` appends the sentinel and flips the status to
    /// `Error`. Calling `advance` again once the status has left
    /// `Advancing` is a no-op.
    pub fn advance(&mut self) {
        if self.status != Status::Advancing {
            return;
        }
        self.state = match self.state {
            State::Opening => self.step_opening(),
            State::Structural => self.step_structural(),
            State::Value => self.step_value(),
            State::Closing => {
                self.output.push(0);
                self.status = Status::Finished;
                State::Closing
            }
            State::Error => {
                self.output.push(0);
                self.status = Status::Error;
                State::Error
            }
        };
    }

    /// Drive the state machine to completion and return the rewritten JSON
    /// text, with the internal sentinel byte stripped.
    pub fn run(&mut self) -> Result<Vec<u8>, TransformError> {
        while self.status == Status::Advancing {
            self.advance();
        }
        match self.status {
            Status::Finished => {
                let mut out = self.output.as_slice().to_vec();
                out.pop();
                Ok(out)
            }
            Status::Error => Err(self
                .error
                .expect("status is Error but no error was recorded")),
            Status::Advancing => unreachable!("loop only exits once status leaves Advancing"),
        }
    }

    /// Drain the accumulated output and return this transformer to
    /// `Opening`, with the cursor left exactly where the just-completed
    /// document ended. Used by [`crate::stream::DocumentStream`] between
    /// documents.
    pub fn reset_output(&mut self) {
        self.output.clear();
        self.state = State::Opening;
        self.status = Status::Advancing;
        self.is_key = false;
        self.error = None;
    }

    /// A snapshot of the raw output bytes, sentinel included. Used by
    /// [`crate::stream::DocumentStream`], which strips the sentinel itself.
    pub(crate) fn output_bytes(&self) -> Vec<u8> {
        self.output.as_slice().to_vec()
    }

    /// Take the stored error, if any. Used by [`crate::stream::DocumentStream`]
    /// to hand the error to its caller without requiring `Copy` semantics at
    /// the call site.
    pub(crate) fn take_error(&mut self) -> Option<TransformError> {
        self.error.take()
    }

    /// Rewind the cursor to the start of the input. Used by [`crate::reset::Reset`]
    /// to reuse a transformer against the same input from scratch.
    pub(crate) fn rewind_cursor(&mut self) {
        self.pos = 0;
    }

    /// Drop every currently open container. Used by [`crate::reset::Reset`].
    pub(crate) fn clear_stack(&mut self) {
        self.stack.clear();
    }

    fn fail(&mut self, err: TransformError) -> State {
        self.error = Some(err);
        State::Error
    }

    /// 1-based byte offset of the cursor, for error reporting.
    fn offset(&self) -> usize {
        self.pos + 1
    }

    fn peek_byte(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<u8> {
        self.input.get(self.pos + n).copied()
    }

    /// Advance the cursor past ASCII whitespace, copying it straight
    /// through to the output (so formatting between tokens survives the
    /// rewrite), and return the next non-space byte without consuming it.
    fn next_nonspace(&mut self) -> Option<u8> {
        while let Some(b) = self.peek_byte() {
            if b.is_ascii_whitespace() {
                self.output.push(b);
                self.pos += 1;
            } else {
                return Some(b);
            }
        }
        None
    }

    /// The last non-whitespace byte emitted so far, skipping back over any
    /// formatting whitespace (used to detect a trailing comma even when
    /// whitespace separates it from the closing bracket).
    fn last_emitted(&self) -> Option<u8> {
        self.output
            .as_slice()
            .iter()
            .rev()
            .copied()
            .find(|b| !b.is_ascii_whitespace())
    }

    /// Remove a trailing `,` immediately before the container close,
    /// preserving any whitespace that follows it in the output.
    fn strip_trailing_comma(&mut self) {
        if self.last_emitted() != Some(b',') {
            return;
        }
        let mut trailing_ws = Vec::new();
        while self.output.top().is_ascii_whitespace() {
            trailing_ws.push(self.output.pop());
        }
        self.unemit();
        while let Some(b) = trailing_ws.pop() {
            self.output.push(b);
        }
    }

    fn emit(&mut self, b: u8) {
        self.output.push(b);
        self.pos += 1;
    }

    fn emit_here(&mut self, b: u8) {
        self.output.push(b);
    }

    fn emit_span(&mut self, s: &[u8]) {
        self.output.push_span(s);
        self.pos += s.len();
    }

    fn emit_span_here(&mut self, s: &[u8]) {
        self.output.push_span(s);
    }

    fn unemit(&mut self) {
        self.output.pop();
    }

    fn trim_trailing_whitespace(&mut self) {
        while !self.output.is_empty() && self.output.top().is_ascii_whitespace() {
            self.output.pop();
        }
    }

    fn step_opening(&mut self) -> State {
        loop {
            match self.peek_byte() {
                Some(b'{') | Some(b'[') => return State::Structural,
                Some(_) => self.pos += 1,
                None => return State::Closing,
            }
        }
    }

    fn step_structural(&mut self) -> State {
        let b = match self.next_nonspace() {
            Some(b) => b,
            None => return State::Closing,
        };
        match b {
            b'{' => {
                if self.stack.depth() >= self.options.max_depth {
                    return self.fail(TransformError::DepthExceeded {
                        offset: self.offset(),
                    });
                }
                self.stack.push(ContainerKind::Object);
                self.is_key = true;
                self.emit(b'{');
                State::Structural
            }
            b'[' => {
                if self.stack.depth() >= self.options.max_depth {
                    return self.fail(TransformError::DepthExceeded {
                        offset: self.offset(),
                    });
                }
                self.stack.push(ContainerKind::Array);
                self.emit(b'[');
                State::Structural
            }
            b'}' => {
                self.strip_trailing_comma();
                self.stack.pop();
                self.is_key = self.stack.top() == Some(ContainerKind::Object);
                self.emit(b'}');
                if self.stack.is_empty() {
                    State::Closing
                } else {
                    State::Structural
                }
            }
            b']' => {
                self.strip_trailing_comma();
                self.stack.pop();
                self.is_key = self.stack.top() == Some(ContainerKind::Object);
                self.emit(b']');
                if self.stack.is_empty() {
                    State::Closing
                } else {
                    State::Structural
                }
            }
            b':' => {
                self.is_key = false;
                self.emit(b':');
                State::Structural
            }
            b',' => {
                self.emit(b',');
                self.is_key = self.stack.top() == Some(ContainerKind::Object);
                State::Structural
            }
            b'/' => match self.peek_ahead(1) {
                Some(b'/') => {
                    self.skip_line_comment();
                    State::Structural
                }
                Some(b'*') => {
                    self.skip_block_comment();
                    State::Structural
                }
                _ => State::Value,
            },
            b'>' | b')' => self.fail(TransformError::IllegalStructuralByte {
                offset: self.offset(),
                byte: b,
            }),
            _ => State::Value,
        }
    }

    fn skip_line_comment(&mut self) {
        self.pos += 2;
        while let Some(b) = self.peek_byte() {
            if b == b'\n' {
                break;
            }
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self) {
        self.pos += 2;
        while self.pos < self.input.len() {
            if self.input[self.pos] == b'*' && self.peek_ahead(1) == Some(b'/') {
                self.pos += 2;
                return;
            }
            self.pos += 1;
        }
    }

    fn step_value(&mut self) -> State {
        let c = self
            .peek_byte()
            .expect("step_value entered without a pending byte");
        if c == b'"' || c == b'\'' || c == b'`' {
            return self.read_quoted_string(c);
        }
        if (c.is_ascii_digit() || c == b'.' || c == b'-') && !self.is_key {
            return self.read_number();
        }
        if !self.is_key {
            if let Some(next) = self.match_literal() {
                return next;
            }
        }
        if c == b'[' || c == b']' || c == b'{' || c == b'}' {
            return State::Structural;
        }
        self.read_unrecognized()
    }

    fn read_quoted_string(&mut self, quote: u8) -> State {
        self.emit_here(b'"');
        self.pos += 1;
        loop {
            match self.peek_byte() {
                None => {
                    return self.fail(TransformError::UnterminatedString {
                        offset: self.offset(),
                    })
                }
                Some(b'\\') => {
                    self.pos += 1;
                    match self.peek_byte() {
                        None => {
                            return self.fail(TransformError::UnterminatedString {
                                offset: self.offset(),
                            })
                        }
                        Some(b'\'') => {
                            self.output.push(b'\'');
                            self.pos += 1;
                        }
                        Some(escaped) => {
                            self.output.push(b'\\');
                            self.output.push(escaped);
                            self.pos += 1;
                        }
                    }
                }
                Some(b) if b == quote => {
                    self.pos += 1;
                    self.emit_here(b'"');
                    return State::Structural;
                }
                Some(b'"') => {
                    self.output.push(b'\\');
                    self.output.push(b'"');
                    self.pos += 1;
                }
                Some(b) => {
                    self.output.push(b);
                    self.pos += 1;
                }
            }
        }
    }

    fn read_number(&mut self) -> State {
        if self.peek_byte() == Some(b'-') {
            self.emit(b'-');
        }
        match self.peek_byte() {
            Some(b'.') => {
                self.emit_here(b'0');
                self.emit(b'.');
                self.read_decimal_tail();
            }
            Some(b'0') => match self.peek_ahead(1) {
                Some(b'.') => {
                    self.emit(b'0');
                    self.emit(b'.');
                    self.read_decimal_tail();
                }
                Some(b'x') | Some(b'X') => {
                    self.pos += 2;
                    self.read_radix_number(16);
                }
                Some(b'o') | Some(b'O') => {
                    self.pos += 2;
                    self.read_radix_number(8);
                }
                Some(b'b') | Some(b'B') => {
                    self.pos += 2;
                    self.read_radix_number(2);
                }
                Some(d) if (b'0'..=b'7').contains(&d) => {
                    self.pos += 1;
                    self.read_radix_number(8);
                }
                _ => {
                    self.emit(b'0');
                }
            },
            Some(b'1'..=b'9') => {
                self.read_decimal_tail();
            }
            _ => {}
        }
        State::Structural
    }

    fn read_decimal_tail(&mut self) {
        while let Some(b) = self.peek_byte() {
            match b {
                b'0'..=b'9' | b'.' | b'e' | b'E' | b'+' | b'-' => self.emit(b),
                b'_' => self.pos += 1,
                _ => break,
            }
        }
        if !self.output.is_empty() && self.output.top() == b'.' {
            self.output.push(b'0');
        }
    }

    fn read_radix_number(&mut self, radix: u32) -> State {
        let start = self.pos;
        while let Some(b) = self.peek_byte() {
            if b.is_ascii_alphanumeric() || b == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        let mut cleaned = Vec::with_capacity(self.pos - start);
        for &b in &self.input[start..self.pos] {
            if b != b'_' {
                cleaned.push(b);
            }
        }
        let text = std::str::from_utf8(&cleaned).unwrap_or("0");
        let value = u64::from_str_radix(text, radix).unwrap_or(0);
        self.output.push_integer(value as i64);
        State::Structural
    }

    fn match_literal(&mut self) -> Option<State> {
        const LITERALS: [(&[u8], &[u8]); 4] = [
            (b"true", b"true"),
            (b"false", b"false"),
            (b"null", b"null"),
            (b"NaN", b"\"NaN\""),
        ];
        for (literal, replacement) in LITERALS {
            if !self.input[self.pos..].starts_with(literal) {
                continue;
            }
            let after = self.pos + literal.len();
            let continues_identifier = self
                .input
                .get(after)
                .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_');
            if continues_identifier {
                continue;
            }
            if replacement.len() == literal.len() {
                self.emit_span(replacement);
            } else {
                self.emit_span_here(replacement);
                self.pos += literal.len();
            }
            return Some(State::Structural);
        }
        None
    }

    fn read_unrecognized(&mut self) -> State {
        self.emit_here(b'"');
        let mut quoted_with: u8 = 0;
        let mut depth: i32 = 0;
        loop {
            match self.peek_byte() {
                None => {
                    return self.fail(TransformError::UnterminatedToken {
                        offset: self.offset(),
                    })
                }
                Some(b'\\') => {
                    self.output.push(b'\\');
                    self.output.push(b'\\');
                    self.pos += 1;
                }
                Some(b'"') => {
                    self.output.push(b'\\');
                    self.output.push(b'"');
                    quoted_with = if quoted_with == b'"' { 0 } else { b'"' };
                    self.pos += 1;
                }
                Some(b @ b'\'') | Some(b @ b'`') => {
                    self.output.push(b);
                    quoted_with = if quoted_with == b { 0 } else { b };
                    self.pos += 1;
                }
                Some(b @ (b'{' | b'[' | b'<' | b'(')) => {
                    self.output.push(b);
                    depth += 1;
                    self.pos += 1;
                }
                Some(b @ (b'}' | b']' | b'>' | b')')) => {
                    if quoted_with != 0 || depth > 0 {
                        self.output.push(b);
                        if quoted_with == 0 {
                            depth -= 1;
                        }
                        self.pos += 1;
                    } else {
                        self.trim_trailing_whitespace();
                        self.output.push(b'"');
                        return State::Structural;
                    }
                }
                Some(b @ (b',' | b':')) => {
                    if quoted_with != 0 || depth > 0 {
                        self.output.push(b);
                        self.pos += 1;
                    } else {
                        self.trim_trailing_whitespace();
                        self.output.push(b'"');
                        return State::Structural;
                    }
                }
                Some(b'/')
                    if quoted_with == 0
                        && depth == 0
                        && matches!(self.peek_ahead(1), Some(b'/') | Some(b'*')) =>
                {
                    // A comment starts right where the token would otherwise
                    // continue; let `Structural` skip it.
                    self.trim_trailing_whitespace();
                    self.output.push(b'"');
                    return State::Structural;
                }
                Some(b) => {
                    self.output.push(b);
                    self.pos += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_closes_without_error() {
        let mut t = Transformer::new(b"   ");
        assert_eq!(t.run().unwrap(), b"");
    }

    #[test]
    fn single_quoted_object() {
        let mut t = Transformer::new(b"{'a': 'b'}");
        assert_eq!(t.run().unwrap(), b"{\"a\": \"b\"}");
    }

    #[test]
    fn unquoted_keys_and_trailing_comma() {
        let mut t = Transformer::new(b"{a: 1, b: 2,}");
        assert_eq!(t.run().unwrap(), b"{\"a\": 1, \"b\": 2}");
    }

    #[test]
    fn numeral_grammar() {
        let mut t = Transformer::new(b"[0x10, 0b11, 0o17, 1_000]");
        assert_eq!(t.run().unwrap(), b"[16, 3, 15, 1000]");
    }

    #[test]
    fn depth_guard_trips() {
        let opts = TransformerOptions::builder().with_max_depth(2).build();
        let mut t = Transformer::with_options(b"[[[1]]]", opts);
        let err = t.run().unwrap_err();
        assert!(matches!(err, TransformError::DepthExceeded { .. }));
    }

    #[test]
    fn illegal_structural_byte_reports_offset() {
        let mut t = Transformer::new(b"{a: 1)}");
        let err = t.run().unwrap_err();
        assert!(matches!(err, TransformError::IllegalStructuralByte { .. }));
        assert_eq!(err.offset(), 6);
    }
}
