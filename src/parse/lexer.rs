use std::fmt::{self, Display};
use std::io::{self, Read};
use std::sync::Arc;

use thiserror::Error;
use tracing::trace;

use crate::diag::{Diagnostic, IntoDiagnostic, Label, code};
use crate::location::{ConvexHull, Location, Span};

use super::cursor::Cursor;
use super::token::{Token, TokenValue};

#[derive(Error, Debug)]
#[error("{location}: {kind}")]
pub struct LexerError {
    pub kind: LexerErrorKind,
    pub location: Location,
}

fn format_byte(byte: u8) -> impl Display {
    struct ByteFormatter(u8);

    impl Display for ByteFormatter {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            if self.0.is_ascii_graphic() {
                write!(f, "`{}`", self.0 as char)
            } else {
                write!(f, "byte 0x{:02x}", self.0)
            }
        }
    }

    ByteFormatter(byte)
}

#[derive(Error, Debug)]
pub enum LexerErrorKind {
    #[error("expected `\"` at the end of string")]
    UnterminatedString { found: Option<u8> },

    #[error("expected digit")]
    ExpectedDigit,

    #[error("unrecognized word `{0}`")]
    UnrecognizedWord(String),

    #[error("could not read the input")]
    Io(#[source] io::Error),
}

impl IntoDiagnostic for LexerError {
    fn into_diagnostic(self) -> Diagnostic {
        let location = self.location;

        match self.kind {
            LexerErrorKind::UnterminatedString { found } => {
                let label = match found {
                    Some(byte) => Label::primary(location.clone())
                        .with_msg(format!("found {} here", format_byte(byte))),
                    None => Label::primary(location.clone()).with_msg("the input ends here"),
                };

                Diagnostic::error()
                    .at(location)
                    .with_msg(LexerErrorKind::UnterminatedString { found })
                    .with_code(code!(lexer::unterminated_string))
                    .with_label(label)
                    .with_note("strings may only contain ASCII letters, digits, punctuation and spaces")
                    .make()
            }

            kind @ LexerErrorKind::ExpectedDigit => Diagnostic::error()
                .at(location.clone())
                .with_msg(&kind)
                .with_code(code!(lexer::expected_digit))
                .with_label(Label::primary(location))
                .make(),

            kind @ LexerErrorKind::UnrecognizedWord(_) => Diagnostic::error()
                .at(location.clone())
                .with_msg(&kind)
                .with_code(code!(lexer::unrecognized_word))
                .with_label(Label::primary(location))
                .with_note("the only bare words allowed are `true`, `false` and `null`")
                .make(),

            LexerErrorKind::Io(e) => Diagnostic::error()
                .at(location)
                .with_msg(format!("could not read the input: {e}"))
                .with_code(code!(lexer::io))
                .make(),
        }
    }
}

/// Pulls tokens out of a byte cursor, one token per call.
pub struct Lexer<R> {
    cursor: Cursor<R>,
    pushed_back: Option<(u8, Location)>,
    location: Location,
    lexeme: Vec<u8>,
    eof: bool,
}

impl<R> Lexer<R> {
    fn is_whitespace(byte: u8) -> bool {
        matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | b'\x0b')
    }

    fn is_string_byte(byte: u8) -> bool {
        byte.is_ascii_alphanumeric() || byte.is_ascii_punctuation() || byte == b' '
    }

    fn is_exponent_marker(byte: u8) -> bool {
        byte.eq_ignore_ascii_case(&b'e')
    }
}

impl<R: Read> Lexer<R> {
    pub fn new(cursor: Cursor<R>) -> Self {
        let location = cursor.location().clone();

        Self {
            cursor,
            pushed_back: None,
            location,
            lexeme: Vec::with_capacity(32),
            eof: false,
        }
    }

    pub fn path(&self) -> &Arc<str> {
        self.cursor.path()
    }

    /// The location of the byte most recently handed out by [`Self::bump`].
    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn into_cursor(self) -> Cursor<R> {
        self.cursor
    }

    fn make_error(&self, kind: LexerErrorKind) -> LexerError {
        LexerError {
            kind,
            location: self.location.clone(),
        }
    }

    fn bump(&mut self) -> Result<Option<u8>, LexerError> {
        if let Some((byte, location)) = self.pushed_back.take() {
            self.location = location;

            return Ok(Some(byte));
        }

        match self.cursor.next_byte() {
            Ok(byte) => {
                self.location.clone_from(self.cursor.location());

                Ok(byte)
            }

            Err(e) => {
                self.location.clone_from(self.cursor.location());

                Err(self.make_error(LexerErrorKind::Io(e)))
            }
        }
    }

    /// Puts the byte that was read last back so that the next read returns it
    /// again. End of input is sticky in the cursor and needs no push-back.
    fn unread(&mut self, byte: Option<u8>) {
        debug_assert!(self.pushed_back.is_none());

        if let Some(byte) = byte {
            self.pushed_back = Some((byte, self.location.clone()));
        }
    }

    fn take_lexeme(&mut self) -> String {
        let text = self.lexeme.iter().copied().map(char::from).collect();
        self.lexeme.clear();

        text
    }

    fn lexeme_location(&self, start: &Location) -> Location {
        start.convex_hull(&Span::new_with_extent(start.span.start, self.lexeme.len()))
    }

    fn scan_string(&mut self, start: &Location) -> Result<(TokenValue, Location), LexerError> {
        loop {
            match self.bump()? {
                Some(b'"') => break,
                Some(byte) if Self::is_string_byte(byte) => self.lexeme.push(byte),

                found => {
                    self.lexeme.clear();

                    return Err(self.make_error(LexerErrorKind::UnterminatedString { found }));
                }
            }
        }

        Ok((
            TokenValue::String(self.take_lexeme()),
            start.through(&self.location),
        ))
    }

    fn scan_digits(&mut self, mut next: Option<u8>) -> Result<Option<u8>, LexerError> {
        let mut digits = 0;

        while let Some(byte @ b'0'..=b'9') = next {
            self.lexeme.push(byte);
            digits += 1;
            next = self.bump()?;
        }

        if digits == 0 {
            self.lexeme.clear();

            return Err(self.make_error(LexerErrorKind::ExpectedDigit));
        }

        Ok(next)
    }

    fn scan_number(&mut self, first: u8, start: &Location) -> Result<(TokenValue, Location), LexerError> {
        let mut next = Some(first);
        let mut is_float = false;

        if first == b'-' {
            self.lexeme.push(first);
            next = self.bump()?;
        }

        next = self.scan_digits(next)?;

        if let Some(b'.') = next {
            self.lexeme.push(b'.');
            let after_dot = self.bump()?;
            next = self.scan_digits(after_dot)?;
            is_float = true;
        }

        if let Some(marker) = next.filter(|&byte| Self::is_exponent_marker(byte)) {
            self.lexeme.push(marker);
            next = self.bump()?;

            if let Some(sign @ (b'+' | b'-')) = next {
                self.lexeme.push(sign);
                next = self.bump()?;
            }

            next = self.scan_digits(next)?;
            is_float = true;
        }

        self.unread(next);

        let location = self.lexeme_location(start);
        let raw = self.take_lexeme();

        Ok((
            if is_float {
                TokenValue::Float(raw)
            } else {
                TokenValue::Integer(raw)
            },
            location,
        ))
    }

    fn scan_word(&mut self, first: u8, start: &Location) -> Result<(TokenValue, Location), LexerError> {
        self.lexeme.push(first);

        let next = loop {
            match self.bump()? {
                Some(byte) if byte.is_ascii_alphabetic() => self.lexeme.push(byte),
                next => break next,
            }
        };

        self.unread(next);

        let location = self.lexeme_location(start);
        let word = String::from_utf8_lossy(&self.lexeme).into_owned();
        self.lexeme.clear();

        match TokenValue::from_word(&word) {
            Some(value) => Ok((value, location)),

            None => Err(LexerError {
                kind: LexerErrorKind::UnrecognizedWord(word),
                location,
            }),
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexerError> {
        let first = loop {
            match self.bump()? {
                Some(byte) if Self::is_whitespace(byte) => continue,
                byte => break byte,
            }
        };

        let start = self.location.clone();

        let (value, location) = match first {
            None => (TokenValue::Eof, start),

            Some(byte) => match TokenValue::from_punct(byte) {
                Some(value) => (value, start),
                None if byte == b'"' => self.scan_string(&start)?,
                None if byte.is_ascii_digit() || byte == b'-' => self.scan_number(byte, &start)?,
                None => self.scan_word(byte, &start)?,
            },
        };

        let token = Token { location, value };
        trace!(%token);

        Ok(token)
    }
}

impl<R: Read> Iterator for Lexer<R> {
    type Item = Result<Token, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.eof {
            return None;
        }

        let result = self.next_token();

        if let Ok(Token {
            value: TokenValue::Eof,
            ..
        }) = result
        {
            self.eof = true;
        }

        Some(result)
    }
}
