use std::collections::TryReserveError;
use std::io::Read;

use strum::VariantArray;
use thiserror::Error;
use tracing::debug;

use crate::diag::{Diagnostic, IntoDiagnostic, Label, code};
use crate::json::{Json, JsonNumber, JsonObject, NumberKind};
use crate::util::format_iter;

use super::{Lexer, LexerError, Token, TokenKind, TokenValue};

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("{}: expected object or array at the root, found {}", token.location, token.value)]
    ExpectedRoot { token: Box<Token> },

    #[error("{}: expected comma but got {} instead", token.location, token.value)]
    ExpectedComma { token: Box<Token> },

    #[error("{}: expected key but got {} instead", token.location, token.value)]
    ExpectedKey { token: Box<Token> },

    #[error("{}: expected colon (`:`) but got {} instead", token.location, token.value)]
    ExpectedColon { token: Box<Token> },

    #[error("{}: missing right brace (`}}`)", token.location)]
    MissingRightBrace { lbrace: Box<Token>, token: Box<Token> },

    #[error("{}: missing right bracket (`]`)", token.location)]
    MissingRightBracket { lbracket: Box<Token>, token: Box<Token> },

    #[error("{}: invalid token {}", token.location, token.value)]
    InvalidToken { token: Box<Token> },

    #[error("{}: unexpected {} after the root value", token.location, token.value)]
    TrailingToken { token: Box<Token> },

    #[error("{}: nesting exceeds the limit of {max_depth} levels", token.location)]
    NestingTooDeep { token: Box<Token>, max_depth: usize },

    #[error("could not grow the storage for the tree")]
    Allocation(#[from] TryReserveError),

    #[error(transparent)]
    Lexer(#[from] LexerError),
}

impl IntoDiagnostic for ParserError {
    fn into_diagnostic(self) -> Diagnostic {
        match self {
            Self::ExpectedRoot { ref token } => Diagnostic::error()
                .at(token.location.clone())
                .with_msg(format!("expected object or array at the root, found {}", token.value))
                .with_code(code!(parser::expected_root))
                .with_label(Label::primary(token.location.clone()))
                .with_note("a document must be a single object or array")
                .make(),

            Self::ExpectedComma { ref token } => Diagnostic::error()
                .at(token.location.clone())
                .with_msg(format!("expected comma but got {} instead", token.value))
                .with_code(code!(parser::expected_comma))
                .with_label(Label::primary(token.location.clone()))
                .make(),

            Self::ExpectedKey { ref token } => Diagnostic::error()
                .at(token.location.clone())
                .with_msg(format!("expected key but got {} instead", token.value))
                .with_code(code!(parser::expected_key))
                .with_label(Label::primary(token.location.clone()))
                .with_note("object keys must be strings")
                .make(),

            Self::ExpectedColon { ref token } => Diagnostic::error()
                .at(token.location.clone())
                .with_msg(format!("expected colon (`:`) but got {} instead", token.value))
                .with_code(code!(parser::expected_colon))
                .with_label(Label::primary(token.location.clone()))
                .make(),

            Self::MissingRightBrace { lbrace, token } => Diagnostic::error()
                .at(token.location.clone())
                .with_msg("missing right brace (`}`)")
                .with_code(code!(parser::missing_right_brace))
                .with_label(Label::primary(token.location))
                .with_label(Label::secondary(lbrace.location).with_msg("the object starts here"))
                .make(),

            Self::MissingRightBracket { lbracket, token } => Diagnostic::error()
                .at(token.location.clone())
                .with_msg("missing right bracket (`]`)")
                .with_code(code!(parser::missing_right_bracket))
                .with_label(Label::primary(token.location))
                .with_label(Label::secondary(lbracket.location).with_msg("the array starts here"))
                .make(),

            Self::InvalidToken { ref token } => Diagnostic::error()
                .at(token.location.clone())
                .with_msg(format!("invalid token {}", token.value))
                .with_code(code!(parser::invalid_token))
                .with_label(Label::primary(token.location.clone()))
                .with_note(format!(
                    "expected {}",
                    format_iter(
                        TokenKind::VARIANTS.iter().filter(|kind| kind.starts_value()),
                        "or",
                        "a value",
                    ),
                ))
                .make(),

            Self::TrailingToken { ref token } => Diagnostic::error()
                .at(token.location.clone())
                .with_msg(format!("unexpected {} after the root value", token.value))
                .with_code(code!(parser::trailing_token))
                .with_label(Label::primary(token.location.clone()))
                .make(),

            Self::NestingTooDeep { ref token, max_depth } => Diagnostic::error()
                .at(token.location.clone())
                .with_msg(format!("nesting exceeds the limit of {max_depth} levels"))
                .with_code(code!(parser::nesting_too_deep))
                .with_label(
                    Label::primary(token.location.clone()).with_msg("this container is too deep"),
                )
                .make(),

            Self::Allocation(ref e) => Diagnostic::error()
                .with_msg(format!("could not grow the storage for the tree: {e}"))
                .with_code(code!(parser::allocation))
                .make(),

            Self::Lexer(e) => e.into_diagnostic(),
        }
    }
}

/// A recursive-descent parser over a single document.
///
/// Every object or array opens one level of nesting, the root included.
/// Opening a container past the maximum depth fails with
/// [`ParserError::NestingTooDeep`] instead of recursing further.
pub struct Parser<R> {
    lexer: Lexer<R>,
    depth: usize,
    max_depth: usize,
}

impl<R: Read> Parser<R> {
    pub const DEFAULT_MAX_DEPTH: usize = 128;

    pub fn new(lexer: Lexer<R>) -> Self {
        Self {
            lexer,
            depth: 0,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;

        self
    }

    fn advance(&mut self) -> Result<Token, ParserError> {
        Ok(self.lexer.next_token()?)
    }

    pub fn parse(mut self) -> Result<Json, ParserError> {
        debug!(path = %self.lexer.path(), "parsing a document");

        let result = self.parse_document();

        match &result {
            Ok(root) => debug!(path = %self.lexer.path(), kind = %root.kind(), "parsed a document"),
            Err(e) => debug!(path = %self.lexer.path(), error = %e, "failed to parse a document"),
        }

        self.lexer.into_cursor().close();

        result
    }

    fn descend(&mut self, open: &Token) -> Result<(), ParserError> {
        if self.depth >= self.max_depth {
            return Err(ParserError::NestingTooDeep {
                token: Box::new(open.clone()),
                max_depth: self.max_depth,
            });
        }

        self.depth += 1;

        Ok(())
    }

    fn parse_document(&mut self) -> Result<Json, ParserError> {
        let token = self.advance()?;

        let root = match token.value {
            TokenValue::LBrace => self.parse_object(token)?,
            TokenValue::LBracket => self.parse_array(token)?,
            _ => return Err(ParserError::ExpectedRoot { token: token.into() }),
        };

        let token = self.advance()?;

        match token.value {
            TokenValue::Eof => Ok(root),
            _ => Err(ParserError::TrailingToken { token: token.into() }),
        }
    }

    fn parse_object(&mut self, lbrace: Token) -> Result<Json, ParserError> {
        self.descend(&lbrace)?;
        let mut object = JsonObject::new();

        loop {
            let mut token = self.advance()?;

            match token.value {
                TokenValue::RBrace => break,
                TokenValue::Eof => {
                    return Err(ParserError::MissingRightBrace {
                        lbrace: lbrace.into(),
                        token: token.into(),
                    });
                }
                _ => {}
            }

            if !object.is_empty() {
                if token.value != TokenValue::Comma {
                    return Err(ParserError::ExpectedComma { token: token.into() });
                }

                token = self.advance()?;
            }

            let key = match token.value {
                TokenValue::String(key) => key,
                _ => return Err(ParserError::ExpectedKey { token: token.into() }),
            };

            let colon = self.advance()?;

            if colon.value != TokenValue::Colon {
                return Err(ParserError::ExpectedColon { token: colon.into() });
            }

            let value_token = self.advance()?;
            let value = self.parse_value(value_token)?;
            object.try_insert(key, value)?;
        }

        self.depth -= 1;

        Ok(Json::Object(object))
    }

    fn parse_array(&mut self, lbracket: Token) -> Result<Json, ParserError> {
        self.descend(&lbracket)?;
        let mut elems: Vec<Json> = vec![];

        loop {
            let mut token = self.advance()?;

            match token.value {
                TokenValue::RBracket => break,
                TokenValue::Eof => {
                    return Err(ParserError::MissingRightBracket {
                        lbracket: lbracket.into(),
                        token: token.into(),
                    });
                }
                _ => {}
            }

            if !elems.is_empty() {
                if token.value != TokenValue::Comma {
                    return Err(ParserError::ExpectedComma { token: token.into() });
                }

                token = self.advance()?;
            }

            let value = self.parse_value(token)?;
            elems.try_reserve(1)?;
            elems.push(value);
        }

        self.depth -= 1;

        Ok(Json::Array(elems))
    }

    fn parse_value(&mut self, token: Token) -> Result<Json, ParserError> {
        Ok(match token.value {
            TokenValue::String(s) => Json::String(s),
            TokenValue::Integer(raw) => JsonNumber::new(NumberKind::Integer, raw).into(),
            TokenValue::Float(raw) => JsonNumber::new(NumberKind::Float, raw).into(),
            TokenValue::Boolean(b) => Json::Boolean(b),
            TokenValue::Null => Json::Null,
            TokenValue::LBrace => return self.parse_object(token),
            TokenValue::LBracket => return self.parse_array(token),
            _ => return Err(ParserError::InvalidToken { token: token.into() }),
        })
    }
}
