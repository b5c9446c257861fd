use std::fmt::{self, Display};

use phf::phf_map;

use crate::location::Location;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub location: Location,
    pub value: TokenValue,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        self.value.kind()
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {}", self.location, self.kind(), self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenValue {
    Eof,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    Comma,
    String(String),
    Integer(String),
    Float(String),
    Boolean(bool),
    Null,
}

impl TokenValue {
    pub fn kind(&self) -> TokenKind {
        match self {
            Self::Eof => TokenKind::Eof,
            Self::LBrace => TokenKind::LBrace,
            Self::RBrace => TokenKind::RBrace,
            Self::LBracket => TokenKind::LBracket,
            Self::RBracket => TokenKind::RBracket,
            Self::Colon => TokenKind::Colon,
            Self::Comma => TokenKind::Comma,
            Self::String(_) => TokenKind::String,
            Self::Integer(_) => TokenKind::Integer,
            Self::Float(_) => TokenKind::Float,
            Self::Boolean(_) => TokenKind::Boolean,
            Self::Null => TokenKind::Null,
        }
    }

    pub fn from_punct(byte: u8) -> Option<Self> {
        Some(match byte {
            b'{' => Self::LBrace,
            b'}' => Self::RBrace,
            b'[' => Self::LBracket,
            b']' => Self::RBracket,
            b':' => Self::Colon,
            b',' => Self::Comma,
            _ => return None,
        })
    }

    pub fn from_word(word: &str) -> Option<Self> {
        KEYWORDS.get(word).map(|&keyword| match keyword {
            Keyword::True => Self::Boolean(true),
            Keyword::False => Self::Boolean(false),
            Keyword::Null => Self::Null,
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Keyword {
    True,
    False,
    Null,
}

static KEYWORDS: phf::Map<&'static str, Keyword> = phf_map! {
    "true" => Keyword::True,
    "false" => Keyword::False,
    "null" => Keyword::Null,
};

/// Renders the token the way it was written in the source.
impl Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eof => write!(f, "end of input"),
            Self::LBrace => write!(f, "`{{`"),
            Self::RBrace => write!(f, "`}}`"),
            Self::LBracket => write!(f, "`[`"),
            Self::RBracket => write!(f, "`]`"),
            Self::Colon => write!(f, "`:`"),
            Self::Comma => write!(f, "`,`"),
            Self::String(s) => write!(f, "`\"{s}\"`"),
            Self::Integer(raw) | Self::Float(raw) => write!(f, "`{raw}`"),
            Self::Boolean(b) => write!(f, "`{b}`"),
            Self::Null => write!(f, "`null`"),
        }
    }
}

#[derive(strum::Display, strum::VariantArray, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    #[strum(to_string = "end of input")]
    Eof,

    #[strum(to_string = "object start")]
    LBrace,

    #[strum(to_string = "object end")]
    RBrace,

    #[strum(to_string = "array start")]
    LBracket,

    #[strum(to_string = "array end")]
    RBracket,

    #[strum(to_string = "colon")]
    Colon,

    #[strum(to_string = "comma")]
    Comma,

    #[strum(to_string = "string literal")]
    String,

    #[strum(to_string = "integer literal")]
    Integer,

    #[strum(to_string = "float literal")]
    Float,

    #[strum(to_string = "boolean literal")]
    Boolean,

    #[strum(to_string = "null literal")]
    Null,
}

impl TokenKind {
    pub fn starts_value(self) -> bool {
        matches!(
            self,
            Self::LBrace
                | Self::LBracket
                | Self::String
                | Self::Integer
                | Self::Float
                | Self::Boolean
                | Self::Null
        )
    }
}
