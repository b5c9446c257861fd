mod cursor;
mod lexer;
mod parser;
mod token;

pub use cursor::{CHUNK_SIZE, Cursor};
pub use lexer::{Lexer, LexerError, LexerErrorKind};
pub use parser::{Parser, ParserError};
pub use token::{Token, TokenKind, TokenValue};
