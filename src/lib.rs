//! A small JSON reader that keeps numbers as written.
//!
//! Documents are read through a chunked byte [`Cursor`](parse::Cursor),
//! tokenized by a pull-based [`Lexer`](parse::Lexer) and assembled into a
//! [`Json`] tree by a recursive-descent [`Parser`](parse::Parser). The root of
//! a document must be an object or an array. The first problem found stops the
//! parse and is reported with its `path:row:col` location.
//!
//! ```
//! let doc = jsontree::parse_str(r#"{"port": 8080, "ratio": 1.50e2}"#).unwrap();
//!
//! assert_eq!(doc.pointer("/ratio").unwrap().as_number().unwrap().raw(), "1.50e2");
//! ```

pub mod diag;
mod error;
pub mod json;
pub mod location;
pub mod parse;
pub mod print;
pub mod sourcemap;
pub mod util;

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use tracing::warn;

use self::diag::DiagCtx;
use self::parse::{Cursor, Lexer, Parser, ParserError};

pub use self::error::Error;
pub use self::json::{Json, JsonKind, JsonNumber, JsonObject, Member, NumberKind};
pub use self::print::{Pretty, print, to_string_pretty};

/// Parses the document stored at `path`.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Json, Error> {
    let path = path.as_ref();
    let cursor = Cursor::open(path).map_err(|source| Error::Open {
        path: path.to_owned(),
        source,
    })?;

    Ok(Parser::new(Lexer::new(cursor)).parse()?)
}

/// Parses a document read from `reader`. `name` is used as the path in
/// locations.
pub fn parse_reader(name: impl Into<Arc<str>>, reader: impl Read) -> Result<Json, ParserError> {
    Parser::new(Lexer::new(Cursor::new(name, reader))).parse()
}

pub fn parse_str(source: &str) -> Result<Json, ParserError> {
    parse_reader("<string>", source.as_bytes())
}

/// Parses the document stored at `path`, emitting the failure, if any, to
/// `diag`.
pub fn parse_file_reporting(path: impl AsRef<Path>, diag: &mut impl DiagCtx) -> Option<Json> {
    match parse_file(path.as_ref()) {
        Ok(root) => Some(root),

        Err(e) => {
            warn!(path = %path.as_ref().display(), error = %e, "could not parse a document");
            diag.emit(e);

            None
        }
    }
}
