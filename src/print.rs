//! Indented rendering of a [`Json`] tree.
//!
//! Containers span several lines with one child per line. Strings are written
//! between quotes exactly as stored, and numbers are written as their raw
//! lexeme, so parsing the output yields an equal tree.

use std::fmt::{self, Display};
use std::io;

use crate::json::Json;

/// Formats a tree with a fixed indent width per nesting level.
#[derive(Debug, Clone, Copy)]
pub struct Pretty<'a> {
    root: &'a Json,
    indent: usize,
}

impl<'a> Pretty<'a> {
    pub const DEFAULT_INDENT: usize = 4;

    pub fn new(root: &'a Json, indent: usize) -> Self {
        Self { root, indent }
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>, node: &Json, current: usize) -> fmt::Result {
        let inner = current + self.indent;

        match node {
            Json::Object(object) if object.is_empty() => f.write_str("{}"),

            Json::Object(object) => {
                f.write_str("{\n")?;

                for (idx, (key, value)) in object.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",\n")?;
                    }

                    write!(f, "{:inner$}\"{key}\": ", "")?;
                    self.write_node(f, value, inner)?;
                }

                write!(f, "\n{:current$}}}", "")
            }

            Json::Array(elems) if elems.is_empty() => f.write_str("[]"),

            Json::Array(elems) => {
                f.write_str("[\n")?;

                for (idx, elem) in elems.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",\n")?;
                    }

                    write!(f, "{:inner$}", "")?;
                    self.write_node(f, elem, inner)?;
                }

                write!(f, "\n{:current$}]", "")
            }

            Json::String(s) => write!(f, "\"{s}\""),
            Json::Number(number) => f.write_str(number.raw()),
            Json::Boolean(b) => write!(f, "{b}"),
            Json::Null => f.write_str("null"),
        }
    }
}

impl Display for Pretty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, self.root, 0)
    }
}

/// Renders the tree followed by a newline.
pub fn to_string_pretty(root: &Json, indent: usize) -> String {
    format!("{}\n", Pretty::new(root, indent))
}

/// Writes the tree followed by a newline to `out`. An absent root writes
/// nothing.
pub fn print(root: Option<&Json>, indent: usize, out: &mut impl io::Write) -> io::Result<()> {
    match root {
        Some(root) => writeln!(out, "{}", Pretty::new(root, indent)),
        None => Ok(()),
    }
}
