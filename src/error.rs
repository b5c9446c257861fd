use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::diag::{Diagnostic, IntoDiagnostic, code};
use crate::parse::ParserError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not open `{}`: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Parse(#[from] ParserError),
}

impl IntoDiagnostic for Error {
    fn into_diagnostic(self) -> Diagnostic {
        match self {
            Self::Open { .. } => Diagnostic::error()
                .with_msg(&self)
                .with_code(code!(io::open_failed))
                .make(),

            Self::Parse(e) => e.into_diagnostic(),
        }
    }
}
