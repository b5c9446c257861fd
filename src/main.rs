mod cli;
mod logging;

use std::fs::{self, File};
use std::io::{self, Write};
use std::process::ExitCode;

use jsontree::diag::{DiagCtx, IntoDiagnostic, StderrDiagCtx};
use jsontree::parse::{Cursor, Lexer, LexerError, LexerErrorKind, Parser, ParserError};
use jsontree::print;
use jsontree::sourcemap::SourceMap;
use tracing::{debug, error};
use yansi::Paint;

use self::cli::Args;

fn report(args: &Args, diag: impl IntoDiagnostic) {
    let mut source_map = SourceMap::new();

    match fs::read_to_string(&args.input) {
        Ok(contents) => {
            source_map.add_source(args.input.display().to_string(), contents);
        }

        Err(e) => debug!(error = %e, "the source is unavailable for snippets"),
    }

    StderrDiagCtx::new(&source_map, args.color.into()).emit(diag);
}

/// Input that cannot be read exits with 2, like input that cannot be opened.
fn exit_code(e: &LexerError) -> ExitCode {
    match e.kind {
        LexerErrorKind::Io(_) => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}

fn dump_tokens(args: &Args, lexer: Lexer<File>) -> ExitCode {
    let mut stdout = io::stdout().lock();

    for token in lexer {
        let token = match token {
            Ok(token) => token,

            Err(e) => {
                let code = exit_code(&e);
                report(args, e);

                return code;
            }
        };

        if let Err(e) = writeln!(stdout, "{token}") {
            error!(error = %e, "could not write to stdout");

            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    logging::setup_logging();

    let args = Args::parse();

    debug!(input = %args.input.display(), indent = args.indent);

    let cursor = match Cursor::open(&args.input) {
        Ok(cursor) => cursor,

        Err(e) => {
            eprintln!(
                "{}: could not open the input file `{}`: {e}",
                "error".bright_red().bold(),
                args.input.display(),
            );

            return ExitCode::from(2);
        }
    };

    let lexer = Lexer::new(cursor);

    if args.tokens {
        return dump_tokens(&args, lexer);
    }

    let root = match Parser::new(lexer).parse() {
        Ok(root) => root,

        Err(e) => {
            let code = match &e {
                ParserError::Lexer(e) => exit_code(e),
                _ => ExitCode::FAILURE,
            };
            report(&args, e);

            return code;
        }
    };

    if args.check {
        return ExitCode::SUCCESS;
    }

    if let Err(e) = print(Some(&root), args.indent, &mut io::stdout().lock()) {
        error!(error = %e, "could not write to stdout");

        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
