use std::fmt::{self, Display};
use std::io;

use codespan_reporting::diagnostic::{self as cs, Severity};
use codespan_reporting::term::{self, Config};
use termcolor::{ColorChoice, StandardStream, WriteColor};

use crate::location::Location;
use crate::sourcemap::SourceMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Error,
}

impl Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
        }
    }
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::Error => Severity::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn code(&self) -> &'static str {
        self.0
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

macro_rules! code {
    ($category:ident :: $name:ident) => {
        $crate::diag::Code::new(concat!(stringify!($category), "::", stringify!($name)))
    };
}

pub(crate) use code;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub location: Location,
    pub primary: bool,
    pub msg: Option<String>,
}

impl Label {
    pub fn primary(location: Location) -> Self {
        Self {
            location,
            primary: true,
            msg: None,
        }
    }

    pub fn secondary(location: Location) -> Self {
        Self {
            location,
            primary: false,
            msg: None,
        }
    }

    pub fn with_msg(mut self, msg: impl ToString) -> Self {
        self.msg = Some(msg.to_string());

        self
    }
}

/// A structured report of a single problem in a source.
///
/// Displays as `path:row:col: message`, the format used for plain-text
/// diagnostic channels. [`emit`] renders the same diagnostic with source
/// snippets when the source is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub code: Code,
    pub location: Option<Location>,
    pub msg: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

pub struct DiagnosticBuilder(Diagnostic);

impl DiagnosticBuilder {
    pub fn at(mut self, location: Location) -> Self {
        self.0.location = Some(location);

        self
    }

    pub fn with_msg(mut self, msg: impl ToString) -> Self {
        self.0.msg = msg.to_string();

        self
    }

    pub fn with_code(mut self, code: Code) -> Self {
        self.0.code = code;

        self
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.0.add_label(label);

        self
    }

    pub fn with_note(mut self, note: impl ToString) -> Self {
        self.0.add_note(note);

        self
    }

    pub fn make(self) -> Diagnostic {
        self.0
    }
}

impl Diagnostic {
    fn builder(level: Level) -> DiagnosticBuilder {
        DiagnosticBuilder(Diagnostic {
            level,
            code: code!(generic::unknown),
            location: None,
            msg: String::new(),
            labels: vec![],
            notes: vec![],
        })
    }

    pub fn error() -> DiagnosticBuilder {
        Self::builder(Level::Error)
    }

    pub fn add_label(&mut self, label: Label) {
        self.labels.push(label);
    }

    pub fn add_note(&mut self, note: impl ToString) {
        self.notes.push(note.to_string());
    }

    fn to_codespan(&self, source_map: &SourceMap) -> Option<cs::Diagnostic<usize>> {
        let labels = self
            .labels
            .iter()
            .map(|label| {
                let file_id = source_map.get_by_name(label.location.path())?;
                let range = label.location.span.to_range();
                let cs_label = if label.primary {
                    cs::Label::primary(file_id, range)
                } else {
                    cs::Label::secondary(file_id, range)
                };

                Some(match &label.msg {
                    Some(msg) => cs_label.with_message(msg),
                    None => cs_label,
                })
            })
            .collect::<Option<Vec<_>>>()?;

        Some(
            cs::Diagnostic::new(self.level.into())
                .with_message(&self.msg)
                .with_code(self.code.code())
                .with_labels(labels)
                .with_notes(self.notes.clone()),
        )
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{location}: {}", self.msg),
            None => f.write_str(&self.msg),
        }
    }
}

pub trait IntoDiagnostic {
    fn into_diagnostic(self) -> Diagnostic;
}

impl IntoDiagnostic for Diagnostic {
    fn into_diagnostic(self) -> Diagnostic {
        self
    }
}

pub trait DiagCtx {
    fn emit(&mut self, diag: impl IntoDiagnostic);
}

impl DiagCtx for Vec<Diagnostic> {
    fn emit(&mut self, diag: impl IntoDiagnostic) {
        self.push(diag.into_diagnostic());
    }
}

/// Renders `diag` to `writer`, with source snippets if every labelled source
/// is in `source_map` and as plain `level[code]: path:row:col: message` lines
/// otherwise.
pub fn emit(
    writer: &mut dyn WriteColor,
    diag: &Diagnostic,
    source_map: &SourceMap,
    config: &Config,
) -> io::Result<()> {
    if let Some(cs_diag) = diag.to_codespan(source_map) {
        if !cs_diag.labels.is_empty() {
            return term::emit(writer, config, source_map.files(), &cs_diag)
                .map_err(io::Error::other);
        }
    }

    writeln!(writer, "{}[{}]: {diag}", diag.level, diag.code)?;

    for note in &diag.notes {
        writeln!(writer, "  = note: {note}")?;
    }

    Ok(())
}

pub fn print_to_stderr(diag: &Diagnostic, source_map: &SourceMap, config: &Config) {
    let stream = StandardStream::stderr(ColorChoice::Auto);
    let _ = emit(&mut stream.lock(), diag, source_map, config);
}

/// Writes every diagnostic to stderr as soon as it is emitted.
pub struct StderrDiagCtx<'src> {
    source_map: &'src SourceMap,
    stream: StandardStream,
    config: Config,
}

impl<'src> StderrDiagCtx<'src> {
    pub fn new(source_map: &'src SourceMap, color: ColorChoice) -> Self {
        Self {
            source_map,
            stream: StandardStream::stderr(color),
            config: Default::default(),
        }
    }
}

impl DiagCtx for StderrDiagCtx<'_> {
    fn emit(&mut self, diag: impl IntoDiagnostic) {
        let diag = diag.into_diagnostic();
        let _ = emit(&mut self.stream.lock(), &diag, self.source_map, &self.config);
    }
}

/// Writes every diagnostic as a single `path:row:col: message` line.
pub struct PlainDiagCtx<W> {
    out: W,
}

impl<W: io::Write> PlainDiagCtx<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: io::Write> DiagCtx for PlainDiagCtx<W> {
    fn emit(&mut self, diag: impl IntoDiagnostic) {
        let _ = writeln!(self.out, "{}", diag.into_diagnostic());
    }
}
