use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use derive_more::From;
use jsontree::diag::Level;
use jsontree::{parse_str, to_string_pretty};
use regex::{Regex, RegexSet};

use crate::{TestCtx, TestResult, TestRunData};

#[derive(From)]
pub enum Directive {
    Diag(DirectiveDiag),
    Pass(DirectivePass),
    RoundTrip(DirectiveRoundTrip),
    Output(DirectiveOutput),
}

impl Directive {
    pub fn check(&self, run_data: &TestRunData, ctx: &TestCtx) -> TestResult {
        match self {
            Self::Diag(d) => d.check(run_data),
            Self::Pass(d) => d.check(run_data),
            Self::RoundTrip(d) => d.check(run_data),
            Self::Output(d) => d.check(run_data, ctx),
        }
    }
}

pub struct DirectiveDiag {
    line: usize,
    code: String,
    position: Option<(usize, usize)>,
}

static DIRECTIVE_DIAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^ERROR\((?<code>[[:word:]]+::[[:word:]]+)\)(?:\s+@\s+(?<row>\d+):(?<column>\d+))?$"#)
        .unwrap()
});

impl DirectiveDiag {
    fn parse(directive: &str, line: usize) -> Self {
        let captures = DIRECTIVE_DIAG_REGEX.captures(directive).unwrap();
        let code = captures["code"].to_string();
        let position = captures
            .name("row")
            .zip(captures.name("column"))
            .map(|(row, column)| {
                (
                    row.as_str().parse().unwrap(),
                    column.as_str().parse().unwrap(),
                )
            });

        Self {
            line,
            code,
            position,
        }
    }

    pub fn check(&self, run_data: &TestRunData) -> TestResult {
        if run_data.diags.iter().any(|diag| {
            diag.level == Level::Error
                && diag.code.code() == self.code
                && self.position.is_none_or(|(row, column)| {
                    diag.location
                        .as_ref()
                        .is_some_and(|location| (location.row, location.column) == (row, column))
                })
        }) {
            TestResult::Passed
        } else {
            eprintln!(
                "Could not find a diagnostic matching the directive at line {}",
                self.line,
            );

            TestResult::Failed
        }
    }
}

pub struct DirectivePass;

static DIRECTIVE_PASS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^PASS$"#).unwrap());

impl DirectivePass {
    pub fn check(&self, run_data: &TestRunData) -> TestResult {
        if run_data.root.is_none() {
            eprintln!("The document failed to parse unexpectedly!");

            TestResult::Failed
        } else {
            TestResult::Passed
        }
    }
}

pub struct DirectiveRoundTrip;

static DIRECTIVE_ROUND_TRIP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^ROUNDTRIP$"#).unwrap());

impl DirectiveRoundTrip {
    pub fn check(&self, run_data: &TestRunData) -> TestResult {
        let Some(root) = &run_data.root else {
            eprintln!("Cannot round-trip a document that failed to parse");

            return TestResult::Failed;
        };

        let printed = to_string_pretty(root, 2);

        match parse_str(&printed) {
            Ok(reparsed) if &reparsed == root => TestResult::Passed,

            Ok(_) => {
                eprintln!("The re-parsed document differs from the original:\n{printed}");

                TestResult::Failed
            }

            Err(e) => {
                eprintln!("The printed document failed to parse: {e}\n{printed}");

                TestResult::Failed
            }
        }
    }
}

pub struct DirectiveOutput {
    indent: usize,
    expected_path: PathBuf,
}

static DIRECTIVE_OUTPUT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^OUTPUT\((?<indent>\d+)\)$"#).unwrap());

impl DirectiveOutput {
    fn parse(directive: &str, document: &Path) -> Self {
        let captures = DIRECTIVE_OUTPUT_REGEX.captures(directive).unwrap();

        Self {
            indent: captures["indent"].parse().unwrap(),
            expected_path: document.with_extension("out"),
        }
    }

    pub fn check(&self, run_data: &TestRunData, ctx: &TestCtx) -> TestResult {
        let Some(root) = &run_data.root else {
            eprintln!("Cannot print a document that failed to parse");

            return TestResult::Failed;
        };

        let actual = to_string_pretty(root, self.indent);

        if ctx.bless {
            return match fs::write(&self.expected_path, &actual) {
                Ok(()) => TestResult::Passed,

                Err(e) => {
                    eprintln!("Could not write `{}`: {e}", self.expected_path.display());

                    TestResult::Failed
                }
            };
        }

        match fs::read_to_string(&self.expected_path) {
            Ok(expected) if expected == actual => TestResult::Passed,

            Ok(expected) => {
                eprintln!("Printed output differs.\nExpected:\n{expected}\nActual:\n{actual}");

                TestResult::Failed
            }

            Err(e) => {
                eprintln!("Could not read `{}`: {e}", self.expected_path.display());

                TestResult::Failed
            }
        }
    }
}

static DIRECTIVE_REGEX: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        DIRECTIVE_DIAG_REGEX.as_str(),
        DIRECTIVE_PASS_REGEX.as_str(),
        DIRECTIVE_ROUND_TRIP_REGEX.as_str(),
        DIRECTIVE_OUTPUT_REGEX.as_str(),
    ])
    .unwrap()
});

/// Parses the directives of `document` from its `.expect` file contents.
///
/// Every non-blank line holds one directive; lines starting with `#` are
/// comments.
pub fn parse_directives(s: &str, document: &Path) -> Result<Vec<Directive>, String> {
    let mut directives = vec![];

    for (idx, line) in s.lines().enumerate() {
        let directive = line.trim();

        if directive.is_empty() || directive.starts_with('#') {
            continue;
        }

        let matches = DIRECTIVE_REGEX.matches(directive);

        let directive = if matches.matched(0) {
            DirectiveDiag::parse(directive, idx + 1).into()
        } else if matches.matched(1) {
            DirectivePass.into()
        } else if matches.matched(2) {
            DirectiveRoundTrip.into()
        } else if matches.matched(3) {
            DirectiveOutput::parse(directive, document).into()
        } else {
            return Err(format!("unrecognized directive at line {}", idx + 1));
        };

        directives.push(directive);
    }

    if directives.is_empty() {
        return Err("no directives found".into());
    }

    Ok(directives)
}
