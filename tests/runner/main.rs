mod cli;
mod directive;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::{fs, mem};

use fxhash::FxHashSet;
use glob::glob;
use jsontree::Json;
use jsontree::diag::{Diagnostic, print_to_stderr};
use jsontree::parse_file_reporting;
use jsontree::sourcemap::SourceMap;
use jsontree::util::format_iter;
use yansi::Paint;

use self::cli::Args;
use self::directive::{Directive, parse_directives};

#[derive(Debug, Clone, PartialEq, Eq)]
enum TestResult {
    Passed,
    Failed,
}

struct Test {
    path: PathBuf,
    name: String,
    directives: Vec<Directive>,
}

struct TestRunData {
    diags: Vec<Diagnostic>,
    root: Option<Json>,
}

impl Test {
    pub fn run(&self, ctx: &TestCtx) -> TestResult {
        let mut diags = vec![];
        let root = parse_file_reporting(&self.path, &mut diags);
        let run_data = TestRunData { diags, root };

        let mut result = TestResult::Passed;

        for directive in &self.directives {
            if directive.check(&run_data, ctx) == TestResult::Failed {
                result = TestResult::Failed;

                if ctx.stop_on_first_failure {
                    break;
                }
            }
        }

        if result == TestResult::Failed || ctx.all_diagnostics {
            if !run_data.diags.is_empty() {
                eprintln!("Reported diagnostics:");

                let mut source_map = SourceMap::new();

                if let Ok(contents) = fs::read_to_string(&self.path) {
                    source_map.add_source(self.name.clone(), contents);
                }

                for diag in &run_data.diags {
                    print_to_stderr(diag, &source_map, &Default::default());
                }
            } else {
                eprintln!("No diagnostics reported")
            }
        }

        result
    }
}

struct TestCtx {
    stop_on_first_failure: bool,
    all_diagnostics: bool,
    bless: bool,
    tests: Vec<Test>,
    passed: FxHashSet<String>,
    failed: FxHashSet<String>,
    ignored: FxHashSet<String>,
}

impl TestCtx {
    pub fn new(args: &Args, tests: Vec<Test>) -> Result<Self, String> {
        let mut result = Self {
            stop_on_first_failure: args.first_failure,
            all_diagnostics: args.all_diagnostics,
            bless: args.bless,
            tests,
            passed: Default::default(),
            failed: Default::default(),
            ignored: Default::default(),
        };

        if !args.filters.is_empty() {
            let mut unmatched = args.filters.iter().collect::<FxHashSet<_>>();

            for test in &result.tests {
                let matching = args
                    .filters
                    .iter()
                    .filter(|filter| test.name.contains(filter.as_str()))
                    .collect::<Vec<_>>();

                if matching.is_empty() {
                    result.ignored.insert(test.name.clone());
                }

                for filter in matching {
                    unmatched.remove(filter);
                }
            }

            if !unmatched.is_empty() {
                return Err(format!(
                    "no documents match {}",
                    format_iter(
                        unmatched.iter().map(|filter| format!("`{filter}`")),
                        "or",
                        "",
                    ),
                ));
            }
        }

        Ok(result)
    }

    pub fn run(mut self) -> ExitCode {
        let tests = mem::take(&mut self.tests);

        for test in tests {
            if self.ignored.contains(&test.name) {
                continue;
            }

            eprintln!("{} test `{}`...", "Running".bright_cyan().bold(), test.name);

            match test.run(&self) {
                TestResult::Passed => {
                    self.passed.insert(test.name);
                }

                TestResult::Failed => {
                    eprintln!(
                        "{}",
                        format_args!("Test `{}` {}!", test.name, "failed").bright_red()
                    );
                    self.failed.insert(test.name);

                    if self.stop_on_first_failure {
                        break;
                    }
                }
            };
        }

        eprintln!();

        eprintln!(
            "Test status: {}",
            if self.failed.is_empty() {
                "passed".bright_green().bold()
            } else {
                "failed".bright_red().bold()
            },
        );

        let run_test_count = (self.passed.len() + self.failed.len()).max(1);
        eprintln!(
            "Details: {passed} passed ({passed_perc:.2}%), {failed} failed ({failed_perc:.2}%), and {ignored} ignored",
            passed = self.passed.len().bright_green(),
            passed_perc = self.passed.len() as f64 * 100. / run_test_count as f64,
            failed = self.failed.len().bright_red(),
            failed_perc = self.failed.len() as f64 * 100. / run_test_count as f64,
            ignored = self.ignored.len().white(),
        );

        if self.failed.is_empty() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

fn load_test(path: impl AsRef<Path>) -> Result<Test, String> {
    let path = path.as_ref();
    let expect_path = path.with_extension("expect");
    let expectations = fs::read_to_string(&expect_path)
        .map_err(|e| format!("could not read `{}`: {e}", expect_path.display()))?;
    let directives = parse_directives(&expectations, path)
        .map_err(|e| format!("could not parse directives in `{}`: {e}", expect_path.display()))?;

    Ok(Test {
        path: path.to_owned(),
        name: path.display().to_string(),
        directives,
    })
}

fn load_tests() -> Result<Vec<Test>, String> {
    let mut tests = vec![];
    let pattern = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/documents/**/*.json");

    for entry in glob(pattern).map_err(|e| e.to_string())? {
        tests.push(load_test(entry.map_err(|e| e.to_string())?)?);
    }

    Ok(tests)
}

fn main() -> ExitCode {
    fn load_ctx() -> Result<TestCtx, String> {
        let args = Args::parse();
        let tests = load_tests()?;

        TestCtx::new(&args, tests)
    }

    let ctx = match load_ctx() {
        Ok(ctx) => ctx,

        Err(e) => {
            eprintln!("{}: {e}", "Error".bright_red().bold());

            return ExitCode::from(2);
        }
    };

    ctx.run()
}
