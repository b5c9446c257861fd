#[derive(clap::Parser, Debug)]
#[command()]
pub struct Args {
    /// Only run documents whose path contains one of these substrings.
    pub filters: Vec<String>,

    /// Stop on the first failure.
    #[arg(short = 'x', long)]
    pub first_failure: bool,

    /// Print diagnostics for all run documents regardless of the result.
    #[arg(short = 'd', long)]
    pub all_diagnostics: bool,

    /// Rewrite `.out` files with the current printer output instead of
    /// comparing against them.
    #[arg(long)]
    pub bless: bool,
}

impl Args {
    pub fn parse() -> Self {
        clap::Parser::parse()
    }
}
