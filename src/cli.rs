use std::path::PathBuf;

#[derive(clap::ValueEnum, Debug, Clone, Copy, Default)]
pub enum Color {
    #[default]
    Auto,
    Always,
    Never,
}

impl From<Color> for termcolor::ColorChoice {
    fn from(color: Color) -> Self {
        match color {
            Color::Auto => Self::Auto,
            Color::Always => Self::Always,
            Color::Never => Self::Never,
        }
    }
}

#[derive(clap::Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Path to the JSON document.
    pub input: PathBuf,

    /// Number of spaces per nesting level when printing the tree.
    #[arg(long, default_value_t = 4)]
    pub indent: usize,

    /// Print the token stream instead of the tree.
    #[arg(long, conflicts_with = "check")]
    pub tokens: bool,

    /// Only validate the document; print nothing on success.
    #[arg(long)]
    pub check: bool,

    /// When to use colors in diagnostics.
    #[arg(long, value_enum, default_value_t)]
    pub color: Color,
}

impl Args {
    pub fn parse() -> Self {
        clap::Parser::parse()
    }
}
