use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Evaluates S-expressions of a small Scheme subset.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(name = "sexpr", bin_name = "sexpr")]
#[clap(subcommand_required = true, arg_required_else_help = true)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluates one expression given inline or read from a file.
    Run(RunArgs),
    /// Starts an interactive session; bindings persist between lines.
    Repl,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Expression to evaluate.
    #[clap(short, long, value_name = "CODE", conflicts_with = "file")]
    pub expr: Option<String>,

    /// File holding the expression to evaluate.
    #[clap(value_name = "FILE_PATH", conflicts_with = "expr", required_unless_present = "expr")]
    pub file: Option<PathBuf>,
}
