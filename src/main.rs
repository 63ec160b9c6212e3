mod cli;
mod repl;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, RunArgs};
use sexpr::Interpreter;
use sexpr::logging::init_logging;
use std::fs;
use tracing::{debug, info};

fn run(args: RunArgs) -> Result<()> {
    let source = match (args.expr, args.file) {
        (Some(expr), _) => expr,
        (None, Some(path)) => fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => anyhow::bail!("nothing to evaluate"),
    };
    debug!(source = %source, "Evaluating source");

    let mut interpreter = Interpreter::new();
    let output = interpreter.run(&source)?;
    println!("{}", output);
    Ok(())
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    info!(?cli, "Parsed CLI arguments");

    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Repl => repl::start_repl(),
    }
}
