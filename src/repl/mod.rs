mod highlighter;
mod history;

use crate::repl::highlighter::ReplHelper;
use crate::repl::history::{get_history_path, load_history_from_path, save_history_to_path};
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use sexpr::Interpreter;
use tracing::{info, warn};

const EXIT_COMMAND: &str = ".exit";

#[tracing::instrument]
pub fn start_repl() -> anyhow::Result<()> {
    info!("Starting REPL session with rustyline");
    let mut rl = Editor::<ReplHelper, DefaultHistory>::new()?;
    rl.set_helper(Some(ReplHelper::new()));
    let mut interpreter = Interpreter::new();
    let mut line_number = 1;

    let history_path_opt = get_history_path();
    match &history_path_opt {
        Some(history_path) => load_history_from_path(&mut rl, history_path),
        None => warn!("Could not determine history file path. History will not be saved."),
    }

    loop {
        let prompt = format!("sexpr ({})> ", line_number);
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed_input = line.trim();
                if trimmed_input.is_empty() {
                    line_number += 1;
                    continue;
                }
                if let Err(err) = rl.add_history_entry(line.as_str()) {
                    warn!("Failed to add line to history: {}", err);
                }

                if trimmed_input == EXIT_COMMAND {
                    info!("Exiting REPL session via user command.");
                    break;
                }

                match interpreter.run(trimmed_input) {
                    Ok(output) => println!("{}", output),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                info!("REPL interrupted (Ctrl-C).");
                println!("Interrupted. Type {} or Ctrl-D to exit.", EXIT_COMMAND);
            }
            Err(ReadlineError::Eof) => {
                info!("REPL EOF detected (Ctrl-D).");
                break;
            }
            Err(err) => {
                eprintln!("REPL Readline Error: {:?}", err);
                break;
            }
        }
        line_number += 1;
    }

    if let Some(history_path) = &history_path_opt {
        save_history_to_path(&mut rl, history_path);
    }
    Ok(())
}
