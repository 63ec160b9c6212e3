use crate::repl::highlighter::ReplHelper;
use rustyline::Editor;
use rustyline::history::DefaultHistory;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

const HISTORY_FILE_NAME: &str = "history.txt";

/// `<data dir>/sexpr/history.txt`, falling back to the config dir.
pub(crate) fn get_history_path() -> Option<PathBuf> {
    dirs::data_dir()
        .or_else(dirs::config_dir)
        .map(|base| history_path_in(&base))
}

fn history_path_in(base: &Path) -> PathBuf {
    base.join(env!("CARGO_PKG_NAME")).join(HISTORY_FILE_NAME)
}

pub(crate) fn load_history_from_path(
    rl: &mut Editor<ReplHelper, DefaultHistory>,
    history_path: &Path,
) {
    if let Some(parent_dir) = history_path.parent() {
        if !parent_dir.exists() {
            if let Err(e) = fs::create_dir_all(parent_dir) {
                warn!(
                    "Failed to create history directory {}: {}",
                    parent_dir.display(),
                    e
                );
            }
        }
    }
    if !history_path.exists() {
        info!(
            "History file {} does not exist. Will create on exit.",
            history_path.display()
        );
        return;
    }
    match rl.load_history(history_path) {
        Ok(()) => info!("Loaded history from {}", history_path.display()),
        Err(err) => warn!(
            "Could not load history from {}: {}",
            history_path.display(),
            err
        ),
    }
}

pub(crate) fn save_history_to_path(
    rl: &mut Editor<ReplHelper, DefaultHistory>,
    history_path: &Path,
) {
    match rl.save_history(history_path) {
        Ok(()) => info!("Saved history to {}", history_path.display()),
        Err(err) => error!(
            "Could not save history to {}: {}",
            history_path.display(),
            err
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustyline::history::History;

    #[test]
    fn history_lives_under_crate_directory() {
        let base = tempfile::tempdir().unwrap();
        let path = history_path_in(base.path());
        assert_eq!(path.file_name().unwrap(), HISTORY_FILE_NAME);
        assert_eq!(
            path.parent().unwrap().file_name().unwrap(),
            env!("CARGO_PKG_NAME")
        );
    }

    #[test]
    fn history_round_trips_through_file() {
        let base = tempfile::tempdir().unwrap();
        let path = history_path_in(base.path());

        let mut rl = Editor::<ReplHelper, DefaultHistory>::new().unwrap();
        load_history_from_path(&mut rl, &path);
        assert!(path.parent().unwrap().exists());
        rl.add_history_entry("(define x 5)").unwrap();
        save_history_to_path(&mut rl, &path);

        let mut reloaded = Editor::<ReplHelper, DefaultHistory>::new().unwrap();
        load_history_from_path(&mut reloaded, &path);
        assert_eq!(reloaded.history().len(), 1);
    }
}
