// sash: restore a saved editor area session into an in-memory host and
// print the resulting split tree.
//
//   sash [SESSION_JSON]
//
// Without an argument the session in the platform config dir is used.

use std::path::PathBuf;
use std::process::ExitCode;

use sash_area::session::load_session_from;
use sash_area::{load_session, load_settings, EditorArea, MemoryHost};

fn main() -> ExitCode {
    env_logger::init();

    let session = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => match load_session_from(&path) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Failed to read {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => match load_session() {
            Some(session) => session,
            None => {
                log::error!("No saved session found");
                return ExitCode::FAILURE;
            }
        },
    };

    let mut area = EditorArea::with_settings(MemoryHost::new(), load_settings());
    if let Err(e) = area.restore_session(&session) {
        log::error!("Failed to restore layout: {}", e);
        return ExitCode::FAILURE;
    }

    print!("{}", area.outline());
    ExitCode::SUCCESS
}
