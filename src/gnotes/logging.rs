use crate::error::{NotesError, Result};
use std::fs::{self, OpenOptions};
use std::path::Path;

/// Environment variable holding the `env_logger` filter, e.g. `gnotes=debug`.
pub const LOG_ENV: &str = "GNOTES_LOG";
const DEFAULT_FILTER: &str = "warn";
pub const LOG_FILENAME: &str = "gnotes.log";

/// Where log lines go.
#[derive(Debug, Clone, Copy)]
pub enum LogTarget<'a> {
    Stderr,
    /// Appends to `gnotes.log` in the given directory. Used while the
    /// terminal is in full-screen mode.
    File(&'a Path),
}

fn builder() -> env_logger::Builder {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(LOG_ENV, DEFAULT_FILTER))
}

pub fn init_logging(target: LogTarget<'_>) -> Result<()> {
    let mut builder = builder();
    if let LogTarget::File(dir) = target {
        fs::create_dir_all(dir).map_err(NotesError::Io)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(LOG_FILENAME))
            .map_err(NotesError::Io)?;
        builder
            .target(env_logger::Target::Pipe(Box::new(file)))
            .write_style(env_logger::WriteStyle::Never);
    }
    // A logger installed earlier (tests) wins
    let _ = builder.try_init();
    Ok(())
}
