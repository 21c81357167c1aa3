use crate::checksum::ContentHash;
use crate::error::{NotesError, Result};
use std::env;
use std::fs;
use std::io::Write;
use std::process::Command;

/// What came back from an editing round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// False when the buffer was saved unchanged (or not saved at all)
    pub changed: bool,
    pub content: String,
}

/// Something that lets the user edit a text buffer.
pub trait ExternalEditor {
    fn edit(&mut self, content: &str) -> Result<EditOutcome>;
}

/// Gets the editor command from environment.
/// Checks $EDITOR, then $VISUAL, then falls back to `vi`.
pub fn get_editor() -> String {
    ["EDITOR", "VISUAL"]
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "vi".to_string())
}

/// Runs the user's editor on a temporary markdown file.
#[derive(Debug, Default, Clone)]
pub struct SystemEditor {
    command: Option<String>,
}

impl SystemEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `command` instead of looking at the environment.
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: Some(command.into()),
        }
    }

    fn command_line(&self) -> String {
        self.command.clone().unwrap_or_else(get_editor)
    }
}

impl ExternalEditor for SystemEditor {
    fn edit(&mut self, content: &str) -> Result<EditOutcome> {
        let mut file = tempfile::Builder::new()
            .prefix("gnotes-")
            .suffix(".md")
            .tempfile()
            .map_err(NotesError::Io)?;
        file.write_all(content.as_bytes()).map_err(NotesError::Io)?;
        file.flush().map_err(NotesError::Io)?;
        let before = ContentHash::compute(content.as_bytes());

        // $EDITOR may carry arguments, e.g. "code --wait"
        let command_line = self.command_line();
        let mut parts = command_line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| NotesError::Editor("No editor configured".to_string()))?;

        log::debug!("running {} {}", command_line, file.path().display());
        let status = Command::new(program)
            .args(parts)
            .arg(file.path())
            .status()
            .map_err(|e| {
                NotesError::Editor(format!("Failed to launch editor '{}': {}", program, e))
            })?;

        if !status.success() {
            return Err(NotesError::Editor(format!(
                "Editor '{}' exited with {}",
                program, status
            )));
        }

        let edited = fs::read_to_string(file.path()).map_err(NotesError::Io)?;
        let changed = ContentHash::compute(edited.as_bytes()) != before;
        Ok(EditOutcome {
            changed,
            content: edited,
        })
    }
}

#[cfg(any(test, feature = "test_utils"))]
pub use scripted::ScriptedEditor;

#[cfg(any(test, feature = "test_utils"))]
mod scripted {
    use super::*;
    use std::collections::VecDeque;

    /// Editor double that replays canned results and records what it was given.
    #[derive(Debug, Default)]
    pub struct ScriptedEditor {
        replies: VecDeque<Result<String>>,
        pub seen: Vec<String>,
    }

    impl ScriptedEditor {
        pub fn new() -> Self {
            Self::default()
        }

        /// The next edit returns `content`.
        pub fn then(mut self, content: &str) -> Self {
            self.replies.push_back(Ok(content.to_string()));
            self
        }

        /// The next edit fails.
        pub fn then_fail(mut self, message: &str) -> Self {
            self.replies
                .push_back(Err(NotesError::Editor(message.to_string())));
            self
        }
    }

    impl ExternalEditor for ScriptedEditor {
        fn edit(&mut self, content: &str) -> Result<EditOutcome> {
            self.seen.push(content.to_string());
            // Out of script means the user quit without saving
            let edited = self
                .replies
                .pop_front()
                .unwrap_or_else(|| Ok(content.to_string()))?;
            Ok(EditOutcome {
                changed: edited != content,
                content: edited,
            })
        }
    }
}
