use crate::model::NoteId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotesError {
    #[error("Could not find note with id {0}")]
    NotFound(NoteId),

    #[error("{0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt notes document: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Editor error: {0}")]
    Editor(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, NotesError>;
