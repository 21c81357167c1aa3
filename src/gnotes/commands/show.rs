use crate::commands::{CmdResult, Listing};
use crate::error::{NotesError, Result};
use crate::model::NoteId;
use crate::store::{LocalCache, NoteStore, RemoteStore};

pub fn run<R: RemoteStore, C: LocalCache>(store: &NoteStore<R, C>, id: NoteId) -> Result<CmdResult> {
    let note = store.find_note(id).ok_or(NotesError::NotFound(id))?;
    Ok(CmdResult::default().with_listed_notes(vec![note.clone()], Listing::Full))
}
