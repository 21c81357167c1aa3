use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::NoteId;
use crate::store::{LocalCache, NoteStore, RemoteStore};

/// Marks a note done (or not done again).
pub fn run<R: RemoteStore, C: LocalCache>(
    store: &mut NoteStore<R, C>,
    id: NoteId,
    done: bool,
) -> Result<CmdResult> {
    let note = store.note_mut(id)?;
    let state = if done { "done" } else { "not done" };
    let mut result = CmdResult::default();

    if note.done == done {
        result.add_message(CmdMessage::info(format!("Note {} is already {}", id, state)));
        return Ok(result);
    }

    note.set_done(done);
    result.touched(id);
    result.add_message(CmdMessage::success(format!("Note {} marked as {}", id, state)));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotesError;
    use crate::store::memory::StoreFixture;

    #[test]
    fn marks_and_unmarks() {
        let mut store = StoreFixture::new().with_note("a").build();
        assert!(run(&mut store, 1, true).unwrap().changed);
        assert!(store.find_note(1).unwrap().done);

        assert!(!run(&mut store, 1, true).unwrap().changed);

        assert!(run(&mut store, 1, false).unwrap().changed);
        assert!(!store.find_note(1).unwrap().done);
    }

    #[test]
    fn unknown_id() {
        let mut store = StoreFixture::new().build();
        assert!(matches!(run(&mut store, 3, true), Err(NotesError::NotFound(3))));
    }
}
