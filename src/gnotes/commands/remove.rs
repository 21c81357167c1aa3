use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::NoteId;
use crate::store::{LocalCache, NoteStore, RemoteStore};

pub fn run<R: RemoteStore, C: LocalCache>(
    store: &mut NoteStore<R, C>,
    id: NoteId,
) -> Result<CmdResult> {
    let note = store.delete_note(id)?;
    let mut result = CmdResult::default();
    result.touched(id);
    result.add_message(CmdMessage::success(format!(
        "Note {} removed: {}",
        id,
        note.title()
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::add;
    use crate::error::NotesError;
    use crate::store::memory::StoreFixture;

    #[test]
    fn ids_are_not_reused_after_remove() {
        let mut store = StoreFixture::new().build();
        add::run(&mut store, "buy milk").unwrap();
        add::run(&mut store, "call bob").unwrap();
        run(&mut store, 1).unwrap();
        let result = add::run(&mut store, "pay rent").unwrap();
        assert_eq!(result.affected_ids, vec![3]);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mut store = StoreFixture::new().with_note("a").build();
        assert!(matches!(run(&mut store, 2), Err(NotesError::NotFound(2))));
        assert_eq!(store.len(), 1);
    }
}
