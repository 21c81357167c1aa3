use crate::commands::{CmdMessage, CmdResult};
use crate::editor::ExternalEditor;
use crate::error::{NotesError, Result};
use crate::model::NoteId;
use crate::store::{LocalCache, NoteStore, RemoteStore};

pub fn run<R: RemoteStore, C: LocalCache>(
    store: &mut NoteStore<R, C>,
    editor: &mut dyn ExternalEditor,
    id: NoteId,
) -> Result<CmdResult> {
    let current = store.note_mut(id)?.content.clone();
    let outcome = editor.edit(&current)?;

    let mut result = CmdResult::default();
    if !outcome.changed {
        result.add_message(CmdMessage::info(format!("Note {} unchanged", id)));
        return Ok(result);
    }
    if outcome.content.trim().is_empty() {
        return Err(NotesError::Validation(format!(
            "Refusing to empty note {}, use remove instead",
            id
        )));
    }

    store.note_mut(id)?.set_content(outcome.content);
    result.touched(id);
    result.add_message(CmdMessage::success(format!("Note {} updated", id)));
    Ok(result)
}
