use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{parse_due, NoteId};
use crate::store::{LocalCache, NoteStore, RemoteStore};

/// Sets the due date, parsed with the configured `dueFormat`. `None` clears it.
pub fn run<R: RemoteStore, C: LocalCache>(
    store: &mut NoteStore<R, C>,
    id: NoteId,
    date: Option<&str>,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let config = store.config();
    if !config.use_due {
        result.add_message(CmdMessage::warning(
            "Due dates are disabled. Enable them with: gnotes config useDue true",
        ));
        return Ok(result);
    }

    let due = date.map(|d| parse_due(d, &config.due_format)).transpose()?;
    let note = store.note_mut(id)?;
    match due {
        Some(due) => {
            note.set_due(due);
            result.add_message(CmdMessage::success(format!(
                "Note {} is due {}",
                id,
                date.unwrap_or_default().trim()
            )));
        }
        None => {
            note.clear_due();
            result.add_message(CmdMessage::success(format!("Note {} has no due date", id)));
        }
    }
    result.touched(id);
    Ok(result)
}
