use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{parse_priority, NoteId};
use crate::store::{LocalCache, NoteStore, RemoteStore};

pub fn run<R: RemoteStore, C: LocalCache>(
    store: &mut NoteStore<R, C>,
    id: NoteId,
    priority: &str,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if !store.config().use_priority {
        result.add_message(CmdMessage::warning(
            "Priorities are disabled. Enable them with: gnotes config usePriority true",
        ));
        return Ok(result);
    }

    let priority = parse_priority(priority)?;
    store.note_mut(id)?.set_priority(priority);
    result.touched(id);
    result.add_message(CmdMessage::success(format!(
        "Note {} priority set to {}",
        id, priority
    )));
    Ok(result)
}
