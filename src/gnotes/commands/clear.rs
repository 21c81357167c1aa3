use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{LocalCache, NoteStore, RemoteStore};

/// Removes every note. Confirmation is the caller's job.
pub fn run<R: RemoteStore, C: LocalCache>(store: &mut NoteStore<R, C>) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let count = store.clear();
    if count == 0 {
        result.add_message(CmdMessage::info("Nothing to clear"));
        return Ok(result);
    }
    result.changed = true;
    result.add_message(CmdMessage::success(format!("Removed {} notes", count)));
    Ok(result)
}
