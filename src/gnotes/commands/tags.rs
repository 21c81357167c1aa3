use crate::commands::{CmdMessage, CmdResult};
use crate::error::{NotesError, Result};
use crate::model::NoteId;
use crate::store::{LocalCache, NoteStore, RemoteStore};

fn validate_tag(tag: &str) -> Result<&str> {
    let tag = tag.trim();
    if tag.is_empty() || tag.contains(char::is_whitespace) {
        return Err(NotesError::Validation(format!(
            "Invalid tag \"{}\". Tags are single words",
            tag
        )));
    }
    Ok(tag)
}

pub fn tag<R: RemoteStore, C: LocalCache>(
    store: &mut NoteStore<R, C>,
    id: NoteId,
    tag: &str,
) -> Result<CmdResult> {
    let tag = validate_tag(tag)?;
    let mut result = CmdResult::default();
    if store.note_mut(id)?.add_tag(tag) {
        result.touched(id);
        result.add_message(CmdMessage::success(format!("Note {} tagged {}", id, tag)));
    } else {
        result.add_message(CmdMessage::info(format!("Note {} already tagged {}", id, tag)));
    }
    Ok(result)
}

pub fn untag<R: RemoteStore, C: LocalCache>(
    store: &mut NoteStore<R, C>,
    id: NoteId,
    tag: &str,
) -> Result<CmdResult> {
    let tag = validate_tag(tag)?;
    let mut result = CmdResult::default();
    if store.note_mut(id)?.remove_tag(tag) {
        result.touched(id);
        result.add_message(CmdMessage::success(format!(
            "Removed tag {} from note {}",
            tag, id
        )));
    } else {
        result.add_message(CmdMessage::warning(format!(
            "Note {} is not tagged {}",
            id, tag
        )));
    }
    Ok(result)
}

pub fn clear<R: RemoteStore, C: LocalCache>(
    store: &mut NoteStore<R, C>,
    id: NoteId,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if store.note_mut(id)?.clear_tags() {
        result.touched(id);
        result.add_message(CmdMessage::success(format!("Cleared tags of note {}", id)));
    } else {
        result.add_message(CmdMessage::info(format!("Note {} has no tags", id)));
    }
    Ok(result)
}

/// Tags in use with their counts, most used first.
pub fn list<R: RemoteStore, C: LocalCache>(store: &NoteStore<R, C>) -> Result<CmdResult> {
    let mut tags: Vec<(String, usize)> = store.get_tags().into_iter().collect();
    tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut result = CmdResult::default();
    if tags.is_empty() {
        result.add_message(CmdMessage::info("No tags in use"));
    }
    result.tags = tags;
    Ok(result)
}
