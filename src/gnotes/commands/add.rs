use crate::commands::{CmdMessage, CmdResult};
use crate::editor::ExternalEditor;
use crate::error::{NotesError, Result};
use crate::model::Note;
use crate::store::{LocalCache, NoteStore, RemoteStore};

/// Adds a note with the given content and the configured default priority.
pub fn run<R: RemoteStore, C: LocalCache>(
    store: &mut NoteStore<R, C>,
    content: &str,
) -> Result<CmdResult> {
    let content = content.trim();
    if content.is_empty() {
        return Err(NotesError::Validation("Note content is empty".to_string()));
    }

    let priority = store.config().default_priority;
    let id = store.add_note(Note::new(content).with_priority(priority));

    let mut result = CmdResult::default();
    result.touched(id);
    result.add_message(CmdMessage::success(format!("Note {} added", id)));
    Ok(result)
}

/// Composes the note in the external editor first.
pub fn run_with_editor<R: RemoteStore, C: LocalCache>(
    store: &mut NoteStore<R, C>,
    editor: &mut dyn ExternalEditor,
) -> Result<CmdResult> {
    let outcome = editor.edit("")?;
    if !outcome.changed || outcome.content.trim().is_empty() {
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::warning("Empty note discarded"));
        return Ok(result);
    }
    run(store, &outcome.content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::editor::ScriptedEditor;
    use crate::store::memory::StoreFixture;

    #[test]
    fn quick_add_uses_default_priority_and_tags() {
        let mut config = Config::default();
        config.default_priority = 4;
        config.default_tags = vec!["inbox".into()];
        let mut store = StoreFixture::new().with_config(config).build();

        let result = run(&mut store, "  buy milk \n").unwrap();
        assert!(result.changed);
        assert_eq!(result.affected_ids, vec![1]);

        let note = store.find_note(1).unwrap();
        assert_eq!(note.content, "buy milk");
        assert_eq!(note.priority, 4);
        assert_eq!(note.tags, vec!["inbox"]);
    }

    #[test]
    fn rejects_empty_content() {
        let mut store = StoreFixture::new().build();
        assert!(matches!(run(&mut store, "   "), Err(NotesError::Validation(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn editor_add_discards_untouched_buffer() {
        let mut store = StoreFixture::new().build();
        let mut editor = ScriptedEditor::new();
        let result = run_with_editor(&mut store, &mut editor).unwrap();
        assert!(!result.changed);
        assert!(store.is_empty());

        let mut editor = ScriptedEditor::new().then("Title\n\nbody");
        let result = run_with_editor(&mut store, &mut editor).unwrap();
        assert!(result.changed);
        assert_eq!(store.find_note(1).unwrap().title(), "Title");
    }
}
