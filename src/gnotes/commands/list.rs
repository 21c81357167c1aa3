use crate::commands::{CmdResult, Listing};
use crate::error::Result;
use crate::query::{self, parse_sort_keys};
use crate::store::{LocalCache, NoteStore, RemoteStore};

/// Flags shared by `list` and `todo`.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Comma separated sort keys, the configured default category when absent
    pub order: Option<String>,
    pub search: Option<String>,
    pub min_priority: Option<u8>,
    pub tag: Option<String>,
    pub skip_done: bool,
    pub long: bool,
}

pub fn run<R: RemoteStore, C: LocalCache>(
    store: &NoteStore<R, C>,
    options: &ListOptions,
) -> Result<CmdResult> {
    let sort_keys = match &options.order {
        Some(order) => parse_sort_keys(order)?,
        None => store.config().default_sort_keys(),
    };

    let mut notes = store.note_refs();
    if let Some(q) = &options.search {
        notes = query::search(q, &notes);
    }
    if options.skip_done {
        notes = query::filter_done(&notes);
    }
    if let Some(tag) = &options.tag {
        notes = query::filter_by_tag(tag, &notes);
    }
    if let Some(min) = options.min_priority {
        notes = query::filter_by_priority(min, &notes);
    }
    query::sort(&sort_keys, &mut notes);

    let listing = if options.long {
        Listing::Full
    } else {
        Listing::Table
    };
    let mut result = CmdResult::default()
        .with_listed_notes(notes.into_iter().cloned().collect(), listing);
    result.sort_keys = sort_keys;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{done, priority, tags};
    use crate::config::{Category, Config};
    use crate::error::NotesError;
    use crate::query::{Column, SortKey};
    use crate::store::memory::StoreFixture;

    fn ids(result: &CmdResult) -> Vec<u64> {
        result.listed_notes.iter().map(|n| n.id).collect()
    }

    fn sample() -> crate::store::memory::fixtures::MemoryNoteStore {
        let mut store = StoreFixture::new()
            .with_note("buy milk")
            .with_note("call bob")
            .with_note("pay rent")
            .build();
        priority::run(&mut store, 1, "1").unwrap();
        priority::run(&mut store, 2, "4").unwrap();
        priority::run(&mut store, 3, "5").unwrap();
        tags::tag(&mut store, 2, "phone").unwrap();
        done::run(&mut store, 3, true).unwrap();
        store
    }

    #[test]
    fn list_shows_everything_in_id_order() {
        let store = sample();
        let result = run(&store, &ListOptions::default()).unwrap();
        assert_eq!(ids(&result), vec![1, 2, 3]);
        assert!(!result.changed);
    }

    #[test]
    fn todo_skips_done() {
        let store = sample();
        let options = ListOptions {
            skip_done: true,
            ..Default::default()
        };
        assert_eq!(ids(&run(&store, &options).unwrap()), vec![1, 2]);
    }

    #[test]
    fn filters_combine() {
        let store = sample();
        let options = ListOptions {
            min_priority: Some(3),
            ..Default::default()
        };
        assert_eq!(ids(&run(&store, &options).unwrap()), vec![2, 3]);

        let options = ListOptions {
            tag: Some("phone".into()),
            ..Default::default()
        };
        assert_eq!(ids(&run(&store, &options).unwrap()), vec![2]);

        let options = ListOptions {
            search: Some("PHONE".into()),
            ..Default::default()
        };
        assert_eq!(ids(&run(&store, &options).unwrap()), vec![2]);
    }

    #[test]
    fn explicit_order_and_default_category() {
        let store = sample();
        let options = ListOptions {
            order: Some("-prio".into()),
            ..Default::default()
        };
        let result = run(&store, &options).unwrap();
        assert_eq!(ids(&result), vec![3, 2, 1]);
        assert_eq!(result.sort_keys, vec![SortKey::desc(Column::Priority)]);

        let mut config = Config::default();
        config.default_category = Category::Prio;
        let mut store = StoreFixture::new()
            .with_config(config)
            .with_note("low")
            .with_note("high")
            .build();
        priority::run(&mut store, 2, "5").unwrap();
        let result = run(&store, &ListOptions::default()).unwrap();
        assert_eq!(ids(&result), vec![2, 1]);
    }

    #[test]
    fn bad_order_is_rejected() {
        let store = sample();
        let options = ListOptions {
            order: Some("size".into()),
            ..Default::default()
        };
        assert!(matches!(run(&store, &options), Err(NotesError::Validation(_))));
    }
}
