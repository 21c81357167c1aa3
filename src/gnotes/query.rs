//! # Query Engine
//!
//! Stateless transforms over `&[&Note]`: filters return new vectors of
//! references and [`sort`] reorders a slice in place. Notes themselves are
//! never touched.
//!
//! Pipelines are built by chaining, the session's visible set for example is
//!
//! ```text
//! sort(keys, filter_by_tag(tag, filter_done(search(q, all))))
//! ```

use crate::error::{NotesError, Result};
use crate::model::Note;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// When true, an ascending `id` key orders by descending id before the
/// direction is applied, so `id` lists newest first and `-id` oldest first.
pub const ID_SORT_INVERTED: bool = true;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    Title,
    Priority,
    Due,
    Created,
    Updated,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Id,
        Column::Title,
        Column::Priority,
        Column::Due,
        Column::Created,
        Column::Updated,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Title => "title",
            Column::Priority => "prio",
            Column::Due => "due",
            Column::Created => "created",
            Column::Updated => "updated",
        }
    }

    fn compare(self, a: &Note, b: &Note) -> Ordering {
        match self {
            Column::Id if ID_SORT_INVERTED => b.id.cmp(&a.id),
            Column::Id => a.id.cmp(&b.id),
            Column::Title => a.title().cmp(b.title()),
            Column::Priority => a.priority.cmp(&b.priority),
            Column::Due => a.due.cmp(&b.due),
            Column::Created => a.created.cmp(&b.created),
            Column::Updated => a.updated.cmp(&b.updated),
        }
    }
}

impl FromStr for Column {
    type Err = NotesError;

    fn from_str(s: &str) -> Result<Self> {
        Column::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| {
                NotesError::Validation(format!(
                    "Unknown sort column \"{}\". Use one of: id,title,prio,due,created,updated",
                    s
                ))
            })
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A column plus direction. Textual form is `col` or `-col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: Column,
    pub descending: bool,
}

impl SortKey {
    pub fn asc(column: Column) -> Self {
        Self {
            column,
            descending: false,
        }
    }

    pub fn desc(column: Column) -> Self {
        Self {
            column,
            descending: true,
        }
    }

    fn compare(&self, a: &Note, b: &Note) -> Ordering {
        let ord = self.column.compare(a, b);
        if self.descending {
            ord.reverse()
        } else {
            ord
        }
    }
}

impl FromStr for SortKey {
    type Err = NotesError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.strip_prefix('-') {
            Some(col) => Ok(SortKey::desc(col.parse()?)),
            None => Ok(SortKey::asc(s.parse()?)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "-{}", self.column)
        } else {
            write!(f, "{}", self.column)
        }
    }
}

/// Parses a comma separated key list such as `prio,-due`. Blank input is no keys.
pub fn parse_sort_keys(input: &str) -> Result<Vec<SortKey>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(SortKey::from_str)
        .collect()
}

pub fn format_sort_keys(keys: &[SortKey]) -> String {
    keys.iter()
        .map(SortKey::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Drops notes that are done.
pub fn filter_done<'a>(notes: &[&'a Note]) -> Vec<&'a Note> {
    notes.iter().copied().filter(|n| !n.done).collect()
}

pub fn filter_by_tag<'a>(tag: &str, notes: &[&'a Note]) -> Vec<&'a Note> {
    notes.iter().copied().filter(|n| n.has_tag(tag)).collect()
}

pub fn filter_by_priority<'a>(min_priority: u8, notes: &[&'a Note]) -> Vec<&'a Note> {
    notes
        .iter()
        .copied()
        .filter(|n| n.priority >= min_priority)
        .collect()
}

/// Case-insensitive substring match against the content or the space-joined tags.
pub fn search<'a>(query: &str, notes: &[&'a Note]) -> Vec<&'a Note> {
    let query = query.to_lowercase();
    notes
        .iter()
        .copied()
        .filter(|n| {
            n.content.to_lowercase().contains(&query)
                || n.tags.join(" ").to_lowercase().contains(&query)
        })
        .collect()
}

/// Stable multi-key sort. Ties on a key fall through to the next one; with
/// no keys the notes are ordered by ascending id.
pub fn sort(keys: &[SortKey], notes: &mut [&Note]) {
    if keys.is_empty() {
        notes.sort_by_key(|n| n.id);
        return;
    }
    notes.sort_by(|a, b| {
        keys.iter()
            .map(|k| k.compare(a, b))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn note(id: u64, content: &str, priority: u8) -> Note {
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        Note {
            id,
            content: content.to_string(),
            priority,
            created: base + Duration::hours(id as i64),
            updated: base + Duration::hours(10 - id as i64),
            ..Note::default()
        }
    }

    fn ids(notes: &[&Note]) -> Vec<u64> {
        notes.iter().map(|n| n.id).collect()
    }

    #[test]
    fn filters_by_priority() {
        let low = note(1, "low", 1);
        let high = note(2, "high", 4);
        let all = vec![&low, &high];
        assert_eq!(ids(&filter_by_priority(3, &all)), vec![2]);
        assert_eq!(ids(&filter_by_priority(0, &all)), vec![1, 2]);
    }

    #[test]
    fn filters_by_tag_exactly() {
        let mut n = note(1, "deploy", 3);
        n.tags = vec!["work".into(), "urgent".into()];
        let all = vec![&n];
        assert_eq!(filter_by_tag("urgent", &all).len(), 1);
        assert!(filter_by_tag("home", &all).is_empty());
        assert!(filter_by_tag("Urgent", &all).is_empty());
        assert!(filter_by_tag("urg", &all).is_empty());
    }

    #[test]
    fn filter_done_is_idempotent() {
        let mut a = note(1, "a", 0);
        a.done = true;
        let b = note(2, "b", 0);
        let all = vec![&a, &b];
        let once = filter_done(&all);
        assert_eq!(ids(&once), vec![2]);
        assert_eq!(ids(&filter_done(&once)), ids(&once));
    }

    #[test]
    fn search_matches_content_and_tags_ignoring_case() {
        let a = note(1, "Buy MILK", 0);
        let mut b = note(2, "call bob", 0);
        b.tags = vec!["Errands".into(), "phone".into()];
        let c = note(3, "pay rent", 0);
        let all = vec![&a, &b, &c];

        assert_eq!(ids(&search("milk", &all)), vec![1]);
        assert_eq!(ids(&search("errands", &all)), vec![2]);
        assert_eq!(ids(&search("s ph", &all)), vec![2]);
        assert_eq!(ids(&search("", &all)), vec![1, 2, 3]);

        let once = search("a", &all);
        assert_eq!(ids(&search("a", &once)), ids(&once));
    }

    #[test]
    fn no_keys_sorts_by_id_ascending() {
        let (a, b, c) = (note(3, "c", 0), note(1, "a", 0), note(2, "b", 0));
        let mut v = vec![&a, &b, &c];
        sort(&[], &mut v);
        assert_eq!(ids(&v), vec![1, 2, 3]);
    }

    #[test]
    fn ascending_id_key_lists_newest_first() {
        let (a, b, c) = (note(1, "a", 0), note(2, "b", 0), note(3, "c", 0));
        let mut v = vec![&a, &b, &c];
        sort(&[SortKey::asc(Column::Id)], &mut v);
        assert_eq!(ids(&v), vec![3, 2, 1]);
        sort(&[SortKey::desc(Column::Id)], &mut v);
        assert_eq!(ids(&v), vec![1, 2, 3]);
    }

    #[test]
    fn descending_reverses_ascending_for_unique_keys() {
        let notes: Vec<Note> = (1..=5)
            .map(|i| {
                let mut n = note(i, &format!("t{}", i), i as u8);
                n.due = n.created + Duration::days(i as i64);
                n
            })
            .collect();
        for column in Column::ALL {
            let mut asc: Vec<&Note> = notes.iter().rev().collect();
            sort(&[SortKey::asc(column)], &mut asc);
            let mut desc = asc.clone();
            sort(&[SortKey::desc(column)], &mut desc);
            let mut reversed = ids(&asc);
            reversed.reverse();
            assert_eq!(ids(&desc), reversed, "column {}", column);
        }
    }

    #[test]
    fn multi_key_sort_matches_tuple_sort() {
        let notes = vec![
            note(4, "beta", 1),
            note(1, "alpha", 2),
            note(3, "beta", 3),
            note(2, "alpha", 0),
            note(5, "gamma", 5),
        ];
        let mut by_keys: Vec<&Note> = notes.iter().collect();
        sort(
            &[SortKey::asc(Column::Title), SortKey::desc(Column::Id)],
            &mut by_keys,
        );

        let mut by_tuple: Vec<&Note> = notes.iter().collect();
        by_tuple.sort_by(|a, b| (a.title(), a.id).cmp(&(b.title(), b.id)));

        assert_eq!(ids(&by_keys), ids(&by_tuple));
        assert_eq!(ids(&by_keys), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn sort_is_stable_on_ties() {
        let notes = vec![note(1, "x", 2), note(2, "y", 2), note(3, "z", 2)];
        let mut v: Vec<&Note> = notes.iter().rev().collect();
        sort(&[SortKey::asc(Column::Priority)], &mut v);
        assert_eq!(ids(&v), vec![3, 2, 1]);
    }

    #[test]
    fn unset_due_sorts_first() {
        let mut dated = note(1, "dated", 0);
        dated.due = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let undated = note(2, "undated", 0);
        let mut v = vec![&dated, &undated];
        sort(&[SortKey::asc(Column::Due)], &mut v);
        assert_eq!(ids(&v), vec![2, 1]);
    }

    #[test]
    fn parses_key_lists() {
        let keys = parse_sort_keys("prio, -due,title").unwrap();
        assert_eq!(
            keys,
            vec![
                SortKey::asc(Column::Priority),
                SortKey::desc(Column::Due),
                SortKey::asc(Column::Title)
            ]
        );
        assert_eq!(format_sort_keys(&keys), "prio,-due,title");
        assert!(parse_sort_keys("").unwrap().is_empty());
        assert!(matches!(
            parse_sort_keys("prio,size"),
            Err(NotesError::Validation(_))
        ));
    }
}
