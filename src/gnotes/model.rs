use crate::error::{NotesError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub type NoteId = u64;

pub const MAX_PRIORITY: u8 = 5;

/// Seconds between the Unix epoch and 0001-01-01T00:00:00Z.
const ZERO_TIME_SECS: i64 = -62_135_596_800;

/// The "unset" timestamp. Due dates are never optional in the document, an
/// unset one is stored as this value and therefore sorts before every real date.
pub static ZERO_TIME: Lazy<DateTime<Utc>> =
    Lazy::new(|| DateTime::from_timestamp(ZERO_TIME_SECS, 0).unwrap_or_default());

fn zero_time() -> DateTime<Utc> {
    *ZERO_TIME
}

pub fn is_zero_time(t: &DateTime<Utc>) -> bool {
    *t == *ZERO_TIME
}

/// A single todo item.
///
/// Fields are public for reading; mutate through the setters so `updated`
/// is refreshed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub content: String,
    pub priority: u8,
    pub done: bool,
    #[serde(default = "zero_time")]
    pub created: DateTime<Utc>,
    #[serde(default = "zero_time")]
    pub updated: DateTime<Utc>,
    #[serde(default = "zero_time")]
    pub due: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Default for Note {
    fn default() -> Self {
        Self {
            id: 0,
            content: String::new(),
            priority: 0,
            done: false,
            created: zero_time(),
            updated: zero_time(),
            due: zero_time(),
            tags: Vec::new(),
        }
    }
}

impl Note {
    /// A note that has not been added to a store yet (id 0, timestamps unset).
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// First line of the content.
    pub fn title(&self) -> &str {
        let line = self.content.split('\n').next().unwrap_or_default();
        line.strip_suffix('\r').unwrap_or(line)
    }

    pub fn has_due(&self) -> bool {
        !is_zero_time(&self.due)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn touch(&mut self) {
        self.updated = Utc::now();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.touch();
    }

    pub fn set_priority(&mut self, priority: u8) {
        self.priority = priority;
        self.touch();
    }

    pub fn set_done(&mut self, done: bool) {
        self.done = done;
        self.touch();
    }

    pub fn toggle_done(&mut self) -> bool {
        self.set_done(!self.done);
        self.done
    }

    pub fn set_due(&mut self, due: DateTime<Utc>) {
        self.due = due;
        self.touch();
    }

    pub fn clear_due(&mut self) {
        self.set_due(zero_time());
    }

    /// Returns false if the note already had the tag.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        if self.has_tag(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        self.touch();
        true
    }

    /// Returns false if the note did not have the tag.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        if self.tags.len() == before {
            return false;
        }
        self.touch();
        true
    }

    /// Returns false if there was nothing to clear.
    pub fn clear_tags(&mut self) -> bool {
        if self.tags.is_empty() {
            return false;
        }
        self.tags.clear();
        self.touch();
        true
    }
}

/// Parses a user supplied priority, accepting only `0..=MAX_PRIORITY`.
pub fn parse_priority(input: &str) -> Result<u8> {
    match input.trim().parse::<u8>() {
        Ok(p) if p <= MAX_PRIORITY => Ok(p),
        _ => Err(NotesError::Validation(format!(
            "Invalid priority \"{}\". Priority should be in range 0-{}",
            input, MAX_PRIORITY
        ))),
    }
}

/// Parses a due date with a strftime `format`. Formats without a time part
/// yield midnight UTC.
pub fn parse_due(input: &str, format: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
        return Ok(Utc.from_utc_datetime(&dt));
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, format) {
        return Ok(Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN)));
    }
    Err(NotesError::Validation(format!(
        "Invalid due date \"{}\". Please use the format {}",
        input, format
    )))
}
