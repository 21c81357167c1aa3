//! Turns notes into column-aligned rows and detail views.
//!
//! Nothing here prints. Rows are sequences of [`Cell`]s tagged with the
//! [`Field`] they show and, where it matters, a [`PriorityClass`], so the CLI
//! can colour them with `colored` and the TUI can turn them into styled spans.

use crate::config::Config;
use crate::model::{Note, NoteId};
use crate::query::Column;
use chrono::{DateTime, Utc};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const NO_NOTES: &str = "No notes found.";

const DONE_MARK: &str = "✓";
const COLUMN_GAP: usize = 1;
/// Below this the title column is not worth showing on its own.
const MIN_TITLE_WIDTH: usize = 8;

/// Urgency bucket used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityClass {
    Low,
    Mid,
    High,
}

impl PriorityClass {
    pub fn of(priority: u8) -> Self {
        match priority {
            0 | 1 => PriorityClass::Low,
            2 | 3 => PriorityClass::Mid,
            _ => PriorityClass::High,
        }
    }
}

/// Which optional columns are visible. Id and title always are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns {
    pub done: bool,
    pub priority: bool,
    pub due: bool,
    pub created: bool,
    pub updated: bool,
}

impl Columns {
    pub fn from_config(config: &Config) -> Self {
        Self {
            done: true,
            priority: config.use_priority,
            due: config.use_due,
            created: true,
            updated: false,
        }
    }

    /// Makes sure a column someone sorts by is also on screen.
    pub fn reveal(&mut self, column: Column) {
        match column {
            Column::Id | Column::Title => {}
            Column::Priority => self.priority = true,
            Column::Due => self.due = true,
            Column::Created => self.created = true,
            Column::Updated => self.updated = true,
        }
    }

    fn shows(&self, field: Field) -> bool {
        match field {
            Field::Id | Field::Title => true,
            Field::Done => self.done,
            Field::Priority => self.priority,
            Field::Due => self.due,
            Field::Created => self.created,
            Field::Updated => self.updated,
        }
    }
}

impl Default for Columns {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// A table column, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Done,
    Priority,
    Title,
    Due,
    Created,
    Updated,
}

impl Field {
    const ORDER: [Field; 7] = [
        Field::Id,
        Field::Done,
        Field::Priority,
        Field::Title,
        Field::Due,
        Field::Created,
        Field::Updated,
    ];

    fn header(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Done => "done",
            Field::Priority => "prio",
            Field::Title => "title",
            Field::Due => "due",
            Field::Created => "created",
            Field::Updated => "updated",
        }
    }
}

/// One padded table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub field: Field,
    pub text: String,
    pub class: Option<PriorityClass>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: NoteId,
    pub done: bool,
    pub class: PriorityClass,
    pub cells: Vec<Cell>,
}

impl Row {
    /// Cells joined with the column gap, without styling.
    pub fn plain(&self) -> String {
        join_cells(&self.cells)
    }
}

/// Everything shown about a single note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detail {
    pub title: String,
    pub class: PriorityClass,
    /// Label/value pairs, already formatted
    pub fields: Vec<(&'static str, String)>,
    pub content: String,
}

/// Column-aligned formatting for a given output width.
#[derive(Debug, Clone)]
pub struct Presenter {
    pub columns: Columns,
    time_format: String,
    due_format: String,
    width: usize,
}

impl Presenter {
    pub fn new(config: &Config, width: usize) -> Self {
        Self {
            columns: Columns::from_config(config),
            time_format: config.time_format.clone(),
            due_format: config.due_format.clone(),
            width,
        }
    }

    pub fn with_columns(mut self, columns: Columns) -> Self {
        self.columns = columns;
        self
    }

    /// Visible fields with their widths. `max_id` is the largest id the
    /// store has handed out, so the id column does not jump around when
    /// filters change.
    fn layout(&self, max_id: NoteId) -> Vec<(Field, usize)> {
        let mut fixed: Vec<(Field, usize)> = Field::ORDER
            .iter()
            .copied()
            .filter(|f| self.columns.shows(*f) && *f != Field::Title)
            .map(|f| (f, self.fixed_width(f, max_id)))
            .collect();

        let used: usize = fixed.iter().map(|(_, w)| w + COLUMN_GAP).sum();
        let title_width = self.width.saturating_sub(used).max(MIN_TITLE_WIDTH);

        let title_at = fixed
            .iter()
            .position(|(f, _)| matches!(f, Field::Due | Field::Created | Field::Updated))
            .unwrap_or(fixed.len());
        fixed.insert(title_at, (Field::Title, title_width));
        fixed
    }

    fn fixed_width(&self, field: Field, max_id: NoteId) -> usize {
        let content = match field {
            Field::Id => digits(max_id),
            Field::Done => DONE_MARK.width(),
            Field::Priority => 1,
            Field::Due => sample_width(&self.due_format),
            Field::Created | Field::Updated => sample_width(&self.time_format),
            Field::Title => 0,
        };
        content.max(field.header().width())
    }

    pub fn header(&self, max_id: NoteId) -> Vec<Cell> {
        self.layout(max_id)
            .into_iter()
            .map(|(field, width)| Cell {
                field,
                text: pad_to_width(field.header(), width, field == Field::Id),
                class: None,
            })
            .collect()
    }

    pub fn header_plain(&self, max_id: NoteId) -> String {
        join_cells(&self.header(max_id))
    }

    pub fn row(&self, note: &Note, max_id: NoteId) -> Row {
        let class = PriorityClass::of(note.priority);
        let cells = self
            .layout(max_id)
            .into_iter()
            .map(|(field, width)| {
                let text = match field {
                    Field::Id => note.id.to_string(),
                    Field::Done => if note.done { DONE_MARK } else { "" }.to_string(),
                    Field::Priority => note.priority.to_string(),
                    Field::Title => note.title().to_string(),
                    Field::Due => self.format_due(note),
                    Field::Created => note.created.format(&self.time_format).to_string(),
                    Field::Updated => note.updated.format(&self.time_format).to_string(),
                };
                let class = matches!(field, Field::Priority | Field::Title).then_some(class);
                Cell {
                    field,
                    text: pad_to_width(&text, width, field == Field::Id),
                    class,
                }
            })
            .collect();
        Row {
            id: note.id,
            done: note.done,
            class,
            cells,
        }
    }

    pub fn rows(&self, notes: &[&Note], max_id: NoteId) -> Vec<Row> {
        notes.iter().map(|n| self.row(n, max_id)).collect()
    }

    /// The whole table as plain text lines, or [`NO_NOTES`].
    pub fn render_list(&self, notes: &[&Note], max_id: NoteId) -> Vec<String> {
        if notes.is_empty() {
            return vec![NO_NOTES.to_string()];
        }
        let mut lines = vec![self.header_plain(max_id)];
        lines.extend(self.rows(notes, max_id).iter().map(Row::plain));
        lines
    }

    pub fn render_detail(&self, note: &Note) -> Detail {
        let mut fields = vec![("id", note.id.to_string())];
        if self.columns.priority {
            fields.push(("prio", note.priority.to_string()));
        }
        fields.push(("done", if note.done { "yes" } else { "no" }.to_string()));
        if self.columns.due && note.has_due() {
            fields.push(("due", self.format_due(note)));
        }
        if !note.tags.is_empty() {
            fields.push(("tags", note.tags.join(", ")));
        }
        fields.push(("created", self.format_stamp(note.created)));
        fields.push(("updated", self.format_stamp(note.updated)));

        Detail {
            title: note.title().to_string(),
            class: PriorityClass::of(note.priority),
            fields,
            content: note.content.clone(),
        }
    }

    fn format_due(&self, note: &Note) -> String {
        if note.has_due() {
            note.due.format(&self.due_format).to_string()
        } else {
            String::new()
        }
    }

    fn format_stamp(&self, at: DateTime<Utc>) -> String {
        format!(
            "{} ({})",
            at.format(&self.time_format),
            format_time_ago(at)
        )
    }
}

fn join_cells(cells: &[Cell]) -> String {
    let line = cells
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join(&" ".repeat(COLUMN_GAP));
    line.trim_end().to_string()
}

fn digits(n: NoteId) -> usize {
    n.max(1).to_string().len()
}

fn sample_width(format: &str) -> usize {
    // A date with two-digit fields everywhere gives the widest rendering
    let sample = DateTime::from_timestamp(1_766_000_000, 0).unwrap_or_default();
    sample.format(format).to_string().width()
}

/// Truncates to `max_width` display columns, ending in `…` when cut.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    if max_width > 0 {
        result.push('…');
    }
    result
}

fn pad_to_width(s: &str, width: usize, right_align: bool) -> String {
    let text = truncate_to_width(s, width);
    let padding = " ".repeat(width.saturating_sub(text.width()));
    if right_align {
        format!("{}{}", padding, text)
    } else {
        format!("{}{}", text, padding)
    }
}

pub fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    timeago::Formatter::new().convert(duration.to_std().unwrap_or_default())
}
