use crate::error::{NotesError, Result};
use crate::model::parse_priority;
use crate::query::{parse_sort_keys, SortKey};

pub const INVALID_COMMAND: &str = "Invalid command. Use :h to show help";

/// A parsed `:` command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Nothing typed after the colon
    Empty,
    Quit,
    ForceQuit,
    Write,
    WriteQuit,
    Help,
    Add(String),
    Tag(String),
    Untag(String),
    Priority(u8),
    /// Due date as typed, `None` clears it
    Due(Option<String>),
    Sort(Vec<SortKey>),
}

impl Command {
    /// Parses the buffer with or without its leading `:`.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.strip_prefix(':').unwrap_or(line).trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match (name, rest) {
            ("", _) => Command::Empty,
            ("q", "") => Command::Quit,
            ("q!", "") => Command::ForceQuit,
            ("w", "") => Command::Write,
            ("wq", "") => Command::WriteQuit,
            ("h", "") => Command::Help,
            ("a", text) if !text.is_empty() => Command::Add(text.to_string()),
            ("t", tag) if is_tag(tag) => Command::Tag(tag.to_string()),
            ("rt", tag) if is_tag(tag) => Command::Untag(tag.to_string()),
            ("p", prio) if !prio.is_empty() => Command::Priority(parse_priority(prio)?),
            ("due", "") => Command::Due(None),
            ("due", date) => Command::Due(Some(date.to_string())),
            ("sort", keys) => Command::Sort(parse_sort_keys(&keys.replace(' ', ","))?),
            _ => return Err(NotesError::Validation(INVALID_COMMAND.to_string())),
        };
        Ok(command)
    }
}

fn is_tag(s: &str) -> bool {
    !s.is_empty() && !s.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Column;

    #[test]
    fn parses_the_command_table() {
        assert_eq!(Command::parse(":").unwrap(), Command::Empty);
        assert_eq!(Command::parse(":q").unwrap(), Command::Quit);
        assert_eq!(Command::parse(":q!").unwrap(), Command::ForceQuit);
        assert_eq!(Command::parse(":w").unwrap(), Command::Write);
        assert_eq!(Command::parse(":wq").unwrap(), Command::WriteQuit);
        assert_eq!(Command::parse(":h").unwrap(), Command::Help);
        assert_eq!(
            Command::parse(":a buy  milk").unwrap(),
            Command::Add("buy  milk".into())
        );
        assert_eq!(Command::parse(":t work").unwrap(), Command::Tag("work".into()));
        assert_eq!(Command::parse(":rt work").unwrap(), Command::Untag("work".into()));
        assert_eq!(Command::parse(":p 4").unwrap(), Command::Priority(4));
        assert_eq!(Command::parse(":due").unwrap(), Command::Due(None));
        assert_eq!(
            Command::parse(":due 01.02.2026").unwrap(),
            Command::Due(Some("01.02.2026".into()))
        );
        assert_eq!(
            Command::parse(":sort -prio due").unwrap(),
            Command::Sort(vec![SortKey::desc(Column::Priority), SortKey::asc(Column::Due)])
        );
        assert_eq!(Command::parse(":sort").unwrap(), Command::Sort(vec![]));
    }

    #[test]
    fn rejects_unknown_and_malformed() {
        for line in [":x", ":a", ":q now", ":t", ":t two words", ":p"] {
            let err = Command::parse(line).unwrap_err();
            assert_eq!(err.to_string(), INVALID_COMMAND, "{}", line);
        }
        assert!(matches!(Command::parse(":p 9"), Err(NotesError::Validation(_))));
        assert!(Command::parse(":sort size").is_err());
    }
}
