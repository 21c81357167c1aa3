use crate::commands::{CmdMessage, CmdResult};
use crate::error::{NotesError, Result};
use crate::model::NoteId;
use crate::store::{LocalCache, NoteStore, RemoteStore};
use regex::Regex;

const URL_PATTERN: &str = r#"(?i)\b(?:https?|ftp)://[^\s<>"'`]+"#;

/// Characters that usually close the sentence around a link rather than
/// belong to it.
const TRAILING: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}'];

/// Every URL in `content`, in order of appearance, without duplicates.
pub fn find_urls(content: &str) -> Result<Vec<String>> {
    let re = Regex::new(URL_PATTERN).map_err(|e| NotesError::Parse(e.to_string()))?;
    let mut urls: Vec<String> = Vec::new();
    for m in re.find_iter(content) {
        let url = trim_url(m.as_str());
        if !urls.iter().any(|u| u == url) {
            urls.push(url.to_string());
        }
    }
    Ok(urls)
}

fn trim_url(url: &str) -> &str {
    let mut url = url;
    while let Some(stripped) = url.strip_suffix(TRAILING) {
        // Keep a closing paren that pairs with one inside the link
        if url.ends_with(')') && url.matches('(').count() >= url.matches(')').count() {
            break;
        }
        url = stripped;
    }
    url
}

/// Opens every URL of a note with `open`. A URL that fails to open is
/// reported and the rest are still tried.
pub fn run<R, C, F>(store: &NoteStore<R, C>, id: NoteId, mut open: F) -> Result<CmdResult>
where
    R: RemoteStore,
    C: LocalCache,
    F: FnMut(&str) -> Result<()>,
{
    let note = store.find_note(id).ok_or(NotesError::NotFound(id))?;
    let urls = find_urls(&note.content)?;
    let mut result = CmdResult::default();

    if urls.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "Note {} did not contain any urls",
            id
        )));
        return Ok(result);
    }

    for url in &urls {
        log::debug!("opening {}", url);
        match open(url) {
            Ok(()) => result.add_message(CmdMessage::success(format!("Opened {}", url))),
            Err(e) => result.add_message(CmdMessage::warning(format!(
                "Could not open {}: {}",
                url, e
            ))),
        }
    }
    Ok(result)
}
