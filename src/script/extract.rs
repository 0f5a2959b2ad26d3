//! Structured-text extraction from model completions.
//!
//! A completion is expected to follow a loose four-section layout:
//!
//! ```text
//! [SCRIPT]
//! ...
//! [TITLES]
//! 1. ...
//! [THUMBNAILS]
//! 1. ...
//! [IMAGE_PROMPT]
//! ...
//! ```
//!
//! Each section is located by its own scan over the whole input: the first
//! occurrence of its marker opens it, and the first later occurrence of the
//! *next marker in canonical order* (or end of input) closes it. Markers that
//! appear out of order are not reconciled, so sections can overlap.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Section markers in canonical order.
const MARKERS: [&str; 4] = ["[SCRIPT]", "[TITLES]", "[THUMBNAILS]", "[IMAGE_PROMPT]"];

static MARKER_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| MARKERS.map(marker_regex));

static LIST_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.\s*").expect("Invalid regex"));

fn marker_regex(marker: &str) -> Regex {
    RegexBuilder::new(&regex::escape(marker))
        .case_insensitive(true)
        .unicode(false)
        .build()
        .expect("Invalid regex")
}

/// Script sections extracted from a completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredScript {
    pub script: String,
    pub titles: Vec<String>,
    pub thumbnails: Vec<String>,
    pub image_prompt: String,
}

impl StructuredScript {
    /// Render back into the marker layout, numbering list entries.
    pub fn to_marked_text(&self) -> String {
        format!(
            "{}\n{}\n\n{}\n{}\n\n{}\n{}\n\n{}\n{}\n",
            MARKERS[0],
            self.script,
            MARKERS[1],
            numbered(&self.titles),
            MARKERS[2],
            numbered(&self.thumbnails),
            MARKERS[3],
            self.image_prompt,
        )
    }

    /// True when no section produced any content.
    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
            && self.titles.is_empty()
            && self.thumbnails.is_empty()
            && self.image_prompt.is_empty()
    }
}

fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extract the four sections from `text`. Never fails; missing sections stay empty.
pub fn extract(text: &str) -> StructuredScript {
    let [script, titles, thumbnails, image_prompt] = &*MARKER_PATTERNS;

    StructuredScript {
        script: section(text, script, Some(titles))
            .map(|body| trim_text(body).to_string())
            .unwrap_or_default(),
        titles: section(text, titles, Some(thumbnails))
            .map(list_items)
            .unwrap_or_default(),
        thumbnails: section(text, thumbnails, Some(image_prompt))
            .map(list_items)
            .unwrap_or_default(),
        image_prompt: section(text, image_prompt, None)
            .map(|body| trim_text(body).to_string())
            .unwrap_or_default(),
    }
}

/// Body between the first `open` match and the next `close` match after it.
fn section<'a>(text: &'a str, open: &Regex, close: Option<&Regex>) -> Option<&'a str> {
    let start = open.find(text)?;
    let rest = &text[start.end()..];
    let end = close
        .and_then(|re| re.find(rest))
        .map_or(rest.len(), |m| m.start());
    Some(&rest[..end])
}

/// Whitespace trim that also drops byte-order marks.
fn trim_text(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// Non-blank lines with any leading `N.` ordinal removed.
fn list_items(body: &str) -> Vec<String> {
    body.split('\n')
        .filter(|line| !trim_text(line).is_empty())
        .map(|line| trim_text(&LIST_PREFIX.replace(line, "")).to_string())
        .filter(|line| !line.is_empty())
        .collect()
}
