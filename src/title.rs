//! Volume, chapter and title extraction from free-form chapter headings such
//! as `Vol. 2 Ch. 13.5v2: Aftermath` or `Ch. -1: Prologue`.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::{Error, Result};
use crate::models::{ChapterMetadata, ChapterNumber};
use crate::sanitize::strip_separators;

static CHECK_VOLUME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Vol\.").unwrap());

static WITH_VOLUME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^Vol\.\s*(?P<volume>[0-9]+|Extra)\s*Ch[.\s]\s*(?P<chapter>[0-9.vA-Za-z\-()]+)(?::\s*|\s+|$)(?P<title>.*)$",
    )
    .unwrap()
});

static NO_VOLUME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Ch[.\s]\s*(?P<chapter>[0-9.vA-Za-z\-()]+)(?::\s*|\s+|$)(?P<title>.*)$").unwrap()
});

/// Parses a chapter heading. The chapter number is the only mandatory part.
pub fn parse(raw_heading: &str) -> Result<ChapterMetadata> {
    // Separators never survive into a path, not even inside the chapter token
    let heading = strip_separators(raw_heading);
    let heading = heading.as_str();

    let captures = if CHECK_VOLUME.is_match(heading) {
        WITH_VOLUME.captures(heading)
    } else {
        NO_VOLUME.captures(heading)
    };
    let captures =
        captures.ok_or_else(|| Error::UnparsableHeading(raw_heading.to_string()))?;

    let chapter = captures
        .name("chapter")
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::UnparsableHeading(raw_heading.to_string()))?;

    Ok(ChapterMetadata {
        volume_number: captures.name("volume").map(|m| m.as_str().to_string()),
        chapter_number: ChapterNumber::new(chapter),
        title: optional_field(&captures, "title"),
        group_name: None,
    })
}

/// Cleans a group name scraped next to the heading. Empty names are absent.
pub fn group_name(raw: &str) -> Option<String> {
    let cleaned = strip_separators(raw);
    (!cleaned.is_empty()).then_some(cleaned)
}

fn optional_field(captures: &Captures, name: &str) -> Option<String> {
    captures
        .name(name)
        .map(|m| strip_separators(m.as_str()))
        .filter(|s| !s.is_empty())
}
