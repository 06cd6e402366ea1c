use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

use crate::sanitize::sanitize_name;

/// Chapter index as printed by the site: `12`, `13.5v2`, `-1`, `4(Fixed)`.
///
/// Kept verbatim. Ordering compares the leading number first and falls back
/// to the text for suffixes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChapterNumber(String);

impl ChapterNumber {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn split_numeric(&self) -> (Option<f64>, &str) {
        let s = self.0.as_str();
        let bytes = s.as_bytes();
        let mut end = 0;
        if bytes.first() == Some(&b'-') {
            end = 1;
        }
        let digits_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end == digits_start {
            return (None, s);
        }
        if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
            end += 1;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
        }
        (s[..end].parse().ok(), &s[end..])
    }
}

impl fmt::Display for ChapterNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Ord for ChapterNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, a_suffix) = self.split_numeric();
        let (b, b_suffix) = other.split_numeric();
        let numeric = match (a, b) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        numeric
            .then_with(|| a_suffix.cmp(b_suffix))
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for ChapterNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterMetadata {
    pub volume_number: Option<String>,
    pub chapter_number: ChapterNumber,
    pub title: Option<String>,
    pub group_name: Option<String>,
}

/// Locator of one page: either the image itself or a viewer page embedding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub url: Url,
}

impl Page {
    pub fn new(url: Url) -> Self {
        Self { url }
    }
}

#[derive(Debug, Clone)]
pub struct Chapter {
    pub metadata: ChapterMetadata,
    pub url: Url,
    pub pages: Vec<Page>,
    manga_name: String,
    root: PathBuf,
}

impl Chapter {
    pub fn new(metadata: ChapterMetadata, url: Url, manga_name: &str, root: &Path) -> Self {
        Self {
            metadata,
            url,
            pages: Vec::new(),
            manga_name: manga_name.to_string(),
            root: root.to_path_buf(),
        }
    }

    /// `<manga> [Volume N] Chapter N [- title] [[group]]`
    pub fn prefix(&self) -> String {
        let meta = &self.metadata;
        let mut prefix = vec![self.manga_name.clone()];
        if let Some(volume) = &meta.volume_number {
            prefix.push(format!("Volume {}", volume));
        }
        prefix.push(format!("Chapter {}", meta.chapter_number));
        if let Some(title) = &meta.title {
            prefix.push(format!("- {}", title));
        }
        if let Some(group) = &meta.group_name {
            prefix.push(format!("[{}]", group));
        }
        prefix.join(" ")
    }

    /// Working directory the pages are downloaded into.
    pub fn dir_path(&self) -> PathBuf {
        self.root.join(sanitize_name(&self.prefix()))
    }

    pub fn archive_path(&self) -> PathBuf {
        self.root.join(format!("{}.zip", sanitize_name(&self.prefix())))
    }
}
