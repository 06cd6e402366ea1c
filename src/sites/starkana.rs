use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use url::Url;

use super::{join_attr, last_segment, selector, ChapterLink, SiteAdapter};
use crate::error::{Error, Result};
use crate::models::{ChapterMetadata, ChapterNumber, Page};

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(https?://)?(www\.)?starkana\.com/manga/[0A-Z]/.+").unwrap());

pub struct Starkana;

impl Starkana {
    pub fn new() -> Self {
        Starkana
    }
}

impl Default for Starkana {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteAdapter for Starkana {
    fn name(&self) -> &'static str {
        "Starkana"
    }

    fn matches(&self, url: &str) -> bool {
        URL_PATTERN.is_match(url)
    }

    fn manga_name(&self, index: &Html) -> Option<String> {
        index
            .select(&selector(r#"meta[property="og:title"]"#))
            .next()
            .and_then(|meta| meta.value().attr("content"))
            .map(|content| content.trim().to_string())
            .filter(|name| !name.is_empty())
    }

    /// Download links only; the heading is the chapter number in the href.
    fn list_chapters(&self, index: &Html, base: &Url) -> Vec<ChapterLink> {
        index
            .select(&selector("a.download-link"))
            .filter_map(|a| join_attr(a, "href", base))
            .map(|url| ChapterLink {
                heading: last_segment(&url).unwrap_or_default(),
                url,
                group_name: None,
            })
            .collect()
    }

    fn chapter_metadata(&self, link: &ChapterLink) -> Result<ChapterMetadata> {
        let number = link.heading.trim();
        if number.is_empty() {
            return Err(Error::UnparsableHeading(link.heading.clone()));
        }
        Ok(ChapterMetadata {
            volume_number: None,
            chapter_number: ChapterNumber::new(number),
            title: None,
            group_name: None,
        })
    }

    fn list_pages(&self, chapter: &Html, base: &Url) -> Vec<Page> {
        chapter
            .select(&selector("#page_switch"))
            .next()
            .map(|switch| {
                switch
                    .select(&selector("option[value]"))
                    .filter_map(|option| join_attr(option, "value", base))
                    .map(Page::new)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn page_image(&self, viewer: &Html, base: &Url) -> Option<Url> {
        viewer
            .select(&selector("#pic > div > img"))
            .next()
            .and_then(|img| join_attr(img, "src", base))
    }

    // Viewer pages always have to be fetched, even when the path looks like a file
    fn is_direct_image(&self, _page: &Page) -> bool {
        false
    }
}
