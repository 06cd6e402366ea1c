use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use url::Url;

use super::{join_attr, last_segment, selector, text_of, ChapterLink, SiteAdapter};
use crate::models::Page;

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?://)?(www\.)?(batoto\.net|bato\.to)/.+-r[0-9]+(/|\?|#|$)").unwrap()
});

static ID_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"-r[0-9]+$").unwrap());

const WEBTOON_OPT_OUT: &str = "?supress_webtoon=t";

pub struct Batoto;

impl Batoto {
    pub fn new() -> Self {
        Batoto
    }
}

impl Default for Batoto {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteAdapter for Batoto {
    fn name(&self) -> &'static str {
        "Batoto"
    }

    fn matches(&self, url: &str) -> bool {
        URL_PATTERN.is_match(url)
    }

    fn manga_name(&self, index: &Html) -> Option<String> {
        index
            .select(&selector("h1.ipsType_pagetitle"))
            .next()
            .map(text_of)
            .filter(|name| !name.is_empty())
    }

    fn name_from_url(&self, url: &Url) -> Option<String> {
        let segment = last_segment(url)?;
        let name = ID_SUFFIX.replace(&segment, "").replace(['-', '_'], " ");
        let name = name.trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    fn list_chapters(&self, index: &Html, base: &Url) -> Vec<ChapterLink> {
        let rows = selector("table.chapters_list > tbody > tr");
        let cell = selector("td");
        let link = selector("a");

        // First row is the table header
        index
            .select(&rows)
            .skip(1)
            .filter(|row| {
                let classes: Vec<&str> = row.value().classes().collect();
                classes.contains(&"lang_English") && classes.contains(&"chapter_row")
            })
            .filter_map(|row| {
                let cells: Vec<_> = row.select(&cell).collect();
                let chapter_a = cells.first()?.select(&link).next()?;
                let url = join_attr(chapter_a, "href", base)?;
                let group_name = cells
                    .get(2)
                    .and_then(|cell| cell.select(&link).next())
                    .map(text_of);
                Some(ChapterLink {
                    heading: text_of(chapter_a),
                    url,
                    group_name,
                })
            })
            .collect()
    }

    fn list_pages(&self, chapter: &Html, base: &Url) -> Vec<Page> {
        let webtoon = chapter
            .select(&selector("a[href]"))
            .any(|a| a.value().attr("href") == Some(WEBTOON_OPT_OUT));

        if webtoon {
            debug!("Webtoon: reading in long strip format");
            return chapter
                .select(&selector("#read_settings ~ div > img"))
                .filter_map(|img| join_attr(img, "src", base))
                .map(Page::new)
                .collect();
        }

        let Some(page_select) = chapter.select(&selector("#page_select")).next() else {
            return Vec::new();
        };
        page_select
            .select(&selector("option[value]"))
            .filter_map(|option| join_attr(option, "value", base))
            .map(Page::new)
            .collect()
    }

    fn page_image(&self, viewer: &Html, base: &Url) -> Option<Url> {
        viewer
            .select(&selector("#comic_page"))
            .next()
            .and_then(|img| join_attr(img, "src", base))
    }
}
