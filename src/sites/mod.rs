pub mod batoto;
pub mod starkana;

pub use batoto::Batoto;
pub use starkana::Starkana;

use log::debug;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{Error, Result};
use crate::fetch::{parse_document, Fetch};
use crate::models::{ChapterMetadata, Page};
use crate::title;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// One chapter entry as found on an index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterLink {
    pub heading: String,
    pub url: Url,
    pub group_name: Option<String>,
}

/// Site specific knowledge: which URLs belong to the site and where chapters,
/// pages and images live in its markup.
///
/// Adapters never touch the network; they work on documents fetched for them.
pub trait SiteAdapter: Send + Sync {
    /// Name used for the manga folder, `<name> - <manga>`.
    fn name(&self) -> &'static str;

    /// Whether `url` is an index page of this site.
    fn matches(&self, url: &str) -> bool;

    fn manga_name(&self, index: &Html) -> Option<String>;

    /// Name derived from the index URL when the page has none.
    fn name_from_url(&self, url: &Url) -> Option<String> {
        last_segment(url)
            .map(|s| s.replace('_', " ").trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Chapter entries in document order.
    fn list_chapters(&self, index: &Html, base: &Url) -> Vec<ChapterLink>;

    fn chapter_metadata(&self, link: &ChapterLink) -> Result<ChapterMetadata> {
        let mut metadata = title::parse(&link.heading)?;
        metadata.group_name = link.group_name.as_deref().and_then(title::group_name);
        Ok(metadata)
    }

    /// Page locators of one chapter in reading order.
    fn list_pages(&self, chapter: &Html, base: &Url) -> Vec<Page>;

    /// Image embedded in a viewer page.
    fn page_image(&self, viewer: &Html, base: &Url) -> Option<Url>;

    fn is_direct_image(&self, page: &Page) -> bool {
        page.url
            .path()
            .rsplit_once('.')
            .map(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false)
    }
}

/// Returns the image URL behind `page`, fetching its viewer page if needed.
pub async fn resolve_page_image<F: Fetch>(
    adapter: &dyn SiteAdapter,
    fetcher: &F,
    page: &Page,
) -> Result<Url> {
    if adapter.is_direct_image(page) {
        return Ok(page.url.clone());
    }

    debug!("Resolving image on viewer page {}", page.url);
    let text = fetcher.fetch_text(&page.url).await?;
    let document = parse_document(&text);
    adapter
        .page_image(&document, &page.url)
        .ok_or_else(|| Error::MissingImage(page.url.clone()))
}

pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap()
}

pub(crate) fn text_of(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

pub(crate) fn join_attr(element: ElementRef, attr: &str, base: &Url) -> Option<Url> {
    element
        .value()
        .attr(attr)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| base.join(value).ok())
}

pub(crate) fn last_segment(url: &Url) -> Option<String> {
    url.path_segments()?
        .filter(|s| !s.is_empty())
        .last()
        .map(String::from)
}
