#![allow(dead_code)]

use async_trait::async_trait;
use mangadl::fetch::Fetch;
use mangadl::FetchError;
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

pub const INDEX_URL: &str = "http://www.batoto.net/comic/_/comics/nonscale-r12295";

/// Serves canned responses; unknown URLs answer 404.
#[derive(Default)]
pub struct MemoryFetcher {
    responses: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.insert(url, body);
        self
    }

    pub fn insert(&mut self, url: &str, body: impl Into<Vec<u8>>) {
        let key = Url::parse(url).unwrap().to_string();
        self.responses.insert(key, body.into());
    }

    pub fn remove(&mut self, url: &str) {
        let key = Url::parse(url).unwrap().to_string();
        self.responses.remove(&key);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn reset_requests(&self) {
        self.requests.lock().unwrap().clear();
    }
}

#[async_trait]
impl Fetch for MemoryFetcher {
    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.responses
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.clone(),
                status: reqwest::StatusCode::NOT_FOUND,
            })
    }
}

/// Index page listing chapters 1, 2 and 3, most recent first.
pub fn index_html() -> String {
    r#"<html><body>
<h1 class="ipsType_pagetitle">Nonscale</h1>
<table class="ipb_table chapters_list"><tbody>
  <tr class="header"><th>Chapter</th><th>Language</th><th>Group</th></tr>
  <tr class="row lang_English chapter_row">
    <td><a href="/read/_/3/nonscale_ch3">Vol. 1 Ch. 3: Finale</a></td><td>English</td>
    <td><a href="/group/_/easy">Easy Going</a></td>
  </tr>
  <tr class="row lang_English chapter_row">
    <td><a href="/read/_/2/nonscale_ch2">Vol. 1 Ch. 2: Long/Strip</a></td><td>English</td>
    <td><a href="/group/_/easy">Easy Going</a></td>
  </tr>
  <tr class="row lang_French chapter_row">
    <td><a href="/read/_/20/nonscale_ch2_fr">Vol. 1 Ch. 2: Bande</a></td><td>French</td>
    <td><a href="/group/_/fr">Equipe</a></td>
  </tr>
  <tr class="row lang_English chapter_row">
    <td><a href="/read/_/1/nonscale_ch1">Vol. 1 Ch. 1: Start</a></td><td>English</td>
    <td><a href="/group/_/easy">Easy Going</a></td>
  </tr>
</tbody></table>
</body></html>"#
        .to_string()
}

/// Paged chapter whose viewer pages embed the images.
pub fn paged_chapter_html(chapter: u32, pages: u32) -> String {
    let options: String = (1..=pages)
        .map(|p| {
            format!(
                r#"<option value="http://www.batoto.net/read/_/{chapter}/nonscale_ch{chapter}/{p}">page {p}</option>"#
            )
        })
        .collect();
    format!(r#"<html><body><select id="page_select">{options}</select></body></html>"#)
}

pub fn viewer_html(src: &str) -> String {
    format!(r#"<html><body><img id="comic_page" src="{src}"></body></html>"#)
}

/// A site with chapter 1 paged (3 pages), chapter 2 long strip (2 pages) and
/// chapter 3 paged (1 page).
pub fn batoto_site() -> MemoryFetcher {
    let mut fetcher = MemoryFetcher::new().with(INDEX_URL, index_html());

    fetcher.insert("http://www.batoto.net/read/_/1/nonscale_ch1", paged_chapter_html(1, 3));
    let images = ["a.jpg", "b.png", "c.jpg"];
    for (p, image) in images.iter().enumerate() {
        let p = p + 1;
        fetcher.insert(
            &format!("http://www.batoto.net/read/_/1/nonscale_ch1/{p}"),
            viewer_html(&format!("/img/1/{image}")),
        );
        fetcher.insert(
            &format!("http://www.batoto.net/img/1/{image}"),
            format!("image {image}"),
        );
    }

    fetcher.insert(
        "http://www.batoto.net/read/_/2/nonscale_ch2",
        r#"<html><body>
<a href="?supress_webtoon=t">Page by page</a>
<div id="read_settings"></div>
<div><img src="http://img.batoto.net/2/strip1.png"></div>
<div><img src="http://img.batoto.net/2/strip2.png"></div>
</body></html>"#,
    );
    fetcher.insert("http://img.batoto.net/2/strip1.png", "strip 1");
    fetcher.insert("http://img.batoto.net/2/strip2.png", "strip 2");

    fetcher.insert("http://www.batoto.net/read/_/3/nonscale_ch3", paged_chapter_html(3, 1));
    fetcher.insert(
        "http://www.batoto.net/read/_/3/nonscale_ch3/1",
        viewer_html("http://img.batoto.net/3/end.jpg"),
    );
    fetcher.insert("http://img.batoto.net/3/end.jpg", "the end");

    fetcher
}
