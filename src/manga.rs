use log::{debug, error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::configuration::RunOptions;
use crate::error::{Error, Result};
use crate::fetch::{parse_document, Fetch};
use crate::models::Chapter;
use crate::sanitize::sanitize_name;
use crate::sites::SiteAdapter;

/// Sidecar file recording the URL a manga folder was discovered from.
pub const LINK_FILE: &str = "mangadl.link";

pub struct Manga {
    pub name: String,
    pub url: Url,
    pub root: PathBuf,
    /// Ascending reading order.
    pub chapters: Vec<Chapter>,
}

impl Manga {
    /// Fetches the index page, resolves the name, creates the manga folder
    /// with its link file and builds the chapter list.
    pub async fn discover<F: Fetch>(
        fetcher: &F,
        site: &dyn SiteAdapter,
        url: Url,
        name: Option<String>,
        output_directory: &Path,
        options: &RunOptions,
    ) -> Result<Manga> {
        let text = fetcher.fetch_text(&url).await?;

        let (name, mut links) = {
            let index = parse_document(&text);
            let name = name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .or_else(|| site.manga_name(&index))
                .or_else(|| site.name_from_url(&url));
            (name, site.list_chapters(&index, &url))
        };
        let name = name.ok_or_else(|| {
            Error::Discovery(format!("could not resolve a manga name for {}", url))
        })?;
        info!("Set name to: {}", name);

        let root = output_directory.join(sanitize_name(&format!("{} - {}", site.name(), name)));
        if !options.dry_run {
            create_folder(&root, &url)?;
        }

        // Sites list the most recent chapter first
        links.reverse();
        let mut chapters = Vec::with_capacity(links.len());
        for link in links {
            match site.chapter_metadata(&link) {
                Ok(metadata) => {
                    debug!("Added chapter {}", metadata.chapter_number);
                    chapters.push(Chapter::new(metadata, link.url, &name, &root));
                }
                Err(e) => error!("Skipping chapter at {}: {}", link.url, e),
            }
        }

        if chapters.is_empty() {
            return Err(Error::Discovery(format!("no chapters found on {}", url)));
        }

        Ok(Manga {
            name,
            url,
            root,
            chapters,
        })
    }
}

fn create_folder(root: &Path, url: &Url) -> Result<()> {
    fs::create_dir_all(root)?;
    fs::write(root.join(LINK_FILE), url.as_str())?;
    Ok(())
}

/// URL recorded in `dir`, if the folder has a link file.
pub fn read_link(dir: &Path) -> Result<Option<String>> {
    let path = dir.join(LINK_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    let url = fs::read_to_string(path)?.trim().to_string();
    Ok((!url.is_empty()).then_some(url))
}

/// Collects the URLs to reload from the manga folders under `root`.
///
/// Folders without a link file that still hold chapters are passed to
/// `prompt`, which may supply the URL or skip the folder.
pub fn scan_reload<P>(root: &Path, mut prompt: P) -> Result<Vec<String>>
where
    P: FnMut(&Path) -> Option<String>,
{
    let mut dirs: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    let mut urls = Vec::new();
    for dir in dirs {
        match read_link(&dir) {
            Ok(Some(url)) => {
                urls.push(url);
                continue;
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Skipping folder {}: {}", dir.display(), e);
                continue;
            }
        }

        match holds_chapters(&dir) {
            Ok(true) => {
                if let Some(url) = prompt(&dir).map(|u| u.trim().to_string()) {
                    if !url.is_empty() {
                        urls.push(url);
                    }
                }
            }
            Ok(false) => {}
            Err(e) => warn!("Skipping folder {}: {}", dir.display(), e),
        }
    }
    Ok(urls)
}

fn holds_chapters(dir: &Path) -> Result<bool> {
    for entry in fs::read_dir(dir)? {
        let name = entry?.file_name();
        if name.to_string_lossy().contains(" Chapter ") {
            return Ok(true);
        }
    }
    Ok(false)
}
