use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::cbz;
use crate::error::{Error, Result};
use crate::fetch::{parse_document, Fetch};
use crate::models::{Chapter, Page};
use crate::sites::{resolve_page_image, SiteAdapter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveOutcome {
    Completed { pages: usize },
    /// A verified archive was already on disk.
    Skipped,
}

/// Turns a chapter's pages into `<prefix>.zip` under the manga folder.
pub struct ArchivalPipeline<'a, F> {
    fetcher: &'a F,
    site: &'a dyn SiteAdapter,
}

impl<'a, F: Fetch> ArchivalPipeline<'a, F> {
    pub fn new(fetcher: &'a F, site: &'a dyn SiteAdapter) -> Self {
        Self { fetcher, site }
    }

    pub async fn archive(&self, chapter: &mut Chapter) -> Result<ArchiveOutcome> {
        let dir_path = chapter.dir_path();
        let zip_path = chapter.archive_path();
        debug!("Chapter directory {}", dir_path.display());

        if zip_path.exists() {
            match cbz::verify(&zip_path) {
                Ok(_) => {
                    debug!("Skipping chapter {}", chapter.metadata.chapter_number);
                    return Ok(ArchiveOutcome::Skipped);
                }
                Err(e) => {
                    warn!("{}, downloading it again", e);
                    fs::remove_file(&zip_path)?;
                }
            }
        }

        // Leftovers of an interrupted run
        if dir_path.exists() {
            fs::remove_dir_all(&dir_path)?;
        }
        let work_dir = WorkDir::create(dir_path)?;

        chapter.pages = self.list_pages(&chapter.url).await?;

        let total = chapter.pages.len();
        for (i, page) in chapter.pages.iter().enumerate() {
            let image_url = resolve_page_image(self.site, self.fetcher, page).await?;
            let page_name = page_file_name(i + 1, total, &extension(&image_url));
            debug!("Getting page #{}: {}", i + 1, image_url);
            let bytes = self.fetcher.fetch_bytes(&image_url).await?;
            fs::write(work_dir.path().join(&page_name), bytes)?;
        }

        let pages = cbz::write_dir(work_dir.path(), &zip_path)?;
        work_dir.close()?;
        info!("Wrote {} ({} pages)", zip_path.display(), pages);
        Ok(ArchiveOutcome::Completed { pages })
    }

    async fn list_pages(&self, url: &Url) -> Result<Vec<Page>> {
        let text = self.fetcher.fetch_text(url).await?;
        let document = parse_document(&text);
        let pages = self.site.list_pages(&document, url);
        if pages.is_empty() {
            return Err(Error::NoPages(url.clone()));
        }
        Ok(pages)
    }
}

/// `p001.jpg` style name, widened so names sort in reading order when a
/// chapter has more than 999 pages.
fn page_file_name(number: usize, total: usize, ext: &str) -> String {
    let width = total.to_string().len().max(3);
    format!("p{:0width$}.{}", number, ext, width = width)
}

/// File extension of the image behind `url`, `jpg` when it has none.
fn extension(url: &Url) -> String {
    Path::new(url.path())
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| "jpg".to_string())
}

/// Working directory removed on drop, so no exit path leaves it behind.
struct WorkDir {
    path: PathBuf,
    closed: bool,
}

impl WorkDir {
    fn create(path: PathBuf) -> Result<Self> {
        fs::create_dir_all(&path)?;
        Ok(Self {
            path,
            closed: false,
        })
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn close(mut self) -> Result<()> {
        self.closed = true;
        fs::remove_dir_all(&self.path)?;
        Ok(())
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        if !self.closed {
            let _ = fs::remove_dir_all(&self.path);
        }
    }
}
