use anyhow::Context;
use log::{debug, error, info};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::configuration::{RunOptions, Settings};
use crate::fetch::{parse_url, Fetch, HttpFetcher};
use crate::manga::Manga;
use crate::pipeline::{ArchivalPipeline, ArchiveOutcome};
use crate::router;
use crate::sites::SiteAdapter;

/// One manga to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub url: String,
    pub name: Option<String>,
}

impl Target {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: None,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub mangas: usize,
    pub mangas_failed: usize,
    pub chapters_archived: usize,
    pub chapters_skipped: usize,
    pub chapters_failed: usize,
    pub unsupported: usize,
}

pub async fn run(
    settings: Settings,
    targets: Vec<Target>,
    options: RunOptions,
) -> anyhow::Result<RunSummary> {
    let base_path = settings.output_path();
    info!("Output Directory: {}", base_path.display());
    if !options.dry_run {
        fs::create_dir_all(&base_path)
            .with_context(|| format!("creating {}", base_path.display()))?;
    }

    let fetcher = HttpFetcher::new(settings.retries, settings.user_agent.as_deref())?;
    let summary = run_with(&fetcher, &base_path, targets, options).await;

    info!("Finished!");
    Ok(summary)
}

/// Processes every target in order. Failures are logged and never stop the
/// remaining chapters or mangas.
pub async fn run_with<F: Fetch>(
    fetcher: &F,
    base_path: &Path,
    targets: Vec<Target>,
    options: RunOptions,
) -> RunSummary {
    let mut summary = RunSummary::default();

    for target in targets.into_iter().filter(|t| !t.url.trim().is_empty()) {
        info!("Checking: {}", target.url);
        let site = match router::route(&target.url) {
            Ok(site) => site,
            Err(e) => {
                error!("{}", e);
                summary.unsupported += 1;
                continue;
            }
        };

        let url = match parse_url(&target.url) {
            Ok(url) => url,
            Err(e) => {
                error!("{}", e);
                summary.mangas_failed += 1;
                continue;
            }
        };

        let manga =
            Manga::discover(fetcher, site, url, target.name, base_path, &options).await;
        let mut manga = match manga {
            Ok(manga) => manga,
            Err(e) => {
                error!("Unable to retrieve {}: {}, skipping", target.url, e);
                summary.mangas_failed += 1;
                continue;
            }
        };

        summary.mangas += 1;
        download_chapters(fetcher, site, &mut manga, &options, &mut summary).await;
    }

    summary
}

async fn download_chapters<F: Fetch>(
    fetcher: &F,
    site: &dyn SiteAdapter,
    manga: &mut Manga,
    options: &RunOptions,
    summary: &mut RunSummary,
) {
    let pipeline = ArchivalPipeline::new(fetcher, site);
    let total = manga.chapters.len();
    let mut downloaded = 0;

    for chapter in manga.chapters.iter_mut() {
        debug!(
            "Vol: {:?} Ch: {} - {:?}, by: {:?}",
            chapter.metadata.volume_number,
            chapter.metadata.chapter_number,
            chapter.metadata.title,
            chapter.metadata.group_name
        );
        progress(downloaded, total);

        if options.dry_run {
            info!("Would download {}", chapter.prefix());
            continue;
        }

        info!("{}", chapter.dir_path().display());
        match pipeline.archive(chapter).await {
            Ok(ArchiveOutcome::Completed { .. }) => {
                summary.chapters_archived += 1;
                downloaded += 1;
            }
            Ok(ArchiveOutcome::Skipped) => {
                summary.chapters_skipped += 1;
                downloaded += 1;
            }
            Err(e) => {
                error!("Error creating chapter {}: {}", chapter.archive_path().display(), e);
                summary.chapters_failed += 1;
            }
        }
    }

    progress(downloaded, total);
    println!();
}

fn progress(downloaded: usize, total: usize) {
    print!("\rDownloaded {}/{} chapters.", downloaded, total);
    let _ = io::stdout().flush();
}
