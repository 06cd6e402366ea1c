use clap::Parser;

use crate::configuration::RunOptions;

/// Download manga chapters from collection sites.
#[derive(clap::Parser, Debug)]
#[command(name = "mangadl", version)]
pub struct Cli {
    /// Index page of the manga; asked for when no other source is given
    #[arg(conflicts_with_all = ["reload", "update"])]
    pub url: Option<String>,

    /// Manga name to use instead of the one found on the page
    #[arg(short, long, requires = "url")]
    pub name: Option<String>,

    /// Update all manga folders in the output directory
    #[arg(short, long, conflicts_with = "update")]
    pub reload: bool,

    /// Update the manga at the url(s) provided
    #[arg(short, long)]
    pub update: Vec<String>,

    /// Run in debug mode
    #[arg(short = 'D', long)]
    pub debug: bool,

    /// Run in test mode (downloads suppressed)
    #[arg(short = 'T', long = "test", visible_alias = "dry-run")]
    pub dry_run: bool,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,

    #[arg(short, long, default_value = "mangadl")]
    pub config_file: String,
}

impl Cli {
    pub fn new() -> Self {
        Cli::parse()
    }

    pub fn options(&self) -> RunOptions {
        RunOptions {
            debug: self.debug,
            dry_run: self.dry_run,
            verbose: self.verbose,
        }
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self::new()
    }
}
