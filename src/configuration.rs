use config::{Config, ConfigError, Environment, File};
use resolve_path::PathResolveExt;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Deserialize, Debug)]
pub struct Settings {
    pub output_directory: String,
    pub retries: u32,
    pub user_agent: Option<String>,
}

impl Settings {
    pub fn new(config_file: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("output_directory", ".")?
            .set_default("retries", 4)?
            .add_source(File::with_name(config_file).required(false))
            .add_source(Environment::with_prefix("MANGADL"))
            .build()?;
        builder.try_deserialize()
    }

    /// Output directory with `~` expanded.
    pub fn output_path(&self) -> PathBuf {
        self.output_directory.resolve().into_owned()
    }
}

/// Mode switches for one invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Verbose logging.
    pub debug: bool,
    /// Discover only, write nothing.
    pub dry_run: bool,
    /// Progress details.
    pub verbose: bool,
}

impl RunOptions {
    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}
