pub mod cbz;
pub mod configuration;
pub mod error;
pub mod fetch;
pub mod manga;
pub mod models;
pub mod pipeline;
pub mod router;
pub mod run;
pub mod sanitize;
pub mod sites;
pub mod title;

pub use configuration::{RunOptions, Settings};
pub use error::{Error, FetchError, Result};
pub use models::Cli;
pub use run::{run, RunSummary, Target};
