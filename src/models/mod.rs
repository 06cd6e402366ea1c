pub mod chapter;
pub mod cli;

pub use chapter::{Chapter, ChapterMetadata, ChapterNumber, Page};
pub use cli::Cli;
