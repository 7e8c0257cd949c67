/// Chapter Lookup
///
/// Finds movie chapter lists on ChapterDB (https://chapterdb.plex.tv), lets
/// the user choose among matching entries, and merges the chapters into a
/// Matroska file through mkvmerge.

pub mod chapters;
pub mod config;
pub mod error;
pub mod mux;
pub mod prompt;

// Re-export main types for easy access
pub use crate::chapters::{Chapter, ChapterDbScraper, ChapterLookup, MovieResult, PageFetcher};
pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{ChapterLookupError, Result};
pub use crate::mux::Muxer;
pub use crate::prompt::{Prompt, TerminalPrompt};
