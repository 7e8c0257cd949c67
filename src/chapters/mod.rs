/// Chapter lookup module
///
/// Looks up movie chapters on ChapterDB: the search grid yields candidate
/// movies, the browse page of the chosen movie yields its chapter table.

pub mod chapter;
pub mod lookup;
pub mod markup;
pub mod movie;
pub mod scraper;

// Re-export main types
pub use chapter::Chapter;
pub use lookup::ChapterLookup;
pub use markup::{ChapterRow, QualitySignals};
pub use movie::{MovieResult, DEFAULT_OUTPUT_SUFFIX};
pub use scraper::{ChapterDbScraper, HttpFetcher, PageFetcher};
