/// Chapter lookup coordinator: search, disambiguate, then load chapters
use super::scraper::{ChapterDbScraper, HttpFetcher, PageFetcher};
use super::MovieResult;
use crate::config::LookupConfig;
use crate::error::Result;
use crate::prompt::Prompt;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::info;

/// Runs a complete title → chapters lookup
pub struct ChapterLookup<F = HttpFetcher> {
    scraper: ChapterDbScraper<F>,
}

impl ChapterLookup<HttpFetcher> {
    /// Create a lookup against the configured ChapterDB
    pub fn new(config: &LookupConfig) -> Result<Self> {
        Ok(Self {
            scraper: ChapterDbScraper::new(config)?,
        })
    }
}

impl<F: PageFetcher> ChapterLookup<F> {
    pub fn with_scraper(scraper: ChapterDbScraper<F>) -> Self {
        Self { scraper }
    }

    pub fn scraper(&self) -> &ChapterDbScraper<F> {
        &self.scraper
    }

    /// Search for a title and let the user pick a candidate
    pub async fn search<R, W>(&self, title: &str, prompt: &mut Prompt<R, W>) -> Result<Option<MovieResult>>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let candidates = self.scraper.search(title).await?;
        prompt.choose(candidates).await
    }

    /// Search, select and populate the chosen movie's chapters.
    ///
    /// Returns `None` when ChapterDB has no match; nothing else is fetched
    /// in that case.
    pub async fn get_chapters<R, W>(&self, title: &str, prompt: &mut Prompt<R, W>) -> Result<Option<MovieResult>>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let Some(mut movie) = self.search(title, prompt).await? else {
            info!("📭 No movies found for '{}'", title);
            return Ok(None);
        };

        info!("🎬 Selected: {} (id {})", movie.title, movie.movie_id);
        self.scraper.fetch_chapters(&mut movie).await?;
        Ok(Some(movie))
    }
}
