/// ChapterDB web scraper
use super::markup::{parse_chapter_rows, parse_search_results};
use super::MovieResult;
use crate::config::LookupConfig;
use crate::error::{ChapterLookupError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Fetches a page body for a URL
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String>;
}

/// reqwest-backed fetcher
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with a request timeout and user agent
    pub fn new(timeout_seconds: u64, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(ChapterLookupError::HttpStatus {
                status: response.status(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        debug!("📄 Downloaded {} characters of HTML content", body.len());
        Ok(body)
    }
}

/// ChapterDB scraper: search grid and per-movie chapter tables
pub struct ChapterDbScraper<F = HttpFetcher> {
    fetcher: F,
    base_url: Url,
}

impl ChapterDbScraper<HttpFetcher> {
    /// Create a scraper talking to ChapterDB over HTTP
    pub fn new(config: &LookupConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.request_timeout_seconds, &config.user_agent)?;
        Self::with_fetcher(fetcher, &config.base_url)
    }
}

impl<F: PageFetcher> ChapterDbScraper<F> {
    /// Create a scraper on top of any page fetcher
    pub fn with_fetcher(fetcher: F, base_url: &str) -> Result<Self> {
        Ok(Self {
            fetcher,
            base_url: Url::parse(base_url)?,
        })
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// `<base>/grid?Criteria.Title=<escaped title>`
    pub fn search_url(&self, title: &str) -> Result<Url> {
        let mut url = self.base_url.join("grid")?;
        url.set_query(Some(&format!("Criteria.Title={}", urlencoding::encode(title))));
        Ok(url)
    }

    /// `<base>/browse/<id>`
    pub fn browse_url(&self, movie_id: u64) -> Result<Url> {
        Ok(self.base_url.join(&format!("browse/{}", movie_id))?)
    }

    /// Search ChapterDB for a title. Results carry metadata only.
    pub async fn search(&self, title: &str) -> Result<Vec<MovieResult>> {
        info!("🔍 Searching ChapterDB for: {}", title);

        let url = self.search_url(title)?;
        let html = self.fetcher.fetch(&url).await?;
        let results = parse_search_results(&html)?;

        info!("📚 Found {} candidate(s) for '{}'", results.len(), title);
        Ok(results)
    }

    /// Populate a selected movie with its chapter table
    pub async fn fetch_chapters(&self, movie: &mut MovieResult) -> Result<()> {
        info!("📄 Fetching chapters for {} (id {})", movie.title, movie.movie_id);

        let url = self.browse_url(movie.movie_id)?;
        let html = self.fetcher.fetch(&url).await?;

        for row in parse_chapter_rows(&html)? {
            movie.add_chapter(row.name, row.time, row.number);
        }

        info!("✅ Extracted {} chapters", movie.chapters.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned pages and records requested URLs
    struct CannedFetcher {
        pages: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PageFetcher for CannedFetcher {
        async fn fetch(&self, url: &Url) -> Result<String> {
            self.requested.lock().unwrap().push(url.to_string());
            self.pages.get(url.as_str()).cloned().ok_or_else(|| ChapterLookupError::HttpStatus {
                status: reqwest::StatusCode::NOT_FOUND,
                url: url.to_string(),
            })
        }
    }

    fn scraper(pages: &[(&str, &str)]) -> ChapterDbScraper<CannedFetcher> {
        let fetcher = CannedFetcher {
            pages: pages.iter().map(|(u, p)| (u.to_string(), p.to_string())).collect(),
            requested: Mutex::new(Vec::new()),
        };
        ChapterDbScraper::with_fetcher(fetcher, "https://chapterdb.example").unwrap()
    }

    #[test]
    fn test_search_url_escapes_title() {
        let scraper = scraper(&[]);
        assert_eq!(
            scraper.search_url("Example Movie & Co").unwrap().as_str(),
            "https://chapterdb.example/grid?Criteria.Title=Example%20Movie%20%26%20Co"
        );
    }

    #[test]
    fn test_browse_url() {
        let scraper = scraper(&[]);
        assert_eq!(
            scraper.browse_url(1234).unwrap().as_str(),
            "https://chapterdb.example/browse/1234"
        );
    }

    #[tokio::test]
    async fn test_fetch_chapters_populates_movie() {
        let page = "<table><tbody>\
            <tr><td>1</td><td>Opening</td><td>00:00:00</td></tr>\
            <tr><td>2</td><td>Ending</td><td>01:30:00.25</td></tr>\
            </tbody></table>";
        let scraper = scraper(&[("https://chapterdb.example/browse/7", page)]);

        let mut movie = MovieResult {
            movie_id: 7,
            title: "Seven".to_string(),
            ..MovieResult::default()
        };
        scraper.fetch_chapters(&mut movie).await.unwrap();

        assert_eq!(movie.chapters.len(), 2);
        assert_eq!(movie.chapters[1].number, 2);
        assert_eq!(movie.chapters[1].name, "Ending");
        assert_eq!(movie.chapters[1].time, "01:30:00.25");
    }

    #[tokio::test]
    async fn test_fetch_errors_propagate() {
        let scraper = scraper(&[]);
        let result = scraper.search("Missing").await;

        assert!(matches!(result, Err(ChapterLookupError::HttpStatus { .. })));
        assert_eq!(
            scraper.fetcher.requested.lock().unwrap().as_slice(),
            ["https://chapterdb.example/grid?Criteria.Title=Missing"]
        );
    }
}
