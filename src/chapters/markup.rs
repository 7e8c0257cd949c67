//! ChapterDB HTML parsing.
//!
//! Everything that knows about ChapterDB's page structure lives here so the
//! rest of the crate only sees `MovieResult` and `ChapterRow` values. The
//! markup is not a stable contract; the quality signals in particular are a
//! best-effort reading of icons and tooltips.

use super::MovieResult;
use crate::error::{ChapterLookupError, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use tracing::debug;

/// Rows of the search result grid
const SEARCH_ROW_SELECTOR: &str = "form table tbody tr";
/// Rows of the per-movie chapter table
const CHAPTER_ROW_SELECTOR: &str = "table tbody tr";

/// Meaning of each cell in a search result row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchColumn {
    /// Star icon plus "names detected" tooltip
    QualitySignals,
    MediaType,
    /// Title text with a `/browse/<id>` link
    TitleAndId,
    Duration,
    Ignored,
}

const SEARCH_COLUMNS: [SearchColumn; 6] = [
    SearchColumn::QualitySignals,
    SearchColumn::MediaType,
    SearchColumn::TitleAndId,
    SearchColumn::Duration,
    SearchColumn::Ignored,
    SearchColumn::Ignored,
];

/// Meaning of each cell in a chapter table row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChapterColumn {
    Number,
    Name,
    Time,
}

const CHAPTER_COLUMNS: [ChapterColumn; 3] = [
    ChapterColumn::Number,
    ChapterColumn::Name,
    ChapterColumn::Time,
];

/// Quality hints shown in the first column of a search result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QualitySignals {
    pub is_starred: bool,
    pub has_chapter_names: bool,
}

/// One row of a movie's chapter table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRow {
    /// Listed number; `None` when the cell is not a number
    pub number: Option<u32>,
    pub name: String,
    pub time: String,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ChapterLookupError::Parse(format!("invalid selector {css}: {e:?}")))
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn browse_id_regex() -> &'static Regex {
    static BROWSE_ID: OnceLock<Regex> = OnceLock::new();
    BROWSE_ID.get_or_init(|| Regex::new(r"(\d+)/?(?:[?#].*)?$").expect("browse id pattern is valid"))
}

/// Extract the movie id from a `/browse/<id>` link
pub fn movie_id_from_href(href: &str) -> Option<u64> {
    browse_id_regex()
        .captures(href)
        .and_then(|captures| captures.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Read the star icon and the "names detected" tooltip from a result cell
pub fn quality_signals(cell: &ElementRef) -> Result<QualitySignals> {
    let use_selector = selector("use")?;
    let title_selector = selector("title")?;
    let tooltip_selector = selector("[title]")?;

    // SVG sprites reference the icon through `xlink:href`; the prefix is not
    // part of the parsed attribute name.
    let is_starred = cell
        .select(&use_selector)
        .next()
        .and_then(|icon| {
            icon.value()
                .attrs()
                .find(|(name, _)| *name == "href" || *name == "xlink:href")
                .map(|(_, value)| value.contains("star"))
        })
        .unwrap_or(false);

    let tooltip = cell
        .select(&title_selector)
        .next()
        .map(|title| title.text().collect::<String>())
        .or_else(|| {
            cell.select(&tooltip_selector)
                .next()
                .and_then(|el| el.value().attr("title"))
                .map(str::to_string)
        })
        .map(|text| text.to_lowercase());

    let missing_names = tooltip
        .as_deref()
        .map(|text| text.contains("no names detected"))
        .unwrap_or(false);

    Ok(QualitySignals {
        is_starred,
        has_chapter_names: is_starred || !missing_names,
    })
}

/// Parse the search grid into metadata-only results
pub fn parse_search_results(html: &str) -> Result<Vec<MovieResult>> {
    let document = Html::parse_document(html);
    let row_selector = selector(SEARCH_ROW_SELECTOR)?;
    let cell_selector = selector("td")?;
    let link_selector = selector("a")?;

    let mut results = Vec::new();

    for row in document.select(&row_selector) {
        let cells: Vec<_> = row.select(&cell_selector).collect();

        // Placeholder rows ("no results", spacers) carry no title column
        if cells.len() < 3 {
            debug!("Skipping search row with {} cells", cells.len());
            continue;
        }

        let mut movie = MovieResult::new();

        for (column, cell) in SEARCH_COLUMNS.iter().zip(&cells) {
            match column {
                SearchColumn::QualitySignals => {
                    let signals = quality_signals(cell)?;
                    movie.is_starred = signals.is_starred;
                    movie.has_chapter_names = signals.has_chapter_names;
                }
                SearchColumn::MediaType => movie.media_type = cell_text(cell),
                SearchColumn::TitleAndId => {
                    movie.title = cell_text(cell);
                    let href = cell
                        .select(&link_selector)
                        .next()
                        .and_then(|link| link.value().attr("href"))
                        .ok_or_else(|| {
                            ChapterLookupError::Parse(format!("no browse link for '{}'", movie.title))
                        })?;
                    movie.movie_id = movie_id_from_href(href).ok_or_else(|| {
                        ChapterLookupError::Parse(format!("no movie id in link '{}'", href))
                    })?;
                }
                SearchColumn::Duration => movie.duration = cell_text(cell),
                SearchColumn::Ignored => {}
            }
        }

        debug!("Parsed search result {}: {}", movie.movie_id, movie.title);
        results.push(movie);
    }

    Ok(results)
}

/// Parse a movie's chapter table, keeping page order
pub fn parse_chapter_rows(html: &str) -> Result<Vec<ChapterRow>> {
    let document = Html::parse_document(html);
    let row_selector = selector(CHAPTER_ROW_SELECTOR)?;
    let cell_selector = selector("td")?;

    let mut rows = Vec::new();

    for row in document.select(&row_selector) {
        let mut number = None;
        let mut name = None;
        let mut time = None;

        for (column, cell) in CHAPTER_COLUMNS.iter().zip(row.select(&cell_selector)) {
            let text = cell_text(&cell);
            match column {
                ChapterColumn::Number => number = text.parse().ok(),
                ChapterColumn::Name => name = Some(text),
                ChapterColumn::Time => time = Some(text),
            }
        }

        match (name, time) {
            (Some(name), Some(time)) => rows.push(ChapterRow { number, name, time }),
            _ => debug!("Skipping incomplete chapter row"),
        }
    }

    Ok(rows)
}
