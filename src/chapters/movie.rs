/// Movie search result with its chapter list
use super::Chapter;
use crate::error::{ChapterLookupError, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Suffix appended to the output file stem when none is given
pub const DEFAULT_OUTPUT_SUFFIX: &str = "chapters";

/// A ChapterDB movie entry.
///
/// Created with metadata only by a search, then filled with chapters once
/// selected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieResult {
    /// ChapterDB identifier (last segment of the `/browse/<id>` link)
    pub movie_id: u64,
    /// Movie title
    pub title: String,
    /// Media type column, e.g. "DVD" or "Blu-ray"
    pub media_type: String,
    /// Duration as displayed by ChapterDB
    pub duration: String,
    /// Curated entry
    pub is_starred: bool,
    /// Chapter names were detected for this entry
    pub has_chapter_names: bool,
    /// Chapters in listing order
    pub chapters: Vec<Chapter>,
    /// Source media file to mux into
    pub file_name: Option<PathBuf>,
    /// Suffix placed between the output stem and extension
    pub output_suffix: String,
}

impl Default for MovieResult {
    fn default() -> Self {
        Self {
            movie_id: 0,
            title: String::new(),
            media_type: String::new(),
            duration: String::new(),
            is_starred: false,
            has_chapter_names: false,
            chapters: Vec::new(),
            file_name: None,
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
        }
    }
}

impl MovieResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chapter. Without an explicit number the chapter gets
    /// `chapter count + 1`.
    pub fn add_chapter(&mut self, name: impl Into<String>, time: impl Into<String>, number: Option<u32>) {
        let number = number.unwrap_or(self.chapters.len() as u32 + 1);
        self.chapters.push(Chapter::new(number, name, time));
    }

    /// Set the source media file
    pub fn set_file_name(&mut self, path: impl Into<PathBuf>) {
        self.file_name = Some(path.into());
    }

    /// Set the output suffix; blank falls back to the default
    pub fn set_output_suffix(&mut self, suffix: &str) {
        self.output_suffix = if suffix.is_empty() {
            DEFAULT_OUTPUT_SUFFIX.to_string()
        } else {
            suffix.to_string()
        };
    }

    /// Marker shown in front of the title: `** ` starred, `* ` named chapters
    pub fn quality_marker(&self) -> &'static str {
        if self.is_starred {
            "** "
        } else if self.has_chapter_names {
            "* "
        } else {
            ""
        }
    }

    /// One header line plus one indented line per chapter
    pub fn summary(&self) -> String {
        self.to_string()
    }

    /// `<stem>-<suffix>.<ext>` next to the source file
    pub fn output_file_name(&self) -> Result<PathBuf> {
        let file_name = self
            .file_name
            .as_deref()
            .ok_or(ChapterLookupError::MissingSourceFile)?;
        output_path_for(file_name, &self.output_suffix)
    }

    /// The full chapter file text. Normalizes every chapter timestamp.
    pub fn chapter_file_contents(&mut self) -> String {
        self.chapters
            .iter_mut()
            .map(Chapter::format_file_lines)
            .collect()
    }
}

impl fmt::Display for MovieResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} ({} [{}])",
            self.quality_marker(),
            self.title,
            self.media_type,
            self.duration
        )?;

        for chapter in &self.chapters {
            write!(f, "\n  {}", chapter)?;
        }

        Ok(())
    }
}

/// Build `<stem>-<suffix>.<ext>` for a media path
pub fn output_path_for(path: &Path, suffix: &str) -> Result<PathBuf> {
    let invalid = || ChapterLookupError::InvalidFileName(path.to_path_buf());

    let stem = path.file_stem().ok_or_else(invalid)?;
    let extension = path.extension().ok_or_else(invalid)?;

    let mut name = OsString::from(stem);
    name.push("-");
    name.push(suffix);
    name.push(".");
    name.push(extension);
    Ok(path.with_file_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_movie() -> MovieResult {
        MovieResult {
            movie_id: 42,
            title: "Example Movie".to_string(),
            media_type: "DVD".to_string(),
            duration: "01:45:00".to_string(),
            ..MovieResult::default()
        }
    }

    #[test]
    fn test_new_instances_do_not_share_chapters() {
        let mut first = MovieResult::new();
        first.add_chapter("Opening", "00:00:00", None);

        let second = MovieResult::new();
        assert_eq!(first.chapters.len(), 1);
        assert!(second.chapters.is_empty());
        assert_eq!(second.output_suffix, DEFAULT_OUTPUT_SUFFIX);
    }

    #[test]
    fn test_add_chapter_auto_numbers_from_count() {
        let mut movie = sample_movie();
        movie.add_chapter("One", "00:00:00", None);
        movie.add_chapter("Two", "00:05:00", None);
        movie.add_chapter("Seven", "00:10:00", Some(7));
        movie.add_chapter("Four", "00:15:00", None);

        let numbers: Vec<u32> = movie.chapters.iter().map(|c| c.number).collect();
        assert_eq!(numbers, vec![1, 2, 7, 4]);
    }

    #[test]
    fn test_summary_markers() {
        let mut movie = sample_movie();
        assert_eq!(movie.summary(), "Example Movie (DVD [01:45:00])");

        movie.has_chapter_names = true;
        assert_eq!(movie.summary(), "* Example Movie (DVD [01:45:00])");

        movie.is_starred = true;
        assert_eq!(movie.summary(), "** Example Movie (DVD [01:45:00])");
    }

    #[test]
    fn test_summary_lists_chapters() {
        let mut movie = sample_movie();
        movie.add_chapter("Opening", "00:00:00", None);
        movie.add_chapter("Chase", "00:21:13.5", None);

        assert_eq!(
            movie.summary(),
            "Example Movie (DVD [01:45:00])\n  1. Opening [00:00:00]\n  2. Chase [00:21:13.5]"
        );
    }

    #[test]
    fn test_output_file_name() {
        let mut movie = sample_movie();
        movie.set_file_name("movie.mkv");
        assert_eq!(movie.output_file_name().unwrap(), PathBuf::from("movie-chapters.mkv"));

        movie.set_output_suffix("named");
        assert_eq!(movie.output_file_name().unwrap(), PathBuf::from("movie-named.mkv"));
    }

    #[test]
    fn test_output_file_name_keeps_directory_and_inner_dots() {
        let path = Path::new("/media/films/The.Movie.2001.mkv");
        assert_eq!(
            output_path_for(path, "chapters").unwrap(),
            PathBuf::from("/media/films/The.Movie.2001-chapters.mkv")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_output_file_name_keeps_non_utf8_stem() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"/tmp/Film\xe9.mkv"));
        assert_eq!(
            output_path_for(path, "chapters").unwrap(),
            PathBuf::from(OsStr::from_bytes(b"/tmp/Film\xe9-chapters.mkv"))
        );
    }

    #[test]
    fn test_output_file_name_errors() {
        let movie = sample_movie();
        assert!(matches!(
            movie.output_file_name(),
            Err(ChapterLookupError::MissingSourceFile)
        ));

        assert!(matches!(
            output_path_for(Path::new("movie"), "chapters"),
            Err(ChapterLookupError::InvalidFileName(_))
        ));
    }

    #[test]
    fn test_blank_suffix_falls_back_to_default() {
        let mut movie = sample_movie();
        movie.set_output_suffix("");
        assert_eq!(movie.output_suffix, "chapters");
    }

    #[test]
    fn test_chapter_file_contents() {
        let mut movie = sample_movie();
        movie.add_chapter("Opening", "00:00:00", None);
        movie.add_chapter("Chase", "00:21:13.5", None);

        assert_eq!(
            movie.chapter_file_contents(),
            "CHAPTER01=00:00:00.000\nCHAPTER01NAME=Opening\n\
             CHAPTER02=00:21:13.500\nCHAPTER02NAME=Chase\n"
        );
        assert_eq!(movie.chapters[1].time, "00:21:13.500");
    }
}
