/// A single ChapterDB chapter entry and its mkvmerge "simple chapter" encoding
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of fractional digits mkvmerge expects on a chapter timestamp
const MILLISECOND_DIGITS: usize = 3;

/// Represents a single chapter of a movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chapter {
    /// Chapter number as listed by ChapterDB
    pub number: u32,
    /// Chapter display name
    pub name: String,
    /// Timestamp in `HH:MM:SS[.fff]` form
    pub time: String,
}

impl Chapter {
    /// Create a new chapter
    pub fn new(number: u32, name: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
            time: time.into(),
        }
    }

    /// The `CHAPTERNN` key, zero-padded to two digits
    pub fn prefix(&self) -> String {
        format!("CHAPTER{:02}", self.number)
    }

    /// Rewrite the stored timestamp to exactly millisecond precision.
    ///
    /// Short fractions are padded with zeroes, long ones are truncated (never
    /// rounded). Timestamps without any digit are left untouched.
    pub fn normalize_time(&mut self) {
        self.time = normalize_timestamp(&self.time);
    }

    /// Encode this chapter as the two chapter-file lines mkvmerge reads.
    ///
    /// Normalizes the stored timestamp as a side effect.
    pub fn format_file_lines(&mut self) -> String {
        self.normalize_time();
        let prefix = self.prefix();
        format!("{prefix}={}\n{prefix}NAME={}\n", self.time, self.name)
    }
}

impl fmt::Display for Chapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {} [{}]", self.number, self.name, self.time)
    }
}

/// Pad or truncate the fractional part of a timestamp to three digits
pub fn normalize_timestamp(time: &str) -> String {
    if !time.chars().any(|c| c.is_ascii_digit()) {
        return time.to_string();
    }

    match time.rsplit_once('.') {
        Some((whole, fraction)) => {
            let mut millis: String = fraction.chars().take(MILLISECOND_DIGITS).collect();
            while millis.chars().count() < MILLISECOND_DIGITS {
                millis.push('0');
            }
            format!("{whole}.{millis}")
        }
        None => format!("{time}.000"),
    }
}
