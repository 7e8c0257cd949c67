use std::path::PathBuf;
use std::process::ExitStatus;

/// Result type for chapter lookup operations
pub type Result<T> = std::result::Result<T, ChapterLookupError>;

/// Error types for chapter lookup operations
#[derive(thiserror::Error, Debug)]
pub enum ChapterLookupError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP error {status}: {url}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Unexpected ChapterDB markup: {0}")]
    Parse(String),

    #[error("Cannot derive an output name from {0}")]
    InvalidFileName(PathBuf),

    #[error("No source media file set")]
    MissingSourceFile,

    #[error("No chapters to save")]
    NoChapters,

    #[error("Failed to launch {program}: {source}")]
    MuxLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("mkvmerge failed ({status}): {stderr}")]
    MuxFailed { status: ExitStatus, stderr: String },

    #[error("Input closed before a selection was made")]
    InputClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
