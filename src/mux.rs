use crate::chapters::MovieResult;
use crate::config::MuxConfig;
use crate::error::{ChapterLookupError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// mkvmerge exit code for "finished, but with warnings"
const MKVMERGE_WARNINGS: i32 = 1;

/// Writes chapter files and merges them into Matroska files with mkvmerge
#[derive(Debug, Clone)]
pub struct Muxer {
    mkvmerge: PathBuf,
    chapter_file: PathBuf,
}

impl Muxer {
    pub fn new(config: &MuxConfig) -> Self {
        Self {
            mkvmerge: config.mkvmerge_path.clone(),
            chapter_file: config.chapter_file.clone(),
        }
    }

    /// Path of the intermediate chapter file
    pub fn chapter_file(&self) -> &Path {
        &self.chapter_file
    }

    /// `--chapters <chapter file> -o <output> <source>`
    pub fn mux_args(&self, output: &Path, source: &Path) -> Vec<OsString> {
        vec![
            OsString::from("--chapters"),
            self.chapter_file.clone().into_os_string(),
            OsString::from("-o"),
            output.as_os_str().to_os_string(),
            source.as_os_str().to_os_string(),
        ]
    }

    /// Write the movie's chapters and mux them into `<stem>-<suffix>.<ext>`.
    ///
    /// Needs a source file and at least one chapter. Returns the output path.
    pub async fn save_chapters(&self, movie: &mut MovieResult) -> Result<PathBuf> {
        let source = movie
            .file_name
            .clone()
            .ok_or(ChapterLookupError::MissingSourceFile)?;
        if movie.chapters.is_empty() {
            return Err(ChapterLookupError::NoChapters);
        }

        let output = movie.output_file_name()?;

        let contents = movie.chapter_file_contents();
        tokio::fs::write(&self.chapter_file, contents).await?;
        info!(
            "📝 Wrote {} chapters to {}",
            movie.chapters.len(),
            self.chapter_file.display()
        );

        self.run_mkvmerge(&output, &source).await?;
        Ok(output)
    }

    async fn run_mkvmerge(&self, output: &Path, source: &Path) -> Result<()> {
        let args = self.mux_args(output, source);
        debug!("Running {} {:?}", self.mkvmerge.display(), args);

        let result = tokio::process::Command::new(&self.mkvmerge)
            .args(&args)
            .output()
            .await
            .map_err(|source| ChapterLookupError::MuxLaunch {
                program: self.mkvmerge.display().to_string(),
                source,
            })?;

        match result.status.code() {
            Some(0) => {}
            Some(MKVMERGE_WARNINGS) => {
                warn!(
                    "⚠️ mkvmerge finished with warnings: {}",
                    String::from_utf8_lossy(&result.stdout).trim()
                );
            }
            _ => {
                let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
                let stdout = String::from_utf8_lossy(&result.stdout).trim().to_string();
                return Err(ChapterLookupError::MuxFailed {
                    status: result.status,
                    // mkvmerge reports most errors on stdout
                    stderr: if stderr.is_empty() { stdout } else { stderr },
                });
            }
        }

        info!("🎞️ Muxed chapters into {}", output.display());
        Ok(())
    }
}
