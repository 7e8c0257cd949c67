use anyhow::{Context, Result};
use chapter_lookup::{ChapterLookup, Config, Muxer, PageFetcher, Prompt, TerminalPrompt};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const LONG_ABOUT: &str = "Looks up and saves chapters for a movie
This is done using https://chapterdb.plex.tv, a user-submitted database
!!Currently only supports working with mkv (Matroska) video files!!

Optionally, will also save the chapters to a file
When selecting media, ** indicates a starred result, and * indicates chapters are named
No asterisks indicates a likely-low-quality chapter set

The file extension check ignores case, so movie.MKV is accepted as well";

#[derive(Parser)]
#[command(name = "chapter-lookup", version)]
#[command(about = "Looks up and saves chapters for a movie", long_about = LONG_ABOUT)]
struct Cli {
    /// The movie title to look up
    movie_title: String,

    /// Optionally, the file to save the chapters to
    movie_file: Option<PathBuf>,

    /// The suffix to append to the media file, cannot be blank
    #[arg(long)]
    suffix: Option<String>,

    /// Save without asking for confirmation
    #[arg(long)]
    yes: bool,

    /// Configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// mkvmerge executable to use
    #[arg(long, value_name = "PATH")]
    mkvmerge: Option<PathBuf>,

    /// Print the selected movie as JSON
    #[arg(long)]
    json: bool,

    /// Print the chapter file contents
    #[arg(long)]
    print_chapters: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Only the configured container is supported, and the file must exist
fn check_movie_file(path: &Path, extension: &str) -> std::result::Result<(), String> {
    let supported = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(extension))
        .unwrap_or(false);

    if !supported {
        Err("Unsupported file type!".to_string())
    } else if !path.exists() {
        Err(format!("File {} does not exist!", path.display()))
    } else {
        Ok(())
    }
}

fn init_logging(verbose: bool, log_level: &str) {
    let level = if verbose { "debug" } else { log_level };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("chapter_lookup={},warn", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    if let Some(mkvmerge) = &cli.mkvmerge {
        config.mux.mkvmerge_path = mkvmerge.clone();
    }
    config.validate().context("Invalid configuration")?;

    init_logging(cli.verbose, &config.output.log_level);

    if let Some(movie_file) = &cli.movie_file {
        if let Err(message) = check_movie_file(movie_file, &config.mux.container_extension) {
            Cli::command().error(ErrorKind::ValueValidation, message).exit();
        }
    }

    let lookup = ChapterLookup::new(&config.lookup)?;
    let mut prompt = TerminalPrompt::terminal();

    run(&cli, &config, &lookup, &mut prompt).await
}

/// Look up the title, report it, and save its chapters when a movie file was given
async fn run<F, R, W>(
    cli: &Cli,
    config: &Config,
    lookup: &ChapterLookup<F>,
    prompt: &mut Prompt<R, W>,
) -> Result<()>
where
    F: PageFetcher,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let suffix = cli
        .suffix
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(&config.output.default_suffix);

    let Some(mut movie) = lookup.get_chapters(&cli.movie_title, prompt).await? else {
        prompt.print_line("No movies found! Exiting").await?;
        return Ok(());
    };

    prompt.print_line("Saving details for: ").await?;
    prompt.print_line(&movie.summary()).await?;

    if cli.json {
        prompt.print_line(&serde_json::to_string_pretty(&movie)?).await?;
    }

    if cli.print_chapters {
        let contents = movie.chapter_file_contents();
        prompt.print_line(contents.trim_end()).await?;
    }

    let Some(movie_file) = &cli.movie_file else {
        return Ok(());
    };

    // The file may have moved while the user was choosing
    if !movie_file.exists() {
        prompt.print_line("Non-existent file!").await?;
        return Ok(());
    }

    movie.set_file_name(movie_file);
    movie.set_output_suffix(suffix);
    let output = movie.output_file_name()?;
    prompt
        .print_line(&format!("Would output to: {}", output.display()))
        .await?;

    if !cli.yes && !prompt.confirm_save().await? {
        prompt.print_line("Exiting").await?;
        return Ok(());
    }

    let muxer = Muxer::new(&config.mux);
    match muxer.save_chapters(&mut movie).await {
        Ok(output) => {
            info!("💾 Saved chapters to {}", output.display());
            prompt.print_line("Saved!").await?;
            Ok(())
        }
        Err(e) => {
            error!("Failed to save chapters: {}", e);
            prompt.print_line("Failed to save!").await?;
            Err(e.into())
        }
    }
}
