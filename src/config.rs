use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for chapter lookup and muxing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// ChapterDB access settings
    pub lookup: LookupConfig,

    /// mkvmerge settings
    pub mux: MuxConfig,

    /// Output and logging settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// ChapterDB root URL
    pub base_url: String,

    /// HTTP request timeout in seconds
    pub request_timeout_seconds: u64,

    /// User agent sent with every request
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MuxConfig {
    /// mkvmerge executable (name on PATH or full path)
    pub mkvmerge_path: PathBuf,

    /// Intermediate chapter file handed to mkvmerge
    pub chapter_file: PathBuf,

    /// The one container extension chapters can be muxed into
    pub container_extension: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Suffix used when `--suffix` is absent or blank
    pub default_suffix: String,

    /// Default log level
    pub log_level: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: "https://chapterdb.plex.tv".to_string(),
            request_timeout_seconds: 30,
            user_agent: concat!("chapter-lookup/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for MuxConfig {
    fn default() -> Self {
        Self {
            mkvmerge_path: PathBuf::from("mkvmerge"),
            chapter_file: PathBuf::from("chapters.txt"),
            container_extension: "mkv".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_suffix: "chapters".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the first config file found, then apply
    /// environment overrides
    pub fn load() -> Result<Self> {
        let mut config_paths = vec![
            PathBuf::from("chapter-lookup.toml"),
            PathBuf::from("config/chapter-lookup.toml"),
        ];
        if let Some(dir) = user_config_dir() {
            config_paths.push(dir.join("chapter-lookup").join("config.toml"));
        }

        Self::load_first(&config_paths)?.with_env_overrides()
    }

    /// Parse the first existing file of `paths`, or use defaults when none
    /// exists. A file that exists but does not parse is an error.
    pub fn load_first(paths: &[PathBuf]) -> Result<Self> {
        match paths.iter().find(|path| path.is_file()) {
            Some(path) => Self::parse_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit file
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::parse_file(path)?.with_env_overrides()
    }

    fn parse_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tracing::debug!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Override settings with `CHAPTER_LOOKUP_*` environment variables
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Override settings from a variable lookup
    pub fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(base_url) = var("CHAPTER_LOOKUP_BASE_URL") {
            self.lookup.base_url = base_url;
        }

        if let Some(timeout) = var("CHAPTER_LOOKUP_TIMEOUT") {
            self.lookup.request_timeout_seconds = timeout
                .parse()
                .with_context(|| format!("Invalid CHAPTER_LOOKUP_TIMEOUT: {}", timeout))?;
        }

        if let Some(mkvmerge) = var("CHAPTER_LOOKUP_MKVMERGE") {
            self.mux.mkvmerge_path = PathBuf::from(mkvmerge);
        }

        if let Some(log_level) = var("CHAPTER_LOOKUP_LOG_LEVEL") {
            self.output.log_level = log_level;
        }

        Ok(self)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.lookup.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }

        url::Url::parse(&self.lookup.base_url)
            .with_context(|| format!("Invalid base_url: {}", self.lookup.base_url))?;

        if self.mux.mkvmerge_path.as_os_str().is_empty() {
            return Err(anyhow!("mkvmerge_path must not be empty"));
        }

        if self.mux.chapter_file.as_os_str().is_empty() {
            return Err(anyhow!("chapter_file must not be empty"));
        }

        if self.mux.container_extension.is_empty() {
            return Err(anyhow!("container_extension must not be empty"));
        }

        Ok(())
    }
}

fn user_config_dir() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.lookup.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.config.lookup.request_timeout_seconds = seconds;
        self
    }

    pub fn with_mkvmerge(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.mux.mkvmerge_path = path.into();
        self
    }

    pub fn with_chapter_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.mux.chapter_file = path.into();
        self
    }

    pub fn with_default_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.output.default_suffix = suffix.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
