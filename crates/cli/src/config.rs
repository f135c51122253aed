use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use verse_output::{OutputSettings, RetryPolicy, DEFAULT_RETRY_ATTEMPTS};
use verse_search::{HighlightMarker, DEFAULT_HIGHLIGHT_CLOSE, DEFAULT_HIGHLIGHT_OPEN};

pub const CONFIG_ENV: &str = "BIBLE_CONFIG";
pub const DATA_DIR_ENV: &str = "BIBLE_DATA_DIR";
pub const NAMES_DIR_ENV: &str = "BIBLE_NAMES_DIR";
pub const LANG_ENV: &str = "BIBLE_LANG";
pub const OUTPUT_PATH_ENV: &str = "BIBLE_OUTPUT_PATH";

const CONFIG_APP_DIR: &str = "verse-relay";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub names_dir: PathBuf,
    pub translations_dir: Option<PathBuf>,
    pub language: String,
    pub reference_language: String,
    pub output_path: Option<PathBuf>,
    pub base_dir: Option<PathBuf>,
    pub output: OutputConfig,
    pub search: SearchConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            names_dir: PathBuf::from("names"),
            translations_dir: None,
            language: "ko".to_string(),
            reference_language: verse_render::DEFAULT_REFERENCE_LANG.to_string(),
            output_path: None,
            base_dir: None,
            output: OutputConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub highlight_open: String,
    pub highlight_close: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            highlight_open: DEFAULT_HIGHLIGHT_OPEN.to_string(),
            highlight_close: DEFAULT_HIGHLIGHT_CLOSE.to_string(),
        }
    }
}

impl AppConfig {
    /// Config file from `explicit`, else `BIBLE_CONFIG`, else the user config dir.
    ///
    /// Only an explicitly named file has to exist; otherwise defaults are used.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let explicit = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        if let Some(path) = explicit {
            return Self::from_file(&path);
        }
        match dirs::config_dir().map(|dir| dir.join(CONFIG_APP_DIR).join(CONFIG_FILE)) {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => {
                log::debug!("No config file found; using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(Into::into)
    }

    /// Apply `BIBLE_*` overrides read through `var`.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = var(NAMES_DIR_ENV).filter(|v| !v.is_empty()) {
            self.names_dir = PathBuf::from(dir);
        }
        if let Some(lang) = var(LANG_ENV).filter(|v| !v.is_empty()) {
            self.language = lang;
        }
        if let Some(path) = var(OUTPUT_PATH_ENV).filter(|v| !v.is_empty()) {
            self.output_path = Some(PathBuf::from(path));
        }
    }

    pub fn base_dir(&self) -> PathBuf {
        self.base_dir
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn output_settings(&self) -> OutputSettings {
        let settings = OutputSettings::new(self.base_dir());
        match &self.output_path {
            Some(path) => settings.with_output_path(path),
            None => settings,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.output.retry_attempts,
            Duration::from_millis(self.output.retry_delay_ms),
        )
    }

    pub fn highlight_marker(&self) -> HighlightMarker {
        HighlightMarker::new(&self.search.highlight_open, &self.search.highlight_close)
    }
}
