use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Name of the plain-text key file looked up next to the working directory.
pub const KEY_FILE_NAME: &str = "local.conf";

const KEY_FILE_PREFIX: &str = "API_KEY=";
const DEFAULT_LANG: &str = "fr";
const DEFAULT_OUTPUT_DIR: &str = "JSON Output";
const DEFAULT_LOGS_DIR: &str = "Logs";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// lang = "en"
/// output_dir = "/home/me/forecasts"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// OpenWeather API key.
    pub api_key: Option<String>,

    /// Language for weather descriptions returned by the API.
    pub lang: Option<String>,

    /// Where summaries are written.
    pub output_dir: Option<PathBuf>,

    /// Where log files are written.
    pub logs_dir: Option<PathBuf>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-report", "weather-report")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set/replace the stored API key. Blank keys clear it.
    pub fn set_api_key(&mut self, api_key: String) {
        let trimmed = api_key.trim();
        self.api_key = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }

    /// Returns the stored API key, if present and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    pub fn lang(&self) -> &str {
        self.lang.as_deref().unwrap_or(DEFAULT_LANG)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.logs_dir.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_LOGS_DIR))
    }
}

/// Read the key from a `local.conf`-style file.
///
/// The first line starting with `API_KEY=` wins. An absent file, an absent
/// line or an empty value all mean "no key".
pub fn read_key_file(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read key file: {}", path.display()))?;

    let key = contents
        .lines()
        .find_map(|line| line.strip_prefix(KEY_FILE_PREFIX))
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string);

    Ok(key)
}

/// Where an API key was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Flag,
    KeyFile,
    ConfigFile,
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            KeySource::Flag => "command line",
            KeySource::KeyFile => "key file",
            KeySource::ConfigFile => "config file",
        })
    }
}

/// Pick the API key: explicit flag, then key file, then stored config.
pub fn resolve_api_key(
    flag: Option<&str>,
    key_file: &Path,
    config: &Config,
) -> Result<Option<(String, KeySource)>> {
    if let Some(key) = flag.map(str::trim).filter(|k| !k.is_empty()) {
        return Ok(Some((key.to_string(), KeySource::Flag)));
    }

    if let Some(key) = read_key_file(key_file)? {
        return Ok(Some((key, KeySource::KeyFile)));
    }

    Ok(config.api_key().map(|k| (k.to_string(), KeySource::ConfigFile)))
}
