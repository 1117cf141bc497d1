use crate::search::cache::DEFAULT_SUGGESTION_CACHE_SIZE;
use crate::search::suggest::DEFAULT_MAX_SUGGESTIONS;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "prodsearch";
const CONFIG_FILE: &str = ".prodsearch.toml";

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// JSON catalog to load instead of the built-in demo catalog.
    pub catalog: Option<PathBuf>,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    #[serde(default = "default_suggestion_cache_size")]
    pub suggestion_cache_size: usize,
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
}

fn default_suggestion_cache_size() -> usize {
    DEFAULT_SUGGESTION_CACHE_SIZE
}
fn default_max_suggestions() -> usize {
    DEFAULT_MAX_SUGGESTIONS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            suggestion_cache_size: default_suggestion_cache_size(),
            max_suggestions: default_max_suggestions(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub show_timing: bool,
    pub show_summary: bool,
    /// Products listed per strategy; `None` lists all of them.
    pub max_results: Option<usize>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_timing: true,
            show_summary: true,
            max_results: Some(10),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        match Self::find_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content).with_context(|| "Failed to parse config file")
    }

    /// Lookup order: user config dir, home dotfile, working directory.
    fn candidate_paths() -> Vec<PathBuf> {
        let user_config = dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join("config.toml"));
        let home_dotfile = dirs::home_dir().map(|home| home.join(CONFIG_FILE));
        user_config
            .into_iter()
            .chain(home_dotfile)
            .chain([PathBuf::from(CONFIG_FILE)])
            .collect()
    }

    fn find_config_path() -> Option<PathBuf> {
        Self::candidate_paths().into_iter().find(|path| path.is_file())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        ensure_parent_dir(path)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

/// Create the directory `path` will be written into, if it names one.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display())),
        _ => Ok(()),
    }
}
