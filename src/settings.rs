//! Runtime settings
//!
//! Loaded from `<ROOT>/rankings.yml` when present, otherwise defaults.
//! A handful of `RANKINGS_*` environment variables override the file.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

const SETTINGS_FILE: &str = "rankings.yml";

pub const DEFAULT_ENDPOINT: &str = "https://www.usnews.com/best-graduate-schools/api/search";
pub const DEFAULT_MAX_PAGES: u32 = 100;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub endpoint: String,
    pub program: String,
    pub specialty: String,
    /// Highest page number the collector will request
    pub max_pages: u32,
    /// Dump file stem; `.json` is appended
    pub dump_file: String,
    /// Request timeout; the HTTP client default applies when unset
    pub timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            program: "top-science-schools".to_string(),
            specialty: "computer-science".to_string(),
            max_pages: DEFAULT_MAX_PAGES,
            dump_file: "colleges".to_string(),
            timeout_secs: None,
        }
    }
}

impl Settings {
    /// Apply `RANKINGS_ENDPOINT`, `RANKINGS_MAX_PAGES` and `RANKINGS_DUMP_FILE`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup("RANKINGS_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Some(max_pages) = lookup("RANKINGS_MAX_PAGES") {
            self.max_pages = max_pages
                .trim()
                .parse()
                .with_context(|| format!("RANKINGS_MAX_PAGES is not a number: {:?}", max_pages))?;
        }
        if let Some(dump_file) = lookup("RANKINGS_DUMP_FILE") {
            self.dump_file = dump_file;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_pages == 0 {
            bail!("max_pages must be at least 1");
        }
        if self.dump_file.trim().is_empty() {
            bail!("dump_file must not be empty");
        }
        Ok(())
    }

    pub fn dump_path(&self, root: &str) -> PathBuf {
        PathBuf::from(root).join(format!("{}.json", self.dump_file))
    }
}

/// Load settings for `root`, layering environment overrides on top
pub fn load_settings(root: &str) -> Result<Settings> {
    let mut settings = read_settings_file(root)?;
    settings.apply_overrides(|key| std::env::var(key).ok())?;
    settings.validate()?;
    Ok(settings)
}

fn read_settings_file(root: &str) -> Result<Settings> {
    let path = PathBuf::from(root).join(SETTINGS_FILE);

    if !path.exists() {
        return Ok(Settings::default());
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read settings from {:?}", path))?;

    let settings: Settings = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse settings YAML {:?}", path))?;

    Ok(settings)
}
