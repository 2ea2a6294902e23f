use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Access token saved after authorizing against the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_api_base_url() -> String { "https://api.vimeo.com".to_string() }
fn default_per_page() -> u32 { 30 }
fn default_request_timeout_secs() -> u64 { 10 }
fn default_token_type() -> String { "bearer".to_string() }

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            per_page: default_per_page(),
            request_timeout_secs: default_request_timeout_secs(),
            logging: LoggingConfig::default(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "etiennelawlor", "loop")
}

fn home_fallback() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".loop")
}

impl Config {
    pub fn get_config_path() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| home_fallback().join("config.toml"))
    }

    pub fn get_token_path() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.config_dir().join("token.toml"))
            .unwrap_or_else(|| home_fallback().join("token.toml"))
    }

    pub fn default_log_path() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.data_local_dir().join("loop.log"))
            .unwrap_or_else(|| home_fallback().join("loop.log"))
    }

    pub fn log_path(&self) -> PathBuf {
        self.logging
            .path
            .as_deref()
            .map(expand_tilde)
            .unwrap_or_else(Self::default_log_path)
    }

    /// Defaults for a missing file, an error for one that cannot be read or parsed.
    pub fn read_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Falls back to defaults when the file is missing or malformed.
    pub fn load_from(path: &Path) -> Self {
        Self::read_from(path).unwrap_or_else(|e| {
            log::error!("{:#}", e);
            Self::default()
        })
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut content = String::from("# Loop Configuration\n\n");

        content.push_str("# Base URL of the video API.\n");
        content.push_str(&format!("api_base_url = \"{}\"\n\n", self.api_base_url));

        content.push_str("# Number of videos requested per page.\n");
        content.push_str(&format!("per_page = {}\n\n", self.per_page));

        content.push_str("# Seconds before a request is reported as timed out.\n");
        content.push_str(&format!("request_timeout_secs = {}\n\n", self.request_timeout_secs));

        content.push_str("[logging]\n");
        content.push_str(&format!("enabled = {}\n", self.logging.enabled));
        if let Some(p) = &self.logging.path {
            content.push_str(&format!("path = \"{}\"\n", p.display()));
        }

        fs::write(path, content)?;
        Ok(())
    }
}

impl StoredToken {
    pub fn load() -> Option<Self> {
        Self::load_from(&Config::get_token_path())
    }

    pub fn load_from(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        match toml::from_str::<StoredToken>(&content) {
            Ok(token) if !token.access_token.trim().is_empty() => Some(token),
            Ok(_) => None,
            Err(e) => {
                log::error!("Invalid token file {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// Token precedence: explicit flag, then `LOOP_ACCESS_TOKEN`, then the stored file.
pub fn resolve_access_token(flag: Option<String>) -> Option<String> {
    flag.filter(|t| !t.trim().is_empty())
        .or_else(|| {
            std::env::var("LOOP_ACCESS_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty())
        })
        .or_else(|| StoredToken::load().map(|t| t.access_token))
}

pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Ok(home) = std::env::var("HOME") {
            return Path::new(&home).join(rest);
        }
    }
    path.to_path_buf()
}
