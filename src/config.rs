use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_API_BASE_URL: &str = "https://api.hypixel.net/v2/skyblock";
pub const DEFAULT_ITEMS_URL: &str = "https://api.hypixel.net/resources/skyblock/items";
pub const DEFAULT_WIKI_API_URL: &str =
    "https://hypixel-skyblock.fandom.com/api.php?action=parse&page=Museum/Items&prop=text&format=json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub api_base_url: String,
    pub items_url: String,
    pub wiki_api_url: String,
    pub user_agent: String,
    pub log_payloads: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            items_url: DEFAULT_ITEMS_URL.to_string(),
            wiki_api_url: DEFAULT_WIKI_API_URL.to_string(),
            user_agent: "MuseumTracker/1.0".to_string(),
            log_payloads: true,
        }
    }
}

impl AppConfig {
    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

/// Reads the config file; a missing file falls back to defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let path = path.as_ref();
    if !path.exists() {
        info!("No config at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
