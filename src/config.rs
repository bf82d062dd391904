//! Runtime configuration
//!
//! Defaults work out of the box; a JSON file can override any field and CLI
//! flags override the file.

use crate::error::Result;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Scryfall's standard Magic card back
pub const DEFAULT_CARD_BACK_URL: &str =
    "https://backs.scryfall.io/large/2/2/222b7a3b-2321-4d4c-af19-19338b134971.jpg?1677416389";

/// Scryfall image size used for card faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    Small,
    #[default]
    Normal,
    Large,
    Png,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scryfall_base_url: String,
    pub moxfield_api_url: String,
    pub archidekt_api_url: String,
    pub card_back_url: String,
    pub image_size: ImageSize,
    /// Upper bound on lookups in flight at once
    pub max_concurrent_lookups: usize,
    /// A lookup running longer than this counts as not found
    pub lookup_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scryfall_base_url: "https://api.scryfall.com".to_string(),
            moxfield_api_url: "https://api.moxfield.com".to_string(),
            archidekt_api_url: "https://archidekt.com".to_string(),
            card_back_url: DEFAULT_CARD_BACK_URL.to_string(),
            image_size: ImageSize::default(),
            max_concurrent_lookups: 8,
            lookup_timeout_secs: 30,
            user_agent: "TabletopDeck/1.0".to_string(),
        }
    }
}

impl Config {
    /// Load a JSON config file; missing fields keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }
}
