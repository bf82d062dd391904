//! Decklist download from deck building sites
//!
//! Moxfield and Archidekt decks are read through their JSON APIs and turned
//! back into plain decklist lines; any other URL is expected to serve a plain
//! text decklist.

use crate::config::Config;
use crate::error::{DeckError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use url::Url;

/// Parse `line` as an absolute http(s) URL
pub fn is_valid_http_url(line: &str) -> Option<Url> {
    let url = Url::parse(line.trim()).ok()?;
    let http = url.scheme() == "http" || url.scheme() == "https";
    (http && url.host_str().is_some()).then_some(url)
}

/// Anything that can turn a deck URL into decklist lines
#[async_trait]
pub trait DecklistSource: Send + Sync {
    async fn fetch_lines(&self, url: &Url) -> Result<Vec<String>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DeckSite {
    Moxfield(String),
    Archidekt(String),
    PlainText,
}

fn deck_site(url: &Url) -> Result<DeckSite> {
    let host = url.host_str().unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(host);
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    match host {
        "moxfield.com" => match segments.as_slice() {
            ["decks", id, ..] => Ok(DeckSite::Moxfield(id.to_string())),
            _ => Err(DeckError::InvalidDecklistUrl(url.to_string())),
        },
        "archidekt.com" => match segments.as_slice() {
            ["decks", id, ..] if id.chars().all(|c| c.is_ascii_digit()) => {
                Ok(DeckSite::Archidekt(id.to_string()))
            }
            _ => Err(DeckError::InvalidDecklistUrl(url.to_string())),
        },
        _ => Ok(DeckSite::PlainText),
    }
}

#[derive(Debug, Deserialize)]
struct MoxfieldDeck {
    #[serde(default)]
    commanders: BTreeMap<String, MoxfieldEntry>,
    #[serde(default)]
    mainboard: BTreeMap<String, MoxfieldEntry>,
    #[serde(default)]
    sideboard: BTreeMap<String, MoxfieldEntry>,
}

#[derive(Debug, Deserialize)]
struct MoxfieldEntry {
    quantity: u32,
}

impl MoxfieldDeck {
    fn into_lines(self) -> Vec<String> {
        let main = self
            .commanders
            .iter()
            .chain(self.mainboard.iter())
            .map(|(name, entry)| format!("{} {}", entry.quantity, name));
        let side = self
            .sideboard
            .iter()
            .map(|(name, entry)| format!("SB: {} {}", entry.quantity, name));
        main.chain(side).collect()
    }
}

#[derive(Debug, Deserialize)]
struct ArchidektDeck {
    cards: Vec<ArchidektCard>,
    #[serde(default)]
    categories: Vec<ArchidektCategory>,
}

#[derive(Debug, Deserialize)]
struct ArchidektCard {
    quantity: u32,
    card: ArchidektCardData,
    #[serde(default)]
    categories: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArchidektCardData {
    oracle_card: ArchidektOracleCard,
}

#[derive(Debug, Deserialize)]
struct ArchidektOracleCard {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArchidektCategory {
    name: String,
    #[serde(default = "default_included")]
    included_in_deck: bool,
}

fn default_included() -> bool {
    true
}

impl ArchidektDeck {
    fn into_lines(self) -> Vec<String> {
        let excluded: Vec<&str> = self
            .categories
            .iter()
            .filter(|c| !c.included_in_deck)
            .map(|c| c.name.as_str())
            .collect();

        self.cards
            .iter()
            .filter_map(|card| {
                // the first category is the one the card is filed under
                let primary = card
                    .categories
                    .as_ref()
                    .and_then(|c| c.first())
                    .map(String::as_str);
                let line = format!("{} {}", card.quantity, card.card.oracle_card.name);
                match primary {
                    Some(category) if category.eq_ignore_ascii_case("sideboard") => {
                        Some(format!("SB: {}", line))
                    }
                    Some(category) if excluded.contains(&category) => None,
                    _ => Some(line),
                }
            })
            .collect()
    }
}

/// [`DecklistSource`] over HTTP
#[derive(Debug, Clone)]
pub struct HttpDecklistSource {
    client: reqwest::Client,
    moxfield_api_url: String,
    archidekt_api_url: String,
    user_agent: String,
}

impl HttpDecklistSource {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            moxfield_api_url: config.moxfield_api_url.trim_end_matches('/').to_string(),
            archidekt_api_url: config.archidekt_api_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
        }
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        log::debug!("Fetching decklist from {}", url);
        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(DeckError::HttpStatus(response.status()))
        }
    }

    async fn fetch_moxfield(&self, id: &str) -> Result<Vec<String>> {
        let url = format!("{}/v2/decks/all/{}", self.moxfield_api_url, id);
        let deck: MoxfieldDeck = self.get(&url).await?.json().await?;
        Ok(deck.into_lines())
    }

    async fn fetch_archidekt(&self, id: &str) -> Result<Vec<String>> {
        let url = format!("{}/api/decks/{}/", self.archidekt_api_url, id);
        let deck: ArchidektDeck = self.get(&url).await?.json().await?;
        Ok(deck.into_lines())
    }

    async fn fetch_plain_text(&self, url: &Url) -> Result<Vec<String>> {
        let response = self.get(url.as_str()).await?;
        let is_html = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("text/html"));
        if is_html {
            return Err(DeckError::UnsupportedDecklistSource(url.to_string()));
        }
        let body = response.text().await?;
        Ok(body.lines().map(str::to_string).collect())
    }
}

#[async_trait]
impl DecklistSource for HttpDecklistSource {
    async fn fetch_lines(&self, url: &Url) -> Result<Vec<String>> {
        let lines = match deck_site(url)? {
            DeckSite::Moxfield(id) => self.fetch_moxfield(&id).await?,
            DeckSite::Archidekt(id) => self.fetch_archidekt(&id).await?,
            DeckSite::PlainText => self.fetch_plain_text(url).await?,
        };
        log::info!("Fetched {} decklist lines from {}", lines.len(), url);
        Ok(lines)
    }
}

#[cfg(test)]
#[path = "decklist_url_tests.rs"]
mod tests;
