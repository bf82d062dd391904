//! Scryfall API client for resolving decklist entries
//!
//! Uses async reqwest; every lookup failure (unknown card, HTTP error,
//! network trouble) is reported as [`LookupOutcome::NotFound`] so the
//! pipeline can collect all missing cards in one go.

use crate::card::{CardQuery, Printing, ResolvedCard, TokenRef};
use crate::config::{Config, ImageSize};
use crate::error::{DeckError, Result};
use async_trait::async_trait;
use serde::Deserialize;

/// Scryfall card response
#[derive(Debug, Deserialize, Clone)]
pub struct ScryfallCard {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
    /// For double-faced cards, images are in card_faces
    #[serde(default)]
    pub card_faces: Option<Vec<CardFace>>,
    /// Tokens, meld parts and other related objects
    #[serde(default)]
    pub all_parts: Option<Vec<RelatedCard>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImageUris {
    pub small: Option<String>,
    pub normal: Option<String>,
    pub large: Option<String>,
    pub png: Option<String>,
}

impl ImageUris {
    fn pick(&self, size: ImageSize) -> Option<&str> {
        let preferred = match size {
            ImageSize::Small => &self.small,
            ImageSize::Normal => &self.normal,
            ImageSize::Large => &self.large,
            ImageSize::Png => &self.png,
        };
        preferred.as_deref().or(self.normal.as_deref())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CardFace {
    pub name: String,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RelatedCard {
    #[serde(default)]
    pub id: String,
    pub component: String,
    pub name: String,
    pub uri: String,
}

impl ScryfallCard {
    fn face_images(&self, index: usize) -> Option<&ImageUris> {
        self.card_faces
            .as_ref()
            .and_then(|faces| faces.get(index))
            .and_then(|face| face.image_uris.as_ref())
    }

    /// Front face image URL
    pub fn image_url(&self, size: ImageSize) -> Option<&str> {
        // Try direct image_uris first
        if let Some(ref uris) = self.image_uris {
            return uris.pick(size);
        }
        self.face_images(0).and_then(|uris| uris.pick(size))
    }

    /// Back face image URL, only for cards printed with two separate faces
    pub fn back_image_url(&self, size: ImageSize) -> Option<&str> {
        if self.image_uris.is_some() {
            // split / flip / adventure cards share one image
            return None;
        }
        self.face_images(1).and_then(|uris| uris.pick(size))
    }

    /// Tokens and meld results this card brings to the table
    pub fn related_tokens(&self) -> Vec<TokenRef> {
        self.all_parts
            .iter()
            .flatten()
            .filter(|part| part.component == "token" || part.component == "meld_result")
            .filter(|part| part.id.is_empty() || part.id != self.id)
            .filter(|part| part.name != self.name)
            .map(|part| TokenRef {
                name: part.name.clone(),
                uri: part.uri.clone(),
            })
            .collect()
    }

    /// Convert into the lookup result, `None` if there is no usable image
    pub fn to_resolved(&self, size: ImageSize) -> Option<ResolvedCard> {
        let face_url = self.image_url(size)?.to_string();
        let back_url = self.back_image_url(size).map(str::to_string);
        Some(ResolvedCard {
            name: self.name.clone(),
            face_url,
            is_double_faced: back_url.is_some(),
            back_url,
            tokens: self.related_tokens(),
        })
    }
}

/// Result of a single card lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(ResolvedCard),
    NotFound,
}

/// Anything that can turn a [`CardQuery`] into card images
#[async_trait]
pub trait CardLookup: Send + Sync {
    async fn lookup(&self, query: &CardQuery) -> LookupOutcome;
}

/// Scryfall backed [`CardLookup`]
#[derive(Debug, Clone)]
pub struct ScryfallClient {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
    image_size: ImageSize,
}

impl ScryfallClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.scryfall_base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
            image_size: config.image_size,
        }
    }

    async fn get_card(&self, url: &str) -> Result<ScryfallCard> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response.json::<ScryfallCard>().await?)
        } else {
            Err(DeckError::HttpStatus(response.status()))
        }
    }

    /// Fetch a card by name (fuzzy search)
    pub async fn fetch_card_by_name(&self, name: &str) -> Result<ScryfallCard> {
        let url = format!(
            "{}/cards/named?fuzzy={}",
            self.base_url,
            urlencoding::encode(name)
        );
        log::debug!("Fetching card from Scryfall: {}", name);
        self.get_card(&url).await
    }

    /// Fetch a card by set code and collector number
    pub async fn fetch_card_by_printing(&self, printing: &Printing) -> Result<ScryfallCard> {
        let url = format!(
            "{}/cards/{}/{}",
            self.base_url,
            printing.set.to_lowercase(),
            urlencoding::encode(&printing.collector_number)
        );
        log::debug!("Fetching card from Scryfall: {}", url);
        self.get_card(&url).await
    }

    /// Fetch a card by its API URI (as listed in `all_parts`)
    pub async fn fetch_card_by_uri(&self, uri: &str) -> Result<ScryfallCard> {
        log::debug!("Fetching card from Scryfall: {}", uri);
        self.get_card(uri).await
    }

    async fn fetch(&self, query: &CardQuery) -> Result<ScryfallCard> {
        match query {
            CardQuery::Reference(uri) => self.fetch_card_by_uri(uri).await,
            CardQuery::Named {
                name,
                printing: Some(printing),
            } => match self.fetch_card_by_printing(printing).await {
                Ok(card) => Ok(card),
                Err(e) => {
                    log::warn!(
                        "Printing {} {} of {} not found ({}), falling back to name search",
                        printing.set,
                        printing.collector_number,
                        name,
                        e
                    );
                    self.fetch_card_by_name(name).await
                }
            },
            CardQuery::Named {
                name,
                printing: None,
            } => self.fetch_card_by_name(name).await,
        }
    }
}

#[async_trait]
impl CardLookup for ScryfallClient {
    async fn lookup(&self, query: &CardQuery) -> LookupOutcome {
        match self.fetch(query).await {
            Ok(card) => match card.to_resolved(self.image_size) {
                Some(resolved) => LookupOutcome::Found(resolved),
                None => {
                    log::warn!("No image available for card: {}", card.name);
                    LookupOutcome::NotFound
                }
            },
            Err(e) => {
                log::warn!("Card lookup failed for {:?}: {}", query, e);
                LookupOutcome::NotFound
            }
        }
    }
}

#[cfg(test)]
#[path = "scryfall_tests.rs"]
mod tests;
