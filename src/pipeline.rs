//! Decklist to TTS deck pipeline
//!
//! parse → resolve → expand → resolve derived entries → assemble.
//! Unknown cards do not abort the run; they are collected and returned
//! together instead of a deck.

use crate::card::CardEntry;
use crate::config::Config;
use crate::decklist_url::{is_valid_http_url, DecklistSource, HttpDecklistSource};
use crate::error::{DeckError, Result};
use crate::expander::{expand, TokenRegistry};
use crate::parser::{commander_names, parse_decklist};
use crate::resolver::{resolve_all, ResolveOptions};
use crate::scryfall::{CardLookup, ScryfallClient};
use crate::tabletop::{file_stem, AssembleError, Assembler, TabletopOutput, UnresolvedCards};
use serde::Deserialize;
use std::sync::Arc;

/// The three input fields of the deck form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeckRequest {
    pub commander: String,
    pub partner: String,
    pub decklist: String,
}

impl DeckRequest {
    /// No commander and no decklist; a partner on its own is not a deck
    pub fn is_empty(&self) -> bool {
        self.commander.trim().is_empty() && self.decklist.trim().is_empty()
    }
}

/// A finished deck ready to hand to a download sink
#[derive(Debug, Clone)]
pub struct BuiltDeck {
    pub file_name: String,
    pub document: TabletopOutput,
    pub entries: Vec<CardEntry>,
}

#[derive(Debug, Clone)]
pub enum BuildOutcome {
    /// Nothing was entered
    Empty,
    /// Some cards could not be found, no deck was built
    Unresolved(UnresolvedCards),
    Built(BuiltDeck),
}

/// Runs the whole conversion for one request
#[derive(Clone)]
pub struct DeckBuilder {
    lookup: Arc<dyn CardLookup>,
    source: Arc<dyn DecklistSource>,
    options: ResolveOptions,
    card_back_url: String,
}

impl DeckBuilder {
    pub fn new(
        lookup: Arc<dyn CardLookup>,
        source: Arc<dyn DecklistSource>,
        config: &Config,
    ) -> Self {
        Self {
            lookup,
            source,
            options: ResolveOptions::from_config(config),
            card_back_url: config.card_back_url.clone(),
        }
    }

    /// Scryfall for cards, Moxfield / Archidekt / plain text for deck URLs
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(ScryfallClient::new(config)),
            Arc::new(HttpDecklistSource::new(config)),
            config,
        )
    }

    async fn decklist_lines(&self, decklist: &str) -> Result<Vec<String>> {
        let lines: Vec<String> = decklist.lines().map(str::to_string).collect();
        match lines.first().and_then(|first| is_valid_http_url(first)) {
            Some(url) => {
                log::info!("Decklist is a URL, downloading {}", url);
                self.source.fetch_lines(&url).await
            }
            None => Ok(lines),
        }
    }

    /// Build a deck.
    ///
    /// Errors for decklist URLs that cannot be fetched (before any card
    /// lookup) and for decks too large to assemble.
    pub async fn build(&self, request: &DeckRequest) -> Result<BuildOutcome> {
        if request.is_empty() {
            return Ok(BuildOutcome::Empty);
        }

        let lines = self.decklist_lines(&request.decklist).await?;
        let commanders = commander_names(&request.commander, &request.partner);
        let mut parsed = parse_decklist(&lines, &commanders);
        if parsed.entries.is_empty() {
            log::info!("Decklist has no cards");
            return Ok(BuildOutcome::Empty);
        }

        resolve_all(self.lookup.as_ref(), &mut parsed.entries, self.options).await;

        let expansion = expand(parsed.entries, TokenRegistry::new());
        let mut entries = expansion.entries;
        resolve_all(self.lookup.as_ref(), &mut entries, self.options).await;

        let document = match Assembler::new(&self.card_back_url).assemble(&mut entries) {
            Ok(document) => document,
            Err(AssembleError::Unresolved(unresolved)) => {
                log::warn!("{} cards could not be resolved", unresolved.0.len());
                return Ok(BuildOutcome::Unresolved(unresolved));
            }
            Err(e) => return Err(DeckError::DeckTooLarge(e.to_string())),
        };

        let file_name = format!("{}.json", file_stem(&entries));
        log::info!(
            "Built {} with {} cards in {} stacks",
            file_name,
            document.card_count(),
            document.object_states.len()
        );

        Ok(BuildOutcome::Built(BuiltDeck {
            file_name,
            document,
            entries,
        }))
    }
}
