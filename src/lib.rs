//! Tabletop Deck - MTG decklists for Tabletop Simulator
//!
//! Turns a pasted decklist (or a Moxfield / Archidekt link) into a TTS saved
//! object with the main deck, commanders, sideboard and a stack of tokens and
//! double-faced cards. Card images come from Scryfall.

pub mod card;
pub mod config;
pub mod decklist_url;
pub mod error;
pub mod expander;
pub mod parser;
pub mod pipeline;
pub mod resolver;
pub mod scryfall;
pub mod sink;
pub mod tabletop;
pub mod web;

#[cfg(test)]
mod test_support;

pub use card::{CardEntry, Classification};
pub use config::Config;
pub use error::{DeckError, Result};
pub use pipeline::{BuildOutcome, BuiltDeck, DeckBuilder, DeckRequest};
pub use scryfall::{CardLookup, LookupOutcome, ScryfallClient};
pub use sink::{DirectorySink, DownloadSink, StdoutSink};
pub use tabletop::{TabletopOutput, UnresolvedCards};
