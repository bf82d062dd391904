//! Tabletop Simulator save object generation
//!
//! Groups resolved entries into one `DeckCustom` per stack and numbers every
//! physical card. Field names follow the TTS save format, so the serialized
//! document can be dropped straight into the game's saved objects folder.

use crate::card::{CardEntry, Classification};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Stacks holding this many cards or fewer get a padding card
pub const PADDING_THRESHOLD: u32 = 2;
pub const PADDING_NICKNAME: &str = "Padding";
/// Largest stack the assembler builds
pub const MAX_STACK_CARDS: u32 = 10_000;

/// Physical stacks in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeckType {
    Default,
    Additional,
    Commander,
    Sideboard,
}

impl DeckType {
    pub const ALL: [DeckType; 4] = [
        DeckType::Default,
        DeckType::Additional,
        DeckType::Commander,
        DeckType::Sideboard,
    ];

    /// Table position (x, z) of the stack
    pub fn offset(&self) -> (f32, f32) {
        match self {
            DeckType::Default => (0.0, 0.0),
            DeckType::Additional => (4.0, 0.0),
            DeckType::Commander => (0.0, 4.0),
            DeckType::Sideboard => (0.0, -4.0),
        }
    }

    pub fn of(classification: Classification) -> Self {
        match classification {
            // a flip card that was never split still belongs in the main deck
            Classification::Default | Classification::Flip => DeckType::Default,
            Classification::Additional => DeckType::Additional,
            Classification::Commander => DeckType::Commander,
            Classification::Sideboard => DeckType::Sideboard,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TabletopOutput {
    #[serde(rename = "ObjectStates")]
    pub object_states: Vec<DeckBox>,
}

impl TabletopOutput {
    /// Physical cards across all stacks, padding excluded
    pub fn card_count(&self) -> usize {
        self.object_states.iter().map(DeckBox::card_count).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct DeckBox {
    pub name: String,
    pub contained_objects: Vec<CardObject>,
    #[serde(rename = "DeckIDs")]
    pub deck_ids: Vec<u32>,
    pub custom_deck: BTreeMap<String, CustomCard>,
    pub transform: Transform,
    #[serde(skip)]
    pub padded: bool,
}

impl DeckBox {
    fn new(deck_type: DeckType) -> Self {
        let (pos_x, pos_z) = deck_type.offset();
        Self {
            name: "DeckCustom".to_string(),
            contained_objects: Vec::new(),
            deck_ids: Vec::new(),
            custom_deck: BTreeMap::new(),
            transform: Transform {
                pos_x,
                pos_y: 1.0,
                pos_z,
                rot_z: 0.0,
                ..Transform::default()
            },
            padded: false,
        }
    }

    pub fn card_count(&self) -> usize {
        self.contained_objects.len() - usize::from(self.padded)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct CardObject {
    #[serde(rename = "CardID")]
    pub card_id: u32,
    pub name: String,
    pub nickname: String,
    pub transform: Transform,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct CustomCard {
    #[serde(rename = "FaceURL")]
    pub face_url: String,
    #[serde(rename = "BackURL")]
    pub back_url: String,
    pub num_height: u32,
    pub num_width: u32,
    pub back_is_hidden: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    pub pos_x: f32,
    pub pos_y: f32,
    pub pos_z: f32,
    pub rot_x: f32,
    pub rot_y: f32,
    pub rot_z: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub scale_z: f32,
}

/// Face down card lying in a stack
impl Default for Transform {
    fn default() -> Self {
        Self {
            pos_x: 0.0,
            pos_y: 0.0,
            pos_z: 0.0,
            rot_x: 0.0,
            rot_y: 180.0,
            rot_z: 180.0,
            scale_x: 1.0,
            scale_y: 1.0,
            scale_z: 1.0,
        }
    }
}

/// Cards that could not be resolved, in the order they were found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedCards(pub Vec<String>);

impl fmt::Display for UnresolvedCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("\n"))
    }
}

/// Why no document was assembled
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssembleError {
    #[error("{0}")]
    Unresolved(UnresolvedCards),
    #[error("{deck_type:?} stack has {count} cards, at most {limit} are supported")]
    TooManyCards {
        deck_type: DeckType,
        count: u64,
        limit: u32,
    },
}

/// `counter * 100 + ordinal`, `None` on overflow
pub fn card_id_for(counter: u32, ordinal: u32) -> Option<u32> {
    counter.checked_mul(100)?.checked_add(ordinal)
}

/// Distinct labels of failed entries, first occurrence first
pub fn failed_names(entries: &[CardEntry]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for entry in entries.iter().filter(|e| e.is_failed()) {
        if !names.iter().any(|n| n == entry.label()) {
            names.push(entry.label().to_string());
        }
    }
    names
}

/// File name stem for a deck: first commander, else the first decklist line.
///
/// Derived entries are appended after the parsed ones, so the first entry is
/// always a decklist line.
pub fn file_stem(entries: &[CardEntry]) -> String {
    entries
        .iter()
        .find(|e| e.classification() == Classification::Commander)
        .or_else(|| entries.first())
        .map(|e| e.label().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "deck".to_string())
}

/// Builds the TTS document from resolved entries
pub struct Assembler<'a> {
    card_back_url: &'a str,
}

impl<'a> Assembler<'a> {
    pub fn new(card_back_url: &'a str) -> Self {
        Self { card_back_url }
    }

    fn custom_card(&self, face_url: Option<&str>, back_url: Option<&str>) -> CustomCard {
        CustomCard {
            face_url: face_url.unwrap_or(self.card_back_url).to_string(),
            back_url: back_url.unwrap_or(self.card_back_url).to_string(),
            num_height: 1,
            num_width: 1,
            back_is_hidden: true,
        }
    }

    /// Assemble all stacks.
    ///
    /// Nothing is built if any entry failed (the failed names come back
    /// instead) or a stack is larger than [`MAX_STACK_CARDS`]. Each card gets
    /// `counter * 100 + stack ordinal` as its ID, where the counter restarts
    /// at 1 per stack, and the IDs are recorded on the entries.
    pub fn assemble(
        &self,
        entries: &mut [CardEntry],
    ) -> std::result::Result<TabletopOutput, AssembleError> {
        let failed = failed_names(entries);
        if !failed.is_empty() {
            return Err(AssembleError::Unresolved(UnresolvedCards(failed)));
        }

        let mut present = Vec::with_capacity(DeckType::ALL.len());
        for deck_type in DeckType::ALL {
            let count: u64 = entries
                .iter()
                .filter(|e| DeckType::of(e.classification()) == deck_type)
                .map(|e| u64::from(e.count()))
                .sum();
            if count == 0 {
                continue;
            }
            if count > u64::from(MAX_STACK_CARDS) {
                return Err(AssembleError::TooManyCards {
                    deck_type,
                    count,
                    limit: MAX_STACK_CARDS,
                });
            }
            present.push(deck_type);
        }

        let mut object_states = Vec::with_capacity(present.len());
        for (ordinal, deck_type) in present.into_iter().enumerate() {
            let ordinal = ordinal as u32;
            let overflow = |counter: u32| AssembleError::TooManyCards {
                deck_type,
                count: u64::from(counter),
                limit: MAX_STACK_CARDS,
            };
            let mut deck = DeckBox::new(deck_type);
            let mut counter: u32 = 1;

            for entry in entries
                .iter_mut()
                .filter(|e| DeckType::of(e.classification()) == deck_type)
            {
                let mut ids = Vec::with_capacity(entry.count() as usize);
                for _ in 0..entry.count() {
                    let card_id = card_id_for(counter, ordinal).ok_or_else(|| overflow(counter))?;
                    deck.deck_ids.push(card_id);
                    deck.contained_objects.push(CardObject {
                        card_id,
                        name: "Card".to_string(),
                        nickname: entry.label().to_string(),
                        transform: Transform::default(),
                    });
                    deck.custom_deck.insert(
                        counter.to_string(),
                        self.custom_card(entry.face_url(), entry.back_url()),
                    );
                    ids.push(card_id);
                    counter += 1;
                }
                entry.set_assigned_ids(ids);
            }

            if counter - 1 <= PADDING_THRESHOLD {
                let card_id = card_id_for(counter, ordinal).ok_or_else(|| overflow(counter))?;
                deck.deck_ids.insert(0, card_id);
                deck.contained_objects.insert(
                    0,
                    CardObject {
                        card_id,
                        name: "Card".to_string(),
                        nickname: PADDING_NICKNAME.to_string(),
                        transform: Transform::default(),
                    },
                );
                deck.custom_deck
                    .insert(counter.to_string(), self.custom_card(None, None));
                deck.padded = true;
            }

            log::info!(
                "Built {:?} stack with {} cards{}",
                deck_type,
                deck.card_count(),
                if deck.padded { " (padded)" } else { "" }
            );
            object_states.push(deck);
        }

        Ok(TabletopOutput { object_states })
    }
}

#[cfg(test)]
#[path = "tabletop_tests.rs"]
mod tests;
