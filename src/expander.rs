//! Derived entries: tokens and double-faced cards
//!
//! Runs once between the two resolution passes. Tokens become `Additional`
//! entries looked up by reference; each flip card is split into a front-only
//! main deck entry and a single double-faced object in the additional stack.

use crate::card::{CardEntry, Classification};
use std::collections::HashSet;

/// Names of derived objects that already have an entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenRegistry {
    names: HashSet<String>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Returns `false` if the name was already registered
    pub fn register(&mut self, name: &str) -> bool {
        self.names.insert(name.to_string())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for TokenRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Expanded entry list and the registry after the scan
#[derive(Debug)]
pub struct Expansion {
    pub entries: Vec<CardEntry>,
    pub registry: TokenRegistry,
}

impl Expansion {
    /// Number of entries that still need a lookup
    pub fn pending(&self) -> usize {
        self.entries.iter().filter(|e| e.is_pending()).count()
    }
}

/// Scan resolved entries in order and append their derived entries.
///
/// Entries keep their positions; new entries go to the end in the order they
/// are discovered. Unresolved entries pass through untouched.
pub fn expand(entries: Vec<CardEntry>, mut registry: TokenRegistry) -> Expansion {
    let mut scanned = Vec::with_capacity(entries.len());
    let mut derived = Vec::new();

    for entry in entries {
        if !entry.is_resolved() {
            scanned.push(entry);
            continue;
        }

        for token in entry.tokens() {
            if registry.register(&token.name) {
                log::debug!("Adding token {} from {}", token.name, entry.label());
                derived.push(CardEntry::token(token));
            }
        }

        if entry.classification() != Classification::Flip {
            scanned.push(entry);
            continue;
        }

        let name = entry.label().to_string();
        if registry.contains(&name) {
            // double-faced object already exists, keep this one front side up
            scanned.push(entry.into_front_face_only());
        } else {
            log::debug!("Splitting flip card {}", name);
            derived.push(entry.front_face_copy());
            registry.register(&name);
            scanned.push(entry.into_double_faced_extra());
        }
    }

    log::info!(
        "Expansion added {} entries ({} registered tokens)",
        derived.len(),
        registry.len()
    );

    scanned.extend(derived);
    Expansion {
        entries: scanned,
        registry,
    }
}
