//! Card entry model
//!
//! A [`CardEntry`] is one decklist line (or one derived token / face) tracked
//! from parsing through resolution into the assembled TTS deck.

/// Upper bound on the copies a single entry can ask for
pub const MAX_COPIES: u32 = 999;

/// Which stack a card ends up in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Main deck
    Default,
    Commander,
    /// Tokens and the double-faced copies of flip cards
    Additional,
    Sideboard,
    /// Double-faced main deck card, split up by the expander
    Flip,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Default => "default",
            Classification::Commander => "commander",
            Classification::Additional => "additional",
            Classification::Sideboard => "sideboard",
            Classification::Flip => "flip",
        }
    }
}

/// Exact printing of a card (set code + collector number)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Printing {
    pub set: String,
    pub collector_number: String,
}

/// A token (or other related object) a card brings along
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRef {
    pub name: String,
    /// Direct lookup reference, bypasses name search
    pub uri: String,
}

/// What the card lookup knows about a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCard {
    pub name: String,
    pub face_url: String,
    pub back_url: Option<String>,
    pub is_double_faced: bool,
    pub tokens: Vec<TokenRef>,
}

/// How a card is looked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardQuery {
    Named {
        name: String,
        printing: Option<Printing>,
    },
    Reference(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    Pending,
    Resolved,
    Failed,
}

/// One line item: `count` physical copies of a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardEntry {
    /// Lookup / commander-matching name, empty for reference entries
    name: String,
    reference: Option<String>,
    printing: Option<Printing>,
    /// Printed name once resolved, or the token name for reference entries
    display_name: Option<String>,
    count: u32,
    classification: Classification,
    resolution: Resolution,
    face_url: Option<String>,
    back_url: Option<String>,
    tokens: Vec<TokenRef>,
    assigned_ids: Vec<u32>,
}

impl CardEntry {
    /// A card looked up by name. Counts are clamped to `1..=MAX_COPIES`.
    pub fn named(name: impl Into<String>, count: u32, classification: Classification) -> Self {
        Self {
            name: name.into(),
            reference: None,
            printing: None,
            display_name: None,
            count: count.clamp(1, MAX_COPIES),
            classification,
            resolution: Resolution::Pending,
            face_url: None,
            back_url: None,
            tokens: Vec::new(),
            assigned_ids: Vec::new(),
        }
    }

    /// A single token resolved through its direct reference
    pub fn token(token: &TokenRef) -> Self {
        Self {
            name: String::new(),
            reference: Some(token.uri.clone()),
            display_name: Some(token.name.clone()),
            ..Self::named("", 1, Classification::Additional)
        }
    }

    pub fn with_printing(mut self, printing: Option<Printing>) -> Self {
        self.printing = printing;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name shown on the card object and in failure reports
    pub fn label(&self) -> &str {
        if let Some(ref display) = self.display_name {
            if !display.is_empty() {
                return display;
            }
        }
        if !self.name.is_empty() {
            return &self.name;
        }
        self.reference.as_deref().unwrap_or_default()
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    pub fn printing(&self) -> Option<&Printing> {
        self.printing.as_ref()
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn face_url(&self) -> Option<&str> {
        self.face_url.as_deref()
    }

    pub fn back_url(&self) -> Option<&str> {
        self.back_url.as_deref()
    }

    pub fn tokens(&self) -> &[TokenRef] {
        &self.tokens
    }

    pub fn assigned_ids(&self) -> &[u32] {
        &self.assigned_ids
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution == Resolution::Resolved
    }

    pub fn is_failed(&self) -> bool {
        self.resolution == Resolution::Failed
    }

    pub fn is_pending(&self) -> bool {
        self.resolution == Resolution::Pending
    }

    /// The lookup request for this entry
    pub fn query(&self) -> CardQuery {
        match self.reference {
            Some(ref uri) => CardQuery::Reference(uri.clone()),
            None => CardQuery::Named {
                name: self.name.clone(),
                printing: self.printing.clone(),
            },
        }
    }

    /// Record a successful lookup.
    ///
    /// Main deck cards with two printed faces become [`Classification::Flip`];
    /// commanders and sideboard cards keep both faces where they are.
    pub(crate) fn resolve_with(&mut self, card: ResolvedCard) {
        if card.is_double_faced && self.classification == Classification::Default {
            self.classification = Classification::Flip;
        }
        self.display_name = Some(card.name);
        self.face_url = Some(card.face_url);
        self.back_url = card.back_url;
        self.tokens = card.tokens;
        self.resolution = Resolution::Resolved;
    }

    pub(crate) fn mark_failed(&mut self) {
        self.face_url = None;
        self.back_url = None;
        self.tokens.clear();
        self.resolution = Resolution::Failed;
    }

    /// Main deck copy of a flip card: all copies, front face only.
    pub(crate) fn front_face_copy(&self) -> Self {
        Self {
            classification: Classification::Default,
            back_url: None,
            tokens: Vec::new(),
            ..self.clone()
        }
    }

    /// The single double-faced object for the additional stack.
    pub(crate) fn into_double_faced_extra(self) -> Self {
        Self {
            classification: Classification::Additional,
            count: 1,
            ..self
        }
    }

    /// Flip card whose double-faced object already exists elsewhere.
    pub(crate) fn into_front_face_only(self) -> Self {
        Self {
            classification: Classification::Default,
            back_url: None,
            ..self
        }
    }

    pub(crate) fn set_assigned_ids(&mut self, ids: Vec<u32>) {
        self.assigned_ids = ids;
    }
}
