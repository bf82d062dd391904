//! In-memory card lookup for unit tests

use crate::card::{CardQuery, ResolvedCard, TokenRef};
use crate::scryfall::{CardLookup, LookupOutcome};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

pub(crate) fn token_uri(name: &str) -> String {
    format!("token:{}", slug(name))
}

#[derive(Default)]
pub(crate) struct FakeLookup {
    cards: HashMap<String, ResolvedCard>,
    delay: Option<Duration>,
    pub calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl FakeLookup {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(mut self, key: String, card: ResolvedCard) -> Self {
        self.cards.insert(key, card);
        self
    }

    pub fn with_card(self, name: &str) -> Self {
        self.with_tokens(name, &[])
    }

    pub fn with_tokens(mut self, name: &str, tokens: &[&str]) -> Self {
        let tokens: Vec<TokenRef> = tokens
            .iter()
            .map(|token| TokenRef {
                name: token.to_string(),
                uri: token_uri(token),
            })
            .collect();
        for token in &tokens {
            let card = ResolvedCard {
                name: token.name.clone(),
                face_url: format!("https://img.example/token-{}.jpg", slug(&token.name)),
                back_url: None,
                is_double_faced: false,
                tokens: Vec::new(),
            };
            self = self.insert(token.uri.clone(), card);
        }
        let card = ResolvedCard {
            name: name.to_string(),
            face_url: format!("https://img.example/{}.jpg", slug(name)),
            back_url: None,
            is_double_faced: false,
            tokens,
        };
        self.insert(name.to_lowercase(), card)
    }

    pub fn with_flip(self, name: &str) -> Self {
        let card = ResolvedCard {
            name: name.to_string(),
            face_url: format!("https://img.example/{}.jpg", slug(name)),
            back_url: Some(format!("https://img.example/{}-back.jpg", slug(name))),
            is_double_faced: true,
            tokens: Vec::new(),
        };
        self.insert(name.to_lowercase(), card)
    }

    /// Forget a card so its lookup fails
    pub fn without(mut self, key: &str) -> Self {
        self.cards.remove(key);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl CardLookup for FakeLookup {
    async fn lookup(&self, query: &CardQuery) -> LookupOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let key = match query {
            CardQuery::Named { name, .. } => name.to_lowercase(),
            CardQuery::Reference(uri) => uri.clone(),
        };
        let outcome = match self.cards.get(&key) {
            Some(card) => LookupOutcome::Found(card.clone()),
            None => LookupOutcome::NotFound,
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}
