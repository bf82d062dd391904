//! Concurrent card resolution
//!
//! Every pending entry is looked up at once (bounded by a semaphore) and the
//! call only returns once the whole batch is done. Results are written back
//! on the calling task, so entries are never touched concurrently.

use crate::card::{CardEntry, CardQuery};
use crate::config::Config;
use crate::scryfall::{CardLookup, LookupOutcome};
use futures::future::join_all;
use std::time::Duration;
use tokio::sync::Semaphore;

#[derive(Debug, Clone, Copy)]
pub struct ResolveOptions {
    pub max_concurrent: usize,
    pub timeout: Duration,
}

impl ResolveOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_concurrent: permits(config.max_concurrent_lookups),
            timeout: config.lookup_timeout(),
        }
    }
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Semaphore size for a requested concurrency
fn permits(max_concurrent: usize) -> usize {
    max_concurrent.clamp(1, Semaphore::MAX_PERMITS)
}

async fn lookup_one<L: CardLookup + ?Sized>(
    lookup: &L,
    semaphore: &Semaphore,
    query: &CardQuery,
    timeout: Duration,
) -> LookupOutcome {
    let Ok(_permit) = semaphore.acquire().await else {
        return LookupOutcome::NotFound;
    };
    match tokio::time::timeout(timeout, lookup.lookup(query)).await {
        Ok(outcome) => outcome,
        Err(_) => {
            log::warn!("Card lookup timed out after {:?}: {:?}", timeout, query);
            LookupOutcome::NotFound
        }
    }
}

/// Resolve every pending entry in `entries`.
///
/// Already resolved or failed entries are left alone. Returns the number of
/// entries that failed in this batch.
pub async fn resolve_all<L: CardLookup + ?Sized>(
    lookup: &L,
    entries: &mut [CardEntry],
    options: ResolveOptions,
) -> usize {
    let pending: Vec<(usize, CardQuery)> = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.is_pending())
        .map(|(index, entry)| (index, entry.query()))
        .collect();

    if pending.is_empty() {
        return 0;
    }

    log::info!(
        "Resolving {} cards ({} at a time)",
        pending.len(),
        options.max_concurrent
    );

    let semaphore = Semaphore::new(permits(options.max_concurrent));
    let outcomes = join_all(
        pending
            .iter()
            .map(|(_, query)| lookup_one(lookup, &semaphore, query, options.timeout)),
    )
    .await;

    let mut failed = 0;
    for ((index, _), outcome) in pending.into_iter().zip(outcomes) {
        let entry = &mut entries[index];
        match outcome {
            LookupOutcome::Found(card) => entry.resolve_with(card),
            LookupOutcome::NotFound => {
                log::warn!(
                    "Card not found: {} ({})",
                    entry.label(),
                    entry.classification().as_str()
                );
                entry.mark_failed();
                failed += 1;
            }
        }
    }

    log::info!("Resolution finished, {} failed", failed);
    failed
}
