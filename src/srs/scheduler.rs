//! Card selection and progress updates for one review session.
//!
//! Selection order on every call: the earliest-due reviewed card, then a card
//! from the session's shuffled new-card pool, then the earliest upcoming card.
//! When nothing qualifies the session ends, unless endless practice is enabled,
//! in which case a uniformly random card is returned.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::schedule::apply_review;
use super::state::ProgressStore;
use super::timestamp::utc_now;
use super::types::{ProgressRecord, ProgressState};
use super::Reviewable;
use crate::catalog::Catalog;

/// Session-level selection switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerOptions {
    /// Keep serving random cards once due, new, and upcoming are exhausted.
    pub endless_practice: bool,
}

/// Summary of a deck against its stored progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeckStats {
    pub cards: usize,
    pub reviewed: usize,
    pub new: usize,
    pub due_now: usize,
    /// Reviewed cards falling due within the next seven days, due ones included.
    pub due_within_week: usize,
    /// Mean ease over reviewed cards.
    pub mean_ease: Option<f64>,
}

pub struct Scheduler<C, S> {
    catalog: Catalog<C>,
    state: ProgressState,
    store: S,
    /// Catalog indices of cards with no record at session start, drawn from the back.
    new_pool: Vec<usize>,
    rng: StdRng,
    options: SchedulerOptions,
}

impl<C: Reviewable, S: ProgressStore> Scheduler<C, S> {
    /// Start a session with an entropy-seeded shuffle of the new cards.
    pub fn new(catalog: Catalog<C>, store: S, options: SchedulerOptions) -> Self {
        Self::with_rng(catalog, store, options, StdRng::from_entropy())
    }

    /// Start a session with a reproducible shuffle.
    pub fn with_seed(catalog: Catalog<C>, store: S, options: SchedulerOptions, seed: u64) -> Self {
        Self::with_rng(catalog, store, options, StdRng::seed_from_u64(seed))
    }

    fn with_rng(catalog: Catalog<C>, store: S, options: SchedulerOptions, mut rng: StdRng) -> Self {
        let state = store.load();

        let mut new_pool: Vec<usize> = catalog
            .cards()
            .iter()
            .enumerate()
            .filter(|(_, card)| !state.contains(card.card_id()))
            .map(|(idx, _)| idx)
            .collect();
        new_pool.shuffle(&mut rng);

        tracing::info!(
            cards = catalog.len(),
            records = state.len(),
            new = new_pool.len(),
            "review session started"
        );

        Self {
            catalog,
            state,
            store,
            new_pool,
            rng,
            options,
        }
    }

    /// Next card to present, evaluated against the current time.
    pub fn next_card(&mut self) -> Option<&C> {
        self.next_card_at(utc_now())
    }

    pub fn next_card_at(&mut self, now: DateTime<Utc>) -> Option<&C> {
        let mut earliest_due: Option<(DateTime<Utc>, usize)> = None;
        let mut earliest_upcoming: Option<(DateTime<Utc>, usize)> = None;

        for (idx, card) in self.catalog.cards().iter().enumerate() {
            let Some(record) = self.state.get(card.card_id()) else {
                continue;
            };
            let key = (record.next_due, idx);
            let slot = if record.is_due(now) {
                &mut earliest_due
            } else {
                &mut earliest_upcoming
            };
            if slot.map_or(true, |current| key < current) {
                *slot = Some(key);
            }
        }

        let idx = if let Some((_, idx)) = earliest_due {
            idx
        } else if let Some(idx) = self.new_pool.pop() {
            idx
        } else if let Some((_, idx)) = earliest_upcoming {
            idx
        } else if self.options.endless_practice && !self.catalog.is_empty() {
            self.rng.gen_range(0..self.catalog.len())
        } else {
            return None;
        };

        self.catalog.cards().get(idx)
    }

    /// Record a judged answer for `card` and persist the whole state.
    pub fn update_progress(&mut self, card: &C, correct: bool) -> Result<ProgressRecord> {
        self.update_progress_at(card, correct, utc_now())
    }

    /// Record a judged answer at `now`.
    ///
    /// The in-memory record is updated before the save; a save failure is
    /// returned to the caller.
    pub fn update_progress_at(
        &mut self,
        card: &C,
        correct: bool,
        now: DateTime<Utc>,
    ) -> Result<ProgressRecord> {
        let card_id = card.card_id();
        if self.catalog.get(card_id).is_none() {
            bail!("card is not in the loaded catalog: {card_id}");
        }

        let record = apply_review(self.state.get(card_id), correct, now);

        // a card reviewed out of pool order is no longer new
        let cards = self.catalog.cards();
        self.new_pool.retain(|&idx| cards[idx].card_id() != card_id);

        self.state.cards.insert(card_id.to_string(), record.clone());
        self.store
            .save(&self.state)
            .with_context(|| format!("failed to persist progress for {card_id}"))?;

        tracing::debug!(
            card_id,
            correct,
            streak = record.streak,
            interval = record.interval,
            ease = record.ease,
            "progress updated"
        );
        Ok(record)
    }

    /// New cards not yet drawn this session.
    pub fn remaining_new(&self) -> usize {
        self.new_pool.len()
    }

    /// Catalog cards whose record is due now.
    pub fn due_count(&self) -> usize {
        self.due_count_at(utc_now())
    }

    pub fn due_count_at(&self, now: DateTime<Utc>) -> usize {
        self.catalog
            .cards()
            .iter()
            .filter_map(|card| self.state.get(card.card_id()))
            .filter(|record| record.is_due(now))
            .count()
    }

    pub fn progress(&self, card_id: &str) -> Option<&ProgressRecord> {
        self.state.get(card_id)
    }

    pub fn catalog(&self) -> &Catalog<C> {
        &self.catalog
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn deck_stats_at(&self, now: DateTime<Utc>) -> DeckStats {
        let week = now + Duration::days(7);
        let records: Vec<&ProgressRecord> = self
            .catalog
            .cards()
            .iter()
            .filter_map(|card| self.state.get(card.card_id()))
            .collect();

        let mean_ease = (!records.is_empty())
            .then(|| super::round_ease(records.iter().map(|r| r.ease).sum::<f64>() / records.len() as f64));

        DeckStats {
            cards: self.catalog.len(),
            reviewed: records.len(),
            new: self.catalog.len() - records.len(),
            due_now: records.iter().filter(|r| r.is_due(now)).count(),
            due_within_week: records.iter().filter(|r| r.next_due <= week).count(),
            mean_ease,
        }
    }
}
