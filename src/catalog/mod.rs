//! The loaded set of reviewable cards.
//!
//! A [`Catalog`] is built once per session, either from ready-made cards via
//! [`Catalog::new`] or by asking each selected variant for its cards via
//! [`Catalog::from_variants`]. Any [`CatalogError`] aborts the whole load;
//! partial catalogs are never produced.

pub mod card;

use std::collections::HashMap;
use thiserror::Error;

use crate::srs::Reviewable;
use crate::variant::CardVariant;
use card::Card;

#[derive(Error, Debug, PartialEq)]
pub enum CatalogError {
    #[error("duplicate card identifier: {0}")]
    DuplicateId(String),

    #[error("no valid cards were loaded{}", source_hint(.0))]
    Empty(Option<String>),

    #[error("card '{0}' requires a non-empty options list")]
    MissingOptions(String),

    #[error("card '{0}' produced no valid options")]
    NoValidOptions(String),

    #[error("card '{prompt}' {reason}")]
    InvalidAnswer { prompt: String, reason: String },

    #[error("not enough distinct answers to build multiple-choice options (need {needed}, found {found})")]
    NotEnoughDistractors { needed: usize, found: usize },

    #[error("malformed content in {file}: {reason}")]
    Malformed { file: String, reason: String },
}

fn source_hint(source: &Option<String>) -> String {
    source
        .as_deref()
        .map(|s| format!(" from {s}"))
        .unwrap_or_default()
}

/// Ordered cards plus an id lookup.
#[derive(Debug, Clone)]
pub struct Catalog<C> {
    cards: Vec<C>,
    index: HashMap<String, usize>,
}

impl<C: Reviewable> Catalog<C> {
    /// Validate and index `cards`. Fails on any duplicate id or an empty set.
    pub fn new(cards: Vec<C>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(cards.len());
        for (idx, card) in cards.iter().enumerate() {
            if index.insert(card.card_id().to_string(), idx).is_some() {
                return Err(CatalogError::DuplicateId(card.card_id().to_string()));
            }
        }
        if cards.is_empty() {
            return Err(CatalogError::Empty(None));
        }
        Ok(Self { cards, index })
    }

    pub fn cards(&self) -> &[C] {
        &self.cards
    }

    pub fn get(&self, card_id: &str) -> Option<&C> {
        self.index.get(card_id).map(|&idx| &self.cards[idx])
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &C> {
        self.cards.iter()
    }
}

impl Catalog<Card> {
    /// Collect every card each variant builds, in variant order.
    pub fn from_variants(variants: &[Box<dyn CardVariant>]) -> Result<Self, CatalogError> {
        let mut cards = Vec::new();
        for variant in variants {
            let built = variant.build_cards()?;
            tracing::debug!(variant = variant.id(), cards = built.len(), "variant cards built");
            cards.extend(built);
        }
        let catalog = Self::new(cards)?;
        tracing::info!(cards = catalog.len(), variants = variants.len(), "catalog loaded");
        Ok(catalog)
    }
}
