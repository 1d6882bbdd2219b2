pub mod check;
pub mod journal;
pub mod learn;
pub mod practice;
pub mod stats;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use ecue::catalog::card::Card;
use ecue::config::EcueConfig;
use ecue::content;
use ecue::srs::scheduler::Scheduler;
use ecue::srs::state::JsonFileStore;
use ecue::variant::emotion::{self, DEFINITION_INPUT_ID};
use ecue::variant::{flashcard::FlashcardVariant, VariantSet};

/// The flashcard deck: every variant over `cards.json`.
pub fn flashcard_variants(config: &EcueConfig) -> Result<VariantSet> {
    let entries = content::load_flashcards(&config.cards_path())?;
    Ok(VariantSet::new(FlashcardVariant::all(entries)))
}

/// The emotion deck: every variant over the emotion list and the feelings wheel.
pub fn emotion_variants(config: &EcueConfig) -> Result<VariantSet> {
    let emotions = content::load_emotions(&config.emotions_path())?;
    let wheel = content::load_feelings_wheel(&config.feelings_wheel_path())?;
    Ok(VariantSet::new(emotion::all(emotions, wheel)))
}

pub fn learn_store(config: &EcueConfig) -> JsonFileStore {
    JsonFileStore::new(config.learn_state_path())
}

/// Practice state predates variant-prefixed ids; bare keys belong to definition-input.
pub fn practice_store(config: &EcueConfig) -> JsonFileStore {
    JsonFileStore::new(config.practice_state_path()).with_legacy_prefix(DEFINITION_INPUT_ID)
}

pub fn open_scheduler(
    config: &EcueConfig,
    variants: &VariantSet,
    store: JsonFileStore,
) -> Result<Scheduler<Card, JsonFileStore>> {
    let catalog = variants.catalog().context("failed to build card catalog")?;
    let options = config.scheduler_options();
    Ok(match config.scheduler.seed {
        Some(seed) => Scheduler::with_seed(catalog, store, options, seed),
        None => Scheduler::new(catalog, store, options),
    })
}

/// Randomness for question rendering, kept apart from the scheduler's shuffle.
pub fn question_rng(config: &EcueConfig) -> StdRng {
    match config.scheduler.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_entropy(),
    }
}
