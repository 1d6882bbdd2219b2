mod helpers;

use ecue::content;
use ecue::session::{run_session, SessionStats};
use ecue::srs::state::{MemoryStore, ProgressStore};
use ecue::srs::types::ReviewResult;
use ecue::variant::flashcard::FlashcardVariant;
use ecue::variant::VariantSet;
use helpers::{emotion_set, seeded, write_json};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};
use std::io::Cursor;
use tempfile::TempDir;

fn single_card_set(dir: &TempDir, card: Value) -> VariantSet {
    let path = write_json(dir.path(), "cards.json", &json!([card]));
    VariantSet::new(FlashcardVariant::all(content::load_flashcards(&path).unwrap()))
}

fn definition_card() -> Value {
    json!({"variant": "definition", "front": {"prompt": "Calm satisfaction?"}, "back": "Contentment"})
}

fn run(variants: &VariantSet, store: &mut MemoryStore, input: &str) -> (SessionStats, String) {
    let mut scheduler = seeded(variants, std::mem::take(store), 4);
    let mut rng = StdRng::seed_from_u64(4);
    let mut out = Vec::new();
    let stats = run_session(&mut scheduler, variants, &mut rng, &mut Cursor::new(input), &mut out).unwrap();
    *store = MemoryStore::new(scheduler.store().snapshot());
    (stats, String::from_utf8(out).unwrap())
}

#[test]
fn correct_answer_is_counted_and_persisted() {
    let dir = TempDir::new().unwrap();
    let variants = single_card_set(&dir, definition_card());
    let mut store = MemoryStore::default();

    let (stats, out) = run(&variants, &mut store, "  contentment \n");

    assert_eq!(stats, SessionStats { total: 1, correct: 1 });
    assert!(out.contains("Calm satisfaction?"));
    assert!(out.contains("✅ Correct!"));
    assert!(out.contains("Next review for this card in ~1 day."));
    assert!(out.contains("Progress: 1/1 correct | 0 due | 0 new remaining"));
    // input ran out while the card was shown again
    assert!(out.contains("No input detected."));

    let record = store.load().cards.into_values().next().unwrap();
    assert_eq!(record.streak, 1);
    assert_eq!(record.last_result, Some(ReviewResult::Correct));
}

#[test]
fn incorrect_answer_comes_back_in_four_hours() {
    let dir = TempDir::new().unwrap();
    let variants = single_card_set(&dir, definition_card());
    let mut store = MemoryStore::default();

    let (stats, out) = run(&variants, &mut store, "boredom\n");

    assert_eq!(stats, SessionStats { total: 1, correct: 0 });
    assert!(out.contains("❌ Incorrect. Correct answer: Contentment"));
    assert!(out.contains("Next review for this card in ~4 hours."));
    assert_eq!(store.load().cards.values().next().unwrap().interval, 0);
}

#[test]
fn empty_lines_reprompt_without_counting() {
    let dir = TempDir::new().unwrap();
    let variants = single_card_set(&dir, definition_card());
    let mut store = MemoryStore::default();

    let (stats, out) = run(&variants, &mut store, "\n   \ncontentment\nq\n");

    assert_eq!(stats, SessionStats { total: 1, correct: 1 });
    assert_eq!(out.matches("Please enter a response").count(), 2);
    assert!(out.contains("Exiting session..."));
}

#[test]
fn unrecognized_choice_retries_without_mutation() {
    let dir = TempDir::new().unwrap();
    let variants = single_card_set(
        &dir,
        json!({
            "variant": "multiple-choice",
            "front": {"prompt": "Pick the boundary emotion", "options": [
                {"text": "Anger", "value": "anger"},
                {"text": "Joy", "value": "joy"}
            ]},
            "back": "anger"
        }),
    );
    let mut store = MemoryStore::default();

    let (stats, out) = run(&variants, &mut store, "purple\n7\nexit\n");

    assert_eq!(stats, SessionStats::default());
    assert_eq!(out.matches("Input not recognized").count(), 2);
    assert!(out.contains("1. Anger"));
    assert!(store.load().is_empty());
}

#[test]
fn quitting_immediately_saves_nothing() {
    let dir = TempDir::new().unwrap();
    let variants = single_card_set(&dir, definition_card());
    let mut store = MemoryStore::default();

    let (stats, out) = run(&variants, &mut store, "QUIT\n");

    assert_eq!(stats, SessionStats::default());
    assert!(out.contains("Exiting session..."));
    assert!(store.load().is_empty());
}

#[test]
fn practice_deck_runs_every_variant_through_the_loop() {
    let dir = TempDir::new().unwrap();
    let variants = emotion_set(dir.path());
    let catalog_size = variants.catalog().unwrap().len();
    let mut store = MemoryStore::default();

    // "1" is a valid answer shape for both choice variants and wrong or right
    // for free text, so every card is judged
    let input = "1\n".repeat(catalog_size);
    let (stats, _) = run(&variants, &mut store, &input);

    assert_eq!(stats.total as usize, catalog_size);
    assert_eq!(store.load().len(), catalog_size);
}
