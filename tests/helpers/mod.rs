#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use ecue::catalog::card::Card;
use ecue::content;
use ecue::srs::scheduler::{Scheduler, SchedulerOptions};
use ecue::srs::state::{JsonFileStore, ProgressStore};
use ecue::variant::emotion;
use ecue::variant::flashcard::FlashcardVariant;
use ecue::variant::VariantSet;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A fixed review clock: 2025-04-01 09:00:00 UTC.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).unwrap()
}

/// Write `value` as pretty JSON under `dir` and return the path.
pub fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

/// One card of each flashcard variant.
pub fn sample_cards() -> Value {
    json!([
        {
            "variant": "definition",
            "front": {"prompt": "Name the feeling of calm satisfaction."},
            "back": "Contentment",
            "tags": ["pleasant"]
        },
        {
            "variant": "multiple-choice",
            "front": {
                "prompt": "Which emotion signals a boundary was crossed?",
                "options": [
                    {"text": "Anger", "value": "anger"},
                    {"text": "Joy", "value": "joy"},
                    {"text": "Awe", "value": "awe"}
                ]
            },
            "back": "anger",
            "source": {"text": "Atlas of the Heart", "url": "https://example.org/atlas"}
        },
        {
            "variant": "true-false",
            "front": {
                "prompt": "Shame and guilt are the same emotion.",
                "options": [
                    {"text": "True", "value": true},
                    {"text": "False", "value": false}
                ]
            },
            "back": false
        }
    ])
}

pub fn sample_emotions() -> Value {
    json!([
        {"emotion": "Joy", "definition": "A feeling of great pleasure", "quadrant": "High Pleasant"},
        {"emotion": "Calm", "definition": "Free from agitation", "quadrant": "Low Pleasant"},
        {"emotion": "Dread", "definition": "Anticipation of something bad", "quadrant": "High Unpleasant"},
        {"emotion": "Gloom", "definition": "A state of low spirits"}
    ])
}

pub fn sample_wheel() -> Value {
    json!([
        {"primary": "Happy", "secondary": "Playful", "tertiary": "Cheeky"},
        {"primary": "Happy", "secondary": "Content", "tertiary": "Free"},
        {"primary": "Sad", "secondary": "Lonely", "tertiary": "Isolated"}
    ])
}

pub fn flashcard_set(dir: &Path) -> VariantSet {
    let path = write_json(dir, "cards.json", &sample_cards());
    VariantSet::new(FlashcardVariant::all(content::load_flashcards(&path).unwrap()))
}

pub fn emotion_set(dir: &Path) -> VariantSet {
    let emotions = write_json(dir, "emotions.json", &sample_emotions());
    let wheel = write_json(dir, "feelings_wheel.json", &sample_wheel());
    VariantSet::new(emotion::all(
        content::load_emotions(&emotions).unwrap(),
        content::load_feelings_wheel(&wheel).unwrap(),
    ))
}

/// A seeded scheduler over `variants`, persisting to `state.json` in `dir`.
pub fn file_scheduler(dir: &TempDir, variants: &VariantSet, seed: u64) -> Scheduler<Card, JsonFileStore> {
    let store = JsonFileStore::new(dir.path().join("state.json"));
    seeded(variants, store, seed)
}

pub fn seeded<S: ProgressStore>(variants: &VariantSet, store: S, seed: u64) -> Scheduler<Card, S> {
    Scheduler::with_seed(variants.catalog().unwrap(), store, SchedulerOptions::default(), seed)
}
