//! Spaced-repetition drills and a plain-file journal for emotional vocabulary.
//!
//! ecue keeps two kinds of review decks, flashcards loaded from `cards.json`
//! and emotion drills built from `emotions.json` and `feelings_wheel.json`,
//! and schedules both with one review engine. Each card carries a variant tag
//! naming the strategy that renders and grades it:
//!
//! | Variant | Deck | Answer |
//! |---------|------|--------|
//! | **definition** | flashcards | free text |
//! | **multiple-choice** | flashcards | option number, text, or value |
//! | **true-false** | flashcards | option number, `t`/`f`, or text |
//! | **definition-input** | emotions | emotion name |
//! | **definition-multiple-choice** | emotions | one of three emotions |
//! | **feelings-layer** | emotions | `primary` / `secondary` / `tertiary` |
//!
//! # Scheduling
//!
//! Correct answers grow the review interval (1 day, 3 days, then the previous
//! interval times the card's ease); a miss resets the streak and brings the
//! card back four hours later. Ease moves within `[1.3, 2.8]`. Progress is
//! stored as JSON, rewritten after every answer, and sanitized on load so a
//! damaged file never blocks practice.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`srs`]: Progress records, the update rule, persistence, and the scheduler
//! - [`catalog`]: The card model, stable id derivation, and load-time validation
//! - [`variant`]: Presentation and grading strategies per variant tag
//! - [`content`]: Readers for the JSON content files
//! - [`session`]: The interactive review loop
//! - [`journal`]: Journal entries, analysis parsing, and streak metadata

pub mod catalog;
pub mod config;
pub mod content;
pub mod journal;
pub mod session;
pub mod srs;
pub mod variant;
