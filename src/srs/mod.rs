//! Spaced-repetition engine shared by the flashcard and emotion drills.
//!
//! [`scheduler::Scheduler`] picks the next card and records answers,
//! [`schedule::apply_review`] is the pure ease/interval/streak update rule, and
//! [`state`] persists one [`types::ProgressRecord`] per card id as JSON.

pub mod schedule;
pub mod scheduler;
pub mod state;
pub mod timestamp;
pub mod types;

/// Ease assigned to a card on its first review.
pub const DEFAULT_EASE: f64 = 2.5;
/// Lower bound for ease after any number of misses.
pub const MIN_EASE: f64 = 1.3;
/// Upper bound for ease after any number of hits.
pub const MAX_EASE: f64 = 2.8;
/// Ease gained on a correct answer.
pub const EASE_BONUS: f64 = 0.1;
/// Ease lost on an incorrect answer.
pub const EASE_PENALTY: f64 = 0.3;
/// Re-drill delay after a miss, in hours.
pub const RETRY_HOURS: i64 = 4;
/// Longest interval a correct answer can schedule, roughly a century.
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// Anything the scheduler can track: it only needs a stable identifier.
pub trait Reviewable {
    fn card_id(&self) -> &str;
}

/// Round an ease value to the two decimals kept in persisted state.
pub fn round_ease(ease: f64) -> f64 {
    (ease * 100.0).round() / 100.0
}
