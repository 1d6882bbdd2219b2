//! Review update rule.
//!
//! - Correct: streak + 1; interval ladder 1 → 3 → `round(interval * ease)` (at least 1);
//!   ease + 0.1 up to 2.8; due `interval` days later. Intervals never exceed
//!   [`MAX_INTERVAL_DAYS`], however early or often a card is answered.
//! - Incorrect: streak and interval reset to 0; ease − 0.3 down to 1.3; due 4 hours later.

use chrono::{DateTime, Duration, Utc};

use super::types::{ProgressRecord, ReviewResult};
use super::{
    round_ease, EASE_BONUS, EASE_PENALTY, MAX_EASE, MAX_INTERVAL_DAYS, MIN_EASE, RETRY_HOURS,
};

/// Compute the record that follows one judged review.
///
/// `previous` is `None` for a card that has never been reviewed.
pub fn apply_review(
    previous: Option<&ProgressRecord>,
    correct: bool,
    now: DateTime<Utc>,
) -> ProgressRecord {
    let base = previous
        .cloned()
        .unwrap_or_else(|| ProgressRecord::fresh(now));
    let ease = base.ease.clamp(MIN_EASE, MAX_EASE);

    let (streak, interval, ease, next_due) = if correct {
        let streak = base.streak.saturating_add(1);
        let interval = match streak {
            1 => 1,
            2 => 3,
            _ => {
                let grown = f64::from(base.interval.min(MAX_INTERVAL_DAYS)) * ease;
                (grown.round().min(f64::from(MAX_INTERVAL_DAYS)) as u32).max(1)
            }
        };
        let ease = round_ease((ease + EASE_BONUS).min(MAX_EASE));
        (streak, interval, ease, days_after(now, interval))
    } else {
        let ease = round_ease((ease - EASE_PENALTY).max(MIN_EASE));
        (0, 0, ease, now + Duration::hours(RETRY_HOURS))
    };

    ProgressRecord {
        streak,
        interval,
        ease,
        last_result: Some(ReviewResult::from_correct(correct)),
        last_reviewed: Some(now),
        next_due,
    }
}

/// `now` plus `days`, saturating at the latest representable instant.
fn days_after(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now.checked_add_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
