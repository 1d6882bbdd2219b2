//! Persisted per-card mastery state.
//!
//! Defines [`ReviewResult`] (outcome of one review), [`ProgressRecord`] (the
//! mutable state kept for each card id), and [`ProgressState`] (the whole store,
//! serialized as `{"cards": {...}}`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::timestamp;
use super::DEFAULT_EASE;

/// Outcome of the most recent review of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewResult {
    Correct,
    Incorrect,
}

impl ReviewResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Incorrect => "incorrect",
        }
    }

    pub fn from_correct(correct: bool) -> Self {
        if correct {
            Self::Correct
        } else {
            Self::Incorrect
        }
    }
}

impl std::fmt::Display for ReviewResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReviewResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "correct" => Ok(Self::Correct),
            "incorrect" => Ok(Self::Incorrect),
            _ => Err(format!("unknown review result: {s}")),
        }
    }
}

/// Mastery state for one card. Created lazily on the card's first review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Consecutive correct answers; reset to 0 by any miss.
    pub streak: u32,
    /// Days until the next review.
    pub interval: u32,
    /// Interval multiplier, always within `[MIN_EASE, MAX_EASE]`.
    pub ease: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_result: Option<ReviewResult>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "timestamp::iso_opt"
    )]
    pub last_reviewed: Option<DateTime<Utc>>,
    /// The card is not re-presented before this instant.
    #[serde(with = "timestamp::iso")]
    pub next_due: DateTime<Utc>,
}

impl ProgressRecord {
    /// State of a card that has never been reviewed, due at `now`.
    pub fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            streak: 0,
            interval: 0,
            ease: DEFAULT_EASE,
            last_result: None,
            last_reviewed: None,
            next_due: now,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_due <= now
    }
}

/// Every persisted record, keyed by card id.
///
/// Records for cards no longer in the catalog are kept (and re-saved) but
/// ignored by selection and counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressState {
    pub cards: BTreeMap<String, ProgressRecord>,
}

impl ProgressState {
    pub fn get(&self, card_id: &str) -> Option<&ProgressRecord> {
        self.cards.get(card_id)
    }

    pub fn contains(&self, card_id: &str) -> bool {
        self.cards.contains_key(card_id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn review_result_round_trips_through_str() {
        for result in [ReviewResult::Correct, ReviewResult::Incorrect] {
            assert_eq!(result.as_str().parse::<ReviewResult>().unwrap(), result);
        }
        assert!("maybe".parse::<ReviewResult>().is_err());
    }

    #[test]
    fn record_serializes_with_z_timestamps() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let record = ProgressRecord {
            streak: 2,
            interval: 3,
            ease: 2.7,
            last_result: Some(ReviewResult::Correct),
            last_reviewed: Some(now),
            next_due: now + chrono::Duration::days(3),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["last_result"], "correct");
        assert_eq!(json["last_reviewed"], "2025-03-01T12:00:00Z");
        assert_eq!(json["next_due"], "2025-03-04T12:00:00Z");
    }

    #[test]
    fn fresh_record_omits_unset_fields() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let json = serde_json::to_value(ProgressRecord::fresh(now)).unwrap();
        assert!(json.get("last_result").is_none());
        assert!(json.get("last_reviewed").is_none());
        assert_eq!(json["ease"], 2.5);
    }
}
