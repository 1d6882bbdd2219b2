//! Totals and daily writing streaks derived from the saved entries.

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use super::entry::Entry;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalMetadata {
    /// Consecutive qualifying days ending today; 0 unless today qualifies.
    pub current_daily_streak: u32,
    /// Longest run of consecutive qualifying days ever.
    pub all_time_daily_streak: u32,
    pub total_word_count: usize,
    pub average_word_count_per_day: f64,
    pub average_word_count_per_session: f64,
    pub total_entries: usize,
    pub last_entry_date: Option<NaiveDate>,
}

/// Recompute metadata from every entry. A day qualifies for a streak when at
/// least one of its entries has `min_words` words or more.
pub fn calculate(entries: &[Entry], today: NaiveDate, min_words: usize) -> JournalMetadata {
    if entries.is_empty() {
        return JournalMetadata::default();
    }

    let mut words_per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    let mut qualifying: BTreeSet<NaiveDate> = BTreeSet::new();
    for entry in entries {
        let day = entry.timestamp.date_naive();
        *words_per_day.entry(day).or_default() += entry.word_count;
        if entry.word_count >= min_words {
            qualifying.insert(day);
        }
    }

    let total_word_count: usize = words_per_day.values().sum();
    let last_entry_date = entries
        .iter()
        .max_by_key(|entry| entry.timestamp)
        .map(|entry| entry.timestamp.date_naive());

    JournalMetadata {
        current_daily_streak: streak_ending(&qualifying, today),
        all_time_daily_streak: longest_run(&qualifying),
        total_word_count,
        average_word_count_per_day: round2(total_word_count as f64 / words_per_day.len() as f64),
        average_word_count_per_session: round2(total_word_count as f64 / entries.len() as f64),
        total_entries: entries.len(),
        last_entry_date,
    }
}

fn streak_ending(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = Some(today);
    while let Some(current) = day.filter(|d| days.contains(d)) {
        streak += 1;
        day = current.checked_sub_days(Days::new(1));
    }
    streak
}

fn longest_run(days: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;
    for &day in days {
        run = match previous {
            Some(prev) if prev.succ_opt() == Some(day) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }
    longest
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Read saved metadata; missing or corrupt files yield the defaults.
pub fn load(path: &Path) -> JournalMetadata {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return JournalMetadata::default();
    };
    serde_json::from_str(&contents).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "corrupt journal metadata, using defaults");
        JournalMetadata::default()
    })
}

pub fn save(path: &Path, metadata: &JournalMetadata) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(metadata).context("failed to serialize metadata")?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}
