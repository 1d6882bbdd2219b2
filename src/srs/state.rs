//! Durable progress storage.
//!
//! [`ProgressStore`] is the seam between the scheduler and wherever records
//! live. [`JsonFileStore`] rewrites a single JSON file on every save;
//! [`MemoryStore`] keeps snapshots in memory. Loading never fails: a missing,
//! unreadable, or corrupt store yields an empty [`ProgressState`], and each
//! record is sanitized once here so the rest of the engine can trust it.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

use super::timestamp::{self, utc_now};
use super::types::{ProgressRecord, ProgressState};
use super::{round_ease, DEFAULT_EASE, MAX_EASE, MIN_EASE};

/// Where the scheduler reads and writes progress.
pub trait ProgressStore {
    /// Load all records. Corrupt or unreadable state is treated as empty.
    fn load(&self) -> ProgressState;

    /// Persist all records. Failures must reach the caller.
    fn save(&self, state: &ProgressState) -> Result<()>;
}

/// Whole-file JSON store: `{"cards": {"<card_id>": {...}}}`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    legacy_prefix: Option<String>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            legacy_prefix: None,
        }
    }

    /// Rewrite keys that predate variant-qualified ids (no `:`) as `{prefix}:{key}`.
    pub fn with_legacy_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.legacy_prefix = Some(prefix.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressStore for JsonFileStore {
    fn load(&self) -> ProgressState {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no progress file, starting fresh");
            return ProgressState::default();
        }

        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "unreadable progress file, starting fresh");
                return ProgressState::default();
            }
        };

        let value: Value = match serde_json::from_str(&contents) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "corrupt progress file, starting fresh");
                return ProgressState::default();
            }
        };

        let state = state_from_value(&value, self.legacy_prefix.as_deref(), utc_now());
        tracing::debug!(path = %self.path.display(), records = state.len(), "progress loaded");
        state
    }

    fn save(&self, state: &ProgressState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory {}", parent.display()))?;
            }
        }

        let json = serde_json::to_string_pretty(state).context("failed to serialize progress")?;

        // tmp + rename so a crash mid-write leaves the previous file intact
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)
            .with_context(|| format!("failed to write {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;

        tracing::debug!(path = %self.path.display(), records = state.len(), "progress saved");
        Ok(())
    }
}

/// In-memory store. Starts from an optional initial state and keeps the last save.
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: RefCell<ProgressState>,
    saves: RefCell<usize>,
}

impl MemoryStore {
    pub fn new(initial: ProgressState) -> Self {
        Self {
            saved: RefCell::new(initial),
            saves: RefCell::new(0),
        }
    }

    /// Snapshot of the most recently saved state.
    pub fn snapshot(&self) -> ProgressState {
        self.saved.borrow().clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self) -> ProgressState {
        self.saved.borrow().clone()
    }

    fn save(&self, state: &ProgressState) -> Result<()> {
        *self.saved.borrow_mut() = state.clone();
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}

/// Build a state from raw JSON, dropping anything that isn't a record object.
pub fn state_from_value(value: &Value, legacy_prefix: Option<&str>, now: DateTime<Utc>) -> ProgressState {
    let mut state = ProgressState::default();

    let Some(cards) = value.get("cards").and_then(Value::as_object) else {
        return state;
    };

    for (key, meta) in cards {
        let Some(meta) = meta.as_object() else {
            continue;
        };
        let key = match legacy_prefix {
            Some(prefix) if !key.contains(':') => format!("{prefix}:{key}"),
            _ => key.clone(),
        };
        state.cards.insert(key, sanitize_record(meta, now));
    }

    state
}

/// Coerce one raw record into a valid [`ProgressRecord`].
///
/// Counts become non-negative integers (fallback 0), ease is clamped and
/// rounded (fallback 2.5), and a missing or unparseable `next_due` means "now".
pub fn sanitize_record(meta: &serde_json::Map<String, Value>, now: DateTime<Utc>) -> ProgressRecord {
    let streak = meta.get("streak").map(as_count).unwrap_or(0);
    let interval = meta.get("interval").map(as_count).unwrap_or(0);
    let ease = meta
        .get("ease")
        .and_then(as_float)
        .unwrap_or(DEFAULT_EASE)
        .clamp(MIN_EASE, MAX_EASE);

    let last_result = meta
        .get("last_result")
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok());

    let last_reviewed = meta
        .get("last_reviewed")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(|s| timestamp::parse_or(s, now));

    let next_due = meta
        .get("next_due")
        .and_then(Value::as_str)
        .map(|s| timestamp::parse_or(s, now))
        .unwrap_or(now);

    ProgressRecord {
        streak,
        interval,
        ease: round_ease(ease),
        last_result,
        last_reviewed,
        next_due,
    }
}

fn as_count(value: &Value) -> u32 {
    let n = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<i64>().unwrap_or(0),
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    };
    n.clamp(0, u32::MAX as i64) as u32
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
}
