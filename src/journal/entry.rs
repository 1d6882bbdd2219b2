//! Journal entries and their on-disk store.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::srs::timestamp::{iso, to_iso};

/// One user turn and the reply it received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub user: String,
    #[serde(default)]
    pub assistant: String,
}

/// Structured reading of an entry, as produced by a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub sentiment: String,
    pub emotions: Vec<String>,
    pub tone: String,
    pub topics: Vec<String>,
    pub summary: String,
    pub keywords: Vec<String>,
}

impl Default for Analysis {
    fn default() -> Self {
        Self {
            sentiment: "neutral".into(),
            emotions: Vec::new(),
            tone: "neutral".into(),
            topics: Vec::new(),
            summary: String::new(),
            keywords: Vec::new(),
        }
    }
}

impl Analysis {
    /// Read the first `{ ... }` span of free-form model output.
    ///
    /// Missing fields take their defaults and list fields holding anything but
    /// a list become empty. Output with no parseable object yields the default.
    pub fn from_model_output(output: &str) -> Self {
        let span = match (output.find('{'), output.rfind('}')) {
            (Some(start), Some(end)) if start < end => &output[start..=end],
            _ => {
                tracing::warn!("no JSON object in analysis output");
                return Self::default();
            }
        };

        let value: Value = match serde_json::from_str(span) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable analysis output");
                return Self::default();
            }
        };

        let defaults = Self::default();
        let text = |key: &str, fallback: String| match value.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => fallback,
            Some(other) => other.to_string(),
        };
        let list = |key: &str| match value.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        };

        Self {
            sentiment: text("sentiment", defaults.sentiment),
            emotions: list("emotions"),
            tone: text("tone", defaults.tone),
            topics: list("topics"),
            summary: text("summary", defaults.summary),
            keywords: list("keywords"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    #[serde(with = "iso")]
    pub timestamp: DateTime<Utc>,
    pub content: String,
    pub word_count: usize,
    #[serde(default)]
    pub exchanges: Vec<Exchange>,
    #[serde(default)]
    pub analysis: Option<Analysis>,
}

impl Entry {
    /// Build an entry from a finished session. `None` when nothing was said.
    pub fn from_exchanges(exchanges: Vec<Exchange>, started: DateTime<Utc>) -> Option<Self> {
        if exchanges.is_empty() {
            return None;
        }
        let content = exchanges
            .iter()
            .map(|exchange| exchange.user.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Some(Self {
            id: uuid::Uuid::now_v7().to_string(),
            timestamp: started,
            word_count: count_words(&content),
            content,
            exchanges,
            analysis: None,
        })
    }

    /// `2025-11-18-13-58-26-{id}.json`
    pub fn file_name(&self) -> String {
        let stamp: String = to_iso(self.timestamp)
            .chars()
            .filter(|&c| c != 'Z')
            .map(|c| if matches!(c, ':' | '.' | 'T') { '-' } else { c })
            .collect();
        format!("{}-{}.json", stamp.trim_end_matches('-'), self.id)
    }
}

/// Whitespace-separated word count.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// A directory of one-file-per-entry JSON documents.
#[derive(Debug, Clone)]
pub struct JournalStore {
    dir: PathBuf,
}

impl JournalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `entry`, replacing any earlier version of it.
    pub fn save(&self, entry: &Entry) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create directory {}", self.dir.display()))?;
        let path = self.dir.join(entry.file_name());
        let json = serde_json::to_string_pretty(entry).context("failed to serialize entry")?;
        std::fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
        tracing::debug!(id = %entry.id, path = %path.display(), "journal entry saved");
        Ok(path)
    }

    /// Every readable entry, newest first. Files that fail to parse are skipped.
    pub fn load_all(&self) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();
        for path in self.entry_files()? {
            match read_entry(&path) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable journal entry")
                }
            }
        }
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(entries)
    }

    /// The entry whose file name contains `id`.
    pub fn load_by_id(&self, id: &str) -> Result<Option<Entry>> {
        let id = id.trim();
        if id.is_empty() {
            return Ok(None);
        }
        let found = self.entry_files()?.into_iter().find(|path| {
            path.file_name()
                .is_some_and(|name| name.to_string_lossy().contains(id))
        });
        found.map(|path| read_entry(&path)).transpose()
    }

    fn entry_files(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for item in std::fs::read_dir(&self.dir)
            .with_context(|| format!("failed to list {}", self.dir.display()))?
        {
            let path = item?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

fn read_entry(path: &Path) -> Result<Entry> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn words_split_on_whitespace() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   "), 0);
        assert_eq!(count_words(" one\ttwo\n three "), 3);
    }

    #[test]
    fn entry_joins_user_turns() {
        let started = Utc.with_ymd_and_hms(2025, 11, 18, 13, 58, 26).unwrap();
        let exchanges = vec![
            Exchange { user: "Slept badly.".into(), assistant: "Why?".into() },
            Exchange { user: "Noise outside".into(), assistant: String::new() },
        ];
        let entry = Entry::from_exchanges(exchanges, started).unwrap();
        assert_eq!(entry.content, "Slept badly. Noise outside");
        assert_eq!(entry.word_count, 4);
        assert!(entry.analysis.is_none());
        assert_eq!(entry.file_name(), format!("2025-11-18-13-58-26-{}.json", entry.id));

        assert!(Entry::from_exchanges(Vec::new(), started).is_none());
    }

    #[test]
    fn analysis_from_noisy_output() {
        let output = r#"Here you go:
            {"sentiment": "mixed", "emotions": ["tired", "hopeful"], "topics": "work", "summary": "A long day."}
            Hope that helps."#;
        let analysis = Analysis::from_model_output(output);
        assert_eq!(analysis.sentiment, "mixed");
        assert_eq!(analysis.emotions, vec!["tired", "hopeful"]);
        assert_eq!(analysis.tone, "neutral");
        assert!(analysis.topics.is_empty());
        assert_eq!(analysis.summary, "A long day.");
    }

    #[test]
    fn analysis_defaults_without_json() {
        assert_eq!(Analysis::from_model_output("no structure here"), Analysis::default());
        assert_eq!(Analysis::from_model_output("{not json}"), Analysis::default());
    }
}
