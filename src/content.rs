//! Readers for the JSON content files the drills are built from.
//!
//! Parsing is lenient per entry (non-object entries and incomplete records are
//! skipped) but strict about file shape: a missing file, invalid JSON, or a
//! top level that is not a list is fatal.

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

use crate::catalog::card::Source;
use crate::catalog::CatalogError;

/// One raw `cards.json` entry, before variant-specific validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FlashcardEntry {
    /// Lowercased, trimmed variant tag.
    pub variant: String,
    pub explicit_id: Option<String>,
    pub prompt: String,
    pub image: Option<String>,
    /// `front.options` exactly as written; validated by the choice variants.
    pub options: Option<Value>,
    pub back: Option<Value>,
    pub source: Option<Source>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmotionEntry {
    pub emotion: String,
    pub definition: String,
    /// Lowercased; `unknown` when absent.
    pub quadrant: String,
}

/// One primary → secondary → tertiary path of the feelings wheel.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelEntry {
    pub primary: String,
    pub secondary: String,
    pub tertiary: String,
}

/// Read and parse a JSON file.
pub fn read_json(path: &Path) -> Result<Value> {
    anyhow::ensure!(path.exists(), "could not locate {}", path.display());
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn load_flashcards(path: &Path) -> Result<Vec<FlashcardEntry>> {
    let value = read_json(path)?;
    Ok(parse_flashcards(&value, &file_label(path))?)
}

pub fn load_emotions(path: &Path) -> Result<Vec<EmotionEntry>> {
    let value = read_json(path)?;
    Ok(parse_emotions(&value, &file_label(path))?)
}

pub fn load_feelings_wheel(path: &Path) -> Result<Vec<WheelEntry>> {
    let value = read_json(path)?;
    Ok(parse_feelings_wheel(&value, &file_label(path))?)
}

/// Parse the `cards.json` list. Entries with an empty prompt are dropped here;
/// unknown variants are left for the variant set to ignore.
pub fn parse_flashcards(value: &Value, file: &str) -> Result<Vec<FlashcardEntry>, CatalogError> {
    let entries = as_list(value, file)?;
    let mut cards = Vec::new();

    for entry in entries.iter().filter_map(Value::as_object) {
        let front = entry.get("front").and_then(Value::as_object);
        let prompt = front
            .and_then(|f| f.get("prompt"))
            .map(text_of)
            .unwrap_or_default();
        let prompt = prompt.trim();
        if prompt.is_empty() {
            continue;
        }

        let variant = entry
            .get("variant")
            .map(text_of)
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        let explicit_id = entry.get("id").and_then(|id| match id {
            Value::Null => None,
            other => Some(text_of(other)),
        });

        let image = front
            .and_then(|f| f.get("image"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let options = front
            .and_then(|f| f.get("options"))
            .filter(|o| !o.is_null())
            .cloned();

        let source = entry
            .get("source")
            .and_then(Value::as_object)
            .and_then(|source| {
                let text = source.get("text").map(text_of).unwrap_or_default();
                let text = text.trim();
                if text.is_empty() {
                    return None;
                }
                let url = source
                    .get("url")
                    .map(text_of)
                    .map(|u| u.trim().to_string())
                    .filter(|u| !u.is_empty());
                Some(Source {
                    text: text.to_string(),
                    url,
                })
            });

        let tags = match entry.get("tags") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.iter().map(text_of).collect(),
            Some(other) => vec![text_of(other)],
        };

        cards.push(FlashcardEntry {
            variant,
            explicit_id,
            prompt: prompt.to_string(),
            image,
            options,
            back: entry.get("back").filter(|b| !b.is_null()).cloned(),
            source,
            tags,
        });
    }

    Ok(cards)
}

/// Parse `emotions.json`, keeping the first occurrence of each emotion.
pub fn parse_emotions(value: &Value, file: &str) -> Result<Vec<EmotionEntry>, CatalogError> {
    let entries = as_list(value, file)?;
    let mut seen = HashSet::new();
    let mut emotions = Vec::new();

    for entry in entries.iter().filter_map(Value::as_object) {
        let field = |name: &str| {
            entry
                .get(name)
                .map(text_of)
                .unwrap_or_default()
                .trim()
                .to_string()
        };
        let emotion = field("emotion");
        let definition = field("definition");
        if emotion.is_empty() || definition.is_empty() {
            continue;
        }
        if !seen.insert(emotion.to_lowercase()) {
            continue;
        }
        let quadrant = match field("quadrant").to_lowercase() {
            q if q.is_empty() => "unknown".to_string(),
            q => q,
        };
        emotions.push(EmotionEntry {
            emotion,
            definition,
            quadrant,
        });
    }

    if emotions.is_empty() {
        return Err(CatalogError::Empty(Some(file.to_string())));
    }
    Ok(emotions)
}

pub fn parse_feelings_wheel(value: &Value, file: &str) -> Result<Vec<WheelEntry>, CatalogError> {
    let entries = as_list(value, file)?;
    let mut wheel = Vec::new();

    for entry in entries.iter().filter_map(Value::as_object) {
        let field = |name: &str| {
            entry
                .get(name)
                .map(text_of)
                .unwrap_or_default()
                .trim()
                .to_string()
        };
        let (primary, secondary, tertiary) = (field("primary"), field("secondary"), field("tertiary"));
        if primary.is_empty() || secondary.is_empty() || tertiary.is_empty() {
            continue;
        }
        wheel.push(WheelEntry {
            primary,
            secondary,
            tertiary,
        });
    }

    if wheel.is_empty() {
        return Err(CatalogError::Empty(Some(file.to_string())));
    }
    Ok(wheel)
}

fn as_list<'a>(value: &'a Value, file: &str) -> Result<&'a Vec<Value>, CatalogError> {
    value.as_array().ok_or_else(|| CatalogError::Malformed {
        file: file.to_string(),
        reason: "expected a list of entries".into(),
    })
}

/// Strings as-is; anything else in its JSON form.
fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
