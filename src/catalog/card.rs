//! The immutable card model shared by every drill.

use serde::{Deserialize, Serialize};

use crate::srs::Reviewable;

/// A correct answer or option value as written in content files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl AnswerValue {
    /// Lowercased display form, used when matching typed responses.
    pub fn normalized(&self) -> String {
        self.to_string().trim().to_lowercase()
    }

    /// Form used inside derived card ids, lowercased. Numbers and booleans are
    /// bare, text is quoted so `'1'` and `1` stay distinct. Quoting follows the
    /// rule ids in existing state files were written with: single quotes,
    /// or double quotes when the text holds a `'` but no `"`.
    pub fn id_fragment(&self) -> String {
        match self {
            Self::Bool(true) => "true".into(),
            Self::Bool(false) => "false".into(),
            Self::Integer(n) => n.to_string(),
            Self::Float(x) => format!("{x:?}").to_lowercase(),
            Self::Text(s) => quote_text(&s.to_lowercase()),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl std::fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One selectable answer of a choice-based card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardOption {
    pub text: String,
    pub value: AnswerValue,
}

/// Citation shown after a card is answered.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Source {
    pub text: String,
    pub url: Option<String>,
}

/// A reviewable card. Built once from content; never mutated by the scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub card_id: String,
    /// Id of the [`crate::variant::CardVariant`] that presents and grades this card.
    pub variant: String,
    pub prompt: String,
    pub answer: AnswerValue,
    pub options: Vec<CardOption>,
    pub image: Option<String>,
    pub source: Option<Source>,
    pub tags: Vec<String>,
    /// Hierarchy path for taxonomy cards (e.g. primary → secondary → tertiary).
    pub path: Vec<String>,
}

impl Card {
    /// A card with only the required fields set.
    pub fn new(
        card_id: impl Into<String>,
        variant: impl Into<String>,
        prompt: impl Into<String>,
        answer: AnswerValue,
    ) -> Self {
        Self {
            card_id: card_id.into(),
            variant: variant.into(),
            prompt: prompt.into(),
            answer,
            options: Vec::new(),
            image: None,
            source: None,
            tags: Vec::new(),
            path: Vec::new(),
        }
    }

    /// Human-readable correct answer: the matching option's text when there is one.
    pub fn describe_answer(&self) -> String {
        self.options
            .iter()
            .find(|option| option.value == self.answer)
            .map(|option| option.text.clone())
            .unwrap_or_else(|| self.answer.to_string())
    }
}

impl Reviewable for Card {
    fn card_id(&self) -> &str {
        &self.card_id
    }
}

/// Lowercase and collapse runs of whitespace.
pub fn normalize_prompt(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Stable card id: an explicit non-blank id wins, otherwise
/// `{variant}:{normalized prompt}:{answer fragment}`.
pub fn derive_card_id(
    variant: &str,
    prompt: &str,
    answer: &AnswerValue,
    explicit_id: Option<&str>,
) -> String {
    if let Some(id) = explicit_id.map(str::trim).filter(|id| !id.is_empty()) {
        return id.to_string();
    }
    format!(
        "{variant}:{}:{}",
        normalize_prompt(prompt),
        answer.id_fragment()
    )
}

/// Quote text the way ids in existing state files were written, escaping
/// backslashes, control characters and the chosen quote.
fn quote_text(text: &str) -> String {
    let quote = if text.contains('\'') && !text.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
