//! Flashcard variants read from `cards.json`: free-text definition recall,
//! multiple choice, and true/false.

use rand::rngs::StdRng;
use serde_json::Value;
use std::rc::Rc;

use super::{choice_index, CardVariant, Grade, Question};
use crate::catalog::card::{derive_card_id, AnswerValue, Card, CardOption};
use crate::catalog::CatalogError;
use crate::content::FlashcardEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashcardKind {
    Definition,
    MultipleChoice,
    TrueFalse,
}

impl FlashcardKind {
    pub const ALL: [FlashcardKind; 3] = [Self::Definition, Self::MultipleChoice, Self::TrueFalse];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Definition => "definition",
            Self::MultipleChoice => "multiple-choice",
            Self::TrueFalse => "true-false",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Definition => "Definition",
            Self::MultipleChoice => "Multiple Choice",
            Self::TrueFalse => "True / False",
        }
    }

    fn is_choice(&self) -> bool {
        matches!(self, Self::MultipleChoice | Self::TrueFalse)
    }
}

impl std::str::FromStr for FlashcardKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown flashcard variant: {s}"))
    }
}

/// One flashcard kind over the shared list of parsed entries.
pub struct FlashcardVariant {
    kind: FlashcardKind,
    entries: Rc<[FlashcardEntry]>,
}

impl FlashcardVariant {
    pub fn new(kind: FlashcardKind, entries: Rc<[FlashcardEntry]>) -> Self {
        Self { kind, entries }
    }

    /// All three kinds over the same entries. Entries tagged with any other
    /// variant are left out.
    pub fn all(entries: Vec<FlashcardEntry>) -> Vec<Box<dyn CardVariant>> {
        let unknown = entries
            .iter()
            .filter(|entry| entry.variant.parse::<FlashcardKind>().is_err())
            .count();
        if unknown > 0 {
            tracing::debug!(skipped = unknown, "flashcards with unsupported variants ignored");
        }

        let entries: Rc<[FlashcardEntry]> = entries.into();
        FlashcardKind::ALL
            .into_iter()
            .map(|kind| Box::new(Self::new(kind, Rc::clone(&entries))) as Box<dyn CardVariant>)
            .collect()
    }

    fn build_card(&self, entry: &FlashcardEntry) -> Result<Card, CatalogError> {
        let prompt = entry.prompt.as_str();

        let options = if self.kind.is_choice() {
            parse_options(prompt, entry.options.as_ref())?
        } else {
            Vec::new()
        };

        let invalid = |reason: &str| CatalogError::InvalidAnswer {
            prompt: prompt.to_string(),
            reason: reason.to_string(),
        };

        let answer = match self.kind {
            FlashcardKind::TrueFalse => match &entry.back {
                Some(Value::Bool(b)) => AnswerValue::Bool(*b),
                _ => return Err(invalid("must have a boolean back value")),
            },
            FlashcardKind::MultipleChoice => entry
                .back
                .as_ref()
                .and_then(answer_from_json)
                .ok_or_else(|| invalid("must define a correct answer on back"))?,
            FlashcardKind::Definition => match &entry.back {
                Some(Value::String(s)) if !s.trim().is_empty() => AnswerValue::Text(s.clone()),
                _ => return Err(invalid("must have a non-empty string back value")),
            },
        };

        let card_id = derive_card_id(
            self.kind.as_str(),
            prompt,
            &answer,
            entry.explicit_id.as_deref(),
        );

        Ok(Card {
            card_id,
            variant: self.kind.as_str().to_string(),
            prompt: prompt.to_string(),
            answer,
            options,
            image: entry.image.clone(),
            source: entry.source.clone(),
            tags: entry.tags.clone(),
            path: Vec::new(),
        })
    }
}

impl CardVariant for FlashcardVariant {
    fn id(&self) -> &str {
        self.kind.as_str()
    }

    fn label(&self) -> &str {
        self.kind.label()
    }

    fn build_cards(&self) -> Result<Vec<Card>, CatalogError> {
        self.entries
            .iter()
            .filter(|entry| entry.variant == self.kind.as_str())
            .map(|entry| self.build_card(entry))
            .collect()
    }

    fn prepare_question(&self, card: &Card, _rng: &mut StdRng) -> Question {
        let mut prompt_lines = vec![card.prompt.clone()];
        if let Some(image) = &card.image {
            prompt_lines.push(format!("[image: {image}]"));
        }

        let choices = if self.kind.is_choice() {
            card.options.iter().map(|option| option.text.clone()).collect()
        } else {
            Vec::new()
        };

        let kind = self.kind;
        let card = card.clone();
        Question::new(prompt_lines, choices, move |response| {
            let correct = match kind {
                FlashcardKind::Definition => response.trim().to_lowercase() == card.answer.normalized(),
                FlashcardKind::MultipleChoice | FlashcardKind::TrueFalse => {
                    match parse_choice(kind, &card.options, response) {
                        Some(selection) => selection == card.answer,
                        None => {
                            return Grade::retry(
                                "Input not recognized. Please choose one of the listed options.",
                            )
                        }
                    }
                }
            };

            let grade = if correct {
                Grade::correct()
            } else {
                Grade::incorrect(vec![format!(
                    "❌ Incorrect. Correct answer: {}",
                    card.describe_answer()
                )])
            };
            grade.with_notes(citation_lines(&card))
        })
    }
}

/// Resolve a typed response to an option value: 1-based index, `t`/`f`
/// shorthand for true/false cards, then option text or value.
pub fn parse_choice(kind: FlashcardKind, options: &[CardOption], response: &str) -> Option<AnswerValue> {
    let normalized = response.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    if let Some(idx) = choice_index(&normalized, options.len()) {
        return Some(options[idx].value.clone());
    }

    if kind == FlashcardKind::TrueFalse {
        let wanted = match normalized.as_str() {
            "t" | "true" => Some(true),
            "f" | "false" => Some(false),
            _ => None,
        };
        if let Some(wanted) = wanted {
            return options
                .iter()
                .find(|option| option.value.as_bool() == Some(wanted))
                .map(|option| option.value.clone());
        }
    }

    options
        .iter()
        .find(|option| {
            option.text.to_lowercase() == normalized || option.value.normalized() == normalized
        })
        .map(|option| option.value.clone())
}

fn parse_options(prompt: &str, raw: Option<&Value>) -> Result<Vec<CardOption>, CatalogError> {
    let items = match raw {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => return Err(CatalogError::MissingOptions(prompt.to_string())),
    };

    let options: Vec<CardOption> = items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|option| {
            let text = match option.get("text") {
                Some(Value::String(s)) => s.trim().to_string(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
            if text.is_empty() {
                return None;
            }
            let value = option
                .get("value")
                .and_then(answer_from_json)
                .unwrap_or_else(|| AnswerValue::Text(text.clone()));
            Some(CardOption { text, value })
        })
        .collect();

    if options.is_empty() {
        return Err(CatalogError::NoValidOptions(prompt.to_string()));
    }
    Ok(options)
}

fn answer_from_json(value: &Value) -> Option<AnswerValue> {
    match value {
        Value::Bool(b) => Some(AnswerValue::Bool(*b)),
        Value::Number(n) => n
            .as_i64()
            .map(AnswerValue::Integer)
            .or_else(|| n.as_f64().map(AnswerValue::Float)),
        Value::String(s) => Some(AnswerValue::Text(s.clone())),
        _ => None,
    }
}

fn citation_lines(card: &Card) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(source) = &card.source {
        match &source.url {
            Some(url) => lines.push(format!("Source: {} ({url})", source.text)),
            None => lines.push(format!("Source: {}", source.text)),
        }
    }
    if !card.tags.is_empty() {
        lines.push(format!("Tags: {}", card.tags.join(", ")));
    }
    lines
}
