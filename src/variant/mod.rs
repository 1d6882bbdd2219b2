//! Card presentation and grading strategies.
//!
//! Each [`CardVariant`] builds its own cards from content and turns one of them
//! into a [`Question`]: prompt lines, an optional numbered choice list, and a
//! grader mapping a typed response to a [`Grade`]. The scheduler never looks
//! inside a variant; the session loop dispatches on [`Card::variant`].

pub mod emotion;
pub mod flashcard;

use anyhow::{bail, Result};
use rand::rngs::StdRng;

use crate::catalog::card::Card;
use crate::catalog::{Catalog, CatalogError};

pub const CORRECT_FEEDBACK: &str = "✅ Correct!";

/// How a typed response was judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
    /// Unrecognized input: re-prompt without counting an attempt.
    Retry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grade {
    pub outcome: Outcome,
    pub feedback: Vec<String>,
}

impl Grade {
    pub fn correct() -> Self {
        Self {
            outcome: Outcome::Correct,
            feedback: vec![CORRECT_FEEDBACK.to_string()],
        }
    }

    pub fn incorrect(feedback: Vec<String>) -> Self {
        Self {
            outcome: Outcome::Incorrect,
            feedback,
        }
    }

    pub fn retry(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Retry,
            feedback: vec![message.into()],
        }
    }

    /// Append lines shown regardless of the outcome.
    pub fn with_notes(mut self, notes: impl IntoIterator<Item = String>) -> Self {
        self.feedback.extend(notes);
        self
    }
}

type Grader = Box<dyn Fn(&str) -> Grade>;

/// A rendered card, ready to be asked.
pub struct Question {
    pub prompt_lines: Vec<String>,
    /// Numbered 1-based when shown; empty for free-text questions.
    pub choices: Vec<String>,
    grader: Grader,
}

impl Question {
    pub fn new(
        prompt_lines: Vec<String>,
        choices: Vec<String>,
        grader: impl Fn(&str) -> Grade + 'static,
    ) -> Self {
        Self {
            prompt_lines,
            choices,
            grader: Box::new(grader),
        }
    }

    pub fn grade(&self, response: &str) -> Grade {
        (self.grader)(response)
    }
}

impl std::fmt::Debug for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Question")
            .field("prompt_lines", &self.prompt_lines)
            .field("choices", &self.choices)
            .finish_non_exhaustive()
    }
}

/// A presentation/grading strategy for one variant tag.
pub trait CardVariant {
    /// Tag stored on every card this variant builds.
    fn id(&self) -> &str;

    fn label(&self) -> &str;

    /// Build this variant's cards. Malformed content is a fatal error.
    fn build_cards(&self) -> Result<Vec<Card>, CatalogError>;

    fn prepare_question(&self, card: &Card, rng: &mut StdRng) -> Question;
}

/// The variants active in one session, in presentation order.
pub struct VariantSet {
    variants: Vec<Box<dyn CardVariant>>,
}

impl VariantSet {
    pub fn new(variants: Vec<Box<dyn CardVariant>>) -> Self {
        Self { variants }
    }

    pub fn get(&self, id: &str) -> Option<&dyn CardVariant> {
        self.variants
            .iter()
            .find(|variant| variant.id() == id)
            .map(|variant| variant.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn CardVariant> {
        self.variants.iter().map(|variant| variant.as_ref())
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Build the session catalog from every variant in the set.
    pub fn catalog(&self) -> Result<Catalog<Card>, CatalogError> {
        Catalog::from_variants(&self.variants)
    }

    /// Keep the variants named by a comma-separated list of ids, labels, or
    /// 1-based positions. A blank selection keeps everything.
    pub fn select(self, selection: &str) -> Result<Self> {
        let chosen = self.resolve(selection)?;
        Ok(self.keep(&chosen))
    }

    /// Positions named by `selection`, deduplicated, in the order given.
    pub fn resolve(&self, selection: &str) -> Result<Vec<usize>> {
        let parts: Vec<&str> = selection
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            return Ok((0..self.variants.len()).collect());
        }

        let mut chosen: Vec<usize> = Vec::new();
        for part in parts {
            let idx = if let Some(idx) = choice_index(part, self.variants.len()) {
                idx
            } else if part.chars().all(|c| c.is_ascii_digit()) {
                bail!("selection '{part}' is out of range (1-{})", self.variants.len());
            } else {
                let lowered = part.to_lowercase();
                match self.variants.iter().position(|variant| {
                    variant.id().to_lowercase() == lowered || variant.label().to_lowercase() == lowered
                }) {
                    Some(idx) => idx,
                    None => bail!("unrecognised variant '{part}'"),
                }
            };
            if !chosen.contains(&idx) {
                chosen.push(idx);
            }
        }
        Ok(chosen)
    }

    /// Keep only the variants at `positions`, in that order.
    pub fn keep(self, positions: &[usize]) -> Self {
        let mut slots: Vec<Option<Box<dyn CardVariant>>> = self.variants.into_iter().map(Some).collect();
        let variants = positions
            .iter()
            .filter_map(|&idx| slots.get_mut(idx).and_then(Option::take))
            .collect();
        Self { variants }
    }
}

/// Map a 1-based numeric response to an index into `len` choices.
pub fn choice_index(response: &str, len: usize) -> Option<usize> {
    let trimmed = response.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let n: usize = trimmed.parse().ok()?;
    (1..=len).contains(&n).then(|| n - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::card::AnswerValue;

    struct Fixed(&'static str);

    impl CardVariant for Fixed {
        fn id(&self) -> &str {
            self.0
        }

        fn label(&self) -> &str {
            "Fixed"
        }

        fn build_cards(&self) -> Result<Vec<Card>, CatalogError> {
            Ok(vec![Card::new(
                format!("{}:card", self.0),
                self.0,
                "prompt",
                AnswerValue::Text("a".into()),
            )])
        }

        fn prepare_question(&self, _card: &Card, _rng: &mut StdRng) -> Question {
            Question::new(vec!["prompt".into()], Vec::new(), |_| Grade::correct())
        }
    }

    fn set() -> VariantSet {
        VariantSet::new(vec![Box::new(Fixed("one")), Box::new(Fixed("two")), Box::new(Fixed("three"))])
    }

    #[test]
    fn choice_index_is_one_based() {
        assert_eq!(choice_index("1", 3), Some(0));
        assert_eq!(choice_index(" 3 ", 3), Some(2));
        assert_eq!(choice_index("0", 3), None);
        assert_eq!(choice_index("4", 3), None);
        assert_eq!(choice_index("-1", 3), None);
        assert_eq!(choice_index("two", 3), None);
    }

    #[test]
    fn blank_selection_keeps_all() {
        assert_eq!(set().select("  ").unwrap().len(), 3);
    }

    #[test]
    fn selection_by_index_and_id_keeps_order_and_dedupes() {
        let selected = set().select("3, one, 3").unwrap();
        let ids: Vec<&str> = selected.iter().map(|v| v.id()).collect();
        assert_eq!(ids, ["three", "one"]);
    }

    #[test]
    fn bad_selection_is_an_error() {
        assert!(set().select("9").is_err());
        assert!(set().select("four").is_err());
    }

    #[test]
    fn failed_resolve_leaves_set_usable() {
        let set = set();
        assert!(set.resolve("one, nine").is_err());
        let positions = set.resolve("two").unwrap();
        assert_eq!(positions, [1]);
        assert_eq!(set.keep(&positions).iter().next().unwrap().id(), "two");
    }

    #[test]
    fn catalog_spans_all_variants() {
        let catalog = set().catalog().unwrap();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.get("two:card").is_some());
    }
}
