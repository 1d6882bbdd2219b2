//! Emotion-vocabulary variants: name the emotion from its definition (typed
//! or multiple choice), and place an emotion on its feelings-wheel layer.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use super::{choice_index, CardVariant, Grade, Question};
use crate::catalog::card::{AnswerValue, Card};
use crate::catalog::CatalogError;
use crate::content::{EmotionEntry, WheelEntry};

/// Prefix for definition-input ids; also the migration target for old state keys.
pub const DEFINITION_INPUT_ID: &str = "definition-input";
pub const DEFINITION_CHOICE_ID: &str = "definition-multiple-choice";
pub const FEELINGS_LAYER_ID: &str = "feelings-layer";

/// Wrong answers offered next to the correct one.
const DISTRACTORS: usize = 2;

/// Every emotion variant over the given content.
pub fn all(emotions: Vec<EmotionEntry>, wheel: Vec<WheelEntry>) -> Vec<Box<dyn CardVariant>> {
    let emotions: Rc<[EmotionEntry]> = emotions.into();
    vec![
        Box::new(DefinitionInputVariant::new(Rc::clone(&emotions))),
        Box::new(DefinitionChoiceVariant::new(emotions)),
        Box::new(FeelingsLayerVariant::new(&wheel)),
    ]
}

fn emotion_card(variant: &str, entry: &EmotionEntry) -> Card {
    let mut card = Card::new(
        format!("{variant}:{}", entry.emotion.to_lowercase()),
        variant,
        entry.definition.clone(),
        AnswerValue::Text(entry.emotion.clone()),
    );
    card.tags = vec![entry.quadrant.clone()];
    card
}

fn expected_emotion(card: &Card) -> String {
    card.answer.to_string()
}

/// Definition shown, emotion typed.
pub struct DefinitionInputVariant {
    emotions: Rc<[EmotionEntry]>,
    /// definition → every emotion sharing it
    by_definition: HashMap<String, Vec<String>>,
}

impl DefinitionInputVariant {
    pub fn new(emotions: Rc<[EmotionEntry]>) -> Self {
        let mut by_definition: HashMap<String, Vec<String>> = HashMap::new();
        for entry in emotions.iter() {
            by_definition
                .entry(entry.definition.clone())
                .or_default()
                .push(entry.emotion.clone());
        }
        Self {
            emotions,
            by_definition,
        }
    }
}

impl CardVariant for DefinitionInputVariant {
    fn id(&self) -> &str {
        DEFINITION_INPUT_ID
    }

    fn label(&self) -> &str {
        "Definition → Emotion"
    }

    fn build_cards(&self) -> Result<Vec<Card>, CatalogError> {
        Ok(self
            .emotions
            .iter()
            .map(|entry| emotion_card(DEFINITION_INPUT_ID, entry))
            .collect())
    }

    fn prepare_question(&self, card: &Card, _rng: &mut StdRng) -> Question {
        let expected = expected_emotion(card);
        let alternative = self
            .by_definition
            .get(&card.prompt)
            .into_iter()
            .flatten()
            .find(|emotion| !emotion.eq_ignore_ascii_case(&expected))
            .cloned();

        Question::new(vec![card.prompt.clone()], Vec::new(), move |response| {
            if response.trim().to_lowercase() == expected.to_lowercase() {
                return Grade::correct();
            }
            let mut feedback = vec![format!("❌ Incorrect. The emotion is '{expected}'.")];
            if let Some(alternative) = &alternative {
                feedback.push(format!("(Also described by this definition: {alternative})"));
            }
            Grade::incorrect(feedback)
        })
    }
}

/// Definition shown, emotion picked from three options.
pub struct DefinitionChoiceVariant {
    emotions: Rc<[EmotionEntry]>,
}

impl DefinitionChoiceVariant {
    pub fn new(emotions: Rc<[EmotionEntry]>) -> Self {
        Self { emotions }
    }

    fn distinct_emotions(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.emotions
            .iter()
            .map(|entry| entry.emotion.as_str())
            .filter(|emotion| seen.insert(emotion.to_lowercase()))
            .collect()
    }

    fn choose_distractors(&self, answer: &str, rng: &mut StdRng) -> Vec<String> {
        let mut pool: Vec<&str> = self
            .distinct_emotions()
            .into_iter()
            .filter(|emotion| !emotion.eq_ignore_ascii_case(answer))
            .collect();
        pool.shuffle(rng);
        pool.into_iter()
            .take(DISTRACTORS)
            .map(str::to_string)
            .collect()
    }
}

impl CardVariant for DefinitionChoiceVariant {
    fn id(&self) -> &str {
        DEFINITION_CHOICE_ID
    }

    fn label(&self) -> &str {
        "Definition → Multiple Choice"
    }

    fn build_cards(&self) -> Result<Vec<Card>, CatalogError> {
        let found = self.distinct_emotions().len();
        if found < DISTRACTORS + 1 {
            return Err(CatalogError::NotEnoughDistractors {
                needed: DISTRACTORS + 1,
                found,
            });
        }
        Ok(self
            .emotions
            .iter()
            .map(|entry| emotion_card(DEFINITION_CHOICE_ID, entry))
            .collect())
    }

    fn prepare_question(&self, card: &Card, rng: &mut StdRng) -> Question {
        let correct = expected_emotion(card);
        let mut options = vec![correct.clone()];
        options.extend(self.choose_distractors(&correct, rng));
        options.shuffle(rng);

        let prompt = vec![card.prompt.clone(), "Select the matching emotion:".to_string()];
        let choices = options.clone();
        Question::new(prompt, choices, move |response| {
            let selection = choice_index(response, options.len())
                .map(|idx| options[idx].as_str())
                .or_else(|| {
                    let lowered = response.trim().to_lowercase();
                    options
                        .iter()
                        .find(|option| option.to_lowercase() == lowered)
                        .map(String::as_str)
                });

            match selection {
                None => Grade::retry("Please choose one of the listed options (number or text)."),
                Some(choice) if choice.eq_ignore_ascii_case(&correct) => Grade::correct(),
                Some(_) => Grade::incorrect(vec![format!(
                    "❌ Incorrect. The correct emotion is '{correct}'."
                )]),
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WheelLayer {
    Primary,
    Secondary,
    Tertiary,
}

impl WheelLayer {
    pub const ALL: [WheelLayer; 3] = [Self::Primary, Self::Secondary, Self::Tertiary];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Tertiary => "tertiary",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Primary => "Primary",
            Self::Secondary => "Secondary",
            Self::Tertiary => "Tertiary",
        }
    }

    /// Number of wheel steps from the centre down to this layer.
    fn depth(&self) -> usize {
        match self {
            Self::Primary => 1,
            Self::Secondary => 2,
            Self::Tertiary => 3,
        }
    }

    /// Accepts the layer name, its first letter, or its 1-based position.
    pub fn parse_response(response: &str) -> Option<Self> {
        let cleaned = response.trim().to_lowercase();
        if let Some(idx) = choice_index(&cleaned, Self::ALL.len()) {
            return Some(Self::ALL[idx]);
        }
        Self::ALL
            .into_iter()
            .find(|layer| cleaned == layer.as_str() || cleaned == &layer.as_str()[..1])
    }
}

impl std::str::FromStr for WheelLayer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|layer| layer.as_str() == s)
            .ok_or_else(|| format!("unknown wheel layer: {s}"))
    }
}

/// Emotion shown, wheel layer answered. One card per distinct (emotion, layer).
pub struct FeelingsLayerVariant {
    cards: Vec<Card>,
}

impl FeelingsLayerVariant {
    pub fn new(wheel: &[WheelEntry]) -> Self {
        let mut seen = HashSet::new();
        let mut cards = Vec::new();

        for entry in wheel {
            let path = [&entry.primary, &entry.secondary, &entry.tertiary];
            for (layer, name) in WheelLayer::ALL.into_iter().zip(path) {
                let name = name.trim();
                if name.is_empty() || !seen.insert((name.to_lowercase(), layer)) {
                    continue;
                }
                let mut card = Card::new(
                    format!("{FEELINGS_LAYER_ID}:{}:{}", layer.as_str(), name.to_lowercase()),
                    FEELINGS_LAYER_ID,
                    name,
                    AnswerValue::Text(layer.as_str().to_string()),
                );
                card.path = path.iter().map(|s| s.to_string()).collect();
                cards.push(card);
            }
        }

        Self { cards }
    }
}

impl CardVariant for FeelingsLayerVariant {
    fn id(&self) -> &str {
        FEELINGS_LAYER_ID
    }

    fn label(&self) -> &str {
        "Feelings Wheel Layer"
    }

    fn build_cards(&self) -> Result<Vec<Card>, CatalogError> {
        Ok(self.cards.clone())
    }

    fn prepare_question(&self, card: &Card, _rng: &mut StdRng) -> Question {
        let emotion = card.prompt.clone();
        let layer: Option<WheelLayer> = card.answer.to_string().parse().ok();
        let chain = layer
            .map(|layer| {
                card.path
                    .iter()
                    .take(layer.depth())
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(" → ")
            })
            .unwrap_or_default();

        let prompt = vec![
            format!("Emotion: {emotion}"),
            "Which layer does this emotion belong to?".to_string(),
        ];
        let choices = WheelLayer::ALL.iter().map(|l| l.title().to_string()).collect();

        Question::new(prompt, choices, move |response| {
            let Some(selection) = WheelLayer::parse_response(response) else {
                return Grade::retry(
                    "Please answer with primary, secondary, or tertiary (or 1-3 / p / s / t).",
                );
            };
            match layer {
                Some(expected) if expected == selection => Grade::correct(),
                Some(expected) => Grade::incorrect(vec![format!(
                    "❌ Incorrect. '{emotion}' is a {} emotion ({chain}).",
                    expected.title()
                )]),
                None => Grade::incorrect(vec![format!("❌ Incorrect. '{emotion}' has no known layer.")]),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::{Outcome, VariantSet};
    use rand::SeedableRng;

    fn entry(emotion: &str, definition: &str) -> EmotionEntry {
        EmotionEntry {
            emotion: emotion.into(),
            definition: definition.into(),
            quadrant: "unknown".into(),
        }
    }

    fn wheel() -> Vec<WheelEntry> {
        vec![
            WheelEntry { primary: "Happy".into(), secondary: "Playful".into(), tertiary: "Aroused".into() },
            WheelEntry { primary: "Happy".into(), secondary: "Content".into(), tertiary: "Free".into() },
        ]
    }

    fn emotions() -> Vec<EmotionEntry> {
        vec![
            entry("Joy", "Great pleasure"),
            entry("Delight", "Great pleasure"),
            entry("Calm", "At peace"),
            entry("Dread", "Anticipated fear"),
        ]
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(99)
    }

    #[test]
    fn card_ids_follow_variant_conventions() {
        let catalog = VariantSet::new(all(emotions(), wheel())).catalog().unwrap();
        assert!(catalog.get("definition-input:joy").is_some());
        assert!(catalog.get("definition-multiple-choice:calm").is_some());
        assert!(catalog.get("feelings-layer:primary:happy").is_some());
        assert!(catalog.get("feelings-layer:tertiary:free").is_some());
        // 4 + 4 + (Happy once, 2 secondaries, 2 tertiaries)
        assert_eq!(catalog.len(), 13);
    }

    #[test]
    fn definition_input_mentions_alternative() {
        let variant = DefinitionInputVariant::new(emotions().into());
        let card = &variant.build_cards().unwrap()[0];
        let question = variant.prepare_question(card, &mut rng());
        assert_eq!(question.grade(" JOY ").outcome, Outcome::Correct);

        let grade = question.grade("sad");
        assert_eq!(grade.outcome, Outcome::Incorrect);
        assert_eq!(grade.feedback[1], "(Also described by this definition: Delight)");
    }

    #[test]
    fn multiple_choice_needs_three_distinct_emotions() {
        let variant = DefinitionChoiceVariant::new(vec![entry("Joy", "a"), entry("Calm", "b")].into());
        assert_eq!(
            variant.build_cards().unwrap_err(),
            CatalogError::NotEnoughDistractors { needed: 3, found: 2 }
        );
    }

    #[test]
    fn multiple_choice_options_are_distinct_and_contain_answer() {
        let variant = DefinitionChoiceVariant::new(emotions().into());
        let cards = variant.build_cards().unwrap();
        let mut rng = rng();
        for card in &cards {
            let question = variant.prepare_question(card, &mut rng);
            assert_eq!(question.choices.len(), 3);
            let lowered: HashSet<String> = question.choices.iter().map(|c| c.to_lowercase()).collect();
            assert_eq!(lowered.len(), 3);
            let answer = card.answer.to_string();
            let position = question.choices.iter().position(|c| *c == answer).unwrap();

            assert_eq!(question.grade(&(position + 1).to_string()).outcome, Outcome::Correct);
            assert_eq!(question.grade(&answer.to_uppercase()).outcome, Outcome::Correct);
            assert_eq!(question.grade("nothing").outcome, Outcome::Retry);
            assert_eq!(question.grade("0").outcome, Outcome::Retry);
        }
    }

    #[test]
    fn layer_accepts_aliases_and_explains_misses() {
        let variant = FeelingsLayerVariant::new(&wheel());
        let cards = variant.build_cards().unwrap();
        let playful = cards
            .iter()
            .find(|c| c.card_id == "feelings-layer:secondary:playful")
            .unwrap();
        let question = variant.prepare_question(playful, &mut rng());
        assert_eq!(question.choices, ["Primary", "Secondary", "Tertiary"]);
        assert_eq!(question.grade("s").outcome, Outcome::Correct);
        assert_eq!(question.grade("2").outcome, Outcome::Correct);
        assert_eq!(question.grade("Secondary").outcome, Outcome::Correct);
        assert_eq!(question.grade("x").outcome, Outcome::Retry);

        let grade = question.grade("t");
        assert_eq!(grade.outcome, Outcome::Incorrect);
        assert_eq!(
            grade.feedback[0],
            "❌ Incorrect. 'Playful' is a Secondary emotion (Happy → Playful)."
        );
    }
}
