use crate::shuffle::{OPTION_COUNT, permute};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use thiserror::Error;

/// Reasons a raw question cannot be loaded
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QuestionError {
    #[error("question id must not be empty")]
    EmptyId,
    #[error("question {id} has {count} choices, expected 5")]
    WrongChoiceCount { id: String, count: usize },
    #[error("question {id} has an empty choice at position {index}")]
    BlankChoice { id: String, index: usize },
    #[error("question {id} has no correct choice")]
    NoCorrectChoice { id: String },
    #[error("question {id} marks choice {index} as correct, but only 0..5 exist")]
    CorrectIndexOutOfRange { id: String, index: usize },
    #[error("question {id} has difficulty {difficulty}, expected 1-5")]
    DifficultyOutOfRange { id: String, difficulty: u8 },
}

/// Question as it comes from storage or the built-in bank, not yet validated
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuestionDraft {
    pub id: String,
    pub prompt: String,
    pub choices: Vec<String>,
    pub correct: Vec<usize>,
    pub explanation: String,
    pub law_ref: String,
    pub tags: Vec<String>,
    pub difficulty: u8,
    pub last_checked: Option<NaiveDate>,
}

impl QuestionDraft {
    pub fn validate(self) -> Result<Question, QuestionError> {
        Question::try_from(self)
    }
}

/// A validated multiple-choice question with exactly five options
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    id: String,
    prompt: String,
    choices: [String; OPTION_COUNT],
    correct: BTreeSet<usize>,
    explanation: String,
    law_ref: String,
    tags: Vec<String>,
    difficulty: u8,
    last_checked: Option<NaiveDate>,
}

impl TryFrom<QuestionDraft> for Question {
    type Error = QuestionError;

    fn try_from(draft: QuestionDraft) -> Result<Self, Self::Error> {
        let id = draft.id.trim().to_string();
        if id.is_empty() {
            return Err(QuestionError::EmptyId);
        }

        let count = draft.choices.len();
        let choices: [String; OPTION_COUNT] = draft
            .choices
            .try_into()
            .map_err(|_| QuestionError::WrongChoiceCount {
                id: id.clone(),
                count,
            })?;
        if let Some(index) = choices.iter().position(|c| c.trim().is_empty()) {
            return Err(QuestionError::BlankChoice { id, index });
        }

        if let Some(&index) = draft.correct.iter().find(|&&i| i >= OPTION_COUNT) {
            return Err(QuestionError::CorrectIndexOutOfRange { id, index });
        }
        let correct: BTreeSet<usize> = draft.correct.into_iter().collect();
        if correct.is_empty() {
            return Err(QuestionError::NoCorrectChoice { id });
        }

        if !(1..=5).contains(&draft.difficulty) {
            return Err(QuestionError::DifficultyOutOfRange {
                id,
                difficulty: draft.difficulty,
            });
        }

        let mut tags: Vec<String> = Vec::with_capacity(draft.tags.len());
        for tag in draft.tags {
            let tag = tag.trim().to_string();
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        Ok(Question {
            id,
            prompt: draft.prompt,
            choices,
            correct,
            explanation: draft.explanation,
            law_ref: draft.law_ref,
            tags,
            difficulty: draft.difficulty,
            last_checked: draft.last_checked,
        })
    }
}

impl Question {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn choices(&self) -> &[String; OPTION_COUNT] {
        &self.choices
    }

    /// Canonical indices of the correct options
    pub fn correct(&self) -> &BTreeSet<usize> {
        &self.correct
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn law_ref(&self) -> &str {
        &self.law_ref
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn difficulty(&self) -> u8 {
        self.difficulty
    }

    pub fn last_checked(&self) -> Option<NaiveDate> {
        self.last_checked
    }

    pub fn has_any_tag<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        self.tags
            .iter()
            .any(|tag| tags.iter().any(|wanted| wanted.as_ref() == tag))
    }

    /// Exact-match check on canonical indices; no partial credit
    pub fn is_correct_selection(&self, canonical: &BTreeSet<usize>) -> bool {
        *canonical == self.correct
    }

    /// Choices in the order they are shown for a presentation key
    pub fn display_choices(&self, presentation_key: &str) -> Vec<&str> {
        permute(presentation_key)
            .iter()
            .map(|&canonical| self.choices[canonical].as_str())
            .collect()
    }

    /// Display slots holding the correct options for a presentation key
    pub fn correct_slots(&self, presentation_key: &str) -> BTreeSet<usize> {
        permute(presentation_key)
            .iter()
            .enumerate()
            .filter(|(_, canonical)| self.correct.contains(*canonical))
            .map(|(slot, _)| slot)
            .collect()
    }

    pub fn into_draft(self) -> QuestionDraft {
        QuestionDraft {
            id: self.id,
            prompt: self.prompt,
            choices: self.choices.into(),
            correct: self.correct.into_iter().collect(),
            explanation: self.explanation,
            law_ref: self.law_ref,
            tags: self.tags,
            difficulty: self.difficulty,
            last_checked: self.last_checked,
        }
    }
}

/// Maps display slots back to canonical indices.
///
/// Returns `None` if any slot lies outside the five display positions.
pub fn to_canonical(
    selected_slots: &BTreeSet<usize>,
    presentation_key: &str,
) -> Option<BTreeSet<usize>> {
    let order = permute(presentation_key);
    selected_slots
        .iter()
        .map(|&slot| order.get(slot).copied())
        .collect()
}

/// Decides whether the selected display slots are exactly the correct answer
pub fn evaluate(
    question: &Question,
    selected_slots: &BTreeSet<usize>,
    presentation_key: &str,
) -> bool {
    match to_canonical(selected_slots, presentation_key) {
        Some(canonical) => question.is_correct_selection(&canonical),
        None => false,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn draft(id: &str, correct: &[usize]) -> QuestionDraft {
        QuestionDraft {
            id: id.to_string(),
            prompt: format!("Prompt for {}", id),
            choices: (0..OPTION_COUNT).map(|i| format!("Option {}", i)).collect(),
            correct: correct.to_vec(),
            explanation: "Explanation".to_string(),
            law_ref: "BDG § 43".to_string(),
            tags: vec!["BDG".to_string()],
            difficulty: 1,
            last_checked: None,
        }
    }

    pub(crate) fn question(id: &str, correct: &[usize]) -> Question {
        draft(id, correct).validate().unwrap()
    }

    pub(crate) fn tagged(id: &str, tags: &[&str]) -> Question {
        let mut d = draft(id, &[0]);
        d.tags = tags.iter().map(|t| t.to_string()).collect();
        d.validate().unwrap()
    }

    fn slots(values: &[usize]) -> BTreeSet<usize> {
        values.iter().copied().collect()
    }

    #[test]
    fn test_validate_accepts_well_formed_draft() {
        let q = question("Q1", &[0, 1, 3]);
        assert_eq!(q.id(), "Q1");
        assert_eq!(q.correct(), &slots(&[0, 1, 3]));
        assert_eq!(q.choices().len(), OPTION_COUNT);
    }

    #[test]
    fn test_validate_rejects_empty_id() {
        let mut d = draft("Q1", &[0]);
        d.id = "  ".to_string();
        assert_eq!(d.validate(), Err(QuestionError::EmptyId));
    }

    #[test]
    fn test_validate_rejects_wrong_choice_count() {
        let mut d = draft("Q1", &[0]);
        d.choices.pop();
        assert_eq!(
            d.validate(),
            Err(QuestionError::WrongChoiceCount {
                id: "Q1".to_string(),
                count: 4
            })
        );
    }

    #[test]
    fn test_validate_rejects_blank_choice() {
        let mut d = draft("Q1", &[0]);
        d.choices[2] = " ".to_string();
        assert_eq!(
            d.validate(),
            Err(QuestionError::BlankChoice {
                id: "Q1".to_string(),
                index: 2
            })
        );
    }

    #[test]
    fn test_validate_rejects_empty_correct_set() {
        let d = draft("Q1", &[]);
        assert_eq!(
            d.validate(),
            Err(QuestionError::NoCorrectChoice {
                id: "Q1".to_string()
            })
        );
    }

    #[test]
    fn test_validate_rejects_correct_index_out_of_range() {
        let d = draft("Q1", &[1, 5]);
        assert_eq!(
            d.validate(),
            Err(QuestionError::CorrectIndexOutOfRange {
                id: "Q1".to_string(),
                index: 5
            })
        );
    }

    #[test]
    fn test_validate_rejects_difficulty_out_of_range() {
        let mut d = draft("Q1", &[0]);
        d.difficulty = 0;
        assert!(matches!(
            d.clone().validate(),
            Err(QuestionError::DifficultyOutOfRange { difficulty: 0, .. })
        ));
        d.difficulty = 6;
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_validate_dedupes_tags_and_correct_indices() {
        let mut d = draft("Q1", &[2, 0, 2]);
        d.tags = vec!["StPO".into(), "StGB".into(), "StPO".into(), "".into()];
        let q = d.validate().unwrap();
        assert_eq!(q.tags(), &["StPO".to_string(), "StGB".to_string()]);
        assert_eq!(q.correct(), &slots(&[0, 2]));
    }

    #[test]
    fn test_error_messages_are_readable() {
        let err = draft("Q9", &[7]).validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "question Q9 marks choice 7 as correct, but only 0..5 exist"
        );
    }

    #[test]
    fn test_is_correct_selection_requires_exact_match() {
        let q = question("Q1", &[0, 2]);
        assert!(q.is_correct_selection(&slots(&[0, 2])));
        assert!(!q.is_correct_selection(&slots(&[0])));
        assert!(!q.is_correct_selection(&slots(&[0, 2, 3])));
        assert!(!q.is_correct_selection(&slots(&[])));
    }

    #[test]
    fn test_evaluate_maps_display_slots_through_permutation() {
        // "Q1#0" shows canonical [0, 1, 3, 4, 2]
        let q = question("Q1", &[0, 1, 3]);
        assert!(evaluate(&q, &slots(&[0, 1, 2]), "Q1#0"));
        assert!(!evaluate(&q, &slots(&[0, 1, 3]), "Q1#0"));
        assert!(!evaluate(&q, &slots(&[0, 1]), "Q1#0"));
    }

    #[test]
    fn test_evaluate_same_answer_differs_between_slots() {
        // "Q1#1" shows canonical [1, 3, 2, 0, 4]
        let q = question("Q1", &[0, 1, 3]);
        assert!(evaluate(&q, &slots(&[0, 1, 3]), "Q1#1"));
        assert!(!evaluate(&q, &slots(&[0, 1, 2]), "Q1#1"));
    }

    #[test]
    fn test_evaluate_rejects_unmappable_slot() {
        let q = question("Q1", &[0]);
        assert!(!evaluate(&q, &slots(&[5]), "Q1#0"));
        assert_eq!(to_canonical(&slots(&[0, 9]), "Q1#0"), None);
    }

    #[test]
    fn test_display_choices_follow_permutation() {
        let q = question("Q1", &[0]);
        assert_eq!(
            q.display_choices("Q1#0"),
            vec!["Option 0", "Option 1", "Option 3", "Option 4", "Option 2"]
        );
    }

    #[test]
    fn test_correct_slots_are_accepted_by_evaluate() {
        let q = question("Q1", &[0, 1, 3]);
        assert_eq!(q.correct_slots("Q1#0"), slots(&[0, 1, 2]));
        assert_eq!(q.correct_slots("Q1#1"), slots(&[0, 1, 3]));
        assert!(evaluate(&q, &q.correct_slots("Q1#7"), "Q1#7"));
    }

    #[test]
    fn test_has_any_tag() {
        let q = question("Q1", &[0]);
        assert!(q.has_any_tag(&["SPG", "BDG"]));
        assert!(!q.has_any_tag(&["SPG"]));
        assert!(!q.has_any_tag::<&str>(&[]));
    }

    #[test]
    fn test_into_draft_round_trip() {
        let q = question("Q1", &[3, 1]);
        let again = q.clone().into_draft().validate().unwrap();
        assert_eq!(q, again);
    }
}
