use crate::question::{Question, evaluate};
use crate::shuffle::presentation_key;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeSet;

/// Number of questions in a mock exam
pub const EXAM_LENGTH: usize = 20;

/// A mock exam: a random draw of questions answered once each.
///
/// Answers are only tallied here; progress and review state stay untouched.
#[derive(Debug, Clone)]
pub struct ExamSession {
    questions: Vec<Question>,
    position: usize,
    correct: usize,
}

impl ExamSession {
    /// Draws up to `EXAM_LENGTH` distinct questions from the pool
    pub fn draw<R: Rng + ?Sized>(pool: &[&Question], rng: &mut R) -> Self {
        let questions = pool
            .choose_multiple(rng, EXAM_LENGTH)
            .map(|q| (*q).clone())
            .collect();
        Self {
            questions,
            position: 0,
            correct: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn answered(&self) -> usize {
        self.position
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.questions.len()
    }

    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.position)
    }

    pub fn current_key(&self) -> Option<String> {
        self.current()
            .map(|q| presentation_key(q.id(), self.position))
    }

    /// Grades the current question and moves to the next one.
    /// Returns `None` once the exam is over.
    pub fn answer(&mut self, selected_slots: &BTreeSet<usize>) -> Option<bool> {
        let question = self.questions.get(self.position)?;
        let key = presentation_key(question.id(), self.position);
        let is_correct = evaluate(question, selected_slots, &key);
        if is_correct {
            self.correct += 1;
        }
        self.position += 1;
        Some(is_correct)
    }

    /// Share of correct answers so far, rounded to a whole percent
    pub fn percent(&self) -> u32 {
        if self.position == 0 {
            return 0;
        }
        ((self.correct as f64 / self.position as f64) * 100.0).round() as u32
    }
}
