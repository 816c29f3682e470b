use crate::spaced_repetition::{ReviewScheduler, ReviewState, ScheduleOutcome, due_set};
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};

/// Everything the trainer knows about one user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserProgress {
    pub total_attempts: u64,
    pub total_correct: u64,
    pub attempts: HashMap<String, u64>,
    pub correct: HashMap<String, u64>,
    pub bookmarks: BTreeSet<String>,
    pub review: HashMap<String, ReviewState>,
}

/// What changed for a question after one answer
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub is_correct: bool,
    /// Scheduling transition, present when the question is (or just became) queued
    pub schedule: Option<ScheduleOutcome>,
    pub entered_queue: bool,
    pub left_queue: bool,
}

impl AnswerOutcome {
    pub fn review_state_changed(&self) -> bool {
        self.schedule.is_some()
    }
}

impl UserProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts_for(&self, question_id: &str) -> u64 {
        self.attempts.get(question_id).copied().unwrap_or(0)
    }

    pub fn correct_for(&self, question_id: &str) -> u64 {
        self.correct.get(question_id).copied().unwrap_or(0)
    }

    pub fn streak_for(&self, question_id: &str) -> u32 {
        self.review.get(question_id).map(|s| s.streak).unwrap_or(0)
    }

    pub fn is_bookmarked(&self, question_id: &str) -> bool {
        self.bookmarks.contains(question_id)
    }

    pub fn is_queued(&self, question_id: &str) -> bool {
        self.review.get(question_id).is_some_and(|s| s.in_queue)
    }

    /// Ten points per correct answer
    pub fn score(&self) -> u64 {
        self.total_correct * 10
    }

    pub fn queue_size(&self) -> usize {
        self.review.values().filter(|s| s.in_queue).count()
    }

    pub fn due_reviews(&self, now: DateTime<Utc>) -> Vec<&str> {
        due_set(&self.review, now)
    }

    /// Applies one answer to the counters and the review queue.
    ///
    /// Wrong answers (re)queue the question at streak 0. Correct answers only
    /// move questions that are already queued; a question reaching the
    /// mastery threshold leaves the queue but keeps its streak and date.
    pub fn record_answer(
        &mut self,
        question_id: &str,
        is_correct: bool,
        now: DateTime<Utc>,
        scheduler: &ReviewScheduler,
    ) -> AnswerOutcome {
        self.total_attempts += 1;
        *self.attempts.entry(question_id.to_string()).or_insert(0) += 1;
        let correct = self.correct.entry(question_id.to_string()).or_insert(0);
        if is_correct {
            self.total_correct += 1;
            *correct += 1;
        }

        let was_queued = self.is_queued(question_id);
        if !is_correct {
            let outcome = scheduler.schedule(self.streak_for(question_id), false, now);
            self.review.insert(
                question_id.to_string(),
                ReviewState {
                    streak: outcome.streak,
                    next_review_date: outcome.next_review_date,
                    in_queue: true,
                },
            );
            return AnswerOutcome {
                is_correct,
                schedule: Some(outcome),
                entered_queue: !was_queued,
                left_queue: false,
            };
        }

        if !was_queued {
            return AnswerOutcome {
                is_correct,
                schedule: None,
                entered_queue: false,
                left_queue: false,
            };
        }

        let outcome = scheduler.schedule(self.streak_for(question_id), true, now);
        let mastered = scheduler.is_mastered(outcome.streak);
        self.review.insert(
            question_id.to_string(),
            ReviewState {
                streak: outcome.streak,
                next_review_date: outcome.next_review_date,
                in_queue: !mastered,
            },
        );
        AnswerOutcome {
            is_correct,
            schedule: Some(outcome),
            entered_queue: false,
            left_queue: mastered,
        }
    }

    /// Flips the bookmark and returns whether the question is now bookmarked
    pub fn toggle_bookmark(&mut self, question_id: &str) -> bool {
        if self.bookmarks.remove(question_id) {
            false
        } else {
            self.bookmarks.insert(question_id.to_string());
            true
        }
    }
}
