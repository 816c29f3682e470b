use crate::dashboard::Dashboard;
use crate::database::Database;
use crate::progress::{AnswerOutcome, UserProgress};
use crate::question::{Question, QuestionError, evaluate};
use crate::question_bank::default_questions;
use crate::session::matches_search;
use crate::spaced_repetition::{ReviewScheduler, ReviewState};
use crate::time_format::format_time_difference;
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("invalid question: {0}")]
    InvalidQuestion(#[from] QuestionError),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of answering a single question
#[derive(Debug, Clone)]
pub struct AnswerResult {
    pub question_id: String,
    pub presentation_key: String,
    pub is_correct: bool,
    /// Display slots that would have been the right answer
    pub correct_slots: BTreeSet<usize>,
    pub outcome: AnswerOutcome,
}

/// Size of the review queue at the service clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewStatus {
    pub due: usize,
    pub queued: i64,
}

/// Service layer tying storage, scheduling and the clock together for one user
pub struct QuizService {
    db: Arc<Database>,
    user_id: String,
    scheduler: ReviewScheduler,
}

impl QuizService {
    pub fn new(db: Arc<Database>, user_id: &str) -> Self {
        Self {
            db,
            user_id: user_id.to_string(),
            scheduler: ReviewScheduler::new(),
        }
    }

    pub fn with_scheduler(mut self, scheduler: ReviewScheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn scheduler(&self) -> &ReviewScheduler {
        &self.scheduler
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.db.current_time()
    }

    /// Active questions, seeding the built-in bank into a fresh database
    pub fn questions(&self) -> Result<Vec<Question>, QuizError> {
        if self.db.count_questions()? == 0 {
            self.db.seed_questions(&default_questions()?)?;
        }
        Ok(self.db.list_questions()?)
    }

    /// Active questions matching `query`, all of them without one
    pub fn find_questions(&self, query: Option<&str>) -> Result<Vec<Question>, QuizError> {
        let mut questions = self.questions()?;
        if let Some(query) = query {
            questions.retain(|q| matches_search(q, query));
        }
        Ok(questions)
    }

    pub fn question(&self, question_id: &str) -> Result<Option<Question>, QuizError> {
        Ok(self.db.get_question(question_id)?)
    }

    /// Hides a question from every mode; progress rows stay in storage
    pub fn delete_question(&self, question_id: &str) -> Result<bool, QuizError> {
        let deleted = self.db.delete_question(question_id)?;
        if deleted {
            info!("Question {} deleted", question_id);
        }
        Ok(deleted)
    }

    pub fn review_state(&self, question_id: &str) -> Result<Option<ReviewState>, QuizError> {
        Ok(self.db.get_review_state(&self.user_id, question_id)?)
    }

    pub fn review_status(&self) -> Result<ReviewStatus, QuizError> {
        Ok(ReviewStatus {
            due: self.db.get_due_reviews(&self.user_id)?.len(),
            queued: self.db.count_queued_reviews(&self.user_id)?,
        })
    }

    pub fn progress(&self) -> Result<UserProgress, QuizError> {
        let progress = self.db.load_progress(&self.user_id)?;
        debug!(
            "Loaded progress for user={}: {} attempts, {} queued",
            self.user_id,
            progress.total_attempts,
            progress.queue_size()
        );
        Ok(progress)
    }

    /// Grades an answer, applies it to `progress` and persists what changed
    pub fn submit_answer(
        &self,
        progress: &mut UserProgress,
        question: &Question,
        selected_slots: &BTreeSet<usize>,
        presentation_key: &str,
    ) -> Result<AnswerResult, QuizError> {
        let now = self.now();
        let is_correct = evaluate(question, selected_slots, presentation_key);
        // Applied to a copy so a failed write leaves the caller's view untouched
        let mut updated = progress.clone();
        let outcome = updated.record_answer(question.id(), is_correct, now, &self.scheduler);

        let review_state = outcome
            .schedule
            .as_ref()
            .and_then(|_| updated.review.get(question.id()));
        self.db
            .record_answer(&self.user_id, question.id(), is_correct, review_state)?;
        *progress = updated;

        match &outcome.schedule {
            Some(schedule) => info!(
                "Answer: {} | {} | Streak: {} | Next review: {} ({}){}",
                question.id(),
                if is_correct { "correct" } else { "wrong" },
                schedule.streak,
                format_time_difference(now, schedule.next_review_date),
                schedule.label,
                if outcome.left_queue { " | mastered" } else { "" }
            ),
            None => info!(
                "Answer: {} | {} | not in review queue",
                question.id(),
                if is_correct { "correct" } else { "wrong" }
            ),
        }

        Ok(AnswerResult {
            question_id: question.id().to_string(),
            presentation_key: presentation_key.to_string(),
            is_correct,
            correct_slots: question.correct_slots(presentation_key),
            outcome,
        })
    }

    /// Flips a bookmark in storage and in `progress`; returns the new state
    pub fn toggle_bookmark(
        &self,
        progress: &mut UserProgress,
        question_id: &str,
    ) -> Result<bool, QuizError> {
        let bookmarked = self.db.toggle_bookmark(&self.user_id, question_id)?;
        if bookmarked {
            progress.bookmarks.insert(question_id.to_string());
        } else {
            progress.bookmarks.remove(question_id);
        }
        info!(
            "Bookmark for {} {}",
            question_id,
            if bookmarked { "set" } else { "removed" }
        );
        Ok(bookmarked)
    }

    pub fn dashboard(&self, questions: &[Question], progress: &UserProgress) -> Dashboard {
        Dashboard::build(questions, progress, self.now())
    }
}
