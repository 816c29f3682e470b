pub mod bookmarks;
pub mod connection;
pub mod progress;
pub mod questions;
pub mod review_states;

use crate::date_provider::{DateProvider, SystemDateProvider};
use crate::progress::UserProgress;
use crate::question::Question;
use crate::spaced_repetition::ReviewState;
use chrono::{DateTime, Utc};
use log::info;
use rusqlite::{Connection, Result};
use std::collections::BTreeSet;
use std::sync::Arc;

pub use bookmarks::BookmarksRepository;
pub use progress::{ProgressRepository, QuestionCounters};
pub use questions::QuestionsRepository;
pub use review_states::ReviewStatesRepository;

/// Main Database struct providing access to all repositories
pub struct Database {
    pub conn: Connection,
    date_provider: Arc<dyn DateProvider>,
}

impl Database {
    pub fn new(db_path: &str) -> Result<Self> {
        Self::init(db_path, Arc::new(SystemDateProvider))
    }

    pub fn with_date_provider(db_path: &str, date_provider: Arc<dyn DateProvider>) -> Result<Self> {
        Self::init(db_path, date_provider)
    }

    fn init(db_path: &str, date_provider: Arc<dyn DateProvider>) -> Result<Self> {
        let conn = connection::init_connection(db_path)?;
        Ok(Database {
            conn,
            date_provider,
        })
    }

    /// Current time according to the configured date provider
    pub fn current_time(&self) -> DateTime<Utc> {
        self.date_provider.get_current_time()
    }

    // ===== Questions Repository Access =====

    pub fn get_question(&self, id: &str) -> Result<Option<Question>> {
        QuestionsRepository::new(&self.conn).get(id)
    }

    pub fn list_questions(&self) -> Result<Vec<Question>> {
        QuestionsRepository::new(&self.conn).list_active()
    }

    pub fn delete_question(&self, id: &str) -> Result<bool> {
        QuestionsRepository::new(&self.conn).soft_delete(id)
    }

    pub fn count_questions(&self) -> Result<i64> {
        QuestionsRepository::new(&self.conn).count_active()
    }

    /// Stores `questions` if the question table has never held any.
    /// Returns how many were inserted.
    pub fn seed_questions(&self, questions: &[Question]) -> Result<usize> {
        if QuestionsRepository::new(&self.conn).count_all()? > 0 {
            return Ok(0);
        }
        let tx = self.conn.unchecked_transaction()?;
        let repo = QuestionsRepository::new(&tx);
        for question in questions {
            repo.upsert(question)?;
        }
        tx.commit()?;
        info!("Seeded {} questions into an empty question bank", questions.len());
        Ok(questions.len())
    }

    // ===== Progress Access =====

    /// Assembles everything stored about a user into one aggregate
    pub fn load_progress(&self, user_id: &str) -> Result<UserProgress> {
        let (total_attempts, total_correct) = ProgressRepository::new(&self.conn).get_totals(user_id)?;
        let counters = ProgressRepository::new(&self.conn).get_counters(user_id)?;

        let mut progress = UserProgress {
            total_attempts,
            total_correct,
            bookmarks: BookmarksRepository::new(&self.conn).list(user_id)?,
            review: ReviewStatesRepository::new(&self.conn).get_all(user_id)?,
            ..UserProgress::default()
        };
        for (question_id, QuestionCounters { attempts, correct }) in counters {
            progress.attempts.insert(question_id.clone(), attempts);
            progress.correct.insert(question_id, correct);
        }
        Ok(progress)
    }

    /// Writes one answer: counters always, the review state only when it changed
    pub fn record_answer(
        &self,
        user_id: &str,
        question_id: &str,
        is_correct: bool,
        review_state: Option<&ReviewState>,
    ) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        ProgressRepository::new(&tx).record_attempt(user_id, question_id, is_correct)?;
        if let Some(state) = review_state {
            ReviewStatesRepository::new(&tx).upsert(user_id, question_id, state)?;
        }
        tx.commit()
    }

    pub fn get_review_state(&self, user_id: &str, question_id: &str) -> Result<Option<ReviewState>> {
        ReviewStatesRepository::new(&self.conn).get(user_id, question_id)
    }

    /// Due question ids at the provider's current time
    pub fn get_due_reviews(&self, user_id: &str) -> Result<Vec<String>> {
        ReviewStatesRepository::new(&self.conn).get_due(user_id, self.current_time())
    }

    pub fn count_queued_reviews(&self, user_id: &str) -> Result<i64> {
        ReviewStatesRepository::new(&self.conn).count_queued(user_id)
    }

    // ===== Bookmarks Access =====

    /// Flips a bookmark and returns whether the question is now bookmarked
    pub fn toggle_bookmark(&self, user_id: &str, question_id: &str) -> Result<bool> {
        let repo = BookmarksRepository::new(&self.conn);
        if repo.remove(user_id, question_id)? {
            Ok(false)
        } else {
            repo.add(user_id, question_id, self.current_time())?;
            Ok(true)
        }
    }

    pub fn list_bookmarks(&self, user_id: &str) -> Result<BTreeSet<String>> {
        BookmarksRepository::new(&self.conn).list(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database_factory::{DatabaseConfig, DatabaseFactory};
    use crate::question::tests::question;
    use chrono::{Duration, NaiveDate};

    fn create_test_db() -> Database {
        // Use an in-memory database for each test
        Database::new(":memory:").expect("Failed to create test database")
    }

    #[test]
    fn test_database_creation() {
        let db = create_test_db();
        assert_eq!(db.count_questions().unwrap(), 0);
        assert_eq!(db.load_progress("guest").unwrap(), UserProgress::default());
    }

    #[test]
    fn test_seed_only_into_empty_bank() {
        let db = create_test_db();
        let questions = vec![question("q1", &[0]), question("q2", &[1])];

        assert_eq!(db.seed_questions(&questions).unwrap(), 2);
        assert_eq!(db.seed_questions(&[question("q3", &[0])]).unwrap(), 0);
        assert_eq!(db.count_questions().unwrap(), 2);
    }

    #[test]
    fn test_seed_skips_bank_with_only_deleted_questions() {
        let db = create_test_db();
        QuestionsRepository::new(&db.conn)
            .upsert(&question("q1", &[0]))
            .unwrap();
        db.delete_question("q1").unwrap();

        assert_eq!(db.seed_questions(&[question("q2", &[0])]).unwrap(), 0);
        assert!(db.list_questions().unwrap().is_empty());
    }

    #[test]
    fn test_record_answer_and_load_progress() {
        let db = create_test_db();
        let now = db.current_time();
        let state = ReviewState::entering_queue(now);

        db.record_answer("anna", "q1", false, Some(&state)).unwrap();
        db.record_answer("anna", "q2", true, None).unwrap();
        db.toggle_bookmark("anna", "q2").unwrap();

        let progress = db.load_progress("anna").unwrap();
        assert_eq!(progress.total_attempts, 2);
        assert_eq!(progress.total_correct, 1);
        assert_eq!(progress.attempts_for("q1"), 1);
        assert_eq!(progress.correct_for("q1"), 0);
        assert_eq!(progress.correct_for("q2"), 1);
        assert!(progress.is_queued("q1"));
        assert!(!progress.review.contains_key("q2"));
        assert!(progress.is_bookmarked("q2"));
    }

    #[test]
    fn test_toggle_bookmark() {
        let db = create_test_db();
        assert!(db.toggle_bookmark("anna", "q1").unwrap());
        assert!(db.list_bookmarks("anna").unwrap().contains("q1"));
        assert!(!db.toggle_bookmark("anna", "q1").unwrap());
        assert!(db.list_bookmarks("anna").unwrap().is_empty());
    }

    #[test]
    fn test_due_reviews_follow_date_provider() {
        let db_config = DatabaseConfig::builder()
            .test_mode()
            .date_ymd(2025, 11, 12)
            .build();
        let db = DatabaseFactory::create(db_config).unwrap();
        let today = db.current_time();
        assert_eq!(today.date_naive(), NaiveDate::from_ymd_opt(2025, 11, 12).unwrap());

        let tomorrow = ReviewState {
            streak: 2,
            next_review_date: today + Duration::days(1),
            in_queue: true,
        };
        db.record_answer("anna", "q1", true, Some(&tomorrow)).unwrap();
        db.record_answer("anna", "q2", false, Some(&ReviewState::entering_queue(today)))
            .unwrap();

        assert_eq!(db.get_due_reviews("anna").unwrap(), vec!["q2"]);
        assert_eq!(db.count_queued_reviews("anna").unwrap(), 2);
        assert_eq!(db.get_review_state("anna", "q1").unwrap(), Some(tomorrow));
    }
}
