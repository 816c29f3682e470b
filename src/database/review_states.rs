use crate::row_factories::{ReviewStateRowFactory, to_db_timestamp};
use crate::spaced_repetition::ReviewState;
use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::{Connection, OptionalExtension, Result, params};
use std::collections::HashMap;

/// Log line for a review-state write; the date is absolute so it does not
/// depend on which clock the caller runs on
fn describe_update(user_id: &str, question_id: &str, state: &ReviewState) -> String {
    format!(
        "Updating review state user={} question={}: streak={}, queued={}, next review at {}",
        user_id,
        question_id,
        state.streak,
        state.in_queue,
        to_db_timestamp(state.next_review_date)
    )
}

pub struct ReviewStatesRepository<'a> {
    conn: &'a Connection,
}

impl<'a> ReviewStatesRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        ReviewStatesRepository { conn }
    }

    pub fn upsert(&self, user_id: &str, question_id: &str, state: &ReviewState) -> Result<()> {
        debug!("{}", describe_update(user_id, question_id, state));
        self.conn.execute(
            "INSERT INTO review_states (user_id, question_id, streak, next_review_date, in_queue)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(user_id, question_id) DO UPDATE SET
                streak = excluded.streak,
                next_review_date = excluded.next_review_date,
                in_queue = excluded.in_queue",
            params![
                user_id,
                question_id,
                state.streak,
                to_db_timestamp(state.next_review_date),
                state.in_queue
            ],
        )?;
        Ok(())
    }

    pub fn get(&self, user_id: &str, question_id: &str) -> Result<Option<ReviewState>> {
        self.conn
            .query_row(
                "SELECT question_id, streak, next_review_date, in_queue
                 FROM review_states WHERE user_id = ?1 AND question_id = ?2",
                [user_id, question_id],
                ReviewStateRowFactory::from_row,
            )
            .optional()
            .map(|found| found.map(|(_, state)| state))
    }

    pub fn get_all(&self, user_id: &str) -> Result<HashMap<String, ReviewState>> {
        let mut stmt = self.conn.prepare(
            "SELECT question_id, streak, next_review_date, in_queue
             FROM review_states WHERE user_id = ?1",
        )?;
        let rows = stmt.query_map([user_id], ReviewStateRowFactory::from_row)?;

        let mut result = HashMap::new();
        for row in rows {
            let (question_id, state) = row?;
            result.insert(question_id, state);
        }
        Ok(result)
    }

    /// Queued question ids due at `now`, earliest first
    pub fn get_due(&self, user_id: &str, now: DateTime<Utc>) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT question_id FROM review_states
             WHERE user_id = ?1 AND in_queue = 1 AND next_review_date <= ?2
             ORDER BY next_review_date ASC, question_id ASC",
        )?;
        let rows = stmt.query_map(params![user_id, to_db_timestamp(now)], |row| row.get(0))?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        debug!("Retrieved {} due reviews for user={}", result.len(), user_id);
        Ok(result)
    }

    pub fn count_queued(&self, user_id: &str) -> Result<i64> {
        self.conn.query_row(
            "SELECT COUNT(*) FROM review_states WHERE user_id = ?1 AND in_queue = 1",
            [user_id],
            |row| row.get(0),
        )
    }
}
