use log::debug;
use rusqlite::{Connection, OptionalExtension, Result, params};
use std::collections::HashMap;

/// Attempt and correct counters for one question
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuestionCounters {
    pub attempts: u64,
    pub correct: u64,
}

fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

/// Per-user totals and per-question counters. Counters only ever grow.
pub struct ProgressRepository<'a> {
    conn: &'a Connection,
}

impl<'a> ProgressRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        ProgressRepository { conn }
    }

    pub fn record_attempt(&self, user_id: &str, question_id: &str, is_correct: bool) -> Result<()> {
        let correct = i64::from(is_correct);
        debug!(
            "Recording attempt user={} question={} correct={}",
            user_id, question_id, is_correct
        );
        self.conn.execute(
            "INSERT INTO user_totals (user_id, total_attempts, total_correct)
             VALUES (?1, 1, ?2)
             ON CONFLICT(user_id) DO UPDATE SET
                total_attempts = total_attempts + 1,
                total_correct = total_correct + excluded.total_correct",
            params![user_id, correct],
        )?;
        self.conn.execute(
            "INSERT INTO question_progress (user_id, question_id, attempts, correct)
             VALUES (?1, ?2, 1, ?3)
             ON CONFLICT(user_id, question_id) DO UPDATE SET
                attempts = attempts + 1,
                correct = correct + excluded.correct",
            params![user_id, question_id, correct],
        )?;
        Ok(())
    }

    /// (total attempts, total correct), zero for an unknown user
    pub fn get_totals(&self, user_id: &str) -> Result<(u64, u64)> {
        let totals = self
            .conn
            .query_row(
                "SELECT total_attempts, total_correct FROM user_totals WHERE user_id = ?1",
                [user_id],
                |row| Ok((to_count(row.get(0)?), to_count(row.get(1)?))),
            )
            .optional()?;
        Ok(totals.unwrap_or((0, 0)))
    }

    pub fn get_counters(&self, user_id: &str) -> Result<HashMap<String, QuestionCounters>> {
        let mut stmt = self.conn.prepare(
            "SELECT question_id, attempts, correct FROM question_progress WHERE user_id = ?1",
        )?;
        let rows = stmt.query_map([user_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                QuestionCounters {
                    attempts: to_count(row.get(1)?),
                    correct: to_count(row.get(2)?),
                },
            ))
        })?;

        let mut result = HashMap::new();
        for row in rows {
            let (question_id, counters) = row?;
            result.insert(question_id, counters);
        }
        debug!(
            "Retrieved counters for {} questions of user={}",
            result.len(),
            user_id
        );
        Ok(result)
    }
}
