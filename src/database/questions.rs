use crate::question::Question;
use crate::row_factories::QuestionRowFactory;
use log::debug;
use rusqlite::{Connection, OptionalExtension, Result, params};

pub struct QuestionsRepository<'a> {
    conn: &'a Connection,
}

impl<'a> QuestionsRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        QuestionsRepository { conn }
    }

    /// Inserts or replaces a question; re-inserting a deleted question restores it
    pub fn upsert(&self, question: &Question) -> Result<()> {
        let choices = question.choices();
        let correct = question
            .correct()
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let last_checked = question
            .last_checked()
            .map(|d| d.format("%Y-%m-%d").to_string());

        debug!("Storing question id={}", question.id());
        self.conn.execute(
            "INSERT INTO questions (id, prompt, choice_0, choice_1, choice_2, choice_3, choice_4,
                                    correct, explanation, law_ref, tags, difficulty, last_checked, deleted)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, 0)
             ON CONFLICT(id) DO UPDATE SET
                prompt = excluded.prompt,
                choice_0 = excluded.choice_0,
                choice_1 = excluded.choice_1,
                choice_2 = excluded.choice_2,
                choice_3 = excluded.choice_3,
                choice_4 = excluded.choice_4,
                correct = excluded.correct,
                explanation = excluded.explanation,
                law_ref = excluded.law_ref,
                tags = excluded.tags,
                difficulty = excluded.difficulty,
                last_checked = excluded.last_checked,
                deleted = 0",
            params![
                question.id(),
                question.prompt(),
                choices[0],
                choices[1],
                choices[2],
                choices[3],
                choices[4],
                correct,
                question.explanation(),
                question.law_ref(),
                question.tags().join(","),
                question.difficulty(),
                last_checked
            ],
        )?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Option<Question>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {} FROM questions WHERE id = ?1 AND deleted = 0",
                    QuestionRowFactory::COLUMNS
                ),
                [id],
                QuestionRowFactory::from_row,
            )
            .optional()
    }

    /// Active questions in insertion order
    pub fn list_active(&self) -> Result<Vec<Question>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM questions WHERE deleted = 0 ORDER BY rowid ASC",
            QuestionRowFactory::COLUMNS
        ))?;

        let questions = stmt.query_map([], QuestionRowFactory::from_row)?;

        let mut result = Vec::new();
        for question in questions {
            result.push(question?);
        }

        debug!("Retrieved {} active questions from database", result.len());
        Ok(result)
    }

    /// Hides a question without dropping the rows that reference it
    pub fn soft_delete(&self, id: &str) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE questions SET deleted = 1 WHERE id = ?1 AND deleted = 0",
            [id],
        )?;
        debug!("Soft-deleted question id={} (changed: {})", id, changed);
        Ok(changed > 0)
    }

    pub fn count_active(&self) -> Result<i64> {
        self.conn.query_row(
            "SELECT COUNT(*) FROM questions WHERE deleted = 0",
            [],
            |row| row.get(0),
        )
    }

    /// Counts deleted rows too, so a bank the user emptied is not reseeded
    pub fn count_all(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM questions", [], |row| row.get(0))
    }
}
