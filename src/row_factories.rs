use crate::question::{Question, QuestionDraft};
use crate::spaced_repetition::ReviewState;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::Row;
use rusqlite::types::Type;

/// Fixed-width RFC 3339 so stored timestamps sort as text
pub fn to_db_timestamp(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn conversion_error<E>(index: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(err))
}

fn parse_timestamp(index: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|e| conversion_error(index, e))
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Factory for creating Question objects from database rows
pub struct QuestionRowFactory;

impl QuestionRowFactory {
    pub const COLUMNS: &'static str = "id, prompt, choice_0, choice_1, choice_2, choice_3, choice_4, \
         correct, explanation, law_ref, tags, difficulty, last_checked";

    /// Creates a validated Question from a row selected with `COLUMNS`.
    /// Rows that break question invariants surface as conversion failures.
    pub fn from_row(row: &Row) -> rusqlite::Result<Question> {
        let mut choices = Vec::with_capacity(5);
        for index in 2..7 {
            choices.push(row.get::<_, String>(index)?);
        }

        let correct_text: String = row.get(7)?;
        let correct = split_list(&correct_text)
            .map(|s| s.parse::<usize>().map_err(|e| conversion_error(7, e)))
            .collect::<rusqlite::Result<Vec<usize>>>()?;

        let tags_text: String = row.get(10)?;
        let last_checked = row
            .get::<_, Option<String>>(12)?
            .map(|s| {
                NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|e| conversion_error(12, e))
            })
            .transpose()?;

        let draft = QuestionDraft {
            id: row.get(0)?,
            prompt: row.get(1)?,
            choices,
            correct,
            explanation: row.get(8)?,
            law_ref: row.get(9)?,
            tags: split_list(&tags_text).map(str::to_string).collect(),
            difficulty: row.get(11)?,
            last_checked,
        };
        draft.validate().map_err(|e| conversion_error(0, e))
    }
}

/// Factory for creating review states from database rows
pub struct ReviewStateRowFactory;

impl ReviewStateRowFactory {
    /// Expected columns: question_id, streak, next_review_date, in_queue
    pub fn from_row(row: &Row) -> rusqlite::Result<(String, ReviewState)> {
        let next_review_date = parse_timestamp(2, &row.get::<_, String>(2)?)?;
        Ok((
            row.get(0)?,
            ReviewState {
                streak: row.get(1)?,
                next_review_date,
                in_queue: row.get(3)?,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rusqlite::Connection;

    fn question_table() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE questions (
                id TEXT, prompt TEXT, choice_0 TEXT, choice_1 TEXT, choice_2 TEXT,
                choice_3 TEXT, choice_4 TEXT, correct TEXT, explanation TEXT,
                law_ref TEXT, tags TEXT, difficulty INTEGER, last_checked TEXT
            )",
        )
        .unwrap();
        conn
    }

    fn load(conn: &Connection) -> rusqlite::Result<Question> {
        conn.query_row(
            &format!("SELECT {} FROM questions", QuestionRowFactory::COLUMNS),
            [],
            QuestionRowFactory::from_row,
        )
    }

    #[test]
    fn test_timestamps_have_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(to_db_timestamp(whole), "2025-01-15T12:00:00.000000Z");
        assert_eq!(parse_timestamp(0, &to_db_timestamp(whole)).unwrap(), whole);
    }

    #[test]
    fn test_question_from_row() {
        let conn = question_table();
        conn.execute(
            "INSERT INTO questions VALUES ('q1', 'Frage?', 'a', 'b', 'c', 'd', 'e',
                '3,0', 'weil', 'SPG § 35', 'SPG, StVO', 2, '2025-11-11')",
            [],
        )
        .unwrap();

        let question = load(&conn).unwrap();
        assert_eq!(question.id(), "q1");
        assert_eq!(question.correct().iter().copied().collect::<Vec<_>>(), vec![0, 3]);
        assert_eq!(question.tags(), &["SPG".to_string(), "StVO".to_string()]);
        assert_eq!(question.last_checked(), NaiveDate::from_ymd_opt(2025, 11, 11));
    }

    #[test]
    fn test_invalid_question_row_is_conversion_failure() {
        let conn = question_table();
        conn.execute(
            "INSERT INTO questions VALUES ('q1', 'Frage?', 'a', 'b', 'c', 'd', 'e',
                '', '', '', 'BDG', 1, NULL)",
            [],
        )
        .unwrap();

        let err = load(&conn).unwrap_err();
        assert!(matches!(err, rusqlite::Error::FromSqlConversionFailure(0, _, _)));
        assert!(err.to_string().contains("no correct choice"));
    }

    #[test]
    fn test_unparseable_correct_list_is_rejected() {
        let conn = question_table();
        conn.execute(
            "INSERT INTO questions VALUES ('q1', 'Frage?', 'a', 'b', 'c', 'd', 'e',
                '0,x', '', '', 'BDG', 1, NULL)",
            [],
        )
        .unwrap();

        assert!(matches!(
            load(&conn).unwrap_err(),
            rusqlite::Error::FromSqlConversionFailure(7, _, _)
        ));
    }
}
