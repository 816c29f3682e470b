use crate::row_factories::to_db_timestamp;
use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::{Connection, Result, params};
use std::collections::BTreeSet;

pub struct BookmarksRepository<'a> {
    conn: &'a Connection,
}

impl<'a> BookmarksRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        BookmarksRepository { conn }
    }

    pub fn add(&self, user_id: &str, question_id: &str, created_at: DateTime<Utc>) -> Result<()> {
        debug!("Bookmarking question={} for user={}", question_id, user_id);
        self.conn.execute(
            "INSERT OR IGNORE INTO bookmarks (user_id, question_id, created_at) VALUES (?1, ?2, ?3)",
            params![user_id, question_id, to_db_timestamp(created_at)],
        )?;
        Ok(())
    }

    /// Returns whether a bookmark was removed
    pub fn remove(&self, user_id: &str, question_id: &str) -> Result<bool> {
        let changed = self.conn.execute(
            "DELETE FROM bookmarks WHERE user_id = ?1 AND question_id = ?2",
            [user_id, question_id],
        )?;
        Ok(changed > 0)
    }

    pub fn list(&self, user_id: &str) -> Result<BTreeSet<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT question_id FROM bookmarks WHERE user_id = ?1")?;
        let rows = stmt.query_map([user_id], |row| row.get(0))?;

        let mut result = BTreeSet::new();
        for row in rows {
            result.insert(row?);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connection::init_connection;

    #[test]
    fn test_add_list_remove() {
        let conn = init_connection(":memory:").expect("Failed to create test database");
        let repo = BookmarksRepository::new(&conn);
        let now = Utc::now();

        repo.add("anna", "q2", now).unwrap();
        repo.add("anna", "q1", now).unwrap();
        repo.add("anna", "q1", now).unwrap();
        repo.add("ben", "q3", now).unwrap();

        let listed: Vec<String> = repo.list("anna").unwrap().into_iter().collect();
        assert_eq!(listed, vec!["q1", "q2"]);

        assert!(repo.remove("anna", "q1").unwrap());
        assert!(!repo.remove("anna", "q1").unwrap());
        assert_eq!(repo.list("anna").unwrap().len(), 1);
        assert_eq!(repo.list("ben").unwrap().len(), 1);
    }
}
