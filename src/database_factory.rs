use crate::database::Database;
use crate::date_provider::{DateProvider, FixedDateProvider, OverrideDateProvider, SystemDateProvider};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Result;
use std::sync::Arc;

pub const DEFAULT_DB_PATH: &str = "exam_trainer.db";

/// Database configuration
#[derive(Debug, Clone, Default)]
pub struct DatabaseConfig {
    /// Whether to use in-memory database
    pub is_test_mode: bool,
    /// Custom database file path (ignored if in test mode)
    pub custom_path: Option<String>,
    /// Pretend today is this date
    pub override_date: Option<NaiveDate>,
    /// Freeze the clock at this instant; wins over `override_date`
    pub fixed_time: Option<DateTime<Utc>>,
}

impl DatabaseConfig {
    pub fn builder() -> DatabaseConfigBuilder {
        DatabaseConfigBuilder::default()
    }

    /// Gets the effective database path
    pub fn get_path(&self) -> &str {
        if self.is_test_mode {
            ":memory:"
        } else {
            self.custom_path.as_deref().unwrap_or(DEFAULT_DB_PATH)
        }
    }

    pub fn date_provider(&self) -> Arc<dyn DateProvider> {
        match (self.fixed_time, self.override_date) {
            (Some(instant), _) => Arc::new(FixedDateProvider::new(instant)),
            (None, Some(date)) => Arc::new(OverrideDateProvider::new(date)),
            (None, None) => Arc::new(SystemDateProvider),
        }
    }
}

#[derive(Debug, Default)]
pub struct DatabaseConfigBuilder {
    config: DatabaseConfig,
}

impl DatabaseConfigBuilder {
    pub fn test_mode(mut self) -> Self {
        self.config.is_test_mode = true;
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.config.custom_path = Some(path.into());
        self
    }

    pub fn override_date(mut self, date: Option<NaiveDate>) -> Self {
        self.config.override_date = date;
        self
    }

    /// Shorthand for tests; an impossible date leaves the clock untouched
    pub fn date_ymd(self, year: i32, month: u32, day: u32) -> Self {
        let date = NaiveDate::from_ymd_opt(year, month, day);
        self.override_date(date)
    }

    pub fn fixed_time(mut self, instant: DateTime<Utc>) -> Self {
        self.config.fixed_time = Some(instant);
        self
    }

    pub fn build(self) -> DatabaseConfig {
        self.config
    }
}

/// Factory for creating Database instances
pub struct DatabaseFactory;

impl DatabaseFactory {
    /// Creates a database with the specified configuration
    pub fn create(config: DatabaseConfig) -> Result<Database> {
        Database::with_date_provider(config.get_path(), config.date_provider())
    }
}
