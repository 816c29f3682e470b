pub mod catalog;
pub mod cli;
pub mod dashboard;
pub mod database;
pub mod database_factory;
pub mod date_provider;
pub mod exam;
pub mod progress;
pub mod question;
pub mod question_bank;
pub mod quiz_service;
pub mod row_factories;
pub mod session;
pub mod shuffle;
pub mod spaced_repetition;
pub mod terminal;
pub mod time_format;
