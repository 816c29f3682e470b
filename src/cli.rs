use crate::session::CandidateFilter;
use crate::spaced_repetition::{DEFAULT_MASTERY_THRESHOLD, ReviewScheduler, SchedulerConfig};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Exam trainer for the Austrian police service exam
#[derive(Parser, Debug, Clone)]
#[command(name = "exam_trainer")]
#[command(about = "Multiple-choice exam training with spaced repetition", long_about = None)]
#[command(version)]
pub struct Args {
    /// Use in-memory database for testing
    #[arg(long, help = "Use in-memory database for testing")]
    pub test: bool,

    /// Custom database file path
    #[arg(long, value_name = "PATH", help = "Use custom database file path")]
    pub db_path: Option<PathBuf>,

    /// Override current date for testing (YYYY-MM-DD format)
    #[arg(
        long,
        value_name = "DATE",
        help = "Override current date (YYYY-MM-DD format)"
    )]
    pub override_date: Option<String>,

    /// Learner whose progress is read and written
    #[arg(long, value_name = "ID", default_value = "guest")]
    pub user: String,

    /// Streak at which a question leaves the review queue
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MASTERY_THRESHOLD, conflicts_with = "no_mastery_exit")]
    pub mastery_threshold: u32,

    /// Keep questions in the review queue regardless of streak
    #[arg(long)]
    pub no_mastery_exit: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Practise questions, optionally filtered
    Train {
        /// Only questions carrying one of these tags
        #[arg(long, value_delimiter = ',', conflicts_with_all = ["bookmarks", "search"])]
        tags: Vec<String>,
        /// Only bookmarked questions
        #[arg(long, conflicts_with = "search")]
        bookmarks: bool,
        /// Only questions whose text matches
        #[arg(long, value_name = "TEXT")]
        search: Option<String>,
    },
    /// Work through the questions that are due for review
    Review,
    /// Mock exam of up to 20 random questions
    Exam,
    /// Show statistics
    Dashboard {
        /// Drill into one study group (BDG, SPG, STPO, ADMIN)
        #[arg(long, value_name = "KEY")]
        group: Option<String>,
    },
    /// Toggle the bookmark on a question
    Bookmark {
        #[arg(value_name = "QUESTION_ID")]
        question_id: String,
    },
    /// Manage the question bank
    Questions {
        #[command(subcommand)]
        action: QuestionsCommand,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum QuestionsCommand {
    /// List active questions
    List {
        /// Only questions whose text matches
        #[arg(long, value_name = "TEXT")]
        search: Option<String>,
    },
    /// Show a question with its answer key and review state
    Show {
        #[arg(value_name = "QUESTION_ID")]
        question_id: String,
    },
    /// Remove a question from all modes, keeping its history
    Delete {
        #[arg(value_name = "QUESTION_ID")]
        question_id: String,
    },
}

impl Command {
    /// Candidate filter for session-based commands
    pub fn candidate_filter(&self) -> Option<CandidateFilter> {
        match self {
            Command::Train {
                tags,
                bookmarks,
                search,
            } => Some(if *bookmarks {
                CandidateFilter::Bookmarked
            } else if let Some(query) = search {
                CandidateFilter::Search(query.clone())
            } else if !tags.is_empty() {
                CandidateFilter::tags(tags.iter().map(|t| t.trim().to_string()))
            } else {
                CandidateFilter::All
            }),
            Command::Review => Some(CandidateFilter::DueForReview),
            Command::Exam => Some(CandidateFilter::All),
            Command::Dashboard { .. } | Command::Bookmark { .. } | Command::Questions { .. } => None,
        }
    }
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Validate the override_date argument if provided
    pub fn validate_override_date(&self) -> Result<Option<NaiveDate>, String> {
        match &self.override_date {
            Some(date_str) => NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| {
                    format!(
                        "Invalid date format for --override-date: '{}'. Expected YYYY-MM-DD",
                        date_str
                    )
                }),
            None => Ok(None),
        }
    }

    pub fn mastery_threshold(&self) -> Option<u32> {
        if self.no_mastery_exit {
            None
        } else {
            Some(self.mastery_threshold)
        }
    }

    pub fn scheduler(&self) -> ReviewScheduler {
        ReviewScheduler::with_config(
            SchedulerConfig::default().with_mastery_threshold(self.mastery_threshold()),
        )
    }

    /// Subcommand to run; training over all questions when none is given
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Train {
            tags: Vec::new(),
            bookmarks: false,
            search: None,
        })
    }
}
