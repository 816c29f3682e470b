use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use thiserror::Error;

/// Default streak at which a question leaves the active review queue
pub const DEFAULT_MASTERY_THRESHOLD: u32 = 6;

/// One rung of the review ladder
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewLevel {
    pub interval: Duration,
    pub label: String,
}

impl ReviewLevel {
    pub fn new(interval: Duration, label: &str) -> Self {
        Self {
            interval,
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchedulerConfigError {
    #[error("interval table must contain at least one level")]
    EmptyTable,
    #[error("level 0 must be due immediately")]
    DelayedFirstLevel,
    #[error("interval of level {level} is shorter than the level before it")]
    DecreasingInterval { level: usize },
}

/// Interval table plus the mastery-exit policy
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerConfig {
    levels: Vec<ReviewLevel>,
    mastery_threshold: Option<u32>,
}

impl SchedulerConfig {
    /// Builds a validated configuration.
    ///
    /// `mastery_threshold` of `None` keeps questions in the queue forever and
    /// relies on eligibility times alone.
    pub fn new(
        levels: Vec<ReviewLevel>,
        mastery_threshold: Option<u32>,
    ) -> Result<Self, SchedulerConfigError> {
        let first = levels.first().ok_or(SchedulerConfigError::EmptyTable)?;
        if first.interval != Duration::zero() {
            return Err(SchedulerConfigError::DelayedFirstLevel);
        }
        if let Some(level) = levels
            .windows(2)
            .position(|pair| pair[1].interval < pair[0].interval)
        {
            return Err(SchedulerConfigError::DecreasingInterval { level: level + 1 });
        }
        Ok(Self {
            levels,
            mastery_threshold,
        })
    }

    /// Sofort, 10 Minuten, 1 Tag, 3 Tage, 1 Woche, 2 Wochen
    pub fn standard_levels() -> Vec<ReviewLevel> {
        vec![
            ReviewLevel::new(Duration::zero(), "Sofort"),
            ReviewLevel::new(Duration::minutes(10), "10 Minuten"),
            ReviewLevel::new(Duration::days(1), "1 Tag"),
            ReviewLevel::new(Duration::days(3), "3 Tage"),
            ReviewLevel::new(Duration::weeks(1), "1 Woche"),
            ReviewLevel::new(Duration::weeks(2), "2 Wochen"),
        ]
    }

    pub fn with_mastery_threshold(mut self, mastery_threshold: Option<u32>) -> Self {
        self.mastery_threshold = mastery_threshold;
        self
    }

    pub fn levels(&self) -> &[ReviewLevel] {
        &self.levels
    }

    pub fn mastery_threshold(&self) -> Option<u32> {
        self.mastery_threshold
    }

    pub fn max_level(&self) -> usize {
        self.levels.len() - 1
    }

    /// Level lookup, clamped to the last rung
    pub fn level(&self, streak: u32) -> &ReviewLevel {
        let index = (streak as usize).min(self.max_level());
        &self.levels[index]
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            levels: Self::standard_levels(),
            mastery_threshold: Some(DEFAULT_MASTERY_THRESHOLD),
        }
    }
}

/// Per-user, per-question review bookkeeping
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewState {
    pub streak: u32,
    pub next_review_date: DateTime<Utc>,
    pub in_queue: bool,
}

impl ReviewState {
    /// A question that has just been answered wrong for the first time
    pub fn entering_queue(now: DateTime<Utc>) -> Self {
        Self {
            streak: 0,
            next_review_date: now,
            in_queue: true,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.in_queue && self.next_review_date <= now
    }
}

/// Result of one scheduling transition
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleOutcome {
    pub streak: u32,
    pub next_review_date: DateTime<Utc>,
    /// Interval just granted, e.g. "3 Tage"
    pub label: String,
}

/// Fixed-interval review scheduler
#[derive(Debug, Clone, Default)]
pub struct ReviewScheduler {
    config: SchedulerConfig,
}

impl ReviewScheduler {
    /// Creates a scheduler with the standard interval table
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Computes the next streak and eligibility for an answer given at `now`.
    ///
    /// A wrong answer always drops the streak to 0 and makes the question due
    /// immediately. A correct one moves it one level up the table.
    pub fn schedule(
        &self,
        current_streak: u32,
        was_correct: bool,
        now: DateTime<Utc>,
    ) -> ScheduleOutcome {
        let streak = if was_correct {
            current_streak.saturating_add(1)
        } else {
            0
        };
        let level = self.config.level(streak);
        let next_review_date = if was_correct {
            now + level.interval
        } else {
            now
        };

        ScheduleOutcome {
            streak,
            next_review_date,
            label: level.label.clone(),
        }
    }

    pub fn interval_for(&self, streak: u32) -> Duration {
        self.config.level(streak).interval
    }

    pub fn label_for(&self, streak: u32) -> &str {
        &self.config.level(streak).label
    }

    pub fn is_mastered(&self, streak: u32) -> bool {
        self.config
            .mastery_threshold
            .is_some_and(|threshold| streak >= threshold)
    }
}

/// Question ids whose review is due at `now`, soonest first
pub fn due_set(states: &HashMap<String, ReviewState>, now: DateTime<Utc>) -> Vec<&str> {
    let mut due: Vec<(&str, &ReviewState)> = states
        .iter()
        .filter(|(_, state)| state.is_due(now))
        .map(|(id, state)| (id.as_str(), state))
        .collect();
    due.sort_by(|a, b| {
        a.1.next_review_date
            .cmp(&b.1.next_review_date)
            .then_with(|| a.0.cmp(b.0))
    });
    due.into_iter().map(|(id, _)| id).collect()
}
