use crate::progress::UserProgress;
use crate::question::Question;
use crate::question_bank::{STUDY_GROUPS, StudyGroup};
use chrono::{DateTime, Utc};

/// Rank titles by minimum score
pub const RANKS: [(u64, &str); 6] = [
    (0, "Anwärter:in"),
    (150, "Inspektor:in"),
    (400, "Gruppeninspektor:in"),
    (800, "Revierinspektor:in"),
    (1300, "Abteilungsinspektor:in"),
    (2000, "Chefinspektor:in"),
];

/// Sections of the group detail list at most this many questions
const DETAIL_LIST_LIMIT: usize = 10;

pub fn rank_for(score: u64) -> &'static str {
    RANKS
        .iter()
        .rev()
        .find(|(min, _)| score >= *min)
        .map(|(_, title)| *title)
        .unwrap_or(RANKS[0].1)
}

/// Rounded percentage, 0 when there is nothing to divide by
pub fn percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    pub key: &'static str,
    pub title: &'static str,
    pub total: usize,
    pub attempted_questions: usize,
    pub attempts: u64,
    pub correct: u64,
}

impl GroupStats {
    fn collect(group: &'static StudyGroup, questions: &[Question], progress: &UserProgress) -> Self {
        let mut stats = GroupStats {
            key: group.key,
            title: group.title,
            total: 0,
            attempted_questions: 0,
            attempts: 0,
            correct: 0,
        };
        for question in questions.iter().filter(|q| group.contains(q)) {
            let attempts = progress.attempts_for(question.id());
            stats.total += 1;
            if attempts > 0 {
                stats.attempted_questions += 1;
            }
            stats.attempts += attempts;
            stats.correct += progress.correct_for(question.id());
        }
        stats
    }

    pub fn accuracy(&self) -> u32 {
        percent(self.correct, self.attempts)
    }

    pub fn learned(&self) -> u32 {
        percent(self.attempted_questions as u64, self.total as u64)
    }
}

/// Overview shown on the start screen and by `progress_report`
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub score: u64,
    pub rank: &'static str,
    pub accuracy: u32,
    pub total_questions: usize,
    pub attempted_questions: usize,
    pub due_reviews: usize,
    pub queue_size: usize,
    pub bookmarks: usize,
    pub groups: Vec<GroupStats>,
}

impl Dashboard {
    pub fn build(questions: &[Question], progress: &UserProgress, now: DateTime<Utc>) -> Self {
        let score = progress.score();
        let attempted_questions = questions
            .iter()
            .filter(|q| progress.attempts_for(q.id()) > 0)
            .count();
        let due_reviews = progress
            .due_reviews(now)
            .into_iter()
            .filter(|id| questions.iter().any(|q| q.id() == *id))
            .count();

        Dashboard {
            score,
            rank: rank_for(score),
            accuracy: percent(progress.total_correct, progress.total_attempts),
            total_questions: questions.len(),
            attempted_questions,
            due_reviews,
            queue_size: progress.queue_size(),
            bookmarks: progress.bookmarks.len(),
            groups: STUDY_GROUPS
                .iter()
                .map(|group| GroupStats::collect(group, questions, progress))
                .collect(),
        }
    }

    /// Share of distinct questions answered at least once
    pub fn progress_percent(&self) -> u32 {
        percent(self.attempted_questions as u64, self.total_questions as u64)
    }

    pub fn render(&self) -> String {
        let mut lines = vec![
            format!("Rang: {} ({} XP)", self.rank, self.score),
            format!("Genauigkeit: {}%", self.accuracy),
            format!(
                "Fortschritt: {}% ({}/{} Fragen)",
                self.progress_percent(),
                self.attempted_questions,
                self.total_questions
            ),
            format!(
                "Fällig: {} von {} in der Wiederholung",
                self.due_reviews, self.queue_size
            ),
            format!("Lesezeichen: {}", self.bookmarks),
            String::new(),
            "Fächeranalyse".to_string(),
        ];
        for group in &self.groups {
            lines.push(format!(
                "  {:<6}{:<26}{:>3} Fragen  gelernt {:>3}%  richtig {:>3}%",
                group.key,
                group.title,
                group.total,
                group.learned(),
                group.accuracy()
            ));
        }
        lines.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagStats {
    pub tag: &'static str,
    pub total: usize,
    pub attempts: u64,
    pub correct: u64,
}

impl TagStats {
    /// Success ratio, 0 for a tag nobody has practised yet
    pub fn ratio(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.correct as f64 / self.attempts as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionScore<'a> {
    pub question: &'a Question,
    pub attempts: u64,
    pub correct: u64,
}

impl QuestionScore<'_> {
    pub fn accuracy(&self) -> u32 {
        percent(self.correct, self.attempts)
    }
}

/// Drill-down for one study group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupDetail<'a> {
    pub stats: GroupStats,
    /// Weakest tag first
    pub tags: Vec<TagStats>,
    /// Attempted, success ratio at most 60%
    pub critical: Vec<QuestionScore<'a>>,
    /// Success ratio above 60% but not yet perfect
    pub stable: Vec<QuestionScore<'a>>,
    pub unattempted: usize,
}

impl<'a> GroupDetail<'a> {
    pub fn build(group: &'static StudyGroup, questions: &'a [Question], progress: &UserProgress) -> Self {
        let mut tags: Vec<TagStats> = group
            .tags
            .iter()
            .map(|&tag| {
                let mut stats = TagStats {
                    tag,
                    total: 0,
                    attempts: 0,
                    correct: 0,
                };
                for question in questions.iter().filter(|q| q.has_any_tag(&[tag])) {
                    stats.total += 1;
                    stats.attempts += progress.attempts_for(question.id());
                    stats.correct += progress.correct_for(question.id());
                }
                stats
            })
            .filter(|stats| stats.total > 0)
            .collect();
        tags.sort_by(|a, b| a.ratio().total_cmp(&b.ratio()));

        let mut critical = Vec::new();
        let mut stable = Vec::new();
        let mut unattempted = 0;
        for question in questions.iter().filter(|q| group.contains(q)) {
            let score = QuestionScore {
                question,
                attempts: progress.attempts_for(question.id()),
                correct: progress.correct_for(question.id()),
            };
            // ratio <= 0.6 compared in integers
            if score.attempts == 0 {
                unattempted += 1;
            } else if score.correct * 5 <= score.attempts * 3 {
                critical.push(score);
            } else if score.correct < score.attempts {
                stable.push(score);
            }
        }

        GroupDetail {
            stats: GroupStats::collect(group, questions, progress),
            tags,
            critical,
            stable,
            unattempted,
        }
    }

    /// Tag to practise next, once there is data for it
    pub fn focus_tag(&self) -> Option<&TagStats> {
        self.tags.first().filter(|stats| stats.attempts > 0)
    }

    pub fn render(&self) -> String {
        let mut lines = vec![format!(
            "{}: Erfolgsquote {}%, {} offene Fragen",
            self.stats.title,
            self.stats.accuracy(),
            self.unattempted
        )];
        if let Some(focus) = self.focus_tag() {
            lines.push(format!("Empfehlung: {} üben", focus.tag));
        }
        lines.push("Bereiche".to_string());
        for tag in &self.tags {
            lines.push(format!(
                "  {:<8}{:>3}/{:<3} {:>3}%",
                tag.tag,
                tag.correct,
                tag.attempts,
                percent(tag.correct, tag.attempts)
            ));
        }
        for (title, scores) in [("Kritisch", &self.critical), ("Stabil", &self.stable)] {
            lines.push(format!("{} ({})", title, scores.len()));
            for score in scores.iter().take(DETAIL_LIST_LIMIT) {
                lines.push(format!(
                    "  {:>3}%  {}/{}  {}",
                    score.accuracy(),
                    score.correct,
                    score.attempts,
                    score.question.prompt()
                ));
            }
        }
        lines.join("\n")
    }
}
