use crate::progress::UserProgress;
use crate::question::Question;
use crate::shuffle::presentation_key;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// How the candidate pool of a session is chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateFilter {
    All,
    Tags(BTreeSet<String>),
    Bookmarked,
    Search(String),
    /// Queued questions whose review time has come; ignores every other filter
    DueForReview,
}

impl CandidateFilter {
    pub fn tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CandidateFilter::Tags(tags.into_iter().map(Into::into).collect())
    }

    pub fn is_review(&self) -> bool {
        matches!(self, CandidateFilter::DueForReview)
    }

    fn matches(&self, question: &Question, progress: &UserProgress) -> bool {
        match self {
            CandidateFilter::All | CandidateFilter::DueForReview => true,
            CandidateFilter::Tags(tags) => question.tags().iter().any(|t| tags.contains(t)),
            CandidateFilter::Bookmarked => progress.is_bookmarked(question.id()),
            CandidateFilter::Search(query) => matches_search(question, query),
        }
    }
}

/// Case-insensitive substring match on prompt, explanation, legal reference and tags.
/// A blank query matches everything; otherwise surrounding spaces are part of the term.
pub fn matches_search(question: &Question, query: &str) -> bool {
    if query.trim().is_empty() {
        return true;
    }
    let term = query.to_lowercase();
    question.prompt().to_lowercase().contains(&term)
        || question.explanation().to_lowercase().contains(&term)
        || question.law_ref().to_lowercase().contains(&term)
        || question
            .tags()
            .iter()
            .any(|tag| tag.to_lowercase().contains(&term))
}

/// Questions eligible for the session, in collection order
pub fn select_candidates<'a>(
    questions: &'a [Question],
    filter: &CandidateFilter,
    progress: &UserProgress,
    now: DateTime<Utc>,
) -> Vec<&'a Question> {
    if filter.is_review() {
        let due: BTreeSet<&str> = progress.due_reviews(now).into_iter().collect();
        return questions
            .iter()
            .filter(|q| due.contains(q.id()))
            .collect();
    }
    questions
        .iter()
        .filter(|q| filter.matches(q, progress))
        .collect()
}

/// Rotating cursor over a candidate list that may change between answers
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    filter: CandidateFilter,
    index: usize,
}

impl Session {
    pub fn new(filter: CandidateFilter) -> Self {
        Self { filter, index: 0 }
    }

    pub fn filter(&self) -> &CandidateFilter {
        &self.filter
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Question at the cursor, or `None` when there is nothing to show
    pub fn current<'a>(&self, candidates: &[&'a Question]) -> Option<&'a Question> {
        if candidates.is_empty() {
            None
        } else {
            Some(candidates[self.index % candidates.len()])
        }
    }

    /// Presentation key for a question shown at the current cursor
    pub fn presentation_key(&self, question: &Question) -> String {
        presentation_key(question.id(), self.index)
    }

    /// Moves on after an answer has been acknowledged.
    ///
    /// In review mode a correct answer drops the question out of the due
    /// list, so the next one slides into the same position; the cursor stays.
    pub fn advance(&mut self, last_answer_correct: bool) {
        if self.filter.is_review() && last_answer_correct {
            return;
        }
        self.index = self.index.wrapping_add(1);
    }

    pub fn skip(&mut self) {
        self.index = self.index.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::QuestionDraft;
    use crate::spaced_repetition::{ReviewScheduler, ReviewState};
    use chrono::{Duration, TimeZone};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
    }

    fn make(id: &str, prompt: &str, tags: &[&str], law_ref: &str) -> Question {
        QuestionDraft {
            id: id.to_string(),
            prompt: prompt.to_string(),
            choices: vec!["a".into(), "b".into(), "c".into(), "d".into(), "e".into()],
            correct: vec![0],
            explanation: format!("Erklärung zu {}", id),
            law_ref: law_ref.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            difficulty: 2,
            last_checked: None,
        }
        .validate()
        .unwrap()
    }

    fn bank() -> Vec<Question> {
        vec![
            make("bdg-1", "Dienstpflichten des Beamten", &["BDG"], "BDG § 43"),
            make("spg-1", "Identitätsfeststellung", &["SPG"], "SPG § 35"),
            make("stpo-1", "Festnahme durch Organe", &["StPO", "StGB"], "StPO § 171"),
            make("stvo-1", "Alkoholkontrolle", &["StVO"], "StVO § 5"),
        ]
    }

    fn ids(questions: &[&Question]) -> Vec<String> {
        questions.iter().map(|q| q.id().to_string()).collect()
    }

    #[test]
    fn test_all_keeps_collection_order() {
        let questions = bank();
        let selected = select_candidates(&questions, &CandidateFilter::All, &UserProgress::new(), fixed_now());
        assert_eq!(ids(&selected), vec!["bdg-1", "spg-1", "stpo-1", "stvo-1"]);
    }

    #[test]
    fn test_tag_filter_uses_intersection() {
        let questions = bank();
        let filter = CandidateFilter::tags(["StGB", "StVO"]);
        let selected = select_candidates(&questions, &filter, &UserProgress::new(), fixed_now());
        assert_eq!(ids(&selected), vec!["stpo-1", "stvo-1"]);
    }

    #[test]
    fn test_bookmark_filter() {
        let questions = bank();
        let mut progress = UserProgress::new();
        progress.toggle_bookmark("spg-1");
        let selected = select_candidates(&questions, &CandidateFilter::Bookmarked, &progress, fixed_now());
        assert_eq!(ids(&selected), vec!["spg-1"]);
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let questions = bank();
        let progress = UserProgress::new();
        let search = |q: &str| {
            ids(&select_candidates(
                &questions,
                &CandidateFilter::Search(q.to_string()),
                &progress,
                fixed_now(),
            ))
        };
        assert_eq!(search("ALKOHOL"), vec!["stvo-1"]);
        assert_eq!(search("§ 35"), vec!["spg-1"]);
        assert_eq!(search("stgb"), vec!["stpo-1"]);
        assert_eq!(search("erklärung zu bdg"), vec!["bdg-1"]);
        assert!(search("nirgendwo").is_empty());
    }

    #[test]
    fn test_blank_search_matches_everything() {
        let questions = bank();
        let selected = select_candidates(
            &questions,
            &CandidateFilter::Search("   ".to_string()),
            &UserProgress::new(),
            fixed_now(),
        );
        assert_eq!(selected.len(), 4);
    }

    #[test]
    fn test_search_does_not_look_at_choices() {
        let mut draft = make("x", "Frage", &["BDG"], "BDG § 1").into_draft();
        draft.choices[2] = "zzchoice".to_string();
        let q = draft.validate().unwrap();

        assert!(!matches_search(&q, "zzchoice"));
        assert!(matches_search(&q, "bdg"));
    }

    #[test]
    fn test_search_keeps_surrounding_spaces() {
        let questions = bank();
        let search = |q: &str| {
            ids(&select_candidates(
                &questions,
                &CandidateFilter::Search(q.to_string()),
                &UserProgress::new(),
                fixed_now(),
            ))
        };
        assert!(search("alkohol ").is_empty());
        assert_eq!(search(" § 35"), vec!["spg-1"]);
        assert_eq!(search("Alkohol"), vec!["stvo-1"]);
    }

    #[test]
    fn test_review_mode_ignores_other_filters() {
        let questions = bank();
        let now = fixed_now();
        let mut progress = UserProgress::new();
        progress.review.insert(
            "stvo-1".to_string(),
            ReviewState::entering_queue(now - Duration::minutes(5)),
        );
        progress.review.insert(
            "bdg-1".to_string(),
            ReviewState {
                streak: 2,
                next_review_date: now + Duration::days(1),
                in_queue: true,
            },
        );
        let selected = select_candidates(&questions, &CandidateFilter::DueForReview, &progress, now);
        assert_eq!(ids(&selected), vec!["stvo-1"]);
    }

    #[test]
    fn test_current_rotates_and_handles_empty() {
        let questions = bank();
        let candidates: Vec<&Question> = questions.iter().collect();
        let mut session = Session::new(CandidateFilter::All);
        assert!(session.current(&[]).is_none());

        for _ in 0..5 {
            session.advance(true);
        }
        assert_eq!(session.index(), 5);
        assert_eq!(session.current(&candidates).unwrap().id(), "spg-1");
        assert_eq!(session.presentation_key(&questions[1]), "spg-1#5");
    }

    #[test]
    fn test_review_mode_holds_index_after_correct_answer() {
        let mut session = Session::new(CandidateFilter::DueForReview);
        session.advance(true);
        assert_eq!(session.index(), 0);
        session.advance(false);
        assert_eq!(session.index(), 1);
        session.skip();
        assert_eq!(session.index(), 2);
    }

    #[test]
    fn test_review_walkthrough_visits_every_due_question() {
        let questions = bank();
        let scheduler = ReviewScheduler::new();
        let now = fixed_now();
        let mut progress = UserProgress::new();
        for q in &questions {
            progress.record_answer(q.id(), false, now, &scheduler);
        }

        let mut session = Session::new(CandidateFilter::DueForReview);
        let mut seen = Vec::new();
        loop {
            let candidates = select_candidates(&questions, session.filter(), &progress, now);
            let Some(current) = session.current(&candidates) else {
                break;
            };
            seen.push(current.id().to_string());
            progress.record_answer(current.id(), true, now, &scheduler);
            session.advance(true);
        }
        assert_eq!(seen, vec!["bdg-1", "spg-1", "stpo-1", "stvo-1"]);
    }
}
