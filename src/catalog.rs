use crate::question::Question;
use crate::spaced_repetition::ReviewState;
use crate::time_format::format_time_difference;
use chrono::{DateTime, Utc};

/// One line per question: id, legal reference, prompt
pub fn render_question_list(questions: &[Question]) -> String {
    if questions.is_empty() {
        return "Keine Fragen gefunden.".to_string();
    }
    let mut lines: Vec<String> = questions
        .iter()
        .map(|q| format!("  {:<16}{:<12}{}", q.id(), q.law_ref(), q.prompt()))
        .collect();
    lines.push(format!("{} Fragen", questions.len()));
    lines.join("\n")
}

fn review_status(state: Option<&ReviewState>, now: DateTime<Utc>) -> String {
    match state {
        None => "nicht in der Wiederholung".to_string(),
        Some(state) if state.in_queue => format!(
            "Stufe {}, fällig {}",
            state.streak,
            format_time_difference(now, state.next_review_date)
        ),
        Some(state) => format!("gemeistert (Stufe {})", state.streak),
    }
}

/// Full question in canonical option order, correct options marked
pub fn render_question_detail(
    question: &Question,
    state: Option<&ReviewState>,
    now: DateTime<Utc>,
) -> String {
    let mut lines = vec![
        format!(
            "{} | {} | Schwierigkeit {}",
            question.id(),
            question.law_ref(),
            question.difficulty()
        ),
        format!("Tags: {}", question.tags().join(", ")),
        format!(
            "Zuletzt geprüft: {}",
            question
                .last_checked()
                .map(|date| date.to_string())
                .unwrap_or_else(|| "-".to_string())
        ),
        question.prompt().to_string(),
    ];
    for (index, choice) in question.choices().iter().enumerate() {
        let mark = if question.correct().contains(&index) { "x" } else { " " };
        lines.push(format!("  [{}] {}) {}", mark, (b'A' + index as u8) as char, choice));
    }
    lines.push(format!("Erklärung: {}", question.explanation()));
    lines.push(format!("Wiederholung: {}", review_status(state, now)));
    lines.join("\n")
}
