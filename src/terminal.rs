use crate::exam::ExamSession;
use crate::progress::UserProgress;
use crate::question::Question;
use crate::quiz_service::{AnswerResult, QuizError, QuizService};
use crate::session::{CandidateFilter, Session, select_candidates};
use colored::Colorize;
use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};

/// One line typed by the learner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Selected display slots
    Answer(BTreeSet<usize>),
    Skip,
    Bookmark,
    Quit,
}

/// Parses option letters (`A C D`, `acd`, `a,c`) or one of the commands
/// `s` (skip), `m` (bookmark) and `q` (quit).
pub fn parse_input(line: &str) -> Result<Input, String> {
    let line = line.trim().to_lowercase();
    match line.as_str() {
        "" => return Err("Bitte mindestens eine Antwort wählen.".to_string()),
        "q" => return Ok(Input::Quit),
        "s" => return Ok(Input::Skip),
        "m" => return Ok(Input::Bookmark),
        _ => {}
    }

    let mut slots = BTreeSet::new();
    for c in line.chars().filter(|c| !c.is_whitespace() && *c != ',') {
        match c {
            'a'..='e' => {
                slots.insert(c as usize - 'a' as usize);
            }
            other => return Err(format!("Unbekannte Eingabe: '{}'", other)),
        }
    }
    Ok(Input::Answer(slots))
}

fn slot_letter(slot: usize) -> char {
    (b'A' + slot as u8) as char
}

fn letters(slots: &BTreeSet<usize>) -> String {
    slots
        .iter()
        .map(|&slot| slot_letter(slot).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Tally of a training or review session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub answered: usize,
    pub correct: usize,
    /// Longest run of consecutive correct answers
    pub best_streak: usize,
}

/// Line-oriented front end over any reader and writer
pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Next line of input, `None` at end of input
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn prompt(&mut self) -> io::Result<Option<Input>> {
        loop {
            write!(
                self.output,
                "Antwort (z.B. \"A C\"), s = überspringen, m = merken, q = beenden: "
            )?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                writeln!(self.output)?;
                return Ok(None);
            };
            match parse_input(&line) {
                Ok(input) => return Ok(Some(input)),
                Err(message) => writeln!(self.output, "{}", message.yellow())?,
            }
        }
    }

    fn show_question(
        &mut self,
        number: usize,
        question: &Question,
        key: &str,
        bookmarked: bool,
    ) -> io::Result<()> {
        let header = format!(
            "Frage {} | {} | {} | Schwierigkeit {}{}",
            number,
            question.id(),
            question.law_ref(),
            question.difficulty(),
            if bookmarked { " | gemerkt" } else { "" }
        );
        writeln!(self.output)?;
        writeln!(self.output, "{}", header.bold())?;
        writeln!(self.output, "{}", question.prompt())?;
        for (slot, choice) in question.display_choices(key).iter().enumerate() {
            writeln!(self.output, "  {}) {}", slot_letter(slot), choice)?;
        }
        Ok(())
    }

    fn show_feedback(&mut self, question: &Question, result: &AnswerResult) -> io::Result<()> {
        if result.is_correct {
            writeln!(self.output, "{}", "Richtig!".green().bold())?;
        } else {
            let message = format!("Falsch. Richtig: {}", letters(&result.correct_slots));
            writeln!(self.output, "{}", message.red().bold())?;
        }
        writeln!(self.output, "Erklärung: {}", question.explanation())?;
        writeln!(self.output, "Rechtsgrundlage: {}", question.law_ref())?;
        if let Some(schedule) = &result.outcome.schedule {
            if result.outcome.left_queue {
                writeln!(
                    self.output,
                    "Gemeistert nach {} richtigen Antworten, die Frage verlässt die Wiederholung.",
                    schedule.streak
                )?;
            } else {
                writeln!(self.output, "Nächste Wiederholung: {}", schedule.label)?;
            }
        }
        Ok(())
    }

    /// Runs a training or review session until the learner quits, input ends
    /// or no candidates remain.
    pub fn run_session(
        &mut self,
        service: &QuizService,
        questions: &[Question],
        progress: &mut UserProgress,
        filter: CandidateFilter,
    ) -> Result<SessionSummary, QuizError> {
        let mut session = Session::new(filter);
        let mut summary = SessionSummary::default();
        let mut answer_streak = 0;
        let mut shown = 0;

        loop {
            let now = service.now();
            let candidates = select_candidates(questions, session.filter(), progress, now);
            let Some(question) = session.current(&candidates) else {
                let message = if session.filter().is_review() {
                    "Keine fälligen Wiederholungen."
                } else {
                    "Keine passenden Fragen gefunden."
                };
                writeln!(self.output, "{}", message)?;
                break;
            };
            let key = session.presentation_key(question);
            self.show_question(shown + 1, question, &key, progress.is_bookmarked(question.id()))?;

            match self.prompt()? {
                None | Some(Input::Quit) => break,
                Some(Input::Skip) => {
                    session.skip();
                    shown += 1;
                }
                Some(Input::Bookmark) => {
                    let message = if service.toggle_bookmark(progress, question.id())? {
                        "Gemerkt."
                    } else {
                        "Lesezeichen entfernt."
                    };
                    writeln!(self.output, "{}", message)?;
                }
                Some(Input::Answer(slots)) => {
                    let result = service.submit_answer(progress, question, &slots, &key)?;
                    self.show_feedback(question, &result)?;

                    summary.answered += 1;
                    if result.is_correct {
                        summary.correct += 1;
                        answer_streak += 1;
                        summary.best_streak = summary.best_streak.max(answer_streak);
                    } else {
                        answer_streak = 0;
                    }
                    writeln!(self.output, "Serie: {}", answer_streak)?;

                    session.advance(result.is_correct);
                    shown += 1;
                }
            }
        }

        writeln!(
            self.output,
            "Sitzung beendet: {} von {} richtig, beste Serie {}",
            summary.correct, summary.answered, summary.best_streak
        )?;
        Ok(summary)
    }

    /// Runs a mock exam; skipped questions count as wrong
    pub fn run_exam(&mut self, exam: &mut ExamSession) -> Result<(), QuizError> {
        if exam.is_empty() {
            writeln!(self.output, "Keine Fragen für eine Prüfung vorhanden.")?;
            return Ok(());
        }

        while let (Some(question), Some(key)) = (exam.current().cloned(), exam.current_key()) {
            writeln!(self.output)?;
            writeln!(
                self.output,
                "{}",
                format!("Prüfung: Frage {} / {}", exam.answered() + 1, exam.len()).bold()
            )?;
            self.show_question(exam.answered() + 1, &question, &key, false)?;

            match self.prompt()? {
                None | Some(Input::Quit) => break,
                Some(Input::Skip) => {
                    exam.answer(&BTreeSet::new());
                }
                Some(Input::Bookmark) => {
                    writeln!(self.output, "Im Prüfungsmodus nicht verfügbar.")?;
                }
                Some(Input::Answer(slots)) => {
                    exam.answer(&slots);
                }
            }
        }

        writeln!(
            self.output,
            "Prüfung beendet: {}% ({} von {} richtig beantwortet)",
            exam.percent(),
            exam.correct(),
            exam.answered()
        )?;
        Ok(())
    }
}
