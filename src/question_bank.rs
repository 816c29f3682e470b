use crate::question::{Question, QuestionDraft, QuestionError};
use chrono::NaiveDate;

/// Named set of tags aggregated together on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudyGroup {
    pub key: &'static str,
    pub title: &'static str,
    pub tags: &'static [&'static str],
}

pub const STUDY_GROUPS: [StudyGroup; 4] = [
    StudyGroup {
        key: "BDG",
        title: "Dienstrecht (BDG)",
        tags: &["BDG"],
    },
    StudyGroup {
        key: "SPG",
        title: "Sicherheitspolizei (SPG)",
        tags: &["SPG"],
    },
    StudyGroup {
        key: "STPO",
        title: "Strafprozess/StGB",
        tags: &["StPO", "StGB"],
    },
    StudyGroup {
        key: "ADMIN",
        title: "Verwaltung & Verkehr",
        tags: &["AVG", "VStG", "WaffG", "StVO", "KFG", "FSG"],
    },
];

impl StudyGroup {
    pub fn contains(&self, question: &Question) -> bool {
        question.has_any_tag(self.tags)
    }
}

pub fn study_group(key: &str) -> Option<&'static StudyGroup> {
    STUDY_GROUPS
        .iter()
        .find(|group| group.key.eq_ignore_ascii_case(key))
}

struct BankEntry {
    id: &'static str,
    prompt: &'static str,
    choices: [&'static str; 5],
    correct: &'static [usize],
    explanation: &'static str,
    law_ref: &'static str,
    tags: &'static [&'static str],
    difficulty: u8,
}

const LAST_CHECKED: (i32, u32, u32) = (2025, 11, 11);

const DEFAULT_BANK: [BankEntry; 4] = [
    BankEntry {
        id: "bdg-43-ma-1",
        prompt: "§ 43 BDG: Wie hat ein Beamter seine dienstlichen Aufgaben zu erfüllen? Wählen Sie alle zutreffenden.",
        choices: [
            "Unter Beachtung der geltenden Rechtsordnung.",
            "Treu, gewissenhaft, engagiert und unparteiisch.",
            "Nur nach ständiger Rücksprache mit dem unmittelbaren Vorgesetzten.",
            "So, dass das Vertrauen der Allgemeinheit erhalten bleibt.",
            "Primär an interne Dienstanweisungen, nicht an Gesetze, gebunden.",
        ],
        correct: &[0, 1, 3],
        explanation: "§ 43 BDG: Rechtstreue, Gewissenhaftigkeit, Engagement, Unparteilichkeit und Wahrung des Vertrauens der Allgemeinheit.",
        law_ref: "BDG § 43",
        tags: &["BDG"],
        difficulty: 1,
    },
    BankEntry {
        id: "bdg-44-ma-1",
        prompt: "§ 44 BDG (Weisungen): In welchen Fällen ist zu remonstrieren/abzulehnen? Wählen Sie alle zutreffenden.",
        choices: [
            "Wenn die Weisung von einem unzuständigen Organ erteilt wurde.",
            "Wenn die Befolgung gegen verwaltungsrechtliche Vorschriften verstoßen würde.",
            "Wenn die Befolgung gegen strafrechtliche Vorschriften verstoßen würde.",
            "Wenn der Inhalt unklar ist und trotz Nachfrage unklar bleibt.",
            "Wenn die Weisung mündlich erteilt wurde.",
        ],
        correct: &[0, 1, 2, 3],
        explanation: "Unzuständigkeit oder Rechtswidrigkeit → Remonstrationspflicht; Mündlichkeit allein macht eine Weisung nicht unbeachtlich.",
        law_ref: "BDG § 44",
        tags: &["BDG"],
        difficulty: 2,
    },
    BankEntry {
        id: "bdg-43a-ma-1",
        prompt: "§ 43a BDG (achtungsvoller Umgang): Welche Aussagen treffen zu? Wählen Sie alle zutreffenden.",
        choices: [
            "Beamte haben menschenwürdeverletzendes Verhalten zu unterlassen.",
            "Vorgesetzte und Mitarbeiter begegnen einander mit Achtung.",
            "Spontane Entgleisungen sind disziplinär immer irrelevant.",
            "Vorgesetzte haben für achtungsvollen Umgang Sorge zu tragen.",
            "§ 43a betrifft nur den Umgang mit Parteien.",
        ],
        correct: &[0, 1, 3],
        explanation: "§ 43a BDG verlangt würdevollen, diskriminierungsfreien Umgang; spontane Entgleisungen können relevant sein.",
        law_ref: "BDG § 43a",
        tags: &["BDG"],
        difficulty: 1,
    },
    BankEntry {
        id: "bdg-39-ma-1",
        prompt: "§ 39 BDG (Dienstzuteilung): Unter welchen Bedingungen ist eine Zuteilung ohne schriftliche Zustimmung über 90 Tage zulässig? Wählen Sie alle zutreffenden.",
        choices: [
            "Wenn der Dienstbetrieb auf andere Weise nicht aufrechterhalten werden kann.",
            "Wenn sie zum Zwecke einer Ausbildung erfolgt.",
            "Wenn wichtige private Gründe vorliegen.",
            "Wenn der Kommandant der entsendenden Dienststelle zustimmt.",
            "Wenn der Kommandant der Zuteilungsdienststelle zustimmt.",
        ],
        correct: &[0, 1],
        explanation: ">90 Tage ohne Zustimmung: nur zur Aufrechterhaltung des Dienstbetriebs oder zu Ausbildungszwecken.",
        law_ref: "BDG § 39",
        tags: &["BDG"],
        difficulty: 2,
    },
];

impl BankEntry {
    fn to_draft(&self) -> QuestionDraft {
        let (year, month, day) = LAST_CHECKED;
        QuestionDraft {
            id: self.id.to_string(),
            prompt: self.prompt.to_string(),
            choices: self.choices.iter().map(|c| c.to_string()).collect(),
            correct: self.correct.to_vec(),
            explanation: self.explanation.to_string(),
            law_ref: self.law_ref.to_string(),
            tags: self.tags.iter().map(|t| t.to_string()).collect(),
            difficulty: self.difficulty,
            last_checked: NaiveDate::from_ymd_opt(year, month, day),
        }
    }
}

/// Built-in questions used when storage has none
pub fn default_questions() -> Result<Vec<Question>, QuestionError> {
    DEFAULT_BANK.iter().map(|e| e.to_draft().validate()).collect()
}
