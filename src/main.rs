use exam_trainer::catalog::{render_question_detail, render_question_list};
use exam_trainer::cli::{Args, Command, QuestionsCommand};
use exam_trainer::dashboard::GroupDetail;
use exam_trainer::database_factory::{DatabaseConfig, DatabaseFactory};
use exam_trainer::exam::ExamSession;
use exam_trainer::question::Question;
use exam_trainer::question_bank::study_group;
use exam_trainer::quiz_service::QuizService;
use exam_trainer::terminal::Terminal;
use log::info;
use std::io;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse_args();
    let override_date = args.validate_override_date()?;
    if args.no_color {
        colored::control::set_override(false);
    }

    let mut builder = DatabaseConfig::builder().override_date(override_date);
    if args.test {
        builder = builder.test_mode();
    }
    if let Some(path) = &args.db_path {
        builder = builder.path(path.to_string_lossy());
    }
    let config = builder.build();
    info!("Opening database at {}", config.get_path());

    let db = Arc::new(DatabaseFactory::create(config)?);
    let service = QuizService::new(db, &args.user).with_scheduler(args.scheduler());

    let questions = service.questions()?;
    let mut progress = service.progress()?;
    let command = args.command();
    let filter = command.candidate_filter();

    match command {
        Command::Train { .. } | Command::Review => {
            if filter.as_ref().is_some_and(|f| f.is_review()) {
                let status = service.review_status()?;
                println!(
                    "Fällig: {} von {} in der Wiederholung",
                    status.due, status.queued
                );
            }
            let filter = filter.ok_or("command does not run a session")?;
            let stdin = io::stdin();
            let mut terminal = Terminal::new(stdin.lock(), io::stdout());
            terminal.run_session(&service, &questions, &mut progress, filter)?;
        }
        Command::Exam => {
            let pool: Vec<&Question> = questions.iter().collect();
            let mut exam = ExamSession::draw(&pool, &mut rand::thread_rng());
            let stdin = io::stdin();
            let mut terminal = Terminal::new(stdin.lock(), io::stdout());
            terminal.run_exam(&mut exam)?;
        }
        Command::Dashboard { group: None } => {
            println!("{}", service.dashboard(&questions, &progress).render());
        }
        Command::Dashboard { group: Some(key) } => {
            let group = study_group(&key).ok_or_else(|| format!("Unknown study group: {}", key))?;
            println!("{}", GroupDetail::build(group, &questions, &progress).render());
        }
        Command::Bookmark { question_id } => {
            if !questions.iter().any(|q| q.id() == question_id) {
                return Err(format!("Unknown question: {}", question_id).into());
            }
            if service.toggle_bookmark(&mut progress, &question_id)? {
                println!("Gemerkt: {}", question_id);
            } else {
                println!("Lesezeichen entfernt: {}", question_id);
            }
        }
        Command::Questions {
            action: QuestionsCommand::List { search },
        } => {
            let found = service.find_questions(search.as_deref())?;
            println!("{}", render_question_list(&found));
        }
        Command::Questions {
            action: QuestionsCommand::Show { question_id },
        } => {
            let question = service
                .question(&question_id)?
                .ok_or_else(|| format!("Unknown question: {}", question_id))?;
            let state = service.review_state(&question_id)?;
            println!(
                "{}",
                render_question_detail(&question, state.as_ref(), service.now())
            );
        }
        Command::Questions {
            action: QuestionsCommand::Delete { question_id },
        } => {
            if !service.delete_question(&question_id)? {
                return Err(format!("Unknown question: {}", question_id).into());
            }
            println!("Gelöscht: {}", question_id);
        }
    }

    Ok(())
}
