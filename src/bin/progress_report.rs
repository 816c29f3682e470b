use clap::Parser;
use colored::Colorize;
use exam_trainer::dashboard::{Dashboard, GroupDetail};
use exam_trainer::database::Database;
use exam_trainer::question_bank::STUDY_GROUPS;

/// Prints the learning dashboard stored in a database file
#[derive(Parser, Debug)]
#[command(name = "progress_report")]
#[command(about = "Analyzes learning progress stored in an exam trainer database")]
struct Args {
    /// Path to the SQLite database file
    #[arg(value_name = "DATABASE_FILE")]
    database_file: String,

    /// Learner to report on
    #[arg(long, value_name = "ID", default_value = "guest")]
    user: String,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() {
    env_logger::init();

    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }

    let db = match Database::new(&args.database_file) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Error opening database: {}", e);
            std::process::exit(1);
        }
    };

    let questions = match db.list_questions() {
        Ok(questions) => questions,
        Err(e) => {
            eprintln!("Error fetching questions: {}", e);
            std::process::exit(1);
        }
    };

    if questions.is_empty() {
        println!("No questions found in the database.");
        return;
    }

    let progress = match db.load_progress(&args.user) {
        Ok(progress) => progress,
        Err(e) => {
            eprintln!("Error fetching progress for {}: {}", args.user, e);
            std::process::exit(1);
        }
    };

    println!("{}", format!("Progress Report: {}", args.user).bold());
    println!("{}", "=".repeat(60));
    println!(
        "{}",
        Dashboard::build(&questions, &progress, db.current_time()).render()
    );

    // Drill into every group that holds questions
    for group in STUDY_GROUPS.iter() {
        let detail = GroupDetail::build(group, &questions, &progress);
        if detail.stats.total == 0 {
            continue;
        }
        println!();
        println!("{}", "-".repeat(60));
        println!("{}", detail.render());
    }
}
