use chrono::{DateTime, Utc};
use exam_trainer::spaced_repetition::ReviewScheduler;
use exam_trainer::time_format::format_time_difference;
use std::env;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let streak = validate_input(args);

    let scheduler = ReviewScheduler::new();
    let now = Utc::now();

    println!(
        "Review schedule for streak {} (current interval: {})",
        streak,
        scheduler.label_for(streak)
    );

    compute_and_print(&scheduler, streak, now, true);
    compute_and_print(&scheduler, streak, now, false);
}

fn validate_input(args: Vec<String>) -> u32 {
    if args.len() != 2 {
        eprintln!("Usage: {} <streak>", args[0]);
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  <streak>  Consecutive correct answers of a queued question (non-negative integer)");
        eprintln!();
        eprintln!("Example: {} 2", args[0]);
        std::process::exit(1);
    }

    match args[1].parse() {
        Ok(n) => n,
        Err(_) => {
            eprintln!("Error: streak must be a non-negative integer");
            std::process::exit(1);
        }
    }
}

fn compute_and_print(scheduler: &ReviewScheduler, streak: u32, now: DateTime<Utc>, is_correct: bool) {
    let outcome = scheduler.schedule(streak, is_correct, now);

    let relative_next_date = format_time_difference(now, outcome.next_review_date);
    println!(
        "Answer: {:<7} | Next review: {} | Streak: {} | Level: {}{}",
        if is_correct { "correct" } else { "wrong" },
        relative_next_date,
        outcome.streak,
        outcome.label,
        if scheduler.is_mastered(outcome.streak) {
            " | leaves the queue"
        } else {
            ""
        }
    );
}
