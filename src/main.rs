use anyhow::Context;
use quiz_engine::{
    config::{get_config, init_config},
    dto::{command_dto::Command, result_dto::QuestionView},
    error::Error,
    services::session_service::SessionEvent,
    utils::time::format_remaining,
    EngineState,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
    init_config()?;
    let config = get_config()?;

    let quiz_id = std::env::args()
        .nth(1)
        .context("usage: quiz-engine <quiz-id>")?;

    let state = EngineState::new(config)?;
    let (session, mut events) = match state.start_session(&quiz_id).await {
        Ok(started) => started,
        Err(err @ Error::QuizUnavailable(_)) => {
            info!(error = %err, "quiz refused");
            println!("{}", err.user_message());
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let quiz = session.attempt().quiz();
    println!("== {} ==", quiz.title);
    if let Some(description) = &quiz.description {
        println!("{}", description);
    }
    println!("Time limit: {}", format_remaining(quiz.duration_seconds()));
    println!("Commands: answer N, next, prev, skip, goto N, submit, retake, quit");

    let (commands, receiver) = mpsc::channel(32);
    let runner = tokio::spawn(session.run(receiver));

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Command>() {
                Ok(command) => {
                    let quit = command == Command::Quit;
                    if commands.send(command).await.is_err() || quit {
                        break;
                    }
                }
                Err(err) => println!("?? {}", err),
            }
        }
    });

    while let Some(event) = events.recv().await {
        render(&event);
    }

    runner.await?;
    Ok(())
}

fn render(event: &SessionEvent) {
    match event {
        SessionEvent::QuestionShown(view) => render_question(view),
        SessionEvent::Tick { remaining_seconds } => {
            if *remaining_seconds <= 10 || remaining_seconds % 60 == 0 {
                println!("[{} left]", format_remaining(*remaining_seconds));
            }
        }
        SessionEvent::TimeUp => println!("Time's up! Your answers were submitted."),
        SessionEvent::Submitted(report) => {
            println!(
                "Score: {}/{} ({:.2}%) - {}",
                report.correct_count,
                report.total,
                report.percentage,
                if report.passed { "passed" } else { "failed" }
            );
            for graded in &report.graded {
                let mark = if graded.is_correct {
                    "ok"
                } else if graded.skipped {
                    "--"
                } else {
                    "xx"
                };
                println!("  [{}] {}", mark, graded.question_text);
            }
            println!("Type 'retake' to try again or 'quit' to leave.");
        }
        SessionEvent::LoginRequired => println!("Please log in to save your results."),
        SessionEvent::SubmissionSaved { .. } => println!("Your results were saved."),
        SessionEvent::SubmissionFailed { reason, .. } => println!("{}", reason),
        SessionEvent::Rejected { reason } => println!("!! {}", reason),
    }
}

fn render_question(view: &QuestionView) {
    println!();
    println!(
        "Question {}/{}  [{} left]",
        view.index + 1,
        view.total,
        format_remaining(view.remaining_seconds)
    );
    println!("{}", view.text);
    for (idx, option) in view.options.iter().enumerate() {
        let marker = if view.selected_index == Some(idx as i32) { "*" } else { " " };
        println!(" {} {}) {}", marker, idx + 1, option);
    }
    if view.is_last() {
        println!("(last question: 'next' submits)");
    }
}
