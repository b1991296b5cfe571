// src/main.rs

use std::sync::Arc;
use std::time::Duration;

use edubase::config::Config;
use edubase::engine::countdown::format_clock;
use edubase::engine::{ExamSession, SessionStatus, SubmitOutcome, TickOutcome};
use edubase::error::AppError;
use edubase::models::account::RegisterRequest;
use edubase::models::student::Student;
use edubase::repo::accounts::AdminAccounts;
use edubase::repo::active::ActiveContext;
use edubase::repo::catalog::ExamCatalog;
use edubase::repo::reports::ReportRepository;
use edubase::repo::roster::StudentRoster;
use edubase::storage::{JsonFileStore, KvStore};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// One logical thread of control: the countdown tick and the candidate's
// input are discrete events on the same event loop, so the submit latch in
// the engine cannot race.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "edubase.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging). The exam screen owns stdout, logs go to
    // stderr and the rolling file.
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    let store: Arc<dyn KvStore> = match JsonFileStore::open(&config.data_dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!("Failed to open data dir '{}': {}", config.data_dir, e);
            std::process::exit(1);
        }
    };
    tracing::info!("Using data dir '{}'", config.data_dir);

    // Seed Admin Account
    if let Err(e) = seed_admin_account(store.clone(), &config) {
        tracing::error!("Failed to seed admin account: {:?}", e);
    }

    if let Err(e) = run(store).await {
        tracing::error!("Fatal: {}", e);
        std::process::exit(1);
    }
}

fn seed_admin_account(store: Arc<dyn KvStore>, config: &Config) -> Result<(), AppError> {
    if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
        let accounts = AdminAccounts::new(store);

        if accounts.find_by_email(email)?.is_none() {
            tracing::info!("Seeding admin account: {}", email);
            accounts.register(RegisterRequest {
                full_name: "Administrator".to_string(),
                email: email.clone(),
                password: password.clone(),
            })?;
            tracing::info!("Admin account created successfully.");
        }
    }
    Ok(())
}

/// The candidate flow: login, subject selection, then the live exam loop.
async fn run(store: Arc<dyn KvStore>) -> Result<(), AppError> {
    let roster = StudentRoster::new(store.clone());
    let catalog = ExamCatalog::new(store.clone());
    let reports = ReportRepository::new(store.clone());
    let active = ActiveContext::new(store);

    let mut input = BufReader::new(tokio::io::stdin()).lines();

    // A candidate left over from an earlier run stays logged in
    let student = match active.student()? {
        Some(student) => student,
        None => {
            let Some(student) = login(&roster, &mut input).await? else {
                return Ok(());
            };
            active.set_student(&student)?;
            student
        }
    };
    println!(
        "Welcome, {} (class {}, reg no {})",
        student.name, student.class_name, student.reg_no
    );

    let subjects = catalog.subjects_for_class(&student.class_name)?;
    if subjects.is_empty() {
        println!("No subjects available for your class.");
        return Ok(());
    }
    println!("Select a subject to start the exam:");
    for (i, subject) in subjects.iter().enumerate() {
        println!("  {}. {}", i + 1, subject);
    }
    let subject = loop {
        let Some(line) = next_line(&mut input).await? else {
            return Ok(());
        };
        match line.trim().parse::<usize>() {
            Ok(n) if (1..=subjects.len()).contains(&n) => break subjects[n - 1].clone(),
            _ => println!("Enter a number between 1 and {}.", subjects.len()),
        }
    };

    let Some(exam) = catalog.find(&student.class_name, &subject)? else {
        println!("Exam for {} is not ready yet.", subject);
        return Ok(());
    };
    active.set_exam(&exam)?;

    // Load the session; the already-taken gate fires here
    let mut session = ExamSession::load(active.exam()?, Some(student), &reports)?;
    if session.status() == SessionStatus::AlreadyTaken {
        println!(
            "You have already completed the {} exam.",
            session.exam().subject
        );
        active.clear_exam()?;
        // hold the notice on screen briefly before handing back
        tokio::time::sleep(Duration::from_secs(4)).await;
        return Ok(());
    }

    print_paper(&session);

    let outcome = exam_loop(&mut session, &reports, &mut input).await?;
    if outcome.auto {
        println!("Time is up! Your exam was automatically submitted.");
    } else {
        println!(
            "Exam submitted. You answered {} of {} questions. Score: {}%.",
            outcome.answered_count, outcome.total, outcome.score
        );
    }

    // The attempt is over; the session is dropped and the selection cleared
    active.clear_exam()?;
    Ok(())
}

async fn login(
    roster: &StudentRoster,
    input: &mut Lines<BufReader<Stdin>>,
) -> Result<Option<Student>, AppError> {
    loop {
        println!("Full name:");
        let Some(name) = next_line(input).await? else {
            return Ok(None);
        };
        println!("Class (e.g. SS1):");
        let Some(class_name) = next_line(input).await? else {
            return Ok(None);
        };
        println!("Registration number:");
        let Some(reg_no) = next_line(input).await? else {
            return Ok(None);
        };

        match roster.login(&name, &class_name, &reg_no)? {
            Some(student) => return Ok(Some(student)),
            None => println!("Invalid login details. Please check and try again."),
        }
    }
}

fn print_paper(session: &ExamSession) {
    let exam = session.exam();
    println!(
        "\n{} Exam ({})  |  Time Left: {}",
        exam.subject,
        session.student().class_name,
        format_clock(session.time_remaining())
    );
    if exam.questions.is_empty() {
        println!("No questions available.");
    }
    for (i, q) in exam.questions.iter().enumerate() {
        println!("\n{}. {}", i + 1, q.text);
        println!("   A. {}", q.option_a);
        println!("   B. {}", q.option_b);
        println!("   C. {}", q.option_c);
        println!("   D. {}", q.option_d);
    }
    println!("\nAnswer with '<question> <letter>' (e.g. '2 C'), check the clock with 'time', finish with 'submit'.");
}

/// Runs the countdown and the candidate's commands on one select loop until
/// the session is submitted, by hand or by the clock.
async fn exam_loop(
    session: &mut ExamSession,
    reports: &ReportRepository,
    input: &mut Lines<BufReader<Stdin>>,
) -> Result<SubmitOutcome, AppError> {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    // the first tick of a tokio interval completes immediately
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match session.tick(reports)? {
                    TickOutcome::Running(remaining) => {
                        if remaining % 60 == 0 {
                            println!("Time left: {}", format_clock(remaining));
                        }
                    }
                    TickOutcome::Expired(outcome) => return Ok(outcome),
                    TickOutcome::Stopped => {
                        if let Some(outcome) = session.outcome().copied() {
                            return Ok(outcome);
                        }
                    }
                }
            }
            line = input.next_line() => {
                match line? {
                    Some(line) => {
                        if let Some(outcome) = handle_command(session, reports, &line)? {
                            return Ok(outcome);
                        }
                    }
                    // stdin closed: grade whatever has been answered
                    None => {
                        if let Some(outcome) = session.submit(false, reports)? {
                            return Ok(outcome);
                        }
                        if let Some(outcome) = session.outcome().copied() {
                            return Ok(outcome);
                        }
                    }
                }
            }
        }
    }
}

fn handle_command(
    session: &mut ExamSession,
    reports: &ReportRepository,
    line: &str,
) -> Result<Option<SubmitOutcome>, AppError> {
    let line = line.trim();
    match line {
        "" => {}
        "submit" => {
            if let Some(outcome) = session.submit(false, reports)? {
                return Ok(Some(outcome));
            }
        }
        "time" => println!("Time left: {}", format_clock(session.time_remaining())),
        _ => {
            let mut parts = line.split_whitespace();
            let number = parts.next().and_then(|n| n.parse::<usize>().ok());
            let letter = parts.next();
            match (number, letter) {
                (Some(n), Some(letter))
                    if (1..=session.exam().questions.len()).contains(&n) =>
                {
                    // Option validation is a screen concern, the recorder
                    // takes any letter
                    if session.exam().questions[n - 1].option(letter).is_none() {
                        println!("Pick one of A, B, C or D.");
                    } else {
                        session.record(n - 1, letter.trim());
                        println!("Question {}: {}", n, letter.trim().to_uppercase());
                    }
                }
                _ => println!(
                    "Commands: '<question> <letter>' to answer, 'time', 'submit'."
                ),
            }
        }
    }
    Ok(None)
}

async fn next_line(input: &mut Lines<BufReader<Stdin>>) -> Result<Option<String>, AppError> {
    Ok(input.next_line().await?)
}
