// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! EduVerse command-line client
//!
//! Drives every EduVerse feature page from the terminal: tutor chat, study
//! plans, resources, timed exams, syllabus analysis, learning paths and the
//! profile. State is kept in a local JSON store between runs.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use eduverse_client::{
    config::Config,
    exam::{Countdown, ExamAttempt, Input},
    models::{
        ExamForm, GoalList, PathForm, PlanForm, ProfileUpdate, QuickPlanForm, RegisterRequest,
        Resource, SearchFilters,
    },
    notify::ConsoleNotifier,
    routes::{menu, Navigation, Route},
    time_utils::format_countdown,
    EduClient, Sourced,
};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "eduverse", version, about = "EduVerse AI study tools")]
struct Cli {
    /// Keep all state in memory for this run only
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Override EDUVERSE_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Session, backend and activity overview
    Status,
    /// Show where a path leads for the current session
    Route { path: String },
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        grade: Option<String>,
        #[arg(long, value_delimiter = ',')]
        subjects: Vec<String>,
        #[arg(long)]
        learning_style: Option<String>,
    },
    Logout,
    /// Ask the AI tutor; without a question, start a chat
    Tutor {
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        topic: Option<String>,
        #[arg(long)]
        level: Option<String>,
        question: Vec<String>,
    },
    #[command(subcommand)]
    Plan(PlanCommand),
    #[command(subcommand)]
    Resources(ResourceCommand),
    #[command(subcommand)]
    Exam(ExamCommand),
    #[command(subcommand)]
    Syllabus(SyllabusCommand),
    #[command(subcommand)]
    Paths(PathCommand),
    #[command(subcommand)]
    Profile(ProfileCommand),
}

#[derive(Subcommand)]
enum PlanCommand {
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        subject: String,
        #[arg(long, default_value_t = 4)]
        weeks: u32,
        #[arg(long, default_value_t = 2)]
        hours: u32,
        #[arg(long, default_value = "intermediate")]
        difficulty: String,
        #[arg(long = "goal")]
        goals: Vec<String>,
    },
    /// One-off plan, not saved
    Quick {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        goal: String,
        /// "1 week", "2 weeks", "1 month", "2 months" or "3 months"
        #[arg(long, default_value = "")]
        timeframe: String,
        /// "1 hour" ... "5+ hours"
        #[arg(long, default_value = "")]
        hours: String,
        #[arg(long = "topic")]
        topics: Vec<String>,
    },
    List,
    Regenerate { plan_id: String },
    Delete { plan_id: String },
}

#[derive(Subcommand)]
enum ResourceCommand {
    Search {
        query: Vec<String>,
        #[arg(long, default_value = "")]
        subject: String,
        #[arg(long = "type", default_value = "all")]
        resource_type: String,
        #[arg(long, default_value = "all")]
        difficulty: String,
    },
    Saved,
    /// Save a resource given as JSON
    Save { json: String },
    Remove { resource_id: String },
    History,
}

#[derive(Subcommand)]
enum ExamCommand {
    Generate {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        topic: String,
        #[arg(long, default_value = "intermediate")]
        difficulty: String,
        #[arg(long, default_value_t = 10)]
        questions: u32,
        /// Minutes
        #[arg(long, default_value_t = 30)]
        time_limit: u32,
        #[arg(long = "type", value_delimiter = ',', default_value = "mcq")]
        question_types: Vec<String>,
    },
    List,
    History,
    /// Take an exam interactively
    Take { exam_id: String },
}

#[derive(Subcommand)]
enum SyllabusCommand {
    Text { text: Vec<String> },
    File { path: PathBuf },
    List,
}

#[derive(Subcommand)]
enum PathCommand {
    List,
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        subject: String,
        #[arg(long, default_value = "intermediate")]
        difficulty: String,
        #[arg(long, default_value = "4 weeks")]
        duration: String,
        #[arg(long = "goal")]
        goals: Vec<String>,
    },
    Start { path_id: u64 },
    Complete { path_id: u64, step_id: u64 },
    /// Paths stored on the backend
    Remote {
        #[arg(long)]
        resources_for: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProfileCommand {
    Show,
    Update {
        #[arg(long)]
        name: String,
        #[arg(long)]
        grade: Option<String>,
        #[arg(long, value_delimiter = ',')]
        subjects: Vec<String>,
        #[arg(long)]
        learning_style: Option<String>,
    },
    Password {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
    Stats,
}

impl Command {
    /// Page the command belongs to.
    fn route(&self) -> Route {
        match self {
            Command::Status => Route::Dashboard,
            Command::Route { .. } | Command::Logout => Route::Landing,
            Command::Login { .. } => Route::Login,
            Command::Register { .. } => Route::Register,
            Command::Tutor { .. } => Route::Tutor,
            Command::Plan(_) => Route::StudyPlanner,
            Command::Resources(_) => Route::ResourceCurator,
            Command::Exam(_) => Route::ExamCoach,
            Command::Syllabus(_) => Route::SyllabusAnalyzer,
            Command::Paths(_) => Route::LearningPaths,
            Command::Profile(_) => Route::Profile,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url.as_str());
    }
    init_logging(config.json_logs);

    let notifier = Arc::new(ConsoleNotifier);
    let client = if cli.ephemeral {
        EduClient::ephemeral(config, notifier)?
    } else {
        EduClient::open(config, notifier)?
    };

    // Protected pages need a session.
    let route = cli.command.route();
    if !route.is_public() && !matches!(cli.command, Command::Status) {
        if let Navigation::Redirect(target) = client.navigator().navigate(route.path()) {
            bail!("{} requires a session; continue at {}", route.title(), target.path());
        }
    }

    run(&client, cli.command).await
}

async fn run(client: &EduClient, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Status => status(client).await,
        Command::Route { path } => {
            match client.navigator().navigate(&path) {
                Navigation::Render(route) => println!("{} -> {} ({})", path, route.path(), route.title()),
                Navigation::Redirect(route) => {
                    println!("{} -> redirect {} ({})", path, route.path(), route.title())
                }
            }
            Ok(())
        }
        Command::Login { email, password } => {
            let user_id = client.auth.login(&email, &password).await?;
            println!("Logged in as {}", user_id);
            Ok(())
        }
        Command::Register {
            name,
            email,
            password,
            grade,
            subjects,
            learning_style,
        } => {
            let request = RegisterRequest {
                name,
                email,
                password,
                grade,
                subjects,
                learning_style,
            };
            let user_id = client.auth.register(&request).await?;
            println!("Registered and logged in as {}", user_id);
            Ok(())
        }
        Command::Logout => {
            client.auth.logout()?;
            println!("Logged out");
            Ok(())
        }
        Command::Tutor {
            subject,
            topic,
            level,
            question,
        } => tutor(client, subject, topic, level, question.join(" ")).await,
        Command::Plan(cmd) => plan(client, cmd).await,
        Command::Resources(cmd) => resources(client, cmd).await,
        Command::Exam(cmd) => exam(client, cmd).await,
        Command::Syllabus(cmd) => syllabus(client, cmd).await,
        Command::Paths(cmd) => paths(client, cmd).await,
        Command::Profile(cmd) => profile(client, cmd).await,
    }
}

async fn status(client: &EduClient) -> anyhow::Result<()> {
    let session = client.session();
    println!("Backend:  {}", client.config.api_base_url);
    match client.api().health().await {
        Ok(_) => println!("Health:   ok"),
        Err(e) => println!("Health:   unavailable ({})", e),
    }
    if session.is_authenticated() {
        println!("Session:  logged in as {}", session.current_user_id());
        println!("Page:     {}", client.navigator().current().title());
        for item in menu() {
            println!("  {:<18} {:<20} {}", item.name, item.route.path(), item.description);
        }
        print_json(&client.profile.stats()?)?;
    } else {
        println!("Session:  not logged in (data scope: {})", session.current_user_id());
    }
    Ok(())
}

async fn tutor(
    client: &EduClient,
    subject: Option<String>,
    topic: Option<String>,
    level: Option<String>,
    question: String,
) -> anyhow::Result<()> {
    let mut session = client.tutor.new_session();
    client
        .tutor
        .set_session(&mut session, subject.as_deref(), topic.as_deref(), level.as_deref());

    if !question.trim().is_empty() {
        let answer = client.tutor.ask(&mut session, &question).await?;
        print_sourced_text(&answer);
        return Ok(());
    }

    if let Some(greeting) = session.messages.first() {
        println!("{}\n", greeting.content);
    }
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == ":q" {
            break;
        }
        let answer = client.tutor.ask(&mut session, line).await?;
        print_sourced_text(&answer);
        println!();
    }
    Ok(())
}

async fn plan(client: &EduClient, cmd: PlanCommand) -> anyhow::Result<()> {
    match cmd {
        PlanCommand::Create {
            title,
            subject,
            weeks,
            hours,
            difficulty,
            goals,
        } => {
            let form = PlanForm {
                title,
                subject,
                duration_weeks: weeks,
                hours_per_day: hours,
                difficulty_level: difficulty,
                goals: GoalList::from_goals(goals),
            };
            let plan = client.planner.create(&form).await?;
            report_degraded(&plan);
            print_json(plan.value())
        }
        PlanCommand::Quick {
            subject,
            goal,
            timeframe,
            hours,
            topics,
        } => {
            let mut form = QuickPlanForm {
                subject,
                goal,
                timeframe,
                study_hours: hours,
                ..Default::default()
            };
            for topic in &topics {
                form.add_topic(topic);
            }
            let generated = client.planner.quick_plan(&form).await?;
            report_degraded(&generated);
            print_json(generated.value())
        }
        PlanCommand::List => {
            for plan in client.planner.list()? {
                println!(
                    "{}  {} ({}, {} weeks, {}h/day) [{}]",
                    plan.id, plan.title, plan.subject, plan.duration_weeks, plan.hours_per_day, plan.status
                );
            }
            Ok(())
        }
        PlanCommand::Regenerate { plan_id } => {
            let plan = client.planner.regenerate(&plan_id).await?;
            report_degraded(&plan);
            print_json(plan.value())
        }
        PlanCommand::Delete { plan_id } => {
            if client.planner.delete(&plan_id)? {
                println!("Deleted {}", plan_id);
            } else {
                println!("No plan {}", plan_id);
            }
            Ok(())
        }
    }
}

async fn resources(client: &EduClient, cmd: ResourceCommand) -> anyhow::Result<()> {
    match cmd {
        ResourceCommand::Search {
            query,
            subject,
            resource_type,
            difficulty,
        } => {
            let filters = SearchFilters {
                subject,
                resource_type,
                difficulty_level: difficulty,
            };
            let found = client.curator.search(&query.join(" "), &filters).await?;
            print_json(&found)
        }
        ResourceCommand::Saved => print_json(&client.curator.saved()?),
        ResourceCommand::Save { json } => {
            let resource: Resource =
                serde_json::from_str(&json).context("Resource must be a JSON object")?;
            client.curator.save(&resource)?;
            Ok(())
        }
        ResourceCommand::Remove { resource_id } => {
            client.curator.remove(&resource_id)?;
            Ok(())
        }
        ResourceCommand::History => {
            for search in client.curator.search_history()? {
                println!(
                    "{}  {:?} ({} results)",
                    search.timestamp.format("%Y-%m-%d %H:%M"),
                    search.query,
                    search.results_count
                );
            }
            Ok(())
        }
    }
}

async fn exam(client: &EduClient, cmd: ExamCommand) -> anyhow::Result<()> {
    match cmd {
        ExamCommand::Generate {
            subject,
            topic,
            difficulty,
            questions,
            time_limit,
            question_types,
        } => {
            let form = ExamForm {
                subject,
                topic,
                difficulty,
                question_count: questions,
                time_limit,
                question_types,
            };
            let exam = client.exams.generate(&form).await?;
            println!("Exam {} with {} questions", exam.id, exam.questions.len());
            Ok(())
        }
        ExamCommand::List => {
            for exam in client.exams.exams()? {
                println!(
                    "{}  {} / {} ({}, {} questions, {} min)",
                    exam.id,
                    exam.subject,
                    exam.topic,
                    exam.difficulty,
                    exam.questions.len(),
                    exam.time_limit
                );
            }
            Ok(())
        }
        ExamCommand::History => {
            for result in client.exams.history()? {
                println!(
                    "{}  {} / {}: {}% ({}/{}) in {} min - {}",
                    result.completed_at.format("%Y-%m-%d %H:%M"),
                    result.subject,
                    result.topic,
                    result.score,
                    result.correct_answers,
                    result.total_questions,
                    result.time_taken,
                    result.feedback
                );
            }
            Ok(())
        }
        ExamCommand::Take { exam_id } => take_exam(client, &exam_id).await,
    }
}

fn show_question(attempt: &ExamAttempt) {
    let (Some(question), Some(cursor)) = (attempt.current_question(), attempt.cursor()) else {
        return;
    };
    println!(
        "\n[{}] Question {} of {}",
        format_countdown(attempt.remaining_secs().unwrap_or(0)),
        cursor + 1,
        attempt.question_count()
    );
    println!("{}", question.question);
    if let Some(options) = question.options.as_ref().filter(|_| question.is_multiple_choice()) {
        for (i, option) in options.iter().enumerate() {
            println!("  {}. {}", i + 1, option);
        }
    }
    if let Some(answer) = attempt.answer_for(cursor) {
        println!("(current answer: {})", answer);
    }
}

/// Interactive attempt: type an answer (or an option number), `:n` / `:p`
/// to move, `:q` to submit.
async fn take_exam(client: &EduClient, exam_id: &str) -> anyhow::Result<()> {
    let mut attempt = client.exams.attempt(exam_id)?;
    attempt.start(chrono::Utc::now())?;
    show_question(&attempt);

    let attempt = Arc::new(Mutex::new(attempt));
    let mut countdown = Countdown::spawn(attempt.clone());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            expired = countdown.expired() => {
                if expired.is_some() {
                    println!("\nTime is up! Exam submitted automatically.");
                }
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let mut guard = attempt.lock().await;
                match guard.apply_input(&line)? {
                    Input::Continue => {}
                    Input::Submit | Input::Closed => break,
                }
                show_question(&guard);
            }
        }
    }

    countdown.cancel();
    let mut guard = attempt.lock().await;
    let result = client.exams.complete(&mut guard).await?;
    for (i, q) in result.question_results.iter().enumerate() {
        let mark = if q.is_correct { "correct" } else { "wrong" };
        println!("{}. {} [{}]", i + 1, q.user_answer, mark);
    }
    println!("{}", result.feedback);
    Ok(())
}

async fn syllabus(client: &EduClient, cmd: SyllabusCommand) -> anyhow::Result<()> {
    match cmd {
        SyllabusCommand::Text { text } => {
            let analysis = client.syllabus.analyze_text(&text.join(" ")).await?;
            report_degraded(&analysis);
            print_json(analysis.value())
        }
        SyllabusCommand::File { path } => {
            let analysis = client.syllabus.analyze_file(&path).await?;
            report_degraded(&analysis);
            print_json(analysis.value())
        }
        SyllabusCommand::List => print_json(&client.syllabus.analyses()?),
    }
}

async fn paths(client: &EduClient, cmd: PathCommand) -> anyhow::Result<()> {
    match cmd {
        PathCommand::List => {
            for path in client.learning_paths.list()? {
                println!(
                    "{}  {} ({}, {}) {}% [{}]",
                    path.id, path.title, path.subject, path.difficulty_level, path.progress, path.status
                );
                for step in &path.steps {
                    let mark = if step.completed { "x" } else { " " };
                    println!("    [{}] {}. {}", mark, step.id, step.title);
                }
            }
            Ok(())
        }
        PathCommand::Create {
            title,
            subject,
            difficulty,
            duration,
            goals,
        } => {
            let form = PathForm {
                title,
                subject,
                difficulty_level: difficulty,
                estimated_duration: duration,
                goals: GoalList::from_goals(goals),
            };
            let path = client.learning_paths.create(&form)?;
            println!("Created path {}", path.id);
            Ok(())
        }
        PathCommand::Start { path_id } => {
            let path = client.learning_paths.start(path_id)?;
            println!("{} is now {}", path.title, path.status);
            Ok(())
        }
        PathCommand::Complete { path_id, step_id } => {
            let path = client.learning_paths.complete_step(path_id, step_id)?;
            println!("{}: {}% [{}]", path.title, path.progress, path.status);
            Ok(())
        }
        PathCommand::Remote { resources_for } => {
            let value = match resources_for {
                Some(id) => client.learning_paths.path_resources(&id).await?,
                None => client.learning_paths.remote_paths().await?,
            };
            print_json(&value)
        }
    }
}

async fn profile(client: &EduClient, cmd: ProfileCommand) -> anyhow::Result<()> {
    match cmd {
        ProfileCommand::Show => {
            let profile = client.profile.load().await?;
            report_degraded(&profile);
            print_json(profile.value())
        }
        ProfileCommand::Update {
            name,
            grade,
            subjects,
            learning_style,
        } => {
            let update = ProfileUpdate {
                name,
                grade,
                subjects,
                learning_style,
            };
            let user = client.profile.update(&update).await?;
            print_json(user.value())
        }
        ProfileCommand::Password {
            current,
            new,
            confirm,
        } => {
            client.profile.change_password(&current, &new, &confirm).await?;
            Ok(())
        }
        ProfileCommand::Stats => print_json(&client.profile.stats()?),
    }
}

fn report_degraded<T>(sourced: &Sourced<T>) {
    if let Some(reason) = sourced.reason() {
        eprintln!("(offline result: {})", reason);
    }
}

fn print_sourced_text(answer: &Sourced<String>) {
    report_degraded(answer);
    println!("{}", answer.value());
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initialize logging on stderr: JSON lines when `json` is set, compact text
/// otherwise.
fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("eduverse_client=info,warn"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_feature_commands_map_to_protected_pages() {
        let cli = Cli::parse_from(["eduverse", "--ephemeral", "exam", "take", "123"]);
        assert!(cli.ephemeral);
        assert_eq!(cli.command.route(), Route::ExamCoach);
        assert!(!cli.command.route().is_public());

        let cli = Cli::parse_from(["eduverse", "login", "a@b.c", "--password", "x"]);
        assert!(cli.command.route().is_public());
    }
}
