use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use rustyline::Editor;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use mentor_application::Dispatcher;
use mentor_core::config::MentorConfig;
use mentor_core::evaluation::EvaluateCodeRequest;
use mentor_core::hint::RequestHintRequest;
use mentor_core::history::{AnalyzeHistoryRequest, FetchHistoryRequest, SaveHistoryRequest};
use mentor_core::problem::{CodingProblem, Difficulty, RequestProblemRequest};
use mentor_core::session::{EndSessionRequest, ExperienceLevel, InitSessionRequest};
use mentor_core::study_plan::GenerateStudyPlanRequest;
use mentor_infrastructure::{MentorPaths, store_from_config};

#[derive(Parser)]
#[command(name = "mentor")]
#[command(about = "MENTOR CLI - Modular Evaluation and Tutoring Orchestration Runtime", long_about = None)]
struct Cli {
    /// Path to a config file (defaults to the platform config location)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive tutoring session
    Repl {
        /// User id to start the session for
        #[arg(long, default_value = "local-user")]
        user: String,
        /// Experience level: beginner, intermediate, advanced
        #[arg(long, default_value = "beginner")]
        level: String,
    },
}

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: vec![
                "/problem".to_string(),
                "/eval".to_string(),
                "/hint".to_string(),
                "/plan".to_string(),
                "/history".to_string(),
                "/help".to_string(),
            ],
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

fn parse_level(level: &str) -> ExperienceLevel {
    match level.to_ascii_lowercase().as_str() {
        "intermediate" => ExperienceLevel::Intermediate,
        "advanced" => ExperienceLevel::Advanced,
        _ => ExperienceLevel::Beginner,
    }
}

fn parse_difficulty(arg: Option<&str>) -> Option<Difficulty> {
    match arg.map(|a| a.to_ascii_lowercase()) {
        Some(d) if d == "easy" => Some(Difficulty::Easy),
        Some(d) if d == "medium" => Some(Difficulty::Medium),
        Some(d) if d == "hard" => Some(Difficulty::Hard),
        _ => None,
    }
}

fn print_problem(problem: &CodingProblem) {
    println!("{}", format!("── {} ──", problem.title).bright_magenta().bold());
    println!("{}", problem.description.bright_blue());
    println!(
        "{}",
        format!(
            "difficulty: {:?} | categories: {} | expected: {} time, {} space",
            problem.difficulty,
            problem.category.join(", "),
            problem.expected_time_complexity,
            problem.expected_space_complexity
        )
        .bright_black()
    );
    for example in &problem.examples {
        println!("  {} {}", "in: ".green(), example.input);
        println!("  {} {}", "out:".green(), example.output);
    }
}

/// Reads code lines until a lone `.` terminator.
fn read_code(rl: &mut Editor<CliHelper, rustyline::history::DefaultHistory>) -> Result<String> {
    println!(
        "{}",
        "Enter your code; finish with a single '.' on its own line.".bright_black()
    );
    let mut lines = Vec::new();
    loop {
        match rl.readline("... ") {
            Ok(line) if line.trim() == "." => break,
            Ok(line) => lines.push(line),
            Err(_) => break,
        }
    }
    Ok(lines.join("\n"))
}

async fn run_repl(dispatcher: Dispatcher, user: String, level: String) -> Result<()> {
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== MENTOR ===".bright_magenta().bold());
    println!(
        "{}",
        "Commands: /problem [difficulty] [category], /eval, /hint, /plan, /history, /help — \
         'quit' to exit."
            .bright_black()
    );

    let session = dispatcher
        .init_session(InitSessionRequest {
            user_id: user.clone(),
            experience_level: parse_level(&level),
            target_areas: vec![],
        })
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    println!("{}", session.message.bright_blue());

    let mut current_problem: Option<CodingProblem> = None;
    let mut hints_provided: u8 = 0;

    loop {
        let readline = rl.readline(">> ");
        let line = match readline {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        };

        let trimmed = line.trim().to_string();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == "quit" || trimmed == "exit" {
            break;
        }
        let _ = rl.add_history_entry(&line);

        let mut parts = trimmed.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        let outcome = match command {
            "/problem" => {
                let request = RequestProblemRequest {
                    user_id: user.clone(),
                    session_id: session.session_id.clone(),
                    difficulty: parse_difficulty(args.first().copied()),
                    category: args.get(1).map(|c| vec![c.to_string()]),
                };
                match dispatcher.request_problem(request).await {
                    Ok(problem) => {
                        print_problem(&problem);
                        current_problem = Some(problem);
                        hints_provided = 0;
                        Ok(())
                    }
                    Err(e) => Err(e),
                }
            }
            "/eval" => match &current_problem {
                None => {
                    println!("{}", "Request a problem first with /problem.".yellow());
                    Ok(())
                }
                Some(problem) => {
                    let code = read_code(&mut rl)?;
                    match dispatcher
                        .evaluate_code(EvaluateCodeRequest {
                            code,
                            language: "python".to_string(),
                            problem_id: problem.id.clone(),
                            user_id: user.clone(),
                            session_id: session.session_id.clone(),
                        })
                        .await
                    {
                        Ok(evaluation) => {
                            println!(
                                "{}",
                                format!("Overall score: {:.0}/100", evaluation.overall_score)
                                    .bright_green()
                                    .bold()
                            );
                            println!("{}", evaluation.feedback.bright_blue());
                            for suggestion in &evaluation.suggestions {
                                println!("  {} {}", "→".yellow(), suggestion);
                            }
                            Ok(())
                        }
                        Err(e) => Err(e),
                    }
                }
            },
            "/hint" => match &current_problem {
                None => {
                    println!("{}", "Request a problem first with /problem.".yellow());
                    Ok(())
                }
                Some(problem) => {
                    let code = read_code(&mut rl)?;
                    match dispatcher
                        .request_hint(RequestHintRequest {
                            code,
                            language: "python".to_string(),
                            problem_id: problem.id.clone(),
                            user_id: user.clone(),
                            session_id: session.session_id.clone(),
                            hints_provided,
                            difficulty_level: problem.difficulty.level(),
                        })
                        .await
                    {
                        Ok(hint) => {
                            hints_provided = hints_provided.saturating_add(1);
                            println!(
                                "{}",
                                format!("Hint (level {}): {}", hint.level, hint.text).bright_blue()
                            );
                            if let Some(snippet) = &hint.code_snippet {
                                println!("{}", snippet.bright_black());
                            }
                            Ok(())
                        }
                        Err(e) => Err(e),
                    }
                }
            },
            "/plan" => match dispatcher
                .generate_study_plan(GenerateStudyPlanRequest {
                    user_id: user.clone(),
                    session_ids: None,
                })
                .await
            {
                Ok(plan) => {
                    for metric in &plan.metrics {
                        println!(
                            "{}",
                            format!(
                                "{}: {:.0} over {} attempt(s)",
                                metric.category, metric.average_score, metric.attempts
                            )
                            .bright_blue()
                        );
                    }
                    for rec in &plan.recommendations {
                        println!("  {} {}", format!("[{}]", rec.priority).yellow(), rec.action);
                    }
                    Ok(())
                }
                Err(e) => Err(e),
            },
            "/history" => {
                let save = dispatcher
                    .save_history(SaveHistoryRequest {
                        user_id: user.clone(),
                        session_id: session.session_id.clone(),
                    })
                    .await;
                match save.and(
                    dispatcher
                        .fetch_history(FetchHistoryRequest {
                            user_id: user.clone(),
                            session_id: None,
                            time_range: None,
                        })
                        .await,
                ) {
                    Ok(records) => {
                        for record in records.into_vec() {
                            println!(
                                "{}",
                                format!(
                                    "{} — {} problem(s), average {:.0}",
                                    record.start_time.format("%Y-%m-%d %H:%M"),
                                    record.problems_attempted.len(),
                                    record.average_score
                                )
                                .bright_blue()
                            );
                        }
                        if let Ok(analysis) = dispatcher
                            .analyze_history(AnalyzeHistoryRequest {
                                user_id: user.clone(),
                                session_id: None,
                            })
                            .await
                        {
                            println!("{}", format!("Trend: {:?}", analysis.trend).bright_green());
                        }
                        Ok(())
                    }
                    Err(e) => Err(e),
                }
            }
            "/help" => {
                println!(
                    "{}",
                    "/problem [easy|medium|hard] [category] — get a problem\n\
                     /eval — evaluate your code for the current problem\n\
                     /hint — get an escalating hint\n\
                     /plan — generate your study plan\n\
                     /history — save and show session history\n\
                     quit — end the session"
                        .bright_black()
                );
                Ok(())
            }
            other => {
                println!("{}", format!("Unknown command: {}", other).bright_black());
                Ok(())
            }
        };

        if let Err(e) = outcome {
            eprintln!("{}", e.to_string().red());
        }
    }

    if let Err(e) = dispatcher
        .end_session(EndSessionRequest {
            session_id: session.session_id.clone(),
        })
        .await
    {
        eprintln!("{}", e.to_string().red());
    }
    dispatcher.shutdown();
    println!("{}", "Goodbye!".bright_green());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => MentorPaths::config_file().map_err(|e| anyhow::anyhow!(e.to_string()))?,
    };
    let config = MentorConfig::load(&config_path).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let store = store_from_config(&config.storage).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let dispatcher = Dispatcher::new(store, config.dispatcher.clone());

    match cli.command {
        Commands::Repl { user, level } => run_repl(dispatcher, user, level).await?,
    }

    Ok(())
}
