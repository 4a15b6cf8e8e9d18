//! okrboard - OKR planner
//!
//! CLI entry point: runs the HTTP API or works with the plan directly.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info, warn};

use okrboard::cli::{Cli, Command, OutputFormat};
use okrboard::config::{Config, ResolvedLlmConfig};
use okrboard::domain::{Plan, TaskStatus, UserInput};
use okrboard::service::PlanService;
use okrboard::web;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("okrboard")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("okrboard.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables win
    let dotenv = dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    // Setup logging with priority: CLI > config > INFO default
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;
    if let Some(path) = dotenv {
        debug!(path = %path.display(), "main: loaded .env");
    }

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(model = %config.llm.model, db = %config.storage.expanded_db_path().display(), "okrboard loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Serve { bind, port } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            let port = port.unwrap_or(config.server.port);
            cmd_serve(&config, &bind, port).await
        }
        Command::Plan {
            weekly,
            overall,
            format,
        } => cmd_plan(&config, &weekly, &overall, format).await,
        Command::Show { format } => cmd_show(&config, format).await,
        Command::Task { id, status, content } => cmd_task(&config, &id, status, content).await,
        Command::Input { format } => cmd_input(&config, format).await,
        Command::Config => cmd_config(&config),
    }
}

/// Wire the client, generator and store actor together
fn build_service(config: &Config, llm: &ResolvedLlmConfig) -> Result<PlanService> {
    debug!("build_service: called");
    PlanService::open(llm, config.storage.expanded_db_path())
}

fn print_banner(llm: &ResolvedLlmConfig) {
    println!("{} {}", "Model:".bold(), llm.model);
    println!("{} {}", "Endpoint:".bold(), llm.base_url);
    if llm.api_key.is_some() {
        println!("{} {}", "API key:".bold(), llm.masked_api_key());
    } else {
        println!(
            "{} {} (set {} to enable plan generation)",
            "API key:".bold(),
            "NOT SET".yellow(),
            llm.api_key_env
        );
    }
}

async fn cmd_serve(config: &Config, bind: &str, port: u16) -> Result<()> {
    debug!(%bind, %port, "cmd_serve: called");
    let llm = config.llm.resolve();
    print_banner(&llm);
    let service = build_service(config, &llm)?;
    println!("{} http://{}:{}/api", "Listening on".green(), bind, port);
    println!("Press Ctrl+C to stop");
    web::serve(bind, port, service).await
}

async fn cmd_plan(config: &Config, weekly: &str, overall: &str, format: OutputFormat) -> Result<()> {
    debug!(?format, "cmd_plan: called");
    let service = build_service(config, &config.llm.resolve())?;
    let result = service.process_goals(weekly, overall).await;
    service.state().shutdown().await.ok();

    let plan = result.context("Failed to generate plan")?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        OutputFormat::Text => {
            println!("{} Generated {} objectives", "✓".green(), plan.objectives.len());
            print_plan(&plan);
        }
    }
    Ok(())
}

async fn cmd_show(config: &Config, format: OutputFormat) -> Result<()> {
    debug!(?format, "cmd_show: called");
    let service = build_service(config, &config.llm.resolve())?;
    let plan = service.current_plan().await?;
    service.state().shutdown().await.ok();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        OutputFormat::Text if plan.is_empty() => println!("No plan yet. Run `okr plan` to create one."),
        OutputFormat::Text => print_plan(&plan),
    }
    Ok(())
}

async fn cmd_task(config: &Config, id: &str, status: Option<TaskStatus>, content: Option<String>) -> Result<()> {
    debug!(%id, ?status, "cmd_task: called");
    let service = build_service(config, &config.llm.resolve())?;
    let plan = service.current_plan().await?;

    let Some(existing) = plan.find_task(id) else {
        warn!(%id, "cmd_task: task not found");
        println!("Task not found: {}", id);
        service.state().shutdown().await.ok();
        return Ok(());
    };

    let mut task = existing.clone();
    if let Some(status) = status {
        task.status = status;
    }
    if let Some(content) = content {
        task.content = content;
    }

    let result = service.update_task(task.clone()).await;
    service.state().shutdown().await.ok();
    result?;

    println!("{} {} [{}] {}", "✓".green(), task.id.cyan(), status_label(task.status), task.content);
    Ok(())
}

async fn cmd_input(config: &Config, format: OutputFormat) -> Result<()> {
    debug!(?format, "cmd_input: called");
    let service = build_service(config, &config.llm.resolve())?;
    let input = service.latest_user_input().await?;
    service.state().shutdown().await.ok();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&input)?),
        OutputFormat::Text => print_input(&input),
    }
    Ok(())
}

fn cmd_config(config: &Config) -> Result<()> {
    debug!("cmd_config: called");
    let llm = config.llm.resolve();
    println!("{}", "LLM".bold());
    println!("  model:       {}", llm.model);
    println!("  base-url:    {}", llm.base_url);
    println!("  api-key-env: {}", llm.api_key_env);
    println!("  api-key:     {}", llm.masked_api_key());
    println!("  timeout-ms:  {}", llm.timeout_ms);
    println!("{}", "Storage".bold());
    println!("  db-path:     {}", config.storage.expanded_db_path().display());
    println!("{}", "Server".bold());
    println!("  bind:        {}", config.server.bind);
    println!("  port:        {}", config.server.port);
    Ok(())
}

fn status_label(status: TaskStatus) -> colored::ColoredString {
    match status {
        TaskStatus::Todo => "todo".normal(),
        TaskStatus::InProgress => "in_progress".yellow(),
        TaskStatus::Done => "done".green(),
    }
}

fn print_plan(plan: &Plan) {
    for objective in &plan.objectives {
        println!(
            "\n{} {} ({}/{})",
            objective.id.cyan(),
            objective.title.bold(),
            objective.done_count(),
            objective.tasks.len()
        );
        for task in &objective.tasks {
            let mark = if task.is_done() { "[x]" } else { "[ ]" };
            println!("  {} {} {} {}", mark, task.id.dimmed(), task.content, status_label(task.status));
        }
    }
}

/// Render an RFC 3339 timestamp in local time, or as-is if it doesn't parse
fn local_time(timestamp: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}

fn print_input(input: &UserInput) {
    if input.is_empty() {
        println!("No goals submitted yet.");
        return;
    }
    println!("{} {}", "Submitted:".bold(), local_time(&input.created_at));
    println!("{}\n{}", "Weekly goals:".bold(), input.weekly_goals);
    println!("{}\n{}", "Overall goals:".bold(), input.overall_goals);
}
