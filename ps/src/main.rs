use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use planstore::cli::{Cli, Command};
use planstore::{Store, TaskStatus};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let db_path = cli.db.unwrap_or_else(planstore::default_db_path);

    info!("planstore using {}", db_path.display());

    match cli.command {
        Command::Show { json } => {
            let store = Store::open(&db_path)?;
            let plan = store.load_plan()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else if plan.is_empty() {
                println!("No plan stored");
            } else {
                for obj in &plan.objectives {
                    println!(
                        "{} {} {}",
                        obj.id.dimmed(),
                        obj.title.bold(),
                        format!("({}/{})", obj.done_count(), obj.tasks.len()).dimmed()
                    );
                    for task in &obj.tasks {
                        let marker = match task.status {
                            TaskStatus::Todo => "[ ]".normal(),
                            TaskStatus::InProgress => "[~]".yellow(),
                            TaskStatus::Done => "[x]".green(),
                        };
                        println!("  {} {} {}", marker, task.content, task.id.dimmed());
                    }
                }
            }
        }
        Command::History { limit } => {
            let store = Store::open(&db_path)?;
            let inputs = store.list_user_inputs(limit)?;
            if inputs.is_empty() {
                println!("No inputs recorded");
            } else {
                for input in inputs {
                    println!("{}", input.created_at.cyan());
                    println!("  weekly:  {}", input.weekly_goals);
                    println!("  overall: {}", input.overall_goals);
                }
            }
        }
        Command::Path => {
            println!("{}", db_path.display());
        }
    }

    Ok(())
}
