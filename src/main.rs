mod analytics;
mod api;
mod cli;
mod config;
mod db;

use crate::analytics::{Clock, FixedClock, SystemClock};
use crate::cli::{Cli, Commands, ConfigCommands};
use crate::config::Config;
use crate::db::Database;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => {
            let config = load_or_default_config()?;
            run_service(config).await
        }
        Commands::Status => handle_status(),
        Commands::Summary { user, date } => handle_summary(&user, date),
        Commands::Config { command } => handle_config_command(command),
    }
}

fn handle_config_command(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Set { key, value } => {
            let mut config = load_or_default_config()?;
            config.set_value(&key, &value)?;
            config.ensure_bootstrap_files()?;
            config.save()?;

            println!("Config saved: {key} = {value}");
            Ok(())
        }
        ConfigCommands::Get { key } => {
            let config = load_or_default_config()?;
            let value = config
                .get_value(&key)
                .with_context(|| format!("Unsupported config key: {key}"))?;

            println!("{value}");
            Ok(())
        }
    }
}

fn handle_status() -> Result<()> {
    let config = load_or_default_config()?;
    let database = Database::open(&config.db_path)?;

    println!("LifeLog status");
    println!("- db_path: {}", config.db_path.display());
    println!("- api_port: {}", config.api_port);
    println!("- users: {}", database.user_count()?);
    println!("- streak_lookback_days: {}", config.streak_lookback_days);

    Ok(())
}

fn handle_summary(user: &str, date: Option<String>) -> Result<()> {
    let config = load_or_default_config()?;
    let database = Database::open(&config.db_path)?;

    if !database.user_exists(user)? {
        anyhow::bail!("Unknown user: {user}");
    }

    let clock: Box<dyn Clock> = match parse_optional_date(date)? {
        Some(fixed) => Box::new(FixedClock(fixed)),
        None => Box::new(SystemClock),
    };

    let summary = analytics::dashboard_summary(&database, clock.as_ref(), &config, user)?;
    let habits = analytics::habit_overview(&database, clock.as_ref(), user)?;

    println!("Dashboard for {user}");
    println!("- entries: {}", summary.total_entries);
    println!("- expenses: {:.2}", summary.total_expenses);
    println!("- streak: {} day(s)", summary.streak);
    println!(
        "- top mood: {}",
        summary.top_mood.as_deref().unwrap_or("None")
    );

    if !summary.recent_entries.is_empty() {
        println!("Recent entries:");
        summary.recent_entries.iter().for_each(|entry| {
            println!(
                "  {} [{}] {}",
                entry.occurred_on,
                entry.mood,
                if entry.title.is_empty() {
                    "(untitled)"
                } else {
                    entry.title.as_str()
                }
            );
        });
    }

    if !habits.is_empty() {
        println!("Habits:");
        habits.iter().for_each(|status| {
            let mark = if status.completed_today { "x" } else { " " };
            println!("  [{mark}] {}", status.habit.name);
        });
    }

    Ok(())
}

async fn run_service(config: Config) -> Result<()> {
    config.ensure_bootstrap_files()?;
    let _ = Database::open(&config.db_path)?;

    let api_config = Arc::new(config);

    info!("LifeLog service started");

    tokio::select! {
        api_result = api::run_server(api_config) => {
            api_result?;
        }
        _ = signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    Ok(())
}

fn parse_optional_date(input: Option<String>) -> Result<Option<NaiveDate>> {
    input
        .as_deref()
        .map(|date| {
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .with_context(|| format!("Invalid date format: {date}. Example: 2026-02-18"))
        })
        .transpose()
}

fn load_or_default_config() -> Result<Config> {
    Config::load().or_else(|_| {
        let config = Config::default();
        config.ensure_bootstrap_files()?;
        config.save()?;
        Ok(config)
    })
}
