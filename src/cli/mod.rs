use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "lifelog", about = "Journaling analytics: streaks, moods, habits")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the analytics API server until interrupted.
    Serve,
    /// Print service and database status.
    Status,
    /// Print the dashboard summary for a user in the terminal.
    Summary {
        #[arg(long)]
        user: String,
        /// Reference date (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    Set { key: String, value: String },
    Get { key: String },
}
