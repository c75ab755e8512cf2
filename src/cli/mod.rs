//! Command-line interface.

mod analyze;
mod config;
mod estimate;
mod history;
mod tables;

pub use analyze::AnalyzeArgs;
pub use config::ConfigCommand;
pub use estimate::EstimateArgs;
pub use history::HistoryCommand;
pub use tables::TablesCommand;

use clap::{Parser, Subcommand};

/// Construction material takeoff and cost estimation.
#[derive(Parser, Debug)]
#[command(name = "groundwork", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate an itemized estimate from dimensions and optional photos
    Estimate(EstimateArgs),

    /// Analyze building photos and print the detected features
    Analyze(AnalyzeArgs),

    /// Inspect the reference tables
    Tables {
        #[command(subcommand)]
        table: TablesCommand,
    },

    /// Browse saved estimates
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// View and modify settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Dispatch a parsed command.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Estimate(args) => estimate::run(args).await,
        Command::Analyze(args) => analyze::run(args).await,
        Command::Tables { table } => tables::run(table),
        Command::History { command } => history::run(command).await,
        Command::Config { command } => config::run_config_command(command),
    }
}
