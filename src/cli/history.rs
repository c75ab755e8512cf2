//! The `history` command: browse saved estimates.

use clap::Subcommand;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::db::Database;
use crate::history::Store;
use crate::settings::Settings;

#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// List recent estimates
    List {
        /// Maximum rows to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Show one saved estimate in full
    Show {
        /// Estimate ID
        id: Uuid,
    },

    /// Delete a saved estimate
    Delete {
        /// Estimate ID
        id: Uuid,
    },
}

async fn connect() -> anyhow::Result<Store> {
    let settings = Settings::load();
    let config = DatabaseConfig::from_env(&settings)
        .ok_or_else(|| anyhow::anyhow!("GROUNDWORK_DATABASE_URL is not set"))?;
    let store = Store::new(&config).await?;
    store.run_migrations().await?;
    Ok(store)
}

pub async fn run(command: HistoryCommand) -> anyhow::Result<()> {
    let store = connect().await?;

    match command {
        HistoryCommand::List { limit } => {
            let summaries = store.list_estimates(limit).await?;
            if summaries.is_empty() {
                println!("No saved estimates.");
                return Ok(());
            }
            println!(
                "{:<36} {:<20} {:>4} {:>12} {:>8}",
                "id", "created", "zone", "total", "accuracy"
            );
            for s in summaries {
                let accuracy = s
                    .accuracy
                    .map(|a| format!("{a:.2}"))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<36} {:<20} {:>4} {:>12} {:>8}",
                    s.id,
                    s.created_at.format("%Y-%m-%d %H:%M"),
                    s.climate_zone,
                    s.total.round_dp(2),
                    accuracy
                );
            }
        }
        HistoryCommand::Show { id } => {
            let record = store
                .get_estimate(id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("no estimate with id {id}"))?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        HistoryCommand::Delete { id } => {
            if store.delete_estimate(id).await? {
                println!("Deleted {id}");
            } else {
                println!("No estimate with id {id}");
            }
        }
    }

    Ok(())
}
