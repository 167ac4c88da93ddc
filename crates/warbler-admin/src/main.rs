mod cli;
mod config;

use clap::Parser;
use tracing::info;

use warbler_db::Database;
use warbler_service::profiles;

use crate::cli::{Cli, Command};
use crate::config::AdminConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = AdminConfig::from_env();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with_writer(std::io::stderr)
        .init();

    // Opening runs any pending migrations
    let db = Database::open(&config.db_path)?;

    match cli.command() {
        Command::Stats => {
            let counts = db.counts()?;
            info!(?counts, "store counts");
            println!("{}", serde_json::to_string_pretty(&counts)?);
        }
        Command::Users { search } => {
            let users = profiles::list_users(&db, search.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&users)?);
        }
        Command::Reset => {
            db.delete_all()?;
            info!(path = %config.db_path.display(), "store reset");
        }
    }

    Ok(())
}
