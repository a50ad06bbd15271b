//! Sahayak CLI - Government welfare-scheme assistant
//!
//! Usage:
//!   sahayak init                  Initialize database
//!   sahayak ask "student schemes" Ask a question from the terminal
//!   sahayak serve --port 3000     Start the API server
//!   sahayak categories            List scheme categories

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(cli.db.as_deref(), cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            no_auth,
        } => {
            commands::cmd_serve(
                cli.db.as_deref(),
                cli.knowledge.as_deref(),
                &host,
                port,
                no_auth,
                cli.no_encrypt,
            )
            .await
        }
        Commands::Ask { message, no_log } => commands::cmd_ask(
            cli.db.as_deref(),
            cli.knowledge.as_deref(),
            message.as_deref(),
            no_log,
            cli.no_encrypt,
        ),
        Commands::Categories { name } => {
            commands::cmd_categories(cli.knowledge.as_deref(), name.as_deref())
        }
        Commands::History { email, limit } => {
            let db = commands::open_db(cli.db.as_deref(), cli.no_encrypt)?;
            commands::cmd_history(&db, &email, limit)
        }
        Commands::Status => commands::cmd_status(cli.db.as_deref(), cli.no_encrypt),
    }
}
