//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Sahayak - Discover government welfare schemes
#[derive(Parser)]
#[command(name = "sahayak")]
#[command(about = "Rule-based assistant for discovering government welfare schemes", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set SAHAYAK_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    /// Knowledge pack TOML overriding the built-in schemes and keywords
    #[arg(long, global = true)]
    pub knowledge: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// By default, the server requires a login session or API key.
        #[arg(long)]
        no_auth: bool,
    },

    /// Ask the assistant from the terminal
    ///
    /// With a message, answers once and exits. Without one, starts an
    /// interactive conversation that keeps follow-up context across turns.
    Ask {
        /// The question; omit for interactive mode
        message: Option<String>,

        /// Skip writing exchanges to the log
        #[arg(long)]
        no_log: bool,
    },

    /// List scheme categories, or show one category's schemes and alerts
    Categories {
        /// Category name (e.g., "student" or "senior citizen")
        name: Option<String>,
    },

    /// Show a user's chat history
    History {
        /// User email
        #[arg(short, long)]
        email: String,

        /// Maximum entries to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },

    /// Show database status (encryption, counts, etc.)
    Status,
}
