//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` / `resolve_db_path` - Shared database helpers
//! - `load_knowledge` - Knowledge base + lexicon loading with TOML override
//! - `cmd_init` - Initialize the database
//! - `cmd_status` - Show database status

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sahayak_core::db::Database;
use sahayak_core::{KnowledgeBase, Lexicon};

/// Default database location: `<platform data dir>/sahayak/sahayak.db`,
/// falling back to `./sahayak.db` when no data directory is available.
pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("sahayak").join("sahayak.db"))
        .unwrap_or_else(|| PathBuf::from("sahayak.db"))
}

pub fn resolve_db_path(db: Option<&Path>) -> PathBuf {
    db.map(Path::to_path_buf).unwrap_or_else(default_db_path)
}

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db: Option<&Path>, no_encrypt: bool) -> Result<Database> {
    let path = resolve_db_path(db);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).context("Failed to create data directory")?;
        }
    }

    let path_str = path.to_str().context("Database path must be valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// Load the knowledge base and lexicon.
///
/// With a pack file, scheme facts come from its `[categories.*]` tables and
/// keywords from its `[[lexicon]]` section (falling back to the built-in
/// table when the section is absent). Without one, both are built-in.
pub fn load_knowledge(knowledge: Option<&Path>) -> Result<(KnowledgeBase, Lexicon)> {
    match knowledge {
        Some(path) => {
            let input = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read knowledge pack {}", path.display()))?;
            let kb = KnowledgeBase::from_toml_str(&input)
                .with_context(|| format!("Invalid knowledge pack {}", path.display()))?;
            let lexicon = Lexicon::from_toml_str_opt(&input)
                .with_context(|| format!("Invalid lexicon in {}", path.display()))?
                .unwrap_or_default();
            Ok((kb, lexicon))
        }
        None => Ok((KnowledgeBase::builtin(), Lexicon::builtin())),
    }
}

pub fn cmd_init(db: Option<&Path>, no_encrypt: bool) -> Result<()> {
    let path = resolve_db_path(db);
    println!("🔧 Initializing database at {}...", path.display());

    let _db = open_db(db, no_encrypt)?;

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Ask a question: sahayak ask \"student schemes\"");
    println!("  2. Start the API server: sahayak serve");

    Ok(())
}

pub fn cmd_status(db: Option<&Path>, no_encrypt: bool) -> Result<()> {
    let db = open_db(db, no_encrypt)?;

    println!("📊 Sahayak Status");
    println!("   ─────────────────────────────");
    println!("   Database: {}", db.path());
    println!(
        "   Encrypted: {}",
        if db.is_encrypted()? { "yes" } else { "no" }
    );
    println!("   Registered users: {}", db.count_users()?);
    println!("   Logged exchanges: {}", db.count_exchanges()?);

    Ok(())
}
