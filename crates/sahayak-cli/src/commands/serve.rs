//! Server command implementation

use std::path::Path;

use anyhow::Result;

use super::{load_knowledge, open_db, resolve_db_path};

pub async fn cmd_serve(
    db_path: Option<&Path>,
    knowledge: Option<&Path>,
    host: &str,
    port: u16,
    no_auth: bool,
    no_encrypt: bool,
) -> Result<()> {
    println!("🚀 Starting Sahayak API server...");
    println!("   Database: {}", resolve_db_path(db_path).display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(pack) = knowledge {
        println!("   Knowledge pack: {}", pack.display());
    }

    // Parse API keys from environment (comma-separated)
    let api_keys: Vec<String> = std::env::var("SAHAYAK_API_KEYS")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    // Parse allowed CORS origins (comma-separated)
    let allowed_origins: Vec<String> = std::env::var("SAHAYAK_ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if no_auth {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
    } else {
        println!("   🔒 Authentication: session tokens (POST /api/login)");
        if !api_keys.is_empty() {
            println!(
                "   🔑 API keys: {} configured (SAHAYAK_API_KEYS)",
                api_keys.len()
            );
        }
    }
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;
    let (kb, lexicon) = load_knowledge(knowledge)?;

    let config = sahayak_server::ServerConfig {
        require_auth: !no_auth,
        allowed_origins,
        api_keys,
    };

    sahayak_server::serve_with_config(db, kb, lexicon, host, port, config).await?;

    Ok(())
}
