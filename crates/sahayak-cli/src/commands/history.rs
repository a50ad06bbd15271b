//! Chat history command

use anyhow::{Context, Result};

use sahayak_core::Database;

pub fn cmd_history(db: &Database, email: &str, limit: usize) -> Result<()> {
    let user = db
        .get_user_by_email(email)?
        .with_context(|| format!("No user with email {}", email))?;

    let history = db.list_exchanges(user.id)?;
    if history.is_empty() {
        println!("No chat history for {}", email);
        return Ok(());
    }

    println!("💬 Chat history for {} ({} exchanges)", email, history.len());
    for exchange in history.iter().take(limit) {
        let category = exchange
            .category
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!();
        println!(
            "   [{}] {}",
            exchange.timestamp.format("%Y-%m-%d %H:%M:%S"),
            category
        );
        println!("   Q: {}", exchange.question);
        println!("   A: {}", exchange.reply.replace('\n', "\n      "));
    }

    if history.len() > limit {
        println!();
        println!(
            "   ... {} more (raise --limit to see them)",
            history.len() - limit
        );
    }

    Ok(())
}
