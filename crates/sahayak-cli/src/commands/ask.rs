//! Terminal chat command
//!
//! One-shot with a message argument, interactive without one. The interactive
//! loop keeps a conversation context in process, so follow-up questions
//! ("how much", "last date") work exactly as they do over the API.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use tracing::warn;

use sahayak_core::models::NewExchange;
use sahayak_core::{ChatReply, ConversationContext, Database, DialogueManager};

use super::{load_knowledge, open_db};

pub fn cmd_ask(
    db_path: Option<&Path>,
    knowledge: Option<&Path>,
    message: Option<&str>,
    no_log: bool,
    no_encrypt: bool,
) -> Result<()> {
    let (kb, lexicon) = load_knowledge(knowledge)?;
    kb.validate_against(&lexicon)?;
    let dialogue = DialogueManager::new(&kb, &lexicon);

    // Logging is best-effort: an unavailable database never blocks replies.
    let db = if no_log {
        None
    } else {
        match open_db(db_path, no_encrypt) {
            Ok(db) => Some(db),
            Err(e) => {
                warn!(error = %e, "Exchange log unavailable; replies will not be recorded");
                None
            }
        }
    };

    let mut context = ConversationContext::new();

    match message {
        Some(message) => {
            let reply = dialogue.respond(&mut context, message);
            record(db.as_ref(), message, &reply);
            println!("{}", reply.reply);
        }
        None => {
            println!("💬 Ask about schemes; press Ctrl+D or type 'quit' to exit.");
            let stdin = io::stdin();
            loop {
                print!("> ");
                io::stdout().flush()?;
                let mut line = String::new();
                if stdin.lock().read_line(&mut line)? == 0 {
                    println!();
                    break;
                }
                let line = line.trim();
                if line == "quit" || line == "exit" {
                    break;
                }
                let reply = dialogue.respond(&mut context, line);
                record(db.as_ref(), line, &reply);
                println!("{}", reply.reply);
            }
        }
    }

    Ok(())
}

/// Append the exchange to the log; terminal exchanges carry no user
fn record(db: Option<&Database>, question: &str, reply: &ChatReply) {
    let Some(db) = db else { return };
    if !reply.should_record() {
        return;
    }

    let exchange = NewExchange {
        user_id: None,
        question: question.trim().to_string(),
        reply: reply.reply.clone(),
        category: reply.category,
        timestamp: Utc::now(),
    };

    if let Err(e) = db.record_exchange(&exchange) {
        warn!(error = %e, "Failed to record exchange");
    }
}
