//! Exchange log operations
//!
//! The exchange log is append-only: rows are inserted once per processed chat
//! message and never updated or deleted.

use rusqlite::params;

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{Category, Exchange, NewExchange};

fn row_to_exchange(row: &rusqlite::Row<'_>) -> rusqlite::Result<Exchange> {
    let category: Option<String> = row.get(4)?;
    let timestamp: String = row.get(5)?;

    Ok(Exchange {
        id: row.get(0)?,
        user_id: row.get(1)?,
        question: row.get(2)?,
        reply: row.get(3)?,
        category: category.and_then(|s| s.parse::<Category>().ok()),
        timestamp: parse_datetime(&timestamp),
    })
}

impl Database {
    /// Append one exchange to the log
    pub fn record_exchange(&self, exchange: &NewExchange) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO exchanges (user_id, question, reply, category, timestamp)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                exchange.user_id,
                exchange.question,
                exchange.reply,
                exchange.category.map(|c| c.as_str()),
                exchange.timestamp.to_rfc3339(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// A user's exchange history, oldest first (replay order)
    pub fn list_exchanges(&self, user_id: i64) -> Result<Vec<Exchange>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, question, reply, category, timestamp
            FROM exchanges
            WHERE user_id = ?
            ORDER BY timestamp ASC
            "#,
        )?;

        let exchanges = stmt
            .query_map(params![user_id], row_to_exchange)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(exchanges)
    }

    /// Total number of logged exchanges
    pub fn count_exchanges(&self) -> Result<i64> {
        let conn = self.conn()?;
        conn.query_row("SELECT COUNT(*) FROM exchanges", [], |row| row.get(0))
            .map_err(|e| e.into())
    }
}
