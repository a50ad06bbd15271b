//! User account and login record operations

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{LoginRecord, NewUser, User};

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let signup_date: String = row.get(4)?;
    let last_login: Option<String> = row.get(5)?;

    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        signup_date: parse_datetime(&signup_date),
        last_login: last_login.map(|s| parse_datetime(&s)),
    })
}

impl Database {
    /// Register a new user, hashing the password with Argon2id.
    ///
    /// The email is stored lowercase; a duplicate email is a `Duplicate`
    /// error, not a constraint panic.
    pub fn create_user(&self, new: &NewUser) -> Result<i64> {
        let email = new.email.trim().to_lowercase();
        if email.is_empty() || new.name.trim().is_empty() || new.password.is_empty() {
            return Err(Error::InvalidData(
                "name, email and password are required".to_string(),
            ));
        }

        if self.get_user_by_email(&email)?.is_some() {
            return Err(Error::Duplicate(format!("email {}", email)));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(new.password.as_bytes(), &salt)
            .map_err(|e| Error::PasswordHash(e.to_string()))?
            .to_string();

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO users (name, email, phone, password_hash, signup_date)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                new.name.trim(),
                email,
                new.phone,
                password_hash,
                Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get a user by ID
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, name, email, phone, signup_date, last_login FROM users WHERE id = ?",
            params![id],
            row_to_user,
        )
        .optional()
        .map_err(|e| e.into())
    }

    /// Get a user by email (case-insensitive)
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, name, email, phone, signup_date, last_login FROM users WHERE email = ?",
            params![email.trim().to_lowercase()],
            row_to_user,
        )
        .optional()
        .map_err(|e| e.into())
    }

    /// Verify a login attempt.
    ///
    /// Returns the user when email and password both check out; None for an
    /// unknown email or a wrong password. The two cases are deliberately not
    /// distinguishable by the caller.
    pub fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let row: Option<(i64, String)> = conn
            .query_row(
                "SELECT id, password_hash FROM users WHERE email = ?",
                params![email.trim().to_lowercase()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((user_id, stored_hash)) = row else {
            return Ok(None);
        };

        let parsed =
            PasswordHash::new(&stored_hash).map_err(|e| Error::PasswordHash(e.to_string()))?;

        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_err()
        {
            return Ok(None);
        }

        self.get_user(user_id)
    }

    /// Stamp the user's last successful login time
    pub fn touch_last_login(&self, user_id: i64, when: DateTime<Utc>) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "UPDATE users SET last_login = ? WHERE id = ?",
            params![when.to_rfc3339(), user_id],
        )?;
        Ok(())
    }

    /// Open a login record; returns its id for closing at logout
    pub fn record_login(
        &self,
        user_id: i64,
        ip: Option<&str>,
        when: DateTime<Utc>,
    ) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO logins (user_id, login_time, ip) VALUES (?, ?, ?)",
            params![user_id, when.to_rfc3339(), ip],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Close a login record at logout. A login that was already closed stays
    /// at its first logout time.
    pub fn close_login(&self, login_id: i64, when: DateTime<Utc>) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "UPDATE logins SET logout_time = ? WHERE id = ? AND logout_time IS NULL",
            params![when.to_rfc3339(), login_id],
        )?;
        Ok(())
    }

    /// Recent login records for a user, newest first
    pub fn list_logins(&self, user_id: i64, limit: i64) -> Result<Vec<LoginRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, login_time, logout_time, ip
            FROM logins
            WHERE user_id = ?
            ORDER BY login_time DESC
            LIMIT ?
            "#,
        )?;

        let records = stmt
            .query_map(params![user_id, limit], |row| {
                let login_time: String = row.get(2)?;
                let logout_time: Option<String> = row.get(3)?;
                Ok(LoginRecord {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    login_time: parse_datetime(&login_time),
                    logout_time: logout_time.map(|s| parse_datetime(&s)),
                    ip: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Total number of registered users
    pub fn count_users(&self) -> Result<i64> {
        let conn = self.conn()?;
        conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .map_err(|e| e.into())
    }
}
