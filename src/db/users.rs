use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::error::{LedgerError, Result};
use crate::models::{normalize_email, User};

#[cfg(not(test))]
const PASSWORD_COST: u32 = bcrypt::DEFAULT_COST;
#[cfg(test)]
const PASSWORD_COST: u32 = 4;

// SQLITE_CONSTRAINT_UNIQUE
const UNIQUE_CONSTRAINT_FAILED: std::ffi::c_int = 2067;

impl Database {
    // ── Users ─────────────────────────────────────────────────

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// - [LedgerError::Validation] if the name, email or password is empty,
    /// - [LedgerError::DuplicateIdentity] if the email is already registered,
    /// - [LedgerError::Hashing] if the password could not be hashed.
    pub(crate) fn create_user(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let name = name.trim();
        let email = normalize_email(email);
        if name.is_empty() || email.is_empty() {
            return Err(LedgerError::validation("name and email are required"));
        }
        if password.is_empty() {
            return Err(LedgerError::validation("password must not be empty"));
        }

        let password_hash = bcrypt::hash(password, PASSWORD_COST)
            .map_err(|e| LedgerError::Hashing(e.to_string()))?;

        let inserted = self.conn.execute(
            "INSERT INTO users (name, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![name, email, password_hash, chrono::Utc::now().to_rfc3339()],
        );
        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == UNIQUE_CONSTRAINT_FAILED =>
            {
                tracing::debug!("registration refused, {email} already exists");
                return Err(LedgerError::DuplicateIdentity(email));
            }
            Err(e) => return Err(e.into()),
        }

        let id = self.conn.last_insert_rowid();
        tracing::info!(id, "registered user");
        Ok(User {
            id,
            name: name.to_string(),
            email,
        })
    }

    /// Resolve an email/password pair to a user. Unknown emails and wrong
    /// passwords both give [LedgerError::InvalidCredentials].
    pub(crate) fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let email = normalize_email(email);
        let found = self
            .conn
            .query_row(
                "SELECT id, name, email, password_hash FROM users WHERE email = ?1",
                params![email],
                |row| {
                    Ok((
                        User {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            email: row.get(2)?,
                        },
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((user, password_hash)) = found else {
            return Err(LedgerError::InvalidCredentials);
        };
        let verified = bcrypt::verify(password, &password_hash)
            .map_err(|e| LedgerError::Hashing(e.to_string()))?;
        if verified {
            Ok(user)
        } else {
            Err(LedgerError::InvalidCredentials)
        }
    }
}
