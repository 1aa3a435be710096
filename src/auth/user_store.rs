//! User Storage
//! Mission: persist user accounts with SQLite, emails unique case-insensitively

use crate::auth::models::User;
use anyhow::{Context, Result};
use bcrypt::{hash, verify};
use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::info;
use uuid::Uuid;

/// bcrypt work factor for password hashing
const BCRYPT_COST: u32 = 10;

/// User storage with SQLite backend
pub struct UserStore {
    db_path: String,
}

impl UserStore {
    /// Create a new user store and initialize the schema
    pub fn new(db_path: &str) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                full_name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE COLLATE NOCASE,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Create a new user, hashing the password
    pub fn create_user(&self, full_name: &str, email: &str, password: &str) -> Result<User> {
        let password_hash = hash(password, BCRYPT_COST).context("Failed to hash password")?;

        let now = Utc::now().to_rfc3339();
        let user = User {
            id: Uuid::new_v4(),
            full_name: full_name.to_string(),
            email: email.to_string(),
            password_hash,
            created_at: now.clone(),
            updated_at: now,
        };

        let conn = Connection::open(&self.db_path)?;
        conn.execute(
            "INSERT INTO users (id, full_name, email, password_hash, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.id.to_string(),
                user.full_name,
                user.email,
                user.password_hash,
                user.created_at,
                user.updated_at,
            ],
        )
        .context("Failed to insert user")?;

        info!("Created user: {} ({})", user.email, user.id);

        Ok(user)
    }

    /// Get user by email (case-insensitive)
    pub fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, full_name, email, password_hash, created_at, updated_at
             FROM users WHERE email = ?1 COLLATE NOCASE",
        )?;

        let user_result = stmt.query_row(params![email], row_to_user);

        match user_result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get user by id
    pub fn find_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, full_name, email, password_hash, created_at, updated_at
             FROM users WHERE id = ?1",
        )?;

        let user_result = stmt.query_row(params![id.to_string()], row_to_user);

        match user_result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Verify email and password
    pub fn verify_password(&self, email: &str, password: &str) -> Result<bool> {
        match self.find_by_email(email)? {
            Some(user) => {
                let valid =
                    verify(password, &user.password_hash).context("Failed to verify password")?;
                Ok(valid)
            }
            None => Ok(false),
        }
    }

    /// Check whether an email is already used by a different user
    pub fn email_taken_by_other(&self, email: &str, user_id: &Uuid) -> Result<bool> {
        let conn = Connection::open(&self.db_path)?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE email = ?1 COLLATE NOCASE AND id != ?2",
            params![email, user_id.to_string()],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    /// Persist profile changes (name, email, password hash)
    pub fn update_user(&self, user: &User) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        let rows_affected = conn.execute(
            "UPDATE users SET full_name = ?1, email = ?2, password_hash = ?3, updated_at = ?4
             WHERE id = ?5",
            params![
                user.full_name,
                user.email,
                user.password_hash,
                user.updated_at,
                user.id.to_string(),
            ],
        )?;

        if rows_affected == 0 {
            anyhow::bail!("User not found");
        }

        Ok(())
    }

    /// Hash a password with the store's work factor
    pub fn hash_password(password: &str) -> Result<String> {
        hash(password, BCRYPT_COST).context("Failed to hash password")
    }
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let id_str: String = row.get(0)?;
    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(User {
        id,
        full_name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}
