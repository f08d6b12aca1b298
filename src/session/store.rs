//! Credential Store
//! Mission: Durably persist the session token and role label with SQLite

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::warn;

/// Key under which the bearer token is stored (cookie name and store key).
pub const TOKEN_KEY: &str = "auth_token";
/// Key under which the role label is stored (cookie name and store key).
pub const ROLE_KEY: &str = "user_role";

/// Durable credential mirror with SQLite backend.
///
/// The cookies carried on each request are the primary source; this store is
/// the fallback, written on login and on role revalidation. Absence is a
/// valid, expected state and read failures are reported as absence.
pub struct CredentialStore {
    db_path: String,
}

impl CredentialStore {
    /// Create a new store and initialize the schema.
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
            "CREATE TABLE IF NOT EXISTS credentials (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to initialize credentials table")?;

        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = Connection::open(&self.db_path)?;

        let result = conn.query_row(
            "SELECT value FROM credentials WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) if value.is_empty() => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "INSERT INTO credentials (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
            params![key, value, Utc::now().to_rfc3339()],
        )
        .context("Failed to write credential")?;

        Ok(())
    }

    /// Current token, if any. Store failures read as absent.
    pub fn token(&self) -> Option<String> {
        self.get(TOKEN_KEY).unwrap_or_else(|e| {
            warn!("Credential store read failed for token: {e}");
            None
        })
    }

    /// Current role label, if any. Store failures read as absent.
    pub fn role(&self) -> Option<String> {
        self.get(ROLE_KEY).unwrap_or_else(|e| {
            warn!("Credential store read failed for role: {e}");
            None
        })
    }

    /// Persist a token. Cookie writes belong to the external login flow.
    pub fn set_token(&self, token: &str) -> Result<()> {
        self.put(TOKEN_KEY, token)
    }

    /// Persist a role label.
    pub fn set_role(&self, role: &str) -> Result<()> {
        self.put(ROLE_KEY, role)
    }

    /// Remove both credentials. Idempotent.
    pub fn clear(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "DELETE FROM credentials WHERE key IN (?1, ?2)",
            params![TOKEN_KEY, ROLE_KEY],
        )
        .context("Failed to clear credentials")?;

        Ok(())
    }
}
