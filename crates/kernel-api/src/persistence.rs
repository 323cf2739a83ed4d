use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use contracts::{GameSession, SessionListing};
use kernel_core::create_session;
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("session not found: {0}")]
    SessionNotFound(String),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Keyed session storage. Writes are last-write-wins; callers serialise
/// turns on the same id before calling `put`.
pub trait SessionStore: Send {
    fn get(&self, id: &str) -> Result<GameSession, PersistenceError>;

    fn put(&mut self, session: &GameSession) -> Result<(), PersistenceError>;

    /// Returns whether a session was removed.
    fn delete(&mut self, id: &str) -> Result<bool, PersistenceError>;

    /// Most recently updated first.
    fn list(&self, limit: usize) -> Result<Vec<SessionListing>, PersistenceError>;

    fn create(&mut self) -> Result<GameSession, PersistenceError> {
        let session = create_session();
        self.put(&session)?;
        Ok(session)
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: HashMap<String, StoredSession>,
}

#[derive(Debug, Clone)]
struct StoredSession {
    session: GameSession,
    updated_at: String,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, id: &str) -> Result<GameSession, PersistenceError> {
        self.sessions
            .get(id)
            .map(|stored| stored.session.clone())
            .ok_or_else(|| PersistenceError::SessionNotFound(id.to_string()))
    }

    fn put(&mut self, session: &GameSession) -> Result<(), PersistenceError> {
        self.sessions.insert(
            session.id.clone(),
            StoredSession {
                session: session.clone(),
                updated_at: now_stamp(),
            },
        );
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<bool, PersistenceError> {
        Ok(self.sessions.remove(id).is_some())
    }

    fn list(&self, limit: usize) -> Result<Vec<SessionListing>, PersistenceError> {
        let mut stored: Vec<&StoredSession> = self.sessions.values().collect();
        stored.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.session.id.cmp(&b.session.id))
        });
        Ok(stored
            .into_iter()
            .take(limit)
            .map(|entry| SessionListing::from_session(&entry.session, entry.updated_at.clone()))
            .collect())
    }
}

pub struct SqliteSessionStore {
    conn: Connection,
}

impl fmt::Debug for SqliteSessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteSessionStore")
            .field("path", &self.conn.path())
            .finish()
    }
}

impl SqliteSessionStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.configure()?;
        store.migrate()?;
        Ok(store)
    }

    fn configure(&mut self) -> Result<(), PersistenceError> {
        self.conn.pragma_update(None, "journal_mode", "WAL")?;
        self.conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(())
    }

    fn migrate(&mut self) -> Result<(), PersistenceError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                day INTEGER NOT NULL,
                semester INTEGER NOT NULL,
                total_days INTEGER NOT NULL,
                outcome TEXT NOT NULL,
                payload_json TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_updated_at ON sessions(updated_at);
            ",
        )?;

        self.conn.execute(
            "INSERT OR IGNORE INTO schema_migrations(version, name, applied_at)
             VALUES(1, 'initial_v1', ?1)",
            params![now_stamp()],
        )?;

        Ok(())
    }
}

impl SessionStore for SqliteSessionStore {
    fn get(&self, id: &str) -> Result<GameSession, PersistenceError> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload_json FROM sessions WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(raw) => Ok(serde_json::from_str::<GameSession>(&raw)?),
            None => Err(PersistenceError::SessionNotFound(id.to_string())),
        }
    }

    fn put(&mut self, session: &GameSession) -> Result<(), PersistenceError> {
        let payload_json = serde_json::to_string(session)?;
        let stamp = now_stamp();
        self.conn.execute(
            "INSERT INTO sessions (
                id,
                day,
                semester,
                total_days,
                outcome,
                payload_json,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            ON CONFLICT(id) DO UPDATE SET
                day = excluded.day,
                semester = excluded.semester,
                total_days = excluded.total_days,
                outcome = excluded.outcome,
                payload_json = excluded.payload_json,
                updated_at = excluded.updated_at",
            params![
                session.id.as_str(),
                i64::from(session.day),
                i64::from(session.semester),
                i64::from(session.total_days),
                session.outcome().to_string(),
                payload_json,
                stamp,
            ],
        )?;
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<bool, PersistenceError> {
        let removed = self
            .conn
            .execute("DELETE FROM sessions WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    fn list(&self, limit: usize) -> Result<Vec<SessionListing>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT payload_json, updated_at
             FROM sessions
             ORDER BY updated_at DESC, id ASC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(
            params![i64::try_from(limit).unwrap_or(i64::MAX)],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )?;

        let mut listings = Vec::new();
        for row in rows {
            let (payload, updated_at) = row?;
            let session = serde_json::from_str::<GameSession>(&payload)?;
            listings.push(SessionListing::from_session(&session, updated_at));
        }

        Ok(listings)
    }
}

fn now_stamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
