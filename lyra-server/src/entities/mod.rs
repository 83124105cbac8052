//! Storage layer.
//!
//! [`ChatStore`] and [`MemoryStore`] define how conversation history and
//! memory items are persisted. [`AnyStore`] picks the backend at startup:
//! process-local vectors by default, or SQLite when a database URL is
//! configured. Handlers only ever see [`AnyStore`].
//!
//! All trait methods use `impl Future` in their signatures so no extra
//! `async-trait` crate is required.

pub mod chat;
pub mod dao;
pub mod memory;

pub use dao::{ChatMessage, MemoryItem, Sender};

pub use chat::ChatStore;
pub use memory::MemoryStore;

use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    messages: Mutex<Vec<ChatMessage>>,
    memories: Mutex<Vec<MemoryItem>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Lock a collection, recovering the data if a previous holder panicked.
/// Appends and clears never leave a vector half-written, so the inner value
/// is always consistent.
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// SQLite-backed store.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the SQLite database at `url` and run pending migrations.
    ///
    /// `url` should be a sqlx-compatible SQLite URL, e.g. `"sqlite://lyra.db"`
    /// or `"sqlite::memory:"` for tests. An in-memory database lives only as
    /// long as its connection, so the pool is pinned to a single connection
    /// that never expires.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool_options = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options.connect_with(options).await?;
        // Path is resolved relative to CARGO_MANIFEST_DIR at compile time.
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// The store handed to the services.
#[derive(Debug)]
pub enum AnyStore {
    Memory(InMemoryStore),
    Sqlite(SqliteStore),
}

impl AnyStore {
    /// In-memory when `database_url` is `None`, SQLite otherwise.
    pub async fn open(database_url: Option<&str>) -> Result<Self, sqlx::Error> {
        match database_url {
            None => Ok(AnyStore::Memory(InMemoryStore::new())),
            Some(url) => Ok(AnyStore::Sqlite(SqliteStore::connect(url).await?)),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            AnyStore::Memory(_) => "memory",
            AnyStore::Sqlite(_) => "sqlite",
        }
    }
}

/// Parse an RFC 3339 column, substituting "now" for unreadable values.
pub(crate) fn parse_timestamp(raw: &str) -> chrono::DateTime<chrono::Utc> {
    raw.parse().unwrap_or_else(|e: chrono::ParseError| {
        tracing::warn!(raw = %raw, error = %e, "failed to parse stored timestamp; using now");
        chrono::Utc::now()
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn open_without_url_is_in_memory() {
        let store = AnyStore::open(None).await.unwrap();
        assert_eq!(store.backend_name(), "memory");
    }

    #[tokio::test]
    async fn open_with_url_runs_migrations() {
        let store = AnyStore::open(Some("sqlite::memory:")).await.unwrap();
        assert_eq!(store.backend_name(), "sqlite");
        assert!(store.list_messages().await.unwrap().is_empty());
        assert!(store.list_memories().await.unwrap().is_empty());
    }

    #[test]
    fn unreadable_timestamp_falls_back_to_now() {
        let before = chrono::Utc::now();
        assert!(parse_timestamp("not a date") >= before);
        let parsed = parse_timestamp("2026-01-02T03:04:05+00:00");
        assert_eq!(parsed.to_rfc3339(), "2026-01-02T03:04:05+00:00");
    }
}
