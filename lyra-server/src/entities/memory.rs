use std::future::Future;

use crate::entities::{lock, parse_timestamp, AnyStore, InMemoryStore, MemoryItem, SqliteStore};

/// Append-only memory collection. No update or delete is exposed.
pub trait MemoryStore: Send + Sync + 'static {
    fn append_memory(
        &self,
        item: MemoryItem,
    ) -> impl Future<Output = Result<(), sqlx::Error>> + Send;

    /// All memories in insertion order.
    fn list_memories(&self) -> impl Future<Output = Result<Vec<MemoryItem>, sqlx::Error>> + Send;
}

impl MemoryStore for InMemoryStore {
    async fn append_memory(&self, item: MemoryItem) -> Result<(), sqlx::Error> {
        lock(&self.memories).push(item);
        Ok(())
    }

    async fn list_memories(&self) -> Result<Vec<MemoryItem>, sqlx::Error> {
        Ok(lock(&self.memories).clone())
    }
}

impl MemoryStore for SqliteStore {
    async fn append_memory(&self, item: MemoryItem) -> Result<(), sqlx::Error> {
        let timestamp = item.timestamp.to_rfc3339();
        sqlx::query(
            "INSERT INTO memories (id, title, content, kind, timestamp) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&item.id)
        .bind(&item.title)
        .bind(&item.content)
        .bind(&item.kind)
        .bind(&timestamp)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_memories(&self) -> Result<Vec<MemoryItem>, sqlx::Error> {
        let rows: Vec<(String, String, String, String, String)> = sqlx::query_as(
            "SELECT id, title, content, kind, timestamp \
             FROM memories ORDER BY seq ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(id, title, content, kind, timestamp)| MemoryItem {
                id,
                title,
                content,
                kind,
                timestamp: parse_timestamp(&timestamp),
            })
            .collect())
    }
}

impl MemoryStore for AnyStore {
    async fn append_memory(&self, item: MemoryItem) -> Result<(), sqlx::Error> {
        match self {
            AnyStore::Memory(s) => s.append_memory(item).await,
            AnyStore::Sqlite(s) => s.append_memory(item).await,
        }
    }

    async fn list_memories(&self) -> Result<Vec<MemoryItem>, sqlx::Error> {
        match self {
            AnyStore::Memory(s) => s.list_memories().await,
            AnyStore::Sqlite(s) => s.list_memories().await,
        }
    }
}
