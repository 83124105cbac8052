use std::future::Future;
use std::str::FromStr;

use sqlx::SqliteConnection;

use crate::entities::{
    lock, parse_timestamp, AnyStore, ChatMessage, InMemoryStore, Sender, SqliteStore,
};

pub trait ChatStore: Send + Sync + 'static {
    /// Append a user message and its reply as one unit. On error neither
    /// message is stored.
    fn append_exchange(
        &self,
        user: ChatMessage,
        reply: ChatMessage,
    ) -> impl Future<Output = Result<(), sqlx::Error>> + Send;

    /// The last `limit` messages, oldest first.
    fn recent_messages(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ChatMessage>, sqlx::Error>> + Send;

    /// The full history, oldest first.
    fn list_messages(&self) -> impl Future<Output = Result<Vec<ChatMessage>, sqlx::Error>> + Send;

    fn clear_messages(&self) -> impl Future<Output = Result<(), sqlx::Error>> + Send;
}

// ── InMemoryStore ─────────────────────────────────────────────────────────────

impl ChatStore for InMemoryStore {
    async fn append_exchange(&self, user: ChatMessage, reply: ChatMessage) -> Result<(), sqlx::Error> {
        let mut messages = lock(&self.messages);
        messages.push(user);
        messages.push(reply);
        Ok(())
    }

    async fn recent_messages(&self, limit: usize) -> Result<Vec<ChatMessage>, sqlx::Error> {
        let messages = lock(&self.messages);
        let start = messages.len().saturating_sub(limit);
        Ok(messages[start..].to_vec())
    }

    async fn list_messages(&self) -> Result<Vec<ChatMessage>, sqlx::Error> {
        Ok(lock(&self.messages).clone())
    }

    async fn clear_messages(&self) -> Result<(), sqlx::Error> {
        lock(&self.messages).clear();
        Ok(())
    }
}

// ── SqliteStore ───────────────────────────────────────────────────────────────

type MessageRow = (String, String, String, String);

fn message_from_row((id, sender, content, timestamp): MessageRow) -> Result<ChatMessage, sqlx::Error> {
    let sender = Sender::from_str(&sender).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    Ok(ChatMessage {
        id,
        sender,
        content,
        timestamp: parse_timestamp(&timestamp),
    })
}

async fn insert_message(conn: &mut SqliteConnection, msg: &ChatMessage) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO chat_messages (id, sender, content, timestamp) \
         VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(&msg.id)
    .bind(msg.sender.to_string())
    .bind(&msg.content)
    .bind(msg.timestamp.to_rfc3339())
    .execute(conn)
    .await?;
    Ok(())
}

impl ChatStore for SqliteStore {
    async fn append_exchange(&self, user: ChatMessage, reply: ChatMessage) -> Result<(), sqlx::Error> {
        // Dropping `tx` without commit rolls back the user row.
        let mut tx = self.pool.begin().await?;
        insert_message(&mut tx, &user).await?;
        insert_message(&mut tx, &reply).await?;
        tx.commit().await
    }

    async fn recent_messages(&self, limit: usize) -> Result<Vec<ChatMessage>, sqlx::Error> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<MessageRow> = sqlx::query_as(
            "SELECT id, sender, content, timestamp \
             FROM chat_messages ORDER BY seq DESC LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        let mut messages = rows
            .into_iter()
            .map(message_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        messages.reverse();
        Ok(messages)
    }

    async fn list_messages(&self) -> Result<Vec<ChatMessage>, sqlx::Error> {
        let rows: Vec<MessageRow> = sqlx::query_as(
            "SELECT id, sender, content, timestamp \
             FROM chat_messages ORDER BY seq ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(message_from_row).collect()
    }

    async fn clear_messages(&self) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM chat_messages")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

// ── AnyStore ──────────────────────────────────────────────────────────────────

impl ChatStore for AnyStore {
    async fn append_exchange(&self, user: ChatMessage, reply: ChatMessage) -> Result<(), sqlx::Error> {
        match self {
            AnyStore::Memory(s) => s.append_exchange(user, reply).await,
            AnyStore::Sqlite(s) => s.append_exchange(user, reply).await,
        }
    }

    async fn recent_messages(&self, limit: usize) -> Result<Vec<ChatMessage>, sqlx::Error> {
        match self {
            AnyStore::Memory(s) => s.recent_messages(limit).await,
            AnyStore::Sqlite(s) => s.recent_messages(limit).await,
        }
    }

    async fn list_messages(&self) -> Result<Vec<ChatMessage>, sqlx::Error> {
        match self {
            AnyStore::Memory(s) => s.list_messages().await,
            AnyStore::Sqlite(s) => s.list_messages().await,
        }
    }

    async fn clear_messages(&self) -> Result<(), sqlx::Error> {
        match self {
            AnyStore::Memory(s) => s.clear_messages().await,
            AnyStore::Sqlite(s) => s.clear_messages().await,
        }
    }
}
