//! The memory catalog: an append-only list of titled notes.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::entities::{AnyStore, MemoryItem, MemoryStore};
use crate::services::ids::IdGenerator;

pub const DEFAULT_MEMORY_TITLE: &str = "New Memory";
pub const DEFAULT_MEMORY_KIND: &str = "conversation";

/// Caller-supplied fields for a new memory. Missing fields are defaulted.
#[derive(Debug, Clone, Default)]
pub struct NewMemory {
    pub title: Option<String>,
    pub content: Option<String>,
    pub kind: Option<String>,
}

#[derive(Debug)]
pub struct MemoryCatalog {
    store: Arc<AnyStore>,
    ids: Arc<IdGenerator>,
}

impl MemoryCatalog {
    pub fn new(store: Arc<AnyStore>, ids: Arc<IdGenerator>) -> Self {
        Self { store, ids }
    }

    pub async fn list(&self) -> Result<Vec<MemoryItem>, sqlx::Error> {
        self.store.list_memories().await
    }

    pub async fn create(&self, new: NewMemory) -> Result<MemoryItem, sqlx::Error> {
        let now = Utc::now();
        let item = MemoryItem {
            id: self.ids.memory_id(now),
            title: new.title.unwrap_or_else(|| DEFAULT_MEMORY_TITLE.to_owned()),
            content: new.content.unwrap_or_default(),
            kind: new.kind.unwrap_or_else(|| DEFAULT_MEMORY_KIND.to_owned()),
            timestamp: now,
        };
        self.store.append_memory(item.clone()).await?;
        info!(id = %item.id, kind = %item.kind, "memory created");
        Ok(item)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Variant;
    use crate::entities::InMemoryStore;

    fn catalog(variant: Variant) -> MemoryCatalog {
        MemoryCatalog::new(
            Arc::new(AnyStore::Memory(InMemoryStore::new())),
            Arc::new(IdGenerator::new(variant)),
        )
    }

    #[tokio::test]
    async fn create_with_no_fields_uses_defaults() {
        let memories = catalog(Variant::Full);
        let item = memories.create(NewMemory::default()).await.unwrap();
        assert_eq!(item.title, "New Memory");
        assert_eq!(item.content, "");
        assert_eq!(item.kind, "conversation");
        assert_eq!(memories.list().await.unwrap(), vec![item]);
    }

    #[tokio::test]
    async fn supplied_fields_are_kept_verbatim() {
        let memories = catalog(Variant::Simple);
        let item = memories
            .create(NewMemory {
                title: Some(String::new()),
                content: Some("Buy milk".into()),
                kind: Some("task".into()),
            })
            .await
            .unwrap();
        assert_eq!(item.title, "");
        assert_eq!(item.content, "Buy milk");
        assert_eq!(item.kind, "task");
        assert!(item.id.starts_with("mem-"));
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let memories = catalog(Variant::Full);
        for title in ["first", "second", "third"] {
            memories
                .create(NewMemory {
                    title: Some(title.into()),
                    ..NewMemory::default()
                })
                .await
                .unwrap();
        }
        let titles: Vec<_> = memories
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.title)
            .collect();
        assert_eq!(titles, ["first", "second", "third"]);
    }
}
