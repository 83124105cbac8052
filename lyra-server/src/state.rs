//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::config::Config;
use crate::entities::AnyStore;
use crate::services::{ChatService, IdGenerator, MemoryCatalog, Responder};

/// State shared across all HTTP handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Conversation history and reply generation.
    pub chat: Arc<ChatService>,
    /// Memory catalog.
    pub memory: Arc<MemoryCatalog>,
}

impl AppState {
    /// Wire the services for `config` on top of `store`.
    pub fn new(config: Config, store: AnyStore) -> Self {
        let store = Arc::new(store);
        let ids = Arc::new(IdGenerator::new(config.variant));
        let chat = ChatService::new(
            Arc::clone(&store),
            Responder::for_variant(config.variant),
            Arc::clone(&ids),
            config.context_window(),
        );
        let memory = MemoryCatalog::new(store, ids);
        Self {
            config: Arc::new(config),
            chat: Arc::new(chat),
            memory: Arc::new(memory),
        }
    }
}
