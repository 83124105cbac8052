//! Conversation handling: store the user's message, pick a reply, store it.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::entities::{AnyStore, ChatMessage, ChatStore, Sender};
use crate::services::ids::IdGenerator;
use crate::services::responder::Responder;

pub struct ChatService {
    store: Arc<AnyStore>,
    responder: Responder,
    ids: Arc<IdGenerator>,
    /// Trailing messages handed to the responder.
    context_window: usize,
    /// Held across the whole submit/clear so a user message and its reply
    /// are always adjacent in the history.
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("backend", &self.store.backend_name())
            .field("rules", &self.responder.rules().len())
            .field("context_window", &self.context_window)
            .finish()
    }
}

impl ChatService {
    pub fn new(
        store: Arc<AnyStore>,
        responder: Responder,
        ids: Arc<IdGenerator>,
        context_window: usize,
    ) -> Self {
        Self {
            store,
            responder,
            ids,
            context_window,
            write_lock: Mutex::new(()),
        }
    }

    /// Record `content` from the user and return the assistant's reply.
    /// Both messages are stored together, or neither is.
    pub async fn submit(&self, content: String) -> Result<ChatMessage, sqlx::Error> {
        let _guard = self.write_lock.lock().await;

        let (user_id, reply_id) = self.ids.message_pair(Utc::now());
        let user_message = ChatMessage {
            id: user_id,
            sender: Sender::User,
            content,
            timestamp: Utc::now(),
        };

        // The window counts the message being answered.
        let mut context = self
            .store
            .recent_messages(self.context_window.saturating_sub(1))
            .await?;
        if self.context_window > 0 {
            context.push(user_message.clone());
        }
        let selection = self.responder.select(&user_message.content, &context);
        debug!(rule = selection.rule, context_len = context.len(), "reply selected");

        let reply = ChatMessage {
            id: reply_id,
            sender: Sender::Assistant,
            content: selection.content,
            timestamp: Utc::now(),
        };
        self.store.append_exchange(user_message, reply.clone()).await?;
        Ok(reply)
    }

    pub async fn history(&self) -> Result<Vec<ChatMessage>, sqlx::Error> {
        self.store.list_messages().await
    }

    /// Empty the history. Clearing an empty history is a no-op.
    pub async fn clear(&self) -> Result<(), sqlx::Error> {
        let _guard = self.write_lock.lock().await;
        self.store.clear_messages().await?;
        info!("chat history cleared");
        Ok(())
    }
}
