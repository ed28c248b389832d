use crate::history::HistoryStore;
use crate::llm::chat::{ ChatClient, ChatError };
use crate::models::chat::Role;

use log::{ info, error };
use std::sync::Arc;

/// Relays one user turn: record it, replay the whole conversation to the
/// completion client, record the reply.
///
/// The store lock is taken only inside `append`/`snapshot`; the completion
/// call runs without it, so concurrent requests for the same user may read
/// overlapping snapshots.
#[derive(Clone)]
pub struct ChatAgent {
    chat_client: Arc<dyn ChatClient>,
    history_store: Arc<dyn HistoryStore>,
}

impl ChatAgent {
    pub fn new(chat_client: Arc<dyn ChatClient>, history_store: Arc<dyn HistoryStore>) -> Self {
        Self {
            chat_client,
            history_store,
        }
    }

    pub fn history(&self) -> &Arc<dyn HistoryStore> {
        &self.history_store
    }

    /// Callers must have rejected empty `user_id`/`message` already.
    pub async fn process_message(&self, user_id: &str, message: &str) -> Result<String, ChatError> {
        self.history_store.append(user_id, Role::User, message).await;
        let conversation = self.history_store.snapshot(user_id).await;
        info!("Relaying {} messages for '{}'", conversation.len(), user_id);

        let reply = match self.chat_client.complete(&conversation.messages).await {
            Ok(resp) => resp.response,
            Err(e) => {
                error!("Completion failed for '{}': {}", user_id, e);
                return Err(e);
            }
        };

        self.history_store.append(user_id, Role::Assistant, &reply).await;
        info!(
            "Reply for '{}' ({} chars, {} conversations held)",
            user_id,
            reply.len(),
            self.history_store.user_count().await
        );
        Ok(reply)
    }
}
