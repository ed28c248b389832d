use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use tokio::sync::Mutex;
use crate::history::HistoryStore;
use crate::models::chat::{ ChatMessage, Conversation, Role };

/// Process-local conversation store. Entries are created on first append and
/// live until the process exits; nothing is evicted.
#[derive(Default)]
pub struct MemoryHistoryStore {
    conversations: Mutex<HashMap<String, Vec<ChatMessage>>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append(&self, user_id: &str, role: Role, content: &str) {
        let message = ChatMessage::new(role, content);
        let mut conversations = self.conversations.lock().await;
        let messages = conversations.entry(user_id.to_string()).or_default();
        messages.push(message);
        debug!("Appended {} message for '{}' ({} total)", role, user_id, messages.len());
    }

    async fn snapshot(&self, user_id: &str) -> Conversation {
        let messages = self.conversations
            .lock().await
            .get(user_id)
            .cloned()
            .unwrap_or_default();

        Conversation {
            user_id: user_id.to_string(),
            messages,
        }
    }

    async fn user_count(&self) -> usize {
        self.conversations.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn contents(conversation: &Conversation) -> Vec<(Role, &str)> {
        conversation.messages
            .iter()
            .map(|m| (m.role, m.content.as_str()))
            .collect()
    }

    #[tokio::test]
    async fn snapshot_returns_messages_in_append_order() {
        let store = MemoryHistoryStore::new();
        store.append("u1", Role::User, "one").await;
        store.append("u1", Role::Assistant, "two").await;
        store.append("u1", Role::User, "three").await;

        let conversation = store.snapshot("u1").await;
        assert_eq!(conversation.user_id, "u1");
        assert_eq!(
            contents(&conversation),
            vec![(Role::User, "one"), (Role::Assistant, "two"), (Role::User, "three")]
        );
    }

    #[tokio::test]
    async fn users_do_not_see_each_other() {
        let store = MemoryHistoryStore::new();
        store.append("alice", Role::User, "from alice").await;
        store.append("bob", Role::User, "from bob").await;
        store.append("alice", Role::Assistant, "to alice").await;

        let alice = store.snapshot("alice").await;
        let bob = store.snapshot("bob").await;
        assert_eq!(contents(&alice), vec![(Role::User, "from alice"), (Role::Assistant, "to alice")]);
        assert_eq!(contents(&bob), vec![(Role::User, "from bob")]);
        assert_eq!(store.user_count().await, 2);
    }

    #[tokio::test]
    async fn unknown_user_has_empty_snapshot_and_is_not_created() {
        let store = MemoryHistoryStore::new();
        let conversation = store.snapshot("nobody").await;
        assert!(conversation.is_empty());
        assert_eq!(store.user_count().await, 0);
    }

    #[tokio::test]
    async fn snapshot_is_detached_from_later_appends() {
        let store = MemoryHistoryStore::new();
        store.append("u1", Role::User, "hi").await;
        let before = store.snapshot("u1").await;
        store.append("u1", Role::Assistant, "hello").await;

        assert_eq!(before.len(), 1);
        assert_eq!(store.snapshot("u1").await.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_keep_per_user_order() {
        let store = Arc::new(MemoryHistoryStore::new());
        let mut handles = Vec::new();
        for user in 0..8 {
            let store = Arc::clone(&store);
            handles.push(
                tokio::spawn(async move {
                    let user_id = format!("user-{}", user);
                    for i in 0..50 {
                        store.append(&user_id, Role::User, &i.to_string()).await;
                    }
                })
            );
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.user_count().await, 8);
        for user in 0..8 {
            let conversation = store.snapshot(&format!("user-{}", user)).await;
            let seen: Vec<String> = conversation.messages
                .iter()
                .map(|m| m.content.clone())
                .collect();
            let expected: Vec<String> = (0..50).map(|i| i.to_string()).collect();
            assert_eq!(seen, expected);
        }
    }
}
