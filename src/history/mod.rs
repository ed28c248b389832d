mod memory;

pub use memory::MemoryHistoryStore;

use async_trait::async_trait;
use log::info;
use std::error::Error;
use std::sync::Arc;
use crate::cli::Args;
use crate::models::chat::{ Conversation, Role };

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Appends a message to the end of `user_id`'s conversation, creating it if absent.
    async fn append(&self, user_id: &str, role: Role, content: &str);

    /// Owned copy of `user_id`'s conversation; empty for an unknown user.
    async fn snapshot(&self, user_id: &str) -> Conversation;

    async fn user_count(&self) -> usize;
}

pub fn create_history_store(
    args: &Args
) -> Result<Arc<dyn HistoryStore>, Box<dyn Error + Send + Sync>> {
    match args.history_type.to_lowercase().as_str() {
        "memory" => Ok(Arc::new(MemoryHistoryStore::new())),
        _ =>
            Err(
                Box::new(
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("Unsupported history store type: {}", args.history_type)
                    )
                )
            ),
    }
}

pub fn initialize_history_store(
    args: &Args
) -> Result<Arc<dyn HistoryStore>, Box<dyn Error + Send + Sync>> {
    info!("Chat history will be stored in: {}", args.history_type);
    create_history_store(args)
}
