pub mod agent;
pub mod cli;
pub mod error;
pub mod history;
pub mod llm;
pub mod models;
pub mod server;

use agent::ChatAgent;
use cli::Args;
use history::initialize_history_store;
use llm::LlmConfig;
use llm::chat::new_client as new_chat_client;
use log::info;
use server::Server;
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    if args.chat_api_key.trim().is_empty() {
        return Err("GROQ_API_KEY not set".into());
    }

    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr());
    info!("Static Directory: {}", args.static_dir);
    info!("Chat Base URL: {}", args.chat_base_url);
    info!("Chat Model: {}", args.chat_model);
    if let Some(temperature) = args.chat_temperature {
        info!("Chat Temperature: {}", temperature);
    }
    if let Some(max_tokens) = args.chat_max_tokens {
        info!("Chat Max Tokens: {}", max_tokens);
    }
    info!("History Store Type: {}", args.history_type);
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let chat_config = LlmConfig {
        api_key: Some(args.chat_api_key.clone()),
        completion_model: Some(args.chat_model.clone()),
        base_url: Some(args.chat_base_url.clone()),
        temperature: args.chat_temperature,
        max_tokens: args.chat_max_tokens,
    };
    let chat_client = new_chat_client(&chat_config)?;
    info!(
        "Chat client configured: Model={}, BaseURL={}",
        chat_client.get_model(),
        chat_client.get_base_url().as_deref().unwrap_or("adapter default")
    );
    let history_store = initialize_history_store(&args)?;
    let agent = ChatAgent::new(chat_client, history_store);

    let server = Server::new(agent, args);
    server.run().await?;

    Ok(())
}
