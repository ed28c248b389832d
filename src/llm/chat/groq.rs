use async_trait::async_trait;
use log::debug;
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use serde::{ Deserialize, Serialize };

use super::{ ChatClient, ChatError, CompletionResponse };
use crate::llm::{ LlmConfig, DEFAULT_BASE_URL, DEFAULT_CHAT_MODEL };
use crate::models::chat::ChatMessage;

/// Client for Groq's OpenAI-compatible chat completions API. Any endpoint
/// speaking the same protocol works through `base_url`.
pub struct GroqChatClient {
    http: HttpClient,
    model: String,
    base_url: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

#[derive(Serialize, Deserialize)]
struct GroqMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct GroqRequest<'a> {
    messages: Vec<GroqMessage>,
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct GroqResponse {
    choices: Vec<GroqChoice>,
}

#[derive(Deserialize)]
struct GroqChoice {
    message: GroqMessage,
}

impl GroqChatClient {
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>
    ) -> Result<Self, ChatError> {
        if api_key.trim().is_empty() {
            return Err(ChatError::Config("Groq API key is required".to_string()));
        }
        let chat_model = model.unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string());
        let api_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e|
                ChatError::Config(format!("Invalid API key format: {}", e))
            )?
        );

        let http = HttpClient::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            model: chat_model,
            base_url: api_url,
            temperature: None,
            max_tokens: None,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, ChatError> {
        let api_key = config.api_key
            .clone()
            .ok_or_else(|| ChatError::Config("Groq API key is required".to_string()))?;

        let mut client = Self::new(
            api_key,
            config.completion_model.clone(),
            config.base_url.clone()
        )?;
        client.temperature = config.temperature;
        client.max_tokens = config.max_tokens;
        Ok(client)
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

fn error_body<E: std::fmt::Display>(body: Result<String, E>) -> String {
    match body {
        Ok(text) => text,
        Err(e) => format!("<unreadable body: {}>", e),
    }
}

#[async_trait]
impl ChatClient for GroqChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<CompletionResponse, ChatError> {
        let url = self.completions_url();

        let req = GroqRequest {
            messages: messages
                .iter()
                .map(|m| GroqMessage {
                    role: m.role.as_str().to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            model: &self.model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!("Sending {} messages to {} (model {})", messages.len(), url, self.model);

        let resp = self.http.post(&url).json(&req).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = error_body(resp.text().await);
            return Err(ChatError::Api { status: status.as_u16(), body });
        }

        let parsed = resp.json::<GroqResponse>().await?;
        let content = parsed.choices
            .into_iter()
            .next()
            .ok_or(ChatError::EmptyChoices)?
            .message.content;

        Ok(CompletionResponse { response: content })
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }
}
