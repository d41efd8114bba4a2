// ABOUTME: Generation service for template and plan calls to an OpenAI-compatible API
// ABOUTME: Handles API requests, response parsing, and usage reporting

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use webforge_config::constants::{
    WEBFORGE_API_BASE_URL, WEBFORGE_API_KEY, WEBFORGE_HTTP_CONNECT_TIMEOUT_SECS,
    WEBFORGE_HTTP_REQUEST_TIMEOUT_SECS, WEBFORGE_MODEL, WEBFORGE_TEMPLATE_MODEL,
};
use webforge_config::{env_parsed, env_string};

use crate::prompts;
use crate::templates::TemplateKind;

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
const DEFAULT_TEMPLATE_MODEL: &str = "llama3-8b-8192";

/// The template decision is a single word; the plan is a whole project.
const TEMPLATE_MAX_TOKENS: u32 = 200;
const PLAN_MAX_TOKENS: u32 = 8000;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 600;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid response format")]
    InvalidResponse,

    #[error("No API key configured")]
    NoApiKey,

    #[error("Model did not pick a known template: {0}")]
    TemplateRejected(String),
}

pub type GenerationResult<T> = Result<T, GenerationError>;

/// One chat message in API wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// Token usage reported by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl Usage {
    pub fn total_tokens(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Raw plan generation result: artifact markup plus usage accounting.
#[derive(Debug)]
pub struct PlanResponse {
    pub markup: String,
    pub usage: Option<Usage>,
}

/// Generation service for template selection and plan generation.
pub struct GenerationService {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    template_model: String,
}

impl GenerationService {
    /// Create HTTP client with timeout configuration
    fn create_client() -> Client {
        let request_timeout = env_parsed(
            WEBFORGE_HTTP_REQUEST_TIMEOUT_SECS,
            DEFAULT_REQUEST_TIMEOUT_SECS,
            1..=3600,
        );
        let connect_timeout = env_parsed(
            WEBFORGE_HTTP_CONNECT_TIMEOUT_SECS,
            DEFAULT_CONNECT_TIMEOUT_SECS,
            1..=60,
        );
        Client::builder()
            .timeout(Duration::from_secs(request_timeout))
            .connect_timeout(Duration::from_secs(connect_timeout))
            .build()
            .expect("Failed to build HTTP client")
    }

    /// Create a service from the environment.
    ///
    /// Requires `WEBFORGE_API_KEY`; base URL and models can be
    /// overridden with `WEBFORGE_API_BASE_URL`, `WEBFORGE_MODEL` and
    /// `WEBFORGE_TEMPLATE_MODEL`.
    pub fn from_env() -> GenerationResult<Self> {
        let api_key = env_string(WEBFORGE_API_KEY).ok_or(GenerationError::NoApiKey)?;
        let base_url =
            env_string(WEBFORGE_API_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model = env_string(WEBFORGE_MODEL).unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let template_model = env_string(WEBFORGE_TEMPLATE_MODEL)
            .unwrap_or_else(|| DEFAULT_TEMPLATE_MODEL.to_string());

        if model != DEFAULT_MODEL {
            info!("Using custom generation model: {}", model);
        }

        Ok(Self {
            client: Self::create_client(),
            api_key,
            base_url,
            model,
            template_model,
        })
    }

    /// Create a service against an explicit endpoint (used by tests).
    pub fn with_config(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Self::create_client(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: DEFAULT_MODEL.to_string(),
            template_model: DEFAULT_TEMPLATE_MODEL.to_string(),
        }
    }

    /// Ask the model whether the prompt describes a react or a node
    /// project. Anything but those two single words is rejected.
    pub async fn pick_template(&self, prompt: &str) -> GenerationResult<TemplateKind> {
        let answer = self
            .chat(
                &self.template_model,
                TEMPLATE_MAX_TOKENS,
                vec![
                    ChatMessage::system(prompts::TEMPLATE_SYSTEM_PROMPT),
                    ChatMessage::user(prompt),
                ],
            )
            .await?
            .0;

        let normalized = answer.trim().to_lowercase();
        debug!("Template decision: {}", normalized);
        match normalized.as_str() {
            "react" => Ok(TemplateKind::React),
            "node" => Ok(TemplateKind::Node),
            _ => Err(GenerationError::TemplateRejected(answer)),
        }
    }

    /// Run the plan generation call: the builder system prompt plus the
    /// caller's message history, returning raw artifact markup.
    pub async fn generate_plan(&self, messages: &[ChatMessage]) -> GenerationResult<PlanResponse> {
        let mut all = Vec::with_capacity(messages.len() + 1);
        all.push(ChatMessage::system(prompts::system_prompt()));
        all.extend_from_slice(messages);

        let (markup, usage) = self.chat(&self.model, PLAN_MAX_TOKENS, all).await?;
        if let Some(usage) = &usage {
            info!(
                "Plan generated: {} prompt + {} completion tokens",
                usage.prompt_tokens, usage.completion_tokens
            );
        }
        Ok(PlanResponse { markup, usage })
    }

    async fn chat(
        &self,
        model: &str,
        max_tokens: u32,
        messages: Vec<ChatMessage>,
    ) -> GenerationResult<(String, Option<Usage>)> {
        let request = ChatRequest {
            model: model.to_string(),
            max_tokens,
            messages,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::ApiError(format!("{}: {}", status, body)));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|_| GenerationError::InvalidResponse)?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(GenerationError::InvalidResponse)?;

        Ok((choice.message.content, parsed.usage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn completion_body(content: &str) -> serde_json::Value {
        json!({
            "choices": [{"message": {"role": "assistant", "content": content}}],
            "usage": {"prompt_tokens": 25, "completion_tokens": 7}
        })
    }

    #[tokio::test]
    async fn pick_template_parses_the_single_word_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("React\n")))
            .mount(&server)
            .await;

        let service = GenerationService::with_config("test-key", server.uri());
        let kind = service.pick_template("build me a todo app").await.unwrap();
        assert_eq!(kind, TemplateKind::React);
    }

    #[tokio::test]
    async fn pick_template_rejects_unknown_answers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion_body("svelte, probably")),
            )
            .mount(&server)
            .await;

        let service = GenerationService::with_config("test-key", server.uri());
        let result = service.pick_template("build me a todo app").await;
        assert!(matches!(result, Err(GenerationError::TemplateRejected(_))));
    }

    #[tokio::test]
    async fn generate_plan_returns_markup_and_usage() {
        let markup = r#"<forgeAction type="file" filePath="a.txt">hi</forgeAction>"#;
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({"max_tokens": 8000})))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(markup)))
            .mount(&server)
            .await;

        let service = GenerationService::with_config("test-key", server.uri());
        let plan = service
            .generate_plan(&[ChatMessage::user("a text file please")])
            .await
            .unwrap();

        assert_eq!(plan.markup, markup);
        assert_eq!(plan.usage.unwrap().total_tokens(), 32);
    }

    #[tokio::test]
    async fn api_errors_carry_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let service = GenerationService::with_config("test-key", server.uri());
        let result = service.generate_plan(&[ChatMessage::user("hi")]).await;

        match result {
            Err(GenerationError::ApiError(message)) => {
                assert!(message.contains("429"));
                assert!(message.contains("rate limited"));
            }
            other => panic!("expected ApiError, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn empty_choices_are_an_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let service = GenerationService::with_config("test-key", server.uri());
        let result = service.pick_template("anything").await;
        assert!(matches!(result, Err(GenerationError::InvalidResponse)));
    }
}
