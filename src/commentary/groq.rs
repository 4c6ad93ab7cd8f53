use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{info, warn};

use super::prompt::Prompt;
use super::CommentaryService;
use crate::error::AppError;

const COMPLETIONS_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Ordered model list plus the index of the model currently in use.
pub struct ModelRotation {
    models: Vec<String>,
    current: AtomicUsize,
}

impl ModelRotation {
    pub fn new(models: Vec<String>) -> Self {
        ModelRotation {
            models,
            current: AtomicUsize::new(0),
        }
    }

    pub fn current(&self) -> Option<&str> {
        if self.models.is_empty() {
            return None;
        }
        let idx = self.current.load(Ordering::Relaxed) % self.models.len();
        Some(&self.models[idx])
    }

    /// Moves to the next model (wrapping) and returns it. Concurrent callers
    /// each advance one step.
    pub fn advance(&self) -> Option<&str> {
        if self.models.is_empty() {
            return None;
        }
        let len = self.models.len();
        let previous = self
            .current
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |idx| Some((idx + 1) % len))
            .unwrap_or_else(|idx| idx);
        Some(&self.models[(previous + 1) % len])
    }
}

/// Rate-limit, quota and missing-model failures justify trying another model.
pub fn is_fallback_signal(err: &AppError) -> bool {
    match err {
        AppError::RateLimited => true,
        AppError::Provider { status: 429 | 404, .. } => true,
        AppError::Provider { message, .. } => {
            let message = message.to_lowercase();
            ["rate limit", "quota", "model", "not found"]
                .iter()
                .any(|needle| message.contains(needle))
        }
        _ => false,
    }
}

/// Calls the current model; on a fallback signal switches model and retries once.
pub async fn generate_with_fallback<F, Fut>(rotation: &ModelRotation, call: F) -> Result<String, AppError>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<String, AppError>>,
{
    let model = rotation
        .current()
        .ok_or_else(|| AppError::GenerationFailed("no models configured".to_string()))?
        .to_string();

    let err = match call(model.clone()).await {
        Ok(text) => return Ok(text),
        Err(e) => e,
    };

    if !is_fallback_signal(&err) {
        return Err(AppError::GenerationFailed(err.to_string()));
    }

    warn!(%model, error = %err, "model unavailable, switching");
    let next = rotation.advance().unwrap_or(model.as_str()).to_string();
    if next == model {
        return Err(AppError::GenerationFailed(err.to_string()));
    }

    info!(model = %next, "retrying with fallback model");
    call(next)
        .await
        .map_err(|e| AppError::GenerationFailed(e.to_string()))
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Groq chat-completions client.
pub struct GroqClient {
    api_key: String,
    agent: ureq::Agent,
    rotation: ModelRotation,
}

impl GroqClient {
    pub fn new(api_key: String, models: Vec<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent("league_roast/0.1.0")
            .build();
        GroqClient {
            api_key,
            agent,
            rotation: ModelRotation::new(models),
        }
    }

    async fn complete(&self, model: String, prompt: &Prompt) -> Result<String, AppError> {
        let agent = self.agent.clone();
        let auth = format!("Bearer {}", self.api_key);
        let body = serde_json::to_value(CompletionRequest {
            model: &model,
            max_tokens: prompt.max_tokens,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt.content,
            }],
        })
        .map_err(|e| AppError::JsonError(e.to_string()))?;

        tokio::task::spawn_blocking(move || {
            let response = agent
                .post(COMPLETIONS_URL)
                .set("Authorization", &auth)
                .send_json(body);

            match response {
                Ok(resp) => {
                    let parsed: CompletionResponse = resp
                        .into_json()
                        .map_err(|e| AppError::JsonError(e.to_string()))?;
                    parsed
                        .choices
                        .into_iter()
                        .next()
                        .map(|c| c.message.content.trim().to_string())
                        .filter(|text| !text.is_empty())
                        .ok_or_else(|| AppError::GenerationFailed("empty completion".to_string()))
                }
                Err(ureq::Error::Status(status, resp)) => Err(AppError::Provider {
                    status,
                    message: resp.into_string().unwrap_or_default(),
                }),
                Err(ureq::Error::Transport(t)) => Err(AppError::HttpError(t.to_string())),
            }
        })
        .await
        .map_err(|e| AppError::HttpError(format!("completion task failed: {}", e)))?
    }
}

#[async_trait]
impl CommentaryService for GroqClient {
    async fn generate(&self, prompt: &Prompt) -> Result<String, AppError> {
        generate_with_fallback(&self.rotation, move |model| self.complete(model, prompt)).await
    }
}
