pub mod groq;
pub mod prompt;

use async_trait::async_trait;

use crate::error::AppError;
use prompt::Prompt;

/// Free-text generation for flavor lines.
///
/// Fails with `AppError::GenerationFailed` once every fallback is exhausted;
/// callers degrade to a templated message instead of dropping output.
#[async_trait]
pub trait CommentaryService: Send + Sync {
    async fn generate(&self, prompt: &Prompt) -> Result<String, AppError>;
}

/// Used when no generation API key is configured.
pub struct DisabledCommentary;

#[async_trait]
impl CommentaryService for DisabledCommentary {
    async fn generate(&self, _prompt: &Prompt) -> Result<String, AppError> {
        Err(AppError::GenerationFailed("commentary disabled".to_string()))
    }
}
