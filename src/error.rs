use std::future::Future;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Rate limit exceeded, please try again later")]
    RateLimited,

    #[error("Provider error (HTTP {status}): {message}")]
    Provider { status: u16, message: String },

    #[error("Timed out waiting for {0}")]
    Timeout(String),

    #[error("Invalid Riot ID format. Use format: Name#TAG")]
    InvalidRiotId,

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("No active game found! Start playing and try again.")]
    NoActiveMatch,

    #[error("No matches found for this player")]
    NoMatchesFound,

    #[error("Player not found in match {0}")]
    PlayerNotInMatch(String),

    #[error("Not registered yet. Run `register` with your Riot ID first.")]
    NotRegistered,

    #[error("Already tracking a live match for {0}. Stop it first.")]
    SessionAlreadyActive(String),

    #[error("Commentary generation failed: {0}")]
    GenerationFailed(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),
}

impl AppError {
    /// Errors worth retrying on the next scheduled attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::RateLimited | AppError::Timeout(_) | AppError::HttpError(_) => true,
            AppError::Provider { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Errors that mean "the thing asked for does not exist"; never retried.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::NoActiveMatch
                | AppError::NoMatchesFound
                | AppError::PlayerNotInMatch(_)
                | AppError::PlayerNotFound(_)
                | AppError::NotRegistered
        )
    }
}

/// Runs `fut` with a deadline, mapping an elapsed deadline to `AppError::Timeout`.
pub async fn bounded<T, F>(limit: Duration, what: &str, fut: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(AppError::Timeout(what.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(AppError::RateLimited.is_transient());
        assert!(AppError::Timeout("live game".into()).is_transient());
        assert!(AppError::Provider { status: 503, message: String::new() }.is_transient());
        assert!(!AppError::Provider { status: 403, message: String::new() }.is_transient());
        assert!(!AppError::NoActiveMatch.is_transient());
        assert!(AppError::NoActiveMatch.is_not_found());
    }

    #[test]
    fn test_provider_client_errors_are_final() {
        let missing = AppError::Provider { status: 404, message: "unknown match".into() };
        assert!(!missing.is_transient());
        assert!(!missing.is_not_found());
        assert_eq!(missing.to_string(), "Provider error (HTTP 404): unknown match");
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok::<_, AppError>(1)
        };
        let result = bounded(Duration::from_secs(5), "slow call", slow).await;
        assert_eq!(result, Err(AppError::Timeout("slow call".into())));
    }

    #[tokio::test]
    async fn test_bounded_passes_through() {
        let result = bounded(Duration::from_secs(5), "fast call", async { Ok::<_, AppError>(7) }).await;
        assert_eq!(result, Ok(7));
    }
}
