use async_trait::async_trait;
use colored::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::warn;

use crate::error::{bounded, AppError};

pub type MessageId = u64;

/// Where user-facing text goes. Delivery is best effort.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, channel_id: &str, text: &str) -> Result<MessageId, AppError>;

    /// Replaces the text of a message sent earlier, e.g. a loading placeholder.
    async fn edit(&self, channel_id: &str, message_id: MessageId, text: &str) -> Result<(), AppError>;

    async fn delete(&self, channel_id: &str, message_id: MessageId) -> Result<(), AppError>;
}

/// Single-attempt send with a deadline; failures are logged, never returned.
pub async fn deliver(
    transport: &dyn ChatTransport,
    channel_id: &str,
    text: &str,
    limit: Duration,
) -> Option<MessageId> {
    match bounded(limit, "chat delivery", transport.send(channel_id, text)).await {
        Ok(id) => Some(id),
        Err(e) => {
            warn!(channel = channel_id, error = %e, "failed to deliver message");
            None
        }
    }
}

/// Resolves a placeholder sent with [`deliver`]: rewrites it with `text`, or
/// removes it when there is nothing to say. Failures are logged only.
pub async fn settle(
    transport: &dyn ChatTransport,
    channel_id: &str,
    message_id: MessageId,
    text: Option<&str>,
    limit: Duration,
) {
    let result = match text {
        Some(text) => bounded(limit, "chat edit", transport.edit(channel_id, message_id, text)).await,
        None => bounded(limit, "chat delete", transport.delete(channel_id, message_id)).await,
    };
    if let Err(e) = result {
        warn!(channel = channel_id, message_id, error = %e, "failed to update placeholder message");
    }
}

/// Prints chat messages to the terminal.
#[derive(Default)]
pub struct ConsoleTransport {
    next_id: AtomicU64,
}

impl ConsoleTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatTransport for ConsoleTransport {
    async fn send(&self, _channel_id: &str, text: &str) -> Result<MessageId, AppError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        println!("{}\n{}\n", format!("── #{} ──", id).dimmed(), text);
        Ok(id)
    }

    async fn edit(&self, _channel_id: &str, message_id: MessageId, text: &str) -> Result<(), AppError> {
        println!("{}\n{}\n", format!("── #{} (edited) ──", message_id).dimmed(), text);
        Ok(())
    }

    async fn delete(&self, _channel_id: &str, message_id: MessageId) -> Result<(), AppError> {
        println!("{}", format!("── #{} removed ──", message_id).dimmed());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        ops: Mutex<Vec<String>>,
        broken: bool,
    }

    #[async_trait]
    impl ChatTransport for Recorder {
        async fn send(&self, _channel_id: &str, text: &str) -> Result<MessageId, AppError> {
            let mut ops = self.ops.lock().unwrap();
            ops.push(format!("send {}", text));
            Ok(ops.len() as MessageId)
        }

        async fn edit(&self, _channel_id: &str, message_id: MessageId, text: &str) -> Result<(), AppError> {
            if self.broken {
                return Err(AppError::Provider { status: 404, message: "unknown message".to_string() });
            }
            self.ops.lock().unwrap().push(format!("edit {} {}", message_id, text));
            Ok(())
        }

        async fn delete(&self, _channel_id: &str, message_id: MessageId) -> Result<(), AppError> {
            self.ops.lock().unwrap().push(format!("delete {}", message_id));
            Ok(())
        }
    }

    const LIMIT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_placeholder_is_edited_in_place() {
        let chat = Recorder::default();
        let id = deliver(&chat, "c", "loading", LIMIT).await.unwrap();
        settle(&chat, "c", id, Some("found it"), LIMIT).await;
        assert_eq!(*chat.ops.lock().unwrap(), vec!["send loading", "edit 1 found it"]);
    }

    #[tokio::test]
    async fn test_placeholder_is_removed_without_text() {
        let chat = Recorder::default();
        let id = deliver(&chat, "c", "loading", LIMIT).await.unwrap();
        settle(&chat, "c", id, None, LIMIT).await;
        assert_eq!(*chat.ops.lock().unwrap(), vec!["send loading", "delete 1"]);
    }

    #[tokio::test]
    async fn test_failed_edit_is_swallowed() {
        let chat = Recorder { broken: true, ..Default::default() };
        settle(&chat, "c", 7, Some("found it"), LIMIT).await;
        assert!(chat.ops.lock().unwrap().is_empty());
    }
}
