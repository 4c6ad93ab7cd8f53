use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::AppError;
use crate::live::session::SessionCheckpoint;

/// A chat user linked to a Riot account.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RegisteredPlayer {
    pub user_id: String,
    pub puuid: String,
    pub game_name: String,
    pub tag_line: String,
    pub created_at: DateTime<Utc>,
}

impl RegisteredPlayer {
    pub fn riot_id(&self) -> String {
        format!("{}#{}", self.game_name, self.tag_line)
    }
}

/// Key-value persistence for user records and live-session checkpoints.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn save_user(&self, player: &RegisteredPlayer) -> Result<(), AppError>;

    async fn find_user(&self, user_id: &str) -> Result<Option<RegisteredPlayer>, AppError>;

    async fn persist_session(&self, checkpoint: &SessionCheckpoint) -> Result<(), AppError>;

    async fn load_session(&self, session_id: &str) -> Result<Option<SessionCheckpoint>, AppError>;

    /// Marks the checkpoint inactive. Missing sessions are not an error.
    async fn end_session(&self, session_id: &str) -> Result<(), AppError>;
}

fn ended(mut checkpoint: SessionCheckpoint) -> SessionCheckpoint {
    checkpoint.active = false;
    checkpoint.ended_at = Some(Utc::now());
    checkpoint
}

/// One pretty-printed JSON file per key under the data directory.
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        JsonFileStore { root: root.into() }
    }

    fn path_for(&self, kind: &str, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.root.join(kind).join(format!("{}.json", safe))
    }

    async fn read<T: DeserializeOwned>(&self, kind: &str, key: &str) -> Result<Option<T>, AppError> {
        let path = self.path_for(kind, key);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content)
                .map(Some)
                .map_err(|e| AppError::Persistence(format!("Failed to parse {}: {}", path.display(), e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Persistence(format!("Failed to read {}: {}", path.display(), e))),
        }
    }

    async fn write<T: Serialize + Sync>(&self, kind: &str, key: &str, value: &T) -> Result<(), AppError> {
        let path = self.path_for(kind, key);
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| AppError::Persistence(format!("Failed to create {}: {}", dir.display(), e)))?;
        }

        let json = serde_json::to_string_pretty(value)
            .map_err(|e| AppError::Persistence(format!("Failed to serialize {}: {}", key, e)))?;

        tokio::fs::write(&path, json)
            .await
            .map_err(|e| AppError::Persistence(format!("Failed to write {}: {}", path.display(), e)))
    }
}

#[async_trait]
impl SessionStore for JsonFileStore {
    async fn save_user(&self, player: &RegisteredPlayer) -> Result<(), AppError> {
        self.write("users", &player.user_id, player).await
    }

    async fn find_user(&self, user_id: &str) -> Result<Option<RegisteredPlayer>, AppError> {
        self.read("users", user_id).await
    }

    async fn persist_session(&self, checkpoint: &SessionCheckpoint) -> Result<(), AppError> {
        self.write("sessions", &checkpoint.session_id, checkpoint).await
    }

    async fn load_session(&self, session_id: &str) -> Result<Option<SessionCheckpoint>, AppError> {
        self.read("sessions", session_id).await
    }

    async fn end_session(&self, session_id: &str) -> Result<(), AppError> {
        match self.load_session(session_id).await? {
            Some(checkpoint) => self.persist_session(&ended(checkpoint)).await,
            None => Ok(()),
        }
    }
}

/// Process-local store, for tests and runs without a data directory.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<String, RegisteredPlayer>>,
    sessions: Mutex<HashMap<String, SessionCheckpoint>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> AppError {
    AppError::Persistence("store lock poisoned".to_string())
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn save_user(&self, player: &RegisteredPlayer) -> Result<(), AppError> {
        self.users
            .lock()
            .map_err(poisoned)?
            .insert(player.user_id.clone(), player.clone());
        Ok(())
    }

    async fn find_user(&self, user_id: &str) -> Result<Option<RegisteredPlayer>, AppError> {
        Ok(self.users.lock().map_err(poisoned)?.get(user_id).cloned())
    }

    async fn persist_session(&self, checkpoint: &SessionCheckpoint) -> Result<(), AppError> {
        self.sessions
            .lock()
            .map_err(poisoned)?
            .insert(checkpoint.session_id.clone(), checkpoint.clone());
        Ok(())
    }

    async fn load_session(&self, session_id: &str) -> Result<Option<SessionCheckpoint>, AppError> {
        Ok(self.sessions.lock().map_err(poisoned)?.get(session_id).cloned())
    }

    async fn end_session(&self, session_id: &str) -> Result<(), AppError> {
        let mut sessions = self.sessions.lock().map_err(poisoned)?;
        if let Some(checkpoint) = sessions.remove(session_id) {
            sessions.insert(session_id.to_string(), ended(checkpoint));
        }
        Ok(())
    }
}
