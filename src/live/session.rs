use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use super::detector::{GameEvent, PlayerSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Tracking,
    Ended,
}

/// Mutable state of one live-tracking session, owned by its poll task.
#[derive(Debug, Clone)]
pub struct LiveSession {
    pub user_id: String,
    pub puuid: String,
    pub channel_id: String,
    pub match_id: String,
    pub champion_name: String,
    pub started_at: DateTime<Utc>,
    pub started: Instant,
    pub last_snapshot: Option<PlayerSnapshot>,
    pub last_status_emit: Instant,
    pub emitted_event_count: usize,
    pub events: Vec<GameEvent>,
    pub phase: SessionPhase,
}

impl LiveSession {
    pub fn new(
        user_id: &str,
        puuid: &str,
        channel_id: &str,
        match_id: String,
        champion_name: String,
    ) -> Self {
        let now = Instant::now();
        LiveSession {
            user_id: user_id.to_string(),
            puuid: puuid.to_string(),
            channel_id: channel_id.to_string(),
            match_id,
            champion_name,
            started_at: Utc::now(),
            started: now,
            last_snapshot: None,
            last_status_emit: now,
            emitted_event_count: 0,
            events: Vec::new(),
            phase: SessionPhase::Tracking,
        }
    }

    pub fn checkpoint(&self) -> SessionCheckpoint {
        SessionCheckpoint {
            session_id: self.user_id.clone(),
            puuid: self.puuid.clone(),
            channel_id: self.channel_id.clone(),
            match_id: self.match_id.clone(),
            started_at: self.started_at,
            last_snapshot: self.last_snapshot,
            emitted_event_count: self.emitted_event_count,
            active: self.phase == SessionPhase::Tracking,
            ended_at: None,
        }
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            user_id: self.user_id.clone(),
            match_id: self.match_id.clone(),
            elapsed_secs: self.started.elapsed().as_secs(),
            events: self.emitted_event_count,
        }
    }
}

/// What gets persisted for a session, keyed by user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCheckpoint {
    pub session_id: String,
    pub puuid: String,
    pub channel_id: String,
    pub match_id: String,
    pub started_at: DateTime<Utc>,
    pub last_snapshot: Option<PlayerSnapshot>,
    pub emitted_event_count: usize,
    pub active: bool,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub user_id: String,
    pub match_id: String,
    pub elapsed_secs: u64,
    pub events: usize,
}
