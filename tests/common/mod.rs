#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use league_roast::api::models::{
    AccountDto, LiveGameDto, LiveParticipantDto, LiveStatsDto, MatchDto, MatchInfo, MatchMetadata,
    ParticipantDto, TimelineDto,
};
use league_roast::api::MatchSource;
use league_roast::commentary::prompt::Prompt;
use league_roast::commentary::CommentaryService;
use league_roast::config::TrackerConfig;
use league_roast::error::AppError;
use league_roast::live::SessionTracker;
use league_roast::live::session::SessionCheckpoint;
use league_roast::store::{MemoryStore, RegisteredPlayer, SessionStore};
use league_roast::transport::{ChatTransport, MessageId};

pub const PUUID: &str = "player-1";

/// Scripted match source. Live responses are consumed in order and the last
/// one repeats; an empty script means the player is not in a game.
#[derive(Default)]
pub struct FakeSource {
    live: Mutex<VecDeque<Result<LiveGameDto, AppError>>>,
    live_calls: AtomicUsize,
    ids: Vec<String>,
    matches: HashMap<String, Result<MatchDto, AppError>>,
    requested: Mutex<Vec<usize>>,
}

impl FakeSource {
    pub fn with_live(script: Vec<Result<LiveGameDto, AppError>>) -> Self {
        FakeSource {
            live: Mutex::new(script.into()),
            ..Default::default()
        }
    }

    pub fn with_matches(matches: Vec<MatchDto>) -> Self {
        let mut source = FakeSource::default();
        for m in matches {
            source.ids.push(m.metadata.match_id.clone());
            source.matches.insert(m.metadata.match_id.clone(), Ok(m));
        }
        source
    }

    pub fn failing_match(mut self, match_id: &str, err: AppError) -> Self {
        self.matches.insert(match_id.to_string(), Err(err));
        self
    }

    pub fn live_calls(&self) -> usize {
        self.live_calls.load(Ordering::SeqCst)
    }

    pub fn requested_counts(&self) -> Vec<usize> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl MatchSource for FakeSource {
    async fn account(&self, game_name: &str, tag_line: &str) -> Result<AccountDto, AppError> {
        Ok(AccountDto {
            puuid: PUUID.to_string(),
            game_name: game_name.to_string(),
            tag_line: tag_line.to_string(),
        })
    }

    async fn live_game(&self, _puuid: &str) -> Result<LiveGameDto, AppError> {
        self.live_calls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.live.lock().unwrap();
        match script.len() {
            0 => Err(AppError::NoActiveMatch),
            1 => script[0].clone(),
            _ => script.pop_front().unwrap_or(Err(AppError::NoActiveMatch)),
        }
    }

    async fn match_ids(&self, _puuid: &str, count: usize) -> Result<Vec<String>, AppError> {
        self.requested.lock().unwrap().push(count);
        Ok(self.ids.iter().take(count).cloned().collect())
    }

    async fn match_detail(&self, match_id: &str) -> Result<MatchDto, AppError> {
        self.matches
            .get(match_id)
            .cloned()
            .unwrap_or_else(|| Err(not_found(format!("unknown match {}", match_id))))
    }

    async fn timeline(&self, match_id: &str) -> Result<TimelineDto, AppError> {
        Err(not_found(format!("no timeline for {}", match_id)))
    }
}

fn not_found(message: String) -> AppError {
    AppError::Provider { status: 404, message }
}

#[derive(Default)]
pub struct FakeCommentary {
    fail: bool,
    /// 1-based call number that fails while the others succeed.
    fail_call: Option<usize>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeCommentary {
    pub fn working() -> Self {
        FakeCommentary::default()
    }

    pub fn failing() -> Self {
        FakeCommentary { fail: true, ..Default::default() }
    }

    pub fn failing_on_call(call: usize) -> Self {
        FakeCommentary { fail_call: Some(call), ..Default::default() }
    }

    pub fn slow(delay: Duration) -> Self {
        FakeCommentary { delay: Some(delay), ..Default::default() }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommentaryService for FakeCommentary {
    async fn generate(&self, _prompt: &Prompt) -> Result<String, AppError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail || self.fail_call == Some(call) {
            return Err(AppError::GenerationFailed("all models exhausted".to_string()));
        }
        Ok("roasted".to_string())
    }
}

#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingTransport {
    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(_, text)| text.clone()).collect()
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        self.messages().iter().filter(|m| m.contains(needle)).count()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send(&self, channel_id: &str, text: &str) -> Result<MessageId, AppError> {
        let mut sent = self.sent.lock().unwrap();
        sent.push((channel_id.to_string(), text.to_string()));
        Ok(sent.len() as MessageId)
    }

    async fn edit(&self, _channel_id: &str, _message_id: MessageId, _text: &str) -> Result<(), AppError> {
        Ok(())
    }

    async fn delete(&self, _channel_id: &str, _message_id: MessageId) -> Result<(), AppError> {
        Ok(())
    }
}

/// Memory store whose checkpoint writes take `delay`.
pub struct SlowStore {
    inner: MemoryStore,
    delay: Duration,
}

impl SlowStore {
    pub fn new(delay: Duration) -> Self {
        SlowStore { inner: MemoryStore::new(), delay }
    }
}

#[async_trait]
impl SessionStore for SlowStore {
    async fn save_user(&self, player: &RegisteredPlayer) -> Result<(), AppError> {
        self.inner.save_user(player).await
    }

    async fn find_user(&self, user_id: &str) -> Result<Option<RegisteredPlayer>, AppError> {
        self.inner.find_user(user_id).await
    }

    async fn persist_session(&self, checkpoint: &SessionCheckpoint) -> Result<(), AppError> {
        tokio::time::sleep(self.delay).await;
        self.inner.persist_session(checkpoint).await
    }

    async fn load_session(&self, session_id: &str) -> Result<Option<SessionCheckpoint>, AppError> {
        self.inner.load_session(session_id).await
    }

    async fn end_session(&self, session_id: &str) -> Result<(), AppError> {
        self.inner.end_session(session_id).await
    }
}

pub struct Harness<S = MemoryStore> {
    pub tracker: SessionTracker,
    pub source: Arc<FakeSource>,
    pub commentary: Arc<FakeCommentary>,
    pub transport: Arc<RecordingTransport>,
    pub store: Arc<S>,
}

pub fn harness(source: FakeSource, commentary: FakeCommentary) -> Harness {
    harness_with_store(source, commentary, MemoryStore::new())
}

pub fn harness_with_store<S: SessionStore + 'static>(
    source: FakeSource,
    commentary: FakeCommentary,
    store: S,
) -> Harness<S> {
    let source = Arc::new(source);
    let commentary = Arc::new(commentary);
    let transport = Arc::new(RecordingTransport::default());
    let store = Arc::new(store);
    let tracker = SessionTracker::new(
        source.clone(),
        commentary.clone(),
        store.clone(),
        transport.clone(),
        TrackerConfig {
            poll_interval: Duration::from_secs(3),
            status_interval: Duration::from_secs(15),
            call_timeout: Duration::from_secs(10),
            stop_timeout: Duration::from_secs(5),
        },
    );
    Harness { tracker, source, commentary, transport, store }
}

/// A live game with the tracked player on team 100 and one opponent.
pub fn live_game(game_id: i64, kills: i64, deaths: i64, gold: i64, length: i64) -> LiveGameDto {
    LiveGameDto {
        game_id,
        game_mode: "CLASSIC".to_string(),
        queue_id: 420,
        game_length: length,
        participants: vec![
            LiveParticipantDto {
                puuid: PUUID.to_string(),
                champion_name: "Yasuo".to_string(),
                team_id: 100,
                champion_level: 6,
                current_gold: gold,
                stats: LiveStatsDto { kills, deaths, assists: 1, minions_killed: 40 },
            },
            LiveParticipantDto {
                puuid: "enemy".to_string(),
                champion_name: "Zed".to_string(),
                team_id: 200,
                champion_level: 6,
                current_gold: 1200,
                stats: LiveStatsDto { kills: deaths, ..Default::default() },
            },
        ],
    }
}

pub fn participant(puuid: &str, champion: &str, kills: i64, deaths: i64, assists: i64, win: bool) -> ParticipantDto {
    ParticipantDto {
        puuid: puuid.to_string(),
        champion_name: champion.to_string(),
        team_id: 100,
        win,
        team_position: "MIDDLE".to_string(),
        kills,
        deaths,
        assists,
        total_minions_killed: 180,
        gold_earned: 11_000,
        total_damage_dealt_to_champions: 20_000,
        total_damage_taken: 15_000,
        vision_score: 20,
        ..Default::default()
    }
}

pub fn match_with(match_id: &str, participants: Vec<ParticipantDto>) -> MatchDto {
    MatchDto {
        metadata: MatchMetadata {
            match_id: match_id.to_string(),
            participants: participants.iter().map(|p| p.puuid.clone()).collect(),
        },
        info: MatchInfo {
            game_duration: 1800,
            game_creation: 1_700_000_000_000,
            participants,
        },
    }
}
