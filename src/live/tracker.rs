use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::join_all;
use tokio::sync::{watch, Mutex as AsyncMutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::detector::{detect, GameEvent, PlayerSnapshot};
use super::session::{LiveSession, SessionInfo, SessionPhase};
use crate::api::MatchSource;
use crate::commentary::prompt;
use crate::commentary::CommentaryService;
use crate::config::TrackerConfig;
use crate::display::messages;
use crate::error::{bounded, AppError};
use crate::store::SessionStore;
use crate::transport::{deliver, ChatTransport};

/// Owns every active live-tracking session, at most one per user.
///
/// A second `start` for a user that is already being tracked is rejected with
/// `AppError::SessionAlreadyActive`; the running session is left alone.
#[derive(Clone)]
pub struct SessionTracker {
    inner: Arc<TrackerInner>,
}

struct TrackerInner {
    source: Arc<dyn MatchSource>,
    commentary: Arc<dyn CommentaryService>,
    store: Arc<dyn SessionStore>,
    transport: Arc<dyn ChatTransport>,
    config: TrackerConfig,
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

struct SessionHandle {
    state: Arc<Mutex<LiveSession>>,
    stop_tx: watch::Sender<bool>,
    /// Held by `start` until the poll task is spawned, so `stop` waits for it.
    task: Arc<AsyncMutex<Option<JoinHandle<()>>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickOutcome {
    Continue,
    MatchEnded,
}

/// What to tell the user when a session is retired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Farewell {
    MatchEnded,
    Stopped,
    Silent,
}

fn lock(state: &Mutex<LiveSession>) -> MutexGuard<'_, LiveSession> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SessionTracker {
    pub fn new(
        source: Arc<dyn MatchSource>,
        commentary: Arc<dyn CommentaryService>,
        store: Arc<dyn SessionStore>,
        transport: Arc<dyn ChatTransport>,
        config: TrackerConfig,
    ) -> Self {
        SessionTracker {
            inner: Arc::new(TrackerInner {
                source,
                commentary,
                store,
                transport,
                config,
                sessions: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Begins tracking `puuid`'s live game for `user_id`, narrating into `channel_id`.
    pub async fn start(&self, user_id: &str, puuid: &str, channel_id: &str) -> Result<SessionInfo, AppError> {
        let inner = &self.inner;

        if inner.sessions.read().await.contains_key(user_id) {
            return Err(AppError::SessionAlreadyActive(user_id.to_string()));
        }

        let game = bounded(inner.config.call_timeout, "live game", inner.source.live_game(puuid)).await?;
        let champion = game
            .participants
            .iter()
            .find(|p| p.puuid == puuid)
            .map(|p| p.champion_name.clone())
            .unwrap_or_default();

        let session = LiveSession::new(user_id, puuid, channel_id, game.game_id.to_string(), champion.clone());
        let info = session.info();
        let checkpoint = session.checkpoint();
        let state = Arc::new(Mutex::new(session));
        let (stop_tx, stop_rx) = watch::channel(false);
        let task_slot = Arc::new(AsyncMutex::new(None));
        let mut pending_task = task_slot.clone().lock_owned().await;

        {
            let mut sessions = inner.sessions.write().await;
            if sessions.contains_key(user_id) {
                return Err(AppError::SessionAlreadyActive(user_id.to_string()));
            }
            sessions.insert(
                user_id.to_string(),
                SessionHandle {
                    state: state.clone(),
                    stop_tx,
                    task: task_slot,
                },
            );
        }

        inner.persist(&checkpoint).await;
        deliver(
            inner.transport.as_ref(),
            channel_id,
            &messages::tracking_started(&game.game_mode, &champion),
            inner.config.call_timeout,
        )
        .await;

        // A `stop` that raced this start is waiting on the slot and cancels the task at once.
        *pending_task = Some(tokio::spawn(run_session(inner.clone(), state, stop_rx)));
        drop(pending_task);

        info!(user = user_id, match_id = %info.match_id, "started live tracking");
        Ok(info)
    }

    /// Stops a user's session. Returns false if there was nothing to stop.
    ///
    /// Once this returns, no further tick of that session will run.
    pub async fn stop(&self, user_id: &str) -> bool {
        self.inner.stop(user_id, Farewell::Stopped).await
    }

    /// Best-effort shutdown of every session; individual failures are only logged.
    pub async fn stop_all(&self) -> usize {
        let users: Vec<String> = self.inner.sessions.read().await.keys().cloned().collect();
        let stopped = join_all(users.iter().map(|user| self.inner.stop(user, Farewell::Silent))).await;
        let count = stopped.into_iter().filter(|s| *s).count();
        info!(count, "stopped all live sessions");
        count
    }

    pub async fn is_tracking(&self, user_id: &str) -> bool {
        self.inner.sessions.read().await.contains_key(user_id)
    }

    pub async fn active_sessions(&self) -> Vec<SessionInfo> {
        self.inner
            .sessions
            .read()
            .await
            .values()
            .map(|handle| lock(&handle.state).info())
            .collect()
    }

    /// Resolves once `user_id` has no active session.
    pub async fn wait_until_ended(&self, user_id: &str) {
        let mut poll = tokio::time::interval(self.inner.config.poll_interval);
        while self.is_tracking(user_id).await {
            poll.tick().await;
        }
    }
}

async fn run_session(inner: Arc<TrackerInner>, state: Arc<Mutex<LiveSession>>, mut stop_rx: watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval(inner.config.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // interval fires immediately; the first poll belongs one period after start
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = stop_rx.changed() => break,
            _ = ticker.tick() => {
                if inner.tick(&state).await == TickOutcome::MatchEnded {
                    inner.end_from_task(&state).await;
                    break;
                }
            }
        }
    }
}

impl TrackerInner {
    async fn tick(&self, state: &Mutex<LiveSession>) -> TickOutcome {
        let (user_id, puuid, match_id, channel_id, champion, previous) = {
            let s = lock(state);
            (
                s.user_id.clone(),
                s.puuid.clone(),
                s.match_id.clone(),
                s.channel_id.clone(),
                s.champion_name.clone(),
                s.last_snapshot,
            )
        };

        let game = match bounded(self.config.call_timeout, "live game", self.source.live_game(&puuid)).await {
            Ok(game) => game,
            Err(AppError::NoActiveMatch) => {
                info!(user = %user_id, %match_id, "live game is gone");
                return TickOutcome::MatchEnded;
            }
            Err(e) => {
                // Retried on the next tick; failures alone never end a session.
                warn!(user = %user_id, %match_id, error = %e, transient = e.is_transient(), "live poll failed");
                return TickOutcome::Continue;
            }
        };

        if game.game_id.to_string() != match_id {
            info!(user = %user_id, %match_id, new_match_id = game.game_id, "tracked match replaced");
            return TickOutcome::MatchEnded;
        }

        let Some(current) = PlayerSnapshot::from_live_game(&game, &puuid) else {
            warn!(user = %user_id, %match_id, "player missing from live game, skipping tick");
            return TickOutcome::Continue;
        };

        let events = detect(previous.as_ref(), &current);
        for event in &events {
            debug!(user = %user_id, event = event.label(), "live event");
            let text = self.narrate(event, &current, &champion).await;
            deliver(self.transport.as_ref(), &channel_id, &text, self.config.call_timeout).await;
        }

        let status_due = lock(state).last_status_emit.elapsed() >= self.config.status_interval;
        if status_due {
            let text = messages::live_status(&current, self.config.status_interval.as_secs());
            deliver(self.transport.as_ref(), &channel_id, &text, self.config.call_timeout).await;
        }

        let checkpoint = {
            let mut s = lock(state);
            s.last_snapshot = Some(current);
            s.emitted_event_count += events.len();
            s.events.extend(events.iter().copied());
            if status_due {
                s.last_status_emit = Instant::now();
            }
            (previous.is_none() || !events.is_empty()).then(|| s.checkpoint())
        };

        if let Some(checkpoint) = checkpoint {
            self.persist(&checkpoint).await;
        }

        TickOutcome::Continue
    }

    /// Event template plus generated flavor, or the template alone.
    async fn narrate(&self, event: &GameEvent, snapshot: &PlayerSnapshot, champion: &str) -> String {
        let base = messages::event_message(event, snapshot, champion);
        let request = prompt::live_event(event, snapshot, champion);

        match bounded(self.config.call_timeout, "commentary", self.commentary.generate(&request)).await {
            Ok(line) => messages::with_commentary(&base, Some(&line)),
            Err(e) => {
                warn!(event = event.label(), error = %e, "commentary unavailable, sending plain message");
                base
            }
        }
    }

    async fn stop(&self, user_id: &str, farewell: Farewell) -> bool {
        let Some(handle) = self.sessions.write().await.remove(user_id) else {
            return false;
        };

        let _ = handle.stop_tx.send(true);
        let task = handle.task.lock().await.take();
        if let Some(mut task) = task {
            if tokio::time::timeout(self.config.stop_timeout, &mut task).await.is_err() {
                warn!(user = user_id, "poll task did not stop in time, aborting");
                task.abort();
                let _ = task.await;
            }
        }

        self.retire(&handle.state, farewell).await;
        true
    }

    /// Called from the poll task itself when the match is over.
    async fn end_from_task(&self, state: &Arc<Mutex<LiveSession>>) {
        let user_id = lock(state).user_id.clone();
        let owned = {
            let mut sessions = self.sessions.write().await;
            match sessions.get(&user_id) {
                Some(handle) if Arc::ptr_eq(&handle.state, state) => sessions.remove(&user_id),
                _ => None,
            }
        };

        // A concurrent `stop` already took the session and will retire it.
        if owned.is_some() {
            self.retire(state, Farewell::MatchEnded).await;
        }
    }

    /// Marks the session ended, says goodbye and records the end. Never fails.
    async fn retire(&self, state: &Mutex<LiveSession>, farewell: Farewell) {
        let (user_id, channel_id, last_snapshot, events) = {
            let mut s = lock(state);
            s.phase = SessionPhase::Ended;
            (s.user_id.clone(), s.channel_id.clone(), s.last_snapshot, s.emitted_event_count)
        };

        if farewell == Farewell::Stopped {
            deliver(self.transport.as_ref(), &channel_id, &messages::tracking_stopped(), self.config.call_timeout).await;
        }
        if farewell != Farewell::Silent {
            if let Some(snapshot) = last_snapshot {
                let text = messages::match_ended(&snapshot, events);
                deliver(self.transport.as_ref(), &channel_id, &text, self.config.call_timeout).await;
            }
        }

        if let Err(e) = bounded(self.config.call_timeout, "session end", self.store.end_session(&user_id)).await {
            warn!(user = %user_id, error = %e, "failed to persist session end");
        }

        info!(user = %user_id, events, ?farewell, "stopped live tracking");
    }

    async fn persist(&self, checkpoint: &super::session::SessionCheckpoint) {
        if let Err(e) = bounded(self.config.call_timeout, "session checkpoint", self.store.persist_session(checkpoint)).await {
            warn!(user = %checkpoint.session_id, error = %e, "failed to persist session checkpoint");
        }
    }
}
