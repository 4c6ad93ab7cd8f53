use serde::{Deserialize, Serialize};

use crate::api::models::LiveGameDto;

/// Kill jumps of this size or more in one tick are a multikill.
pub const MULTIKILL_THRESHOLD: i64 = 3;
/// Death jumps of this size or more in one tick count as feeding.
pub const FEEDING_THRESHOLD: i64 = 2;
/// Gold drops must be larger than this to be reported.
pub const GOLD_SWING_THRESHOLD: i64 = 500;
/// Gold swings are only reported before this game time (seconds).
pub const EARLY_GAME_SECS: i64 = 900;

/// One poll's worth of the tracked player's numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub game_duration_secs: i64,
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    pub cs: i64,
    pub gold: i64,
    pub level: i64,
    pub team_kills: i64,
    pub enemy_team_kills: i64,
}

impl PlayerSnapshot {
    /// Reads the player's state out of a live game, or `None` if they are not in it.
    pub fn from_live_game(game: &LiveGameDto, puuid: &str) -> Option<Self> {
        let me = game.participants.iter().find(|p| p.puuid == puuid)?;

        let mut team_kills = 0;
        let mut enemy_team_kills = 0;
        for p in &game.participants {
            if p.team_id == me.team_id {
                team_kills += p.stats.kills;
            } else {
                enemy_team_kills += p.stats.kills;
            }
        }

        Some(PlayerSnapshot {
            game_duration_secs: game.game_length,
            kills: me.stats.kills,
            deaths: me.stats.deaths,
            assists: me.stats.assists,
            cs: me.stats.minions_killed,
            gold: me.current_gold,
            level: me.champion_level,
            team_kills,
            enemy_team_kills,
        })
    }

    pub fn kda_line(&self) -> String {
        format!("{}/{}/{}", self.kills, self.deaths, self.assists)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum GameEvent {
    Kill(i64),
    Multikill(i64),
    Death(i64),
    Feeding(i64),
    GoldSwing(i64),
}

impl GameEvent {
    pub fn label(&self) -> &'static str {
        match self {
            GameEvent::Kill(_) => "kill",
            GameEvent::Multikill(_) => "multikill",
            GameEvent::Death(_) => "death",
            GameEvent::Feeding(_) => "feeding",
            GameEvent::GoldSwing(_) => "gold_swing",
        }
    }
}

/// Compares two consecutive snapshots and returns what happened in between.
///
/// At most one event per category, always ordered kills, deaths, gold.
/// The first tick (`previous == None`) never produces events.
pub fn detect(previous: Option<&PlayerSnapshot>, current: &PlayerSnapshot) -> Vec<GameEvent> {
    let Some(previous) = previous else {
        return Vec::new();
    };

    let mut events = Vec::new();

    let kills = current.kills - previous.kills;
    if kills >= MULTIKILL_THRESHOLD {
        events.push(GameEvent::Multikill(kills));
    } else if kills > 0 {
        events.push(GameEvent::Kill(kills));
    }

    let deaths = current.deaths - previous.deaths;
    if deaths >= FEEDING_THRESHOLD {
        events.push(GameEvent::Feeding(deaths));
    } else if deaths > 0 {
        events.push(GameEvent::Death(deaths));
    }

    let gold = current.gold - previous.gold;
    if gold < -GOLD_SWING_THRESHOLD && current.game_duration_secs < EARLY_GAME_SECS {
        events.push(GameEvent::GoldSwing(gold.abs()));
    }

    events
}
