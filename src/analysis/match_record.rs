use crate::api::models::{MatchDto, ParticipantDto};
use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// One historical game reduced to the player's own numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: String,
    pub champion_name: String,
    pub role: String,
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    pub kda: f64,
    pub cs: i64,
    pub gold: i64,
    pub damage: i64,
    pub damage_taken: i64,
    pub vision_score: i64,
    pub win: bool,
    pub duration_secs: i64,
    /// Epoch milliseconds.
    pub created_at: i64,
}

impl MatchRecord {
    pub fn from_match(data: &MatchDto, puuid: &str) -> Result<Self, AppError> {
        let p = find_participant(data, puuid)?;

        Ok(MatchRecord {
            match_id: data.metadata.match_id.clone(),
            champion_name: p.champion_name.clone(),
            role: resolve_role(p),
            kills: p.kills,
            deaths: p.deaths,
            assists: p.assists,
            kda: kda(p),
            cs: p.total_minions_killed,
            gold: p.gold_earned,
            damage: p.total_damage_dealt_to_champions,
            damage_taken: p.total_damage_taken,
            vision_score: p.vision_score,
            win: p.win,
            duration_secs: data.info.game_duration,
            created_at: data.info.game_creation,
        })
    }
}

pub fn find_participant<'a>(data: &'a MatchDto, puuid: &str) -> Result<&'a ParticipantDto, AppError> {
    data.info
        .participants
        .iter()
        .find(|p| p.puuid == puuid)
        .ok_or_else(|| AppError::PlayerNotInMatch(data.metadata.match_id.clone()))
}

/// Riot's precomputed KDA when present, else (K + A) / max(D, 1).
pub fn kda(p: &ParticipantDto) -> f64 {
    p.challenges
        .as_ref()
        .and_then(|c| c.kda)
        .filter(|k| *k > 0.0)
        .unwrap_or_else(|| (p.kills + p.assists) as f64 / p.deaths.max(1) as f64)
}

pub fn resolve_role(p: &ParticipantDto) -> String {
    [&p.team_position, &p.role, &p.lane]
        .into_iter()
        .find(|r| !r.is_empty() && r.as_str() != "Invalid" && r.as_str() != "NONE")
        .cloned()
        .unwrap_or_else(|| "UNKNOWN".to_string())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::api::models::{MatchInfo, MatchMetadata};

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
}
