use serde::Deserialize;

// Account V1 response
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub puuid: String,
    #[serde(default)]
    pub game_name: String,
    #[serde(default)]
    pub tag_line: String,
}

// Spectator V5 response
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LiveGameDto {
    pub game_id: i64,
    #[serde(default)]
    pub game_mode: String,
    #[serde(default, alias = "gameQueueConfigId")]
    pub queue_id: i64,
    /// Seconds since the game started.
    #[serde(default)]
    pub game_length: i64,
    #[serde(default)]
    pub participants: Vec<LiveParticipantDto>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct LiveParticipantDto {
    #[serde(default)]
    pub puuid: String,
    #[serde(default)]
    pub champion_name: String,
    #[serde(default)]
    pub team_id: i64,
    #[serde(default = "default_level")]
    pub champion_level: i64,
    #[serde(default)]
    pub current_gold: i64,
    #[serde(default)]
    pub stats: LiveStatsDto,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct LiveStatsDto {
    #[serde(default)]
    pub kills: i64,
    #[serde(default)]
    pub deaths: i64,
    #[serde(default)]
    pub assists: i64,
    #[serde(default)]
    pub minions_killed: i64,
}

fn default_level() -> i64 {
    1
}

// Match V5 response
#[derive(Debug, Deserialize, Clone)]
pub struct MatchDto {
    pub metadata: MatchMetadata,
    pub info: MatchInfo,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MatchMetadata {
    pub match_id: String,
    #[serde(default)]
    pub participants: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    pub game_duration: i64,
    #[serde(default)]
    pub game_creation: i64,
    pub participants: Vec<ParticipantDto>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDto {
    pub puuid: String,
    #[serde(default)]
    pub riot_id_game_name: String,
    pub champion_name: String,
    #[serde(default)]
    pub team_id: i64,
    pub win: bool,
    #[serde(default)]
    pub team_position: String, // TOP, JUNGLE, MIDDLE, BOTTOM, UTILITY
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub lane: String,
    #[serde(default)]
    pub champ_level: i64,
    #[serde(default)]
    pub kills: i64,
    #[serde(default)]
    pub deaths: i64,
    #[serde(default)]
    pub assists: i64,
    #[serde(default)]
    pub total_minions_killed: i64,
    #[serde(default)]
    pub gold_earned: i64,
    #[serde(default)]
    pub gold_spent: i64,
    #[serde(default)]
    pub total_damage_dealt_to_champions: i64,
    #[serde(default)]
    pub total_damage_taken: i64,
    #[serde(default)]
    pub vision_score: i64,
    #[serde(default)]
    pub wards_placed: i64,
    #[serde(default)]
    pub total_time_spent_dead: i64,
    #[serde(default)]
    pub largest_killing_spree: i64,
    #[serde(default)]
    pub challenges: Option<ChallengesDto>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChallengesDto {
    #[serde(default)]
    pub kda: Option<f64>,
    #[serde(default)]
    pub kill_participation: Option<f64>,
    #[serde(default)]
    pub damage_per_minute: Option<f64>,
    #[serde(default)]
    pub gold_per_minute: Option<f64>,
}

// Match V5 timeline response
#[derive(Debug, Deserialize, Clone)]
pub struct TimelineDto {
    pub metadata: MatchMetadata,
    pub info: TimelineInfo,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TimelineInfo {
    #[serde(default)]
    pub frames: Vec<TimelineFrame>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TimelineFrame {
    /// Milliseconds since game start.
    pub timestamp: i64,
    #[serde(default)]
    pub events: Vec<TimelineEvent>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub killer_id: Option<i64>,
    #[serde(default)]
    pub victim_id: Option<i64>,
    #[serde(default)]
    pub assisting_participant_ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_game_tolerates_missing_stats() {
        let raw = r#"{
            "gameId": 4242,
            "gameMode": "CLASSIC",
            "gameQueueConfigId": 420,
            "gameLength": 321,
            "participants": [{ "puuid": "p1", "championName": "Ahri", "teamId": 100 }]
        }"#;
        let game: LiveGameDto = serde_json::from_str(raw).unwrap();
        assert_eq!(game.queue_id, 420);
        assert_eq!(game.participants[0].champion_level, 1);
        assert_eq!(game.participants[0].stats.kills, 0);
    }

    #[test]
    fn test_timeline_event_type_field() {
        let raw = r#"{ "type": "CHAMPION_KILL", "timestamp": 60000, "killerId": 3, "victimId": 7 }"#;
        let event: TimelineEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.kind, "CHAMPION_KILL");
        assert_eq!(event.killer_id, Some(3));
        assert!(event.assisting_participant_ids.is_empty());
    }
}
