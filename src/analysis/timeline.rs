use crate::api::models::TimelineDto;
use crate::error::AppError;

/// Roastable moments pulled from one player's match timeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimelineMoments {
    pub kills: usize,
    pub deaths: usize,
    pub assists: usize,
    /// Minutes of deaths before 10:00.
    pub early_deaths: Vec<i64>,
    /// Minutes of deaths after 30:00.
    pub late_deaths: Vec<i64>,
    /// Minutes of kills before 15:00.
    pub early_kills: Vec<i64>,
    /// Minutes of structure kills before 20:00.
    pub early_structures: Vec<i64>,
}

impl TimelineMoments {
    pub fn from_timeline(timeline: &TimelineDto, puuid: &str) -> Result<Self, AppError> {
        // Participant ids are 1-based positions in the metadata list.
        let participant_id = timeline
            .metadata
            .participants
            .iter()
            .position(|p| p == puuid)
            .map(|idx| idx as i64 + 1)
            .ok_or_else(|| AppError::PlayerNotInMatch(timeline.metadata.match_id.clone()))?;

        let mut moments = TimelineMoments::default();

        for event in timeline.info.frames.iter().flat_map(|f| f.events.iter()) {
            let minute = event.timestamp / 60_000;
            match event.kind.as_str() {
                "CHAMPION_KILL" => {
                    if event.killer_id == Some(participant_id) {
                        moments.kills += 1;
                        if minute < 15 {
                            moments.early_kills.push(minute);
                        }
                    }
                    if event.victim_id == Some(participant_id) {
                        moments.deaths += 1;
                        if minute < 10 {
                            moments.early_deaths.push(minute);
                        } else if minute > 30 {
                            moments.late_deaths.push(minute);
                        }
                    }
                    if event.assisting_participant_ids.contains(&participant_id) {
                        moments.assists += 1;
                    }
                }
                "BUILDING_KILL" if event.killer_id == Some(participant_id) && minute < 20 => {
                    moments.early_structures.push(minute);
                }
                _ => {}
            }
        }

        Ok(moments)
    }
}
