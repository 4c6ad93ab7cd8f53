// Prompt builders: structured input in, request text out. No I/O here.

use crate::analysis::champion_stats::AggregateStats;
use crate::analysis::timeline::TimelineMoments;
use crate::api::models::ParticipantDto;
use crate::analysis::match_record;
use crate::live::detector::{GameEvent, PlayerSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub content: String,
    pub max_tokens: u32,
}

pub fn player_name(game_name: &str, tag_line: &str) -> Prompt {
    Prompt {
        content: format!(
            "You are the most ruthless esports roaster alive. Roast this gamer ID in 1-2 sentences, \
             savage but without slurs.\n\nGAMER ID: {}#{}",
            game_name, tag_line
        ),
        max_tokens: 200,
    }
}

pub fn live_event(event: &GameEvent, snapshot: &PlayerSnapshot, champion: &str) -> Prompt {
    let happened = match event {
        GameEvent::Kill(n) => format!("just got {} kill(s)", n),
        GameEvent::Multikill(n) => format!("just got a {}x multikill", n),
        GameEvent::Death(n) => format!("just died ({} death)", n),
        GameEvent::Feeding(n) => format!("just died {} times in a row", n),
        GameEvent::GoldSwing(amount) => format!("just lost {} gold in the early game", amount),
    };

    Prompt {
        content: format!(
            "You are a live League of Legends commentator who roasts the player. \
             One short sentence, max 25 words.\n\n\
             The {} player {}.\n\
             Game time: {}m {}s\nK/D/A: {}\nGold: {}\nCS: {}\nLevel: {}\nTeam score: {} vs {}",
            champion,
            happened,
            snapshot.game_duration_secs / 60,
            snapshot.game_duration_secs % 60,
            snapshot.kda_line(),
            snapshot.gold,
            snapshot.cs,
            snapshot.level,
            snapshot.team_kills,
            snapshot.enemy_team_kills,
        ),
        max_tokens: 100,
    }
}

pub fn stats_summary(stats: &AggregateStats) -> Prompt {
    let best = stats
        .best_champion
        .as_ref()
        .map(|c| format!("{} ({:.0}% over {} games)", c.name, c.win_rate, c.games))
        .unwrap_or_else(|| "none".to_string());
    let worst = stats
        .worst_champion
        .as_ref()
        .map(|c| format!("{} ({:.0}% over {} games)", c.name, c.win_rate, c.games))
        .unwrap_or_else(|| "none".to_string());

    Prompt {
        content: format!(
            "Roast this League of Legends player's recent form in 2-3 brutal sentences. \
             Use the numbers.\n\n\
             GAMES: {} ({}W/{}L, {:.1}% win rate)\n\
             AVG K/D/A: {:.2}/{:.2}/{:.2} (KDA {:.2})\n\
             AVG CS/MIN: {:.1}\nAVG DAMAGE: {:.0}\nAVG VISION: {:.1}\n\
             BEST CHAMPION: {}\nWORST CHAMPION: {}\n\
             GAMES WITH 8+ DEATHS: {} (max {})",
            stats.total_games,
            stats.wins,
            stats.losses,
            stats.win_rate,
            stats.avg_kills,
            stats.avg_deaths,
            stats.avg_assists,
            stats.avg_kda,
            stats.avg_cs_per_minute,
            stats.avg_damage,
            stats.avg_vision,
            best,
            worst,
            stats.high_death_games,
            stats.max_deaths_in_game,
        ),
        max_tokens: 300,
    }
}

pub fn match_performance(p: &ParticipantDto, duration_secs: i64) -> Prompt {
    let minutes = (duration_secs as f64 / 60.0).max(1.0);
    let challenges = p.challenges.clone().unwrap_or_default();

    Prompt {
        content: format!(
            "You are the most ruthless League of Legends roaster in existence. Roast this player \
             in one paragraph of 3-5 sentences, citing specific stats.\n\n\
             CHAMPION: {} (Level {})\nROLE: {}\nK/D/A: {}/{}/{} (KDA {:.2})\n\
             KILL PARTICIPATION: {:.1}%\nTIME DEAD: {}s\n\
             CS: {} ({:.1}/min)\nGOLD EARNED: {}\nDAMAGE TO CHAMPIONS: {}\nDAMAGE TAKEN: {}\n\
             VISION SCORE: {}\nWARDS PLACED: {}\nLARGEST KILLING SPREE: {}\nRESULT: {}",
            p.champion_name,
            p.champ_level,
            match_record::resolve_role(p),
            p.kills,
            p.deaths,
            p.assists,
            match_record::kda(p),
            challenges.kill_participation.unwrap_or(0.0) * 100.0,
            p.total_time_spent_dead,
            p.total_minions_killed,
            p.total_minions_killed as f64 / minutes,
            p.gold_earned,
            p.total_damage_dealt_to_champions,
            p.total_damage_taken,
            p.vision_score,
            p.wards_placed,
            p.largest_killing_spree,
            if p.win { "VICTORY" } else { "DEFEAT" },
        ),
        max_tokens: 400,
    }
}

pub fn timeline(champion: &str, moments: &TimelineMoments, won: bool) -> Prompt {
    let minutes = |list: &[i64], what: &str| -> String {
        if list.is_empty() {
            "none".to_string()
        } else {
            list.iter()
                .map(|m| format!("{} at {}m", what, m))
                .collect::<Vec<_>>()
                .join(", ")
        }
    };

    Prompt {
        content: format!(
            "You are a brutal League analyst. Dissect this timeline and mock every death \
             and throw in 3-5 sentences, referencing specific minutes.\n\n\
             CHAMPION: {}\nEARLY DEATHS: {}\nLATE DEATHS: {}\nEARLY KILLS: {}\n\
             EARLY STRUCTURES: {}\nTIMELINE K/D/A: {}/{}/{}\nRESULT: {}",
            champion,
            minutes(&moments.early_deaths, "died"),
            minutes(&moments.late_deaths, "died"),
            minutes(&moments.early_kills, "kill"),
            minutes(&moments.early_structures, "tower"),
            moments.kills,
            moments.deaths,
            moments.assists,
            if won { "won somehow" } else { "lost" },
        ),
        max_tokens: 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_event_prompt_mentions_event_and_state() {
        let snapshot = PlayerSnapshot {
            game_duration_secs: 605,
            kills: 5,
            deaths: 1,
            assists: 2,
            gold: 900,
            ..Default::default()
        };
        let prompt = live_event(&GameEvent::Multikill(3), &snapshot, "Jinx");
        assert!(prompt.content.contains("Jinx player just got a 3x multikill"));
        assert!(prompt.content.contains("Game time: 10m 5s"));
        assert!(prompt.content.contains("K/D/A: 5/1/2"));
    }

    #[test]
    fn test_timeline_prompt_lists_minutes() {
        let moments = TimelineMoments {
            deaths: 2,
            early_deaths: vec![3, 7],
            ..Default::default()
        };
        let prompt = timeline("Yasuo", &moments, false);
        assert!(prompt.content.contains("EARLY DEATHS: died at 3m, died at 7m"));
        assert!(prompt.content.contains("LATE DEATHS: none"));
    }
}
