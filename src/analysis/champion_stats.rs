use std::collections::HashMap;

use super::match_record::MatchRecord;
use crate::error::AppError;

/// A game with this many deaths or more counts as a high-death game.
pub const HIGH_DEATH_GAME: i64 = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct ChampionStats {
    pub name: String,
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
    pub kda_samples: Vec<f64>,
    pub total_cs: i64,
    pub total_gold: i64,
    pub total_damage: i64,
    pub total_deaths: i64,
}

impl ChampionStats {
    pub fn new(name: String) -> Self {
        ChampionStats {
            name,
            games: 0,
            wins: 0,
            losses: 0,
            kda_samples: Vec::new(),
            total_cs: 0,
            total_gold: 0,
            total_damage: 0,
            total_deaths: 0,
        }
    }

    /// Win rate in percent.
    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins as f64 / self.games as f64 * 100.0
        }
    }

    fn per_game(&self, total: f64) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            total / self.games as f64
        }
    }

    pub fn avg_kda(&self) -> f64 {
        self.per_game(self.kda_samples.iter().sum())
    }

    pub fn avg_cs(&self) -> f64 {
        self.per_game(self.total_cs as f64)
    }

    pub fn avg_gold(&self) -> f64 {
        self.per_game(self.total_gold as f64)
    }

    pub fn avg_damage(&self) -> f64 {
        self.per_game(self.total_damage as f64)
    }

    pub fn avg_deaths(&self) -> f64 {
        self.per_game(self.total_deaths as f64)
    }
}

/// Groups games by champion, remembering the order champions were first seen.
pub struct ChampionStatsTracker {
    stats: Vec<ChampionStats>,
    index: HashMap<String, usize>,
}

impl ChampionStatsTracker {
    pub fn new() -> Self {
        ChampionStatsTracker {
            stats: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn add_match(&mut self, record: &MatchRecord) {
        let slot = match self.index.get(&record.champion_name) {
            Some(&slot) => slot,
            None => {
                self.stats.push(ChampionStats::new(record.champion_name.clone()));
                self.index.insert(record.champion_name.clone(), self.stats.len() - 1);
                self.stats.len() - 1
            }
        };

        let entry = &mut self.stats[slot];
        entry.games += 1;
        if record.win {
            entry.wins += 1;
        } else {
            entry.losses += 1;
        }
        entry.kda_samples.push(record.kda);
        entry.total_cs += record.cs;
        entry.total_gold += record.gold;
        entry.total_damage += record.damage;
        entry.total_deaths += record.deaths;
    }

    pub fn into_stats(self) -> Vec<ChampionStats> {
        self.stats
    }
}

impl Default for ChampionStatsTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChampionSummary {
    pub name: String,
    /// Whole percent, as shown to the player.
    pub win_rate: f64,
    pub games: usize,
}

impl ChampionSummary {
    fn of(stats: &ChampionStats) -> Self {
        ChampionSummary {
            name: stats.name.clone(),
            win_rate: stats.win_rate().round(),
            games: stats.games,
        }
    }
}

/// Read-only projection over a window of games, most recent first.
#[derive(Debug, Clone)]
pub struct AggregateStats {
    pub total_games: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub avg_kills: f64,
    pub avg_deaths: f64,
    pub avg_assists: f64,
    pub avg_kda: f64,
    pub avg_cs: f64,
    pub avg_cs_per_minute: f64,
    pub avg_gold: f64,
    pub avg_damage: f64,
    pub avg_vision: f64,
    pub champions: Vec<ChampionStats>,
    pub best_champion: Option<ChampionSummary>,
    pub worst_champion: Option<ChampionSummary>,
    pub high_death_games: usize,
    pub max_deaths_in_game: i64,
    pub matches: Vec<MatchRecord>,
}

impl AggregateStats {
    pub fn from_matches(matches: Vec<MatchRecord>) -> Result<Self, AppError> {
        if matches.is_empty() {
            return Err(AppError::NoMatchesFound);
        }

        let total_games = matches.len();
        let games = total_games as f64;
        let wins = matches.iter().filter(|m| m.win).count();
        let avg = |f: fn(&MatchRecord) -> f64| matches.iter().map(f).sum::<f64>() / games;

        let total_minutes: f64 = matches.iter().map(|m| m.duration_secs as f64 / 60.0).sum();
        let total_cs: i64 = matches.iter().map(|m| m.cs).sum();
        let avg_cs_per_minute = if total_minutes > 0.0 {
            total_cs as f64 / total_minutes
        } else {
            0.0
        };

        let mut tracker = ChampionStatsTracker::new();
        for record in &matches {
            tracker.add_match(record);
        }
        let champions = tracker.into_stats();

        let mut by_win_rate: Vec<&ChampionStats> = champions.iter().collect();
        by_win_rate.sort_by(|a, b| {
            b.win_rate()
                .partial_cmp(&a.win_rate())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let best_champion = by_win_rate.first().map(|c| ChampionSummary::of(c));
        let worst_champion = by_win_rate.last().map(|c| ChampionSummary::of(c));

        Ok(AggregateStats {
            total_games,
            wins,
            losses: total_games - wins,
            win_rate: wins as f64 / games * 100.0,
            avg_kills: avg(|m| m.kills as f64),
            avg_deaths: avg(|m| m.deaths as f64),
            avg_assists: avg(|m| m.assists as f64),
            avg_kda: avg(|m| m.kda),
            avg_cs: avg(|m| m.cs as f64),
            avg_cs_per_minute,
            avg_gold: avg(|m| m.gold as f64),
            avg_damage: avg(|m| m.damage as f64),
            avg_vision: avg(|m| m.vision_score as f64),
            high_death_games: matches.iter().filter(|m| m.deaths >= HIGH_DEATH_GAME).count(),
            max_deaths_in_game: matches.iter().map(|m| m.deaths).max().unwrap_or(0),
            champions,
            best_champion,
            worst_champion,
            matches,
        })
    }

    /// Champions by games played, ties kept in first-seen order.
    pub fn most_played(&self) -> Vec<&ChampionStats> {
        let mut ordered: Vec<&ChampionStats> = self.champions.iter().collect();
        ordered.sort_by(|a, b| b.games.cmp(&a.games));
        ordered
    }
}
