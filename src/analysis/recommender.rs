use super::champion_stats::{AggregateStats, ChampionStats};

const RECOMMENDED: usize = 3;
const DISCOURAGED: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct ChampionFitScore {
    pub name: String,
    pub games: usize,
    /// Whole percent.
    pub win_rate: f64,
    pub avg_kda: f64,
    pub avg_cs: f64,
    pub avg_gold: f64,
    pub avg_damage: f64,
    pub avg_deaths: f64,
    pub fit_score: f64,
}

#[derive(Debug, Clone)]
pub struct Recommendations {
    /// Every champion, best fit first.
    pub all: Vec<ChampionFitScore>,
    pub recommended: Vec<ChampionFitScore>,
    pub discouraged: Vec<ChampionFitScore>,
}

/// The player's overall averages, rounded the way they are displayed.
#[derive(Debug, Clone, Copy)]
pub struct Baseline {
    pub avg_kda: f64,
    pub avg_cs: f64,
    pub avg_deaths: f64,
}

impl Baseline {
    pub fn of(stats: &AggregateStats) -> Self {
        Baseline {
            avg_kda: round_to(stats.avg_kda, 2),
            avg_cs: round_to(stats.avg_cs, 1),
            avg_deaths: round_to(stats.avg_deaths, 2),
        }
    }
}

pub struct ChampionRecommender;

impl ChampionRecommender {
    /// Fit score, higher = better suited:
    /// (winRate × winBonus + KDA × kdaBonus + CS × csBonus − deaths × deathPenalty) / 10
    pub fn calculate_score(
        win_rate: f64,
        avg_kda: f64,
        avg_cs: f64,
        avg_deaths: f64,
        baseline: &Baseline,
    ) -> f64 {
        let death_penalty = if avg_deaths > baseline.avg_deaths { 0.8 } else { 1.2 };
        let kda_bonus = if avg_kda > baseline.avg_kda { 1.3 } else { 0.9 };
        let cs_bonus = if avg_cs > baseline.avg_cs { 1.2 } else { 0.85 };
        let win_bonus = if win_rate >= 50.0 { 1.5 } else { 0.7 };

        (win_rate * win_bonus + avg_kda * kda_bonus + avg_cs * cs_bonus
            - avg_deaths * death_penalty)
            / 10.0
    }

    pub fn score_champion(champion: &ChampionStats, baseline: &Baseline) -> ChampionFitScore {
        let win_rate = champion.win_rate().round();
        let avg_kda = round_to(champion.avg_kda(), 2);
        let avg_cs = round_to(champion.avg_cs(), 1);
        let avg_deaths = round_to(champion.avg_deaths(), 1);

        let fit_score = round_to(
            Self::calculate_score(win_rate, avg_kda, avg_cs, avg_deaths, baseline),
            2,
        );

        ChampionFitScore {
            name: champion.name.clone(),
            games: champion.games,
            win_rate,
            avg_kda,
            avg_cs,
            avg_gold: champion.avg_gold().round(),
            avg_damage: champion.avg_damage().round(),
            avg_deaths,
            fit_score,
        }
    }

    /// Ranks champions by fit. With fewer than five champions the recommended
    /// and discouraged slices may overlap.
    pub fn get_recommendations(stats: &AggregateStats) -> Recommendations {
        let baseline = Baseline::of(stats);

        let mut all: Vec<ChampionFitScore> = stats
            .champions
            .iter()
            .map(|c| Self::score_champion(c, &baseline))
            .collect();

        all.sort_by(|a, b| b.fit_score.partial_cmp(&a.fit_score).unwrap_or(std::cmp::Ordering::Equal));

        let recommended = all.iter().take(RECOMMENDED).cloned().collect();
        let discouraged = all[all.len().saturating_sub(DISCOURAGED)..].to_vec();

        Recommendations {
            all,
            recommended,
            discouraged,
        }
    }
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
