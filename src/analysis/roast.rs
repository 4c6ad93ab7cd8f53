use rand::seq::SliceRandom;
use rand::Rng;

use super::champion_stats::AggregateStats;

pub const DEFAULT_ROAST: &str = "You exist. That's about all I can say about your play.";

/// Every statistical roast whose threshold the stats cross, in rule order.
pub fn roast_candidates(stats: &AggregateStats) -> Vec<String> {
    let mut roasts = Vec::new();

    // Win rate bands
    if stats.win_rate <= 40.0 {
        roasts.push(format!(
            "With a {:.1}% win rate, you're losing more than a casino. Maybe it's time to accept you're not climbing out of your rank.",
            stats.win_rate
        ));
    } else if stats.win_rate < 50.0 {
        roasts.push(format!(
            "{:.1}% win rate is basically 50/50 - you're a coin flip. Your team can't tell if you're an asset or a liability.",
            stats.win_rate
        ));
    } else if stats.win_rate >= 55.0 {
        roasts.push(format!(
            "Oh wow, {:.1}% win rate. Congrats on being slightly above average - your team probably still mutes you though.",
            stats.win_rate
        ));
    }

    // Death bands
    if stats.avg_deaths > 7.0 {
        roasts.push(format!(
            "Averaging {:.2} deaths per game? You're not a player, you're a feeding simulator. Your teammates see you as enemy gold.",
            stats.avg_deaths
        ));
    } else if stats.avg_deaths > 5.0 {
        roasts.push(format!(
            "{:.2} deaths per game average - you're trying to set a record for respawn timer speedrun.",
            stats.avg_deaths
        ));
    }

    // Champion pool disparity
    if let (Some(best), Some(worst)) = (&stats.best_champion, &stats.worst_champion) {
        let diff = best.win_rate - worst.win_rate;
        if diff >= 30.0 {
            roasts.push(format!(
                "You're {:.0}% better on {} than {}. Stop picking {} - you're torturing your team.",
                diff, best.name, worst.name, worst.name
            ));
        }
    }

    // CS per minute bands
    if stats.avg_cs_per_minute < 4.0 {
        roasts.push(format!(
            "{:.1} CS per minute? Were you afk? That's support numbers and you're not even playing support.",
            stats.avg_cs_per_minute
        ));
    } else if stats.avg_cs_per_minute < 5.0 {
        roasts.push(format!(
            "Averaging {:.1} CS/min - you're more interested in roaming into enemy territory to die than farming.",
            stats.avg_cs_per_minute
        ));
    }

    if stats.high_death_games as f64 > stats.total_games as f64 * 0.5 {
        roasts.push(
            "You die 8+ times in more than half your games. You're either inting or just genuinely terrible at staying alive."
                .to_string(),
        );
    }

    roasts
}

/// Picks one matching roast uniformly at random, or the neutral default.
pub fn pick_roast<R: Rng + ?Sized>(stats: &AggregateStats, rng: &mut R) -> String {
    roast_candidates(stats)
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| DEFAULT_ROAST.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::champion_stats::fixtures::{record, window};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_forty_percent_hits_lowest_band() {
        let stats = AggregateStats::from_matches(window(10, 4)).unwrap();
        assert_eq!(stats.win_rate, 40.0);

        let candidates = roast_candidates(&stats);
        assert!(candidates.iter().any(|r| r.contains("losing more than a casino")));
        assert!(!candidates.iter().any(|r| r.contains("coin flip")));
    }

    #[test]
    fn test_pick_is_drawn_from_candidates() {
        let stats = AggregateStats::from_matches(window(10, 4)).unwrap();
        let candidates = roast_candidates(&stats);

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let roast = pick_roast(&stats, &mut rng);
            assert!(candidates.contains(&roast), "unexpected roast: {}", roast);
        }
    }

    #[test]
    fn test_seeded_pick_is_repeatable() {
        let stats = AggregateStats::from_matches(window(10, 4)).unwrap();
        let a = pick_roast(&stats, &mut StdRng::seed_from_u64(7));
        let b = pick_roast(&stats, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_default_when_nothing_matches() {
        // 52% win rate, 5 deaths, 6 cs/min, one champion
        let mut matches = window(25, 13);
        for m in matches.iter_mut() {
            m.deaths = 5;
        }
        let stats = AggregateStats::from_matches(matches).unwrap();
        assert!(roast_candidates(&stats).is_empty());
        assert_eq!(pick_roast(&stats, &mut StdRng::seed_from_u64(1)), DEFAULT_ROAST);
    }

    #[test]
    fn test_death_and_pool_rules() {
        let matches = vec![
            record(0, "Ahri", true, 2, 9, 1),
            record(1, "Zed", false, 1, 10, 0),
            record(2, "Zed", false, 0, 8, 2),
        ];
        let stats = AggregateStats::from_matches(matches).unwrap();
        let candidates = roast_candidates(&stats);

        assert!(candidates.iter().any(|r| r.contains("feeding simulator")));
        assert!(candidates.iter().any(|r| r.contains("100% better on Ahri than Zed")));
        assert!(candidates.iter().any(|r| r.contains("8+ times")));
    }

    #[test]
    fn test_low_cs_band() {
        let mut matches = window(4, 2);
        for m in matches.iter_mut() {
            m.cs = 90; // 3 per minute
        }
        let stats = AggregateStats::from_matches(matches).unwrap();
        assert!(roast_candidates(&stats).iter().any(|r| r.contains("Were you afk")));
    }
}
