// Chat-facing text templates. Every notification has a plain version that is
// sent as-is when commentary generation is unavailable.

use crate::analysis::champion_stats::AggregateStats;
use crate::analysis::recommender::{ChampionFitScore, Recommendations};
use crate::live::detector::{GameEvent, PlayerSnapshot};

pub fn tracking_started(game_mode: &str, champion: &str) -> String {
    format!(
        "🎮 LIVE MATCH TRACKING STARTED 🎮\n\n\
         📊 Game Mode: {}\n\
         🧙 Champion: {}\n\n\
         🔄 Updates incoming... Get ready to get roasted! 🔥",
        if game_mode.is_empty() { "UNKNOWN" } else { game_mode },
        if champion.is_empty() { "Champion" } else { champion },
    )
}

pub fn event_message(event: &GameEvent, snapshot: &PlayerSnapshot, champion: &str) -> String {
    let kda = snapshot.kda_line();
    match event {
        GameEvent::Kill(count) => format!(
            "🔥 {}\n\nGot a kill with {}? Nice farm pick, probably against an afk. 💀\nK/D/A: {}",
            if *count == 1 { "KILL!".to_string() } else { format!("{}x KILLS", count) },
            champion,
            kda
        ),
        GameEvent::Multikill(count) => format!(
            "🔥🔥🔥 {}x MULTIKILL! 🔥🔥🔥\n\nOkay fine, that was actually impressive. Don't let it go to your head.\nK/D/A: {}",
            count, kda
        ),
        GameEvent::Death(count) => format!(
            "💀 DEAD AGAIN! 💀\n\nThat's {} more death. You're becoming cannon fodder.\nK/D/A: {}\nGold: {}",
            count, kda, snapshot.gold
        ),
        GameEvent::Feeding(count) => format!(
            "💀💀💀 FEEDING DETECTED 💀💀💀\n\n{} deaths in a row?! You're not a player, you're a liability!\nK/D/A: {}",
            count, kda
        ),
        GameEvent::GoldSwing(amount) => format!(
            "📉 MASSIVE GOLD LOSS 📉\n\nLost {} gold! The enemy is farming you. 🤡\nCurrent Gold: {}",
            amount, snapshot.gold
        ),
    }
}

/// Appends generated flavor to a templated message.
pub fn with_commentary(base: &str, commentary: Option<&str>) -> String {
    match commentary {
        Some(line) => format!("{}\n\n🎙️ {}", base, line),
        None => base.to_string(),
    }
}

pub fn live_status(snapshot: &PlayerSnapshot, next_update_secs: u64) -> String {
    format!(
        "⏱️ Live Match Update\n\n\
         📊 Game Time: {}m {}s\n\
         K/D/A: {}\n\
         💰 Gold: {}\n\
         🧿 CS: {}\n\
         ⚡ Level: {}\n\
         Team Score: {} vs {}\n\n\
         🔄 Next update in {}s...",
        snapshot.game_duration_secs / 60,
        snapshot.game_duration_secs % 60,
        snapshot.kda_line(),
        snapshot.gold,
        snapshot.cs,
        snapshot.level,
        snapshot.team_kills,
        snapshot.enemy_team_kills,
        next_update_secs
    )
}

pub fn match_ended(snapshot: &PlayerSnapshot, events: usize) -> String {
    format!(
        "🏁 MATCH ENDED 🏁\n\n\
         Final Stats:\n\
         📊 K/D/A: {}\n\
         💰 Gold: {}\n\
         🧿 CS: {}\n\
         📣 Roastable moments: {}\n\n\
         GG! Run `roast` to see the full breakdown.",
        snapshot.kda_line(),
        snapshot.gold,
        snapshot.cs,
        events
    )
}

pub fn tracking_stopped() -> String {
    "🛑 Live tracking stopped.".to_string()
}

fn discourage_reason(champ: &ChampionFitScore, stats: &AggregateStats) -> &'static str {
    if champ.win_rate < 40.0 {
        "Terrible win rate"
    } else if champ.avg_deaths > stats.avg_deaths + 2.0 {
        "You die too much"
    } else if champ.avg_kda < stats.avg_kda {
        "Weak KDA"
    } else {
        "Not working for you"
    }
}

/// The long-form champion recommendation report.
pub fn champion_report(stats: &AggregateStats, recs: &Recommendations) -> String {
    let mut report = vec!["🎯 PERSONALIZED CHAMPION RECOMMENDATIONS\n".to_string()];

    report.push("✅ Best Champions For You:".to_string());
    for (idx, champ) in recs.recommended.iter().enumerate() {
        let medal = ["🥇", "🥈", "🥉"].get(idx).copied().unwrap_or("•");
        report.push(format!(
            "{} {}\n  • Win Rate: {:.0}%\n  • Avg KDA: {:.2}\n  • Avg CS: {:.1}\n  • Games: {}",
            medal, champ.name, champ.win_rate, champ.avg_kda, champ.avg_cs, champ.games
        ));
    }

    if let Some(top) = recs.recommended.first() {
        report.push("\n📊 Why These Champions Work For You:".to_string());
        if top.win_rate >= 50.0 {
            report.push(format!("✓ {} has {:.0}% win rate - your most consistent pick", top.name, top.win_rate));
        }
        if top.avg_kda > stats.avg_kda {
            report.push(format!("✓ Better KDA than your average ({:.2} vs {:.2})", top.avg_kda, stats.avg_kda));
        }
        if top.avg_deaths < stats.avg_deaths {
            report.push(format!(
                "✓ Fewer deaths ({:.1} vs {:.2} avg) - safer playstyle",
                top.avg_deaths, stats.avg_deaths
            ));
        }
        if top.avg_cs > stats.avg_cs {
            report.push(format!("✓ Higher CS ({:.1}) - better farming with this champ", top.avg_cs));
        }
    }

    report.push("\n❌ STOP PICKING THESE:".to_string());
    for champ in &recs.discouraged {
        report.push(format!(
            "❌ {} - {:.0}% WR ({})",
            champ.name,
            champ.win_rate,
            discourage_reason(champ, stats)
        ));
    }

    report.push("\n🔍 YOUR PLAYSTYLE ANALYSIS:".to_string());
    if stats.avg_cs_per_minute < 4.5 {
        report.push("⚠️ Low CS - you're weak at farming. Pick champions that don't need scaling".to_string());
    } else if stats.avg_cs_per_minute > 7.0 {
        report.push("✓ Good CS - you can pick scaling champions and carry late game".to_string());
    }
    if stats.avg_deaths > 6.0 {
        report.push("⚠️ High deaths - pick safer champions with better escape mechanics".to_string());
    } else if stats.avg_deaths < 4.0 {
        report.push("✓ Low deaths - you can play aggressive champions".to_string());
    }
    if stats.avg_kda < 1.5 {
        report.push("⚠️ Low KDA - focus on utility/support champions over carry champions".to_string());
    } else if stats.avg_kda > 3.0 {
        report.push("✓ High KDA - you can hard carry on mechanical champions".to_string());
    }

    report.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::champion_stats::fixtures::record;
    use crate::analysis::recommender::ChampionRecommender;

    #[test]
    fn test_kill_message_pluralizes() {
        let snapshot = PlayerSnapshot { kills: 2, ..Default::default() };
        assert!(event_message(&GameEvent::Kill(1), &snapshot, "Ahri").contains("KILL!"));
        assert!(event_message(&GameEvent::Kill(2), &snapshot, "Ahri").contains("2x KILLS"));
    }

    #[test]
    fn test_with_commentary() {
        assert_eq!(with_commentary("base", None), "base");
        assert_eq!(with_commentary("base", Some("ouch")), "base\n\n🎙️ ouch");
    }

    #[test]
    fn test_status_formats_game_time() {
        let snapshot = PlayerSnapshot { game_duration_secs: 754, ..Default::default() };
        assert!(live_status(&snapshot, 15).contains("Game Time: 12m 34s"));
    }

    #[test]
    fn test_report_sections() {
        let stats = AggregateStats::from_matches(vec![
            record(0, "Ahri", true, 8, 2, 6),
            record(1, "Zed", false, 2, 9, 1),
            record(2, "Lux", true, 3, 4, 14),
        ])
        .unwrap();
        let recs = ChampionRecommender::get_recommendations(&stats);
        let report = champion_report(&stats, &recs);

        assert!(report.contains("🥇 Ahri"));
        assert!(report.contains("❌ Zed - 0% WR (Terrible win rate)"));
        assert!(report.contains("YOUR PLAYSTYLE ANALYSIS"));
    }
}
