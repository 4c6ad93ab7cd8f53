use crate::analysis::champion_stats::AggregateStats;
use crate::analysis::recommender::Recommendations;
use colored::*;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct MatchRow {
    #[tabled(rename = "#")]
    number: String,
    champion: String,
    role: String,
    result: String,
    kda: String,
    cs: String,
}

#[derive(Tabled)]
struct ChampionRow {
    champion: String,
    games: String,
    win_rate: String,
    kda: String,
    avg_cs: String,
    avg_deaths: String,
}

#[derive(Tabled)]
struct FitRow {
    rank: String,
    champion: String,
    games: String,
    win_rate: String,
    score: String,
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn display_roast(title: &str, text: &str) {
    println!("\n{}", title.bold().red());
    println!("{}\n", "=".repeat(60).red());
    println!("{}\n", text);
}

pub fn display_stats_overview(stats: &AggregateStats, player_name: &str) {
    println!(
        "\n{}",
        format!("📊 STATS FOR {} (Last {} Games)", player_name, stats.total_games)
            .bold()
            .cyan()
    );
    println!("{}\n", "=".repeat(80).cyan());
    println!(
        "{} {} W / {} L ({:.1}% WR)",
        "📈 Overall:".bold(),
        stats.wins.to_string().green(),
        stats.losses.to_string().red(),
        stats.win_rate
    );
    println!(
        "{} {:.1}/{:.1}/{:.1} (KDA {:.2})  CS/min {:.1}  Vision {:.1}\n",
        "⚔️ Average:".bold(),
        stats.avg_kills,
        stats.avg_deaths,
        stats.avg_assists,
        stats.avg_kda,
        stats.avg_cs_per_minute,
        stats.avg_vision
    );

    let rows: Vec<MatchRow> = stats
        .matches
        .iter()
        .enumerate()
        .map(|(idx, m)| MatchRow {
            number: format!("{}", idx + 1),
            champion: m.champion_name.clone(),
            role: m.role.clone(),
            result: if m.win {
                "WIN".green().to_string()
            } else {
                "LOSS".red().to_string()
            },
            kda: format!("{}/{}/{}", m.kills, m.deaths, m.assists),
            cs: m.cs.to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);

    if stats.high_death_games > 0 {
        println!(
            "  {} {} games with 8+ deaths (worst: {})\n",
            "⚠️".red(),
            stats.high_death_games,
            stats.max_deaths_in_game
        );
    }
}

pub fn display_champion_breakdown(stats: &AggregateStats) {
    println!("{}", "🧙 CHAMPION BREAKDOWN".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    let rows: Vec<ChampionRow> = stats
        .most_played()
        .into_iter()
        .map(|c| ChampionRow {
            champion: c.name.clone(),
            games: c.games.to_string(),
            win_rate: format!("{:.1}%", c.win_rate()),
            kda: format!("{:.2}", c.avg_kda()),
            avg_cs: format!("{:.1}", c.avg_cs()),
            avg_deaths: format!("{:.1}", c.avg_deaths()),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_recommendations(recs: &Recommendations) {
    if recs.all.is_empty() {
        println!("{}", "No champion data available (not enough games)".yellow());
        return;
    }

    println!("{}", "🎯 CHAMPION FIT SCORES".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    let rows: Vec<FitRow> = recs
        .all
        .iter()
        .enumerate()
        .map(|(idx, c)| FitRow {
            rank: format!("#{}", idx + 1),
            champion: c.name.clone(),
            games: c.games.to_string(),
            win_rate: format!("{:.0}%", c.win_rate),
            score: format!("{:.2}", c.fit_score),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    println!("\n{}", "Interpretation".bold().yellow());
    println!("• Score: win rate weighted heaviest, then CS, KDA and deaths against your own average");
    println!("• Top 3 are your safest picks, the bottom 2 are the ones to drop\n");
}
