use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::ProgressBar;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use league_roast::analysis::champion_stats::AggregateStats;
use league_roast::analysis::history::HistoryAggregator;
use league_roast::analysis::match_record::{self, MatchRecord};
use league_roast::analysis::recommender::ChampionRecommender;
use league_roast::analysis::roast::pick_roast;
use league_roast::analysis::timeline::TimelineMoments;
use league_roast::api::client::RiotApiClient;
use league_roast::api::{parse_riot_id, MatchSource};
use league_roast::commentary::groq::GroqClient;
use league_roast::commentary::prompt::{self, Prompt};
use league_roast::commentary::{CommentaryService, DisabledCommentary};
use league_roast::config::Config;
use league_roast::display::messages::champion_report;
use league_roast::display::output::{
    display_champion_breakdown, display_error, display_info, display_recommendations, display_roast,
    display_stats_overview, display_success,
};
use league_roast::error::{bounded, AppError};
use league_roast::live::SessionTracker;
use league_roast::store::{JsonFileStore, RegisteredPlayer, SessionStore};
use league_roast::transport::{deliver, settle, ConsoleTransport};

const CONSOLE_CHANNEL: &str = "console";

#[derive(Parser, Debug)]
#[command(name = "League Roast")]
#[command(about = "Roast League of Legends players from their match history and live games", long_about = None)]
struct Args {
    /// Region (default: na1)
    #[arg(short, long, global = true)]
    region: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Link a user to a Riot ID (Name#TAG)
    Register { user: String, riot_id: String },

    /// Analyze recent games, score champions and roast the result
    Analyze {
        user: String,

        /// Number of matches to analyze (default: 10, max: 100)
        #[arg(short, long, default_value = "10")]
        matches: usize,
    },

    /// Roast the most recent game
    Roast {
        user: String,

        /// Also dissect the minute-by-minute timeline
        #[arg(long)]
        timeline: bool,
    },

    /// Narrate the user's current live game until it ends
    Live { user: String },
}

struct App {
    config: Config,
    source: Arc<dyn MatchSource>,
    commentary: Arc<dyn CommentaryService>,
    store: Arc<dyn SessionStore>,
}

impl App {
    fn new(config: Config) -> Self {
        let commentary: Arc<dyn CommentaryService> = match &config.groq_api_key {
            Some(key) => Arc::new(GroqClient::new(
                key.clone(),
                config.groq_models.clone(),
                config.tracker.call_timeout,
            )),
            None => {
                warn!("GROQ_API_KEY not set, commentary falls back to canned roasts");
                Arc::new(DisabledCommentary)
            }
        };

        App {
            source: Arc::new(RiotApiClient::new(config.clone())),
            store: Arc::new(JsonFileStore::new(config.data_dir.clone())),
            commentary,
            config,
        }
    }

    fn timeout(&self) -> Duration {
        self.config.tracker.call_timeout
    }

    async fn registered(&self, user: &str) -> Result<RegisteredPlayer> {
        let player = self
            .store
            .find_user(user)
            .await
            .context("failed to read user registry")?;
        Ok(player.ok_or(AppError::NotRegistered)?)
    }

    /// Generated text, or `fallback()` when generation fails or times out.
    async fn commentary_or(&self, request: &Prompt, fallback: impl FnOnce() -> String) -> String {
        match bounded(self.timeout(), "commentary", self.commentary.generate(request)).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "commentary unavailable, using fallback");
                fallback()
            }
        }
    }
}

#[tokio::main]
async fn main() {
    init_logging();
    let args = Args::parse();

    if let Err(e) = run(args).await {
        match e.downcast_ref::<AppError>() {
            Some(app_err) if app_err.is_not_found() => display_info(&app_err.to_string()),
            _ => display_error(&format!("{:#}", e)),
        }
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,league_roast=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

async fn run(args: Args) -> Result<()> {
    let mut config = Config::from_env()?;
    if let Some(region) = args.region {
        config.region = region;
    }
    let app = App::new(config);

    match args.command {
        Command::Register { user, riot_id } => register(&app, &user, &riot_id).await,
        Command::Analyze { user, matches } => analyze(&app, &user, matches).await,
        Command::Roast { user, timeline } => roast_latest(&app, &user, timeline).await,
        Command::Live { user } => live(app, &user).await,
    }
}

async fn register(app: &App, user: &str, riot_id: &str) -> Result<()> {
    let (game_name, tag_line) = parse_riot_id(riot_id)?;
    display_info(&format!(
        "Looking up {}#{} in region {}",
        game_name, tag_line, app.config.region
    ));

    let account = bounded(app.timeout(), "account lookup", app.source.account(&game_name, &tag_line)).await?;
    let player = RegisteredPlayer {
        user_id: user.to_string(),
        puuid: account.puuid,
        game_name: if account.game_name.is_empty() { game_name } else { account.game_name },
        tag_line: if account.tag_line.is_empty() { tag_line } else { account.tag_line },
        created_at: chrono::Utc::now(),
    };
    app.store
        .save_user(&player)
        .await
        .context("failed to save registration")?;
    display_success(&format!("Registered {} as {}", user, player.riot_id()));

    let name_roast = app
        .commentary_or(&prompt::player_name(&player.game_name, &player.tag_line), || {
            format!("{}? Even your name sounds hardstuck.", player.riot_id())
        })
        .await;
    display_roast("🔥 FIRST IMPRESSIONS", &name_roast);
    Ok(())
}

async fn analyze(app: &App, user: &str, matches: usize) -> Result<()> {
    let player = app.registered(user).await?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("Fetching the last {} games of {}", matches, player.riot_id()));
    spinner.enable_steady_tick(Duration::from_millis(100));
    let stats = HistoryAggregator::new(app.source.clone(), app.timeout())
        .analyze(&player.puuid, matches)
        .await;
    spinner.finish_and_clear();
    let stats = stats?;

    display_stats_overview(&stats, &player.riot_id());
    display_champion_breakdown(&stats);

    let recs = ChampionRecommender::get_recommendations(&stats);
    display_recommendations(&recs);
    println!("{}\n", champion_report(&stats, &recs));

    let verdict = app
        .commentary_or(&prompt::stats_summary(&stats), || {
            pick_roast(&stats, &mut rand::thread_rng())
        })
        .await;
    display_roast("🔥 THE VERDICT", &verdict);
    Ok(())
}

async fn roast_latest(app: &App, user: &str, with_timeline: bool) -> Result<()> {
    let player = app.registered(user).await?;

    let ids = bounded(app.timeout(), "match history", app.source.match_ids(&player.puuid, 1)).await?;
    let match_id = ids.first().ok_or(AppError::NoMatchesFound)?;
    let data = bounded(app.timeout(), "match details", app.source.match_detail(match_id)).await?;
    let participant = match_record::find_participant(&data, &player.puuid)?;

    display_info(&format!(
        "{} on {}: {}/{}/{} ({})",
        player.riot_id(),
        participant.champion_name,
        participant.kills,
        participant.deaths,
        participant.assists,
        if participant.win { "win" } else { "loss" }
    ));

    let single = AggregateStats::from_matches(vec![MatchRecord::from_match(&data, &player.puuid)?])?;
    let text = app
        .commentary_or(&prompt::match_performance(participant, data.info.game_duration), || {
            pick_roast(&single, &mut rand::thread_rng())
        })
        .await;
    display_roast("🔥 LAST GAME ROAST", &text);

    if with_timeline {
        let timeline = bounded(app.timeout(), "match timeline", app.source.timeline(match_id)).await?;
        let moments = TimelineMoments::from_timeline(&timeline, &player.puuid)?;
        let text = app
            .commentary_or(
                &prompt::timeline(&participant.champion_name, &moments, participant.win),
                || {
                    format!(
                        "{} early deaths and {} late deaths. The timeline speaks for itself.",
                        moments.early_deaths.len(),
                        moments.late_deaths.len()
                    )
                },
            )
            .await;
        display_roast("⏱️ TIMELINE BREAKDOWN", &text);
    }

    Ok(())
}

async fn live(app: App, user: &str) -> Result<()> {
    let player = app.registered(user).await?;
    let console = Arc::new(ConsoleTransport::new());
    let limit = app.config.tracker.call_timeout;
    let tracker = SessionTracker::new(
        app.source.clone(),
        app.commentary.clone(),
        app.store.clone(),
        console.clone(),
        app.config.tracker.clone(),
    );

    let loading = deliver(console.as_ref(), CONSOLE_CHANNEL, "⏳ Looking for your live game...", limit).await;
    let started = tracker.start(user, &player.puuid, CONSOLE_CHANNEL).await;
    if let Some(id) = loading {
        let found = started.as_ref().ok().map(|info| format!("✅ Found live game {}", info.match_id));
        settle(console.as_ref(), CONSOLE_CHANNEL, id, found.as_deref(), limit).await;
    }
    started?;
    display_info("Type `stop` to end tracking, `status` for session info, or press Ctrl+C.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = tracker.wait_until_ended(user) => {
                display_success("Match over, tracking finished");
                break;
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) if line.trim().eq_ignore_ascii_case("stop") => {
                    tracker.stop(user).await;
                    break;
                }
                Ok(Some(line)) if line.trim().eq_ignore_ascii_case("status") => {
                    for info in tracker.active_sessions().await {
                        display_info(&format!(
                            "{} tracking match {} for {}s, {} events",
                            info.user_id, info.match_id, info.elapsed_secs, info.events
                        ));
                    }
                }
                Ok(Some(_)) => {}
                Ok(None) | Err(_) => stdin_open = false,
            },
            _ = tokio::signal::ctrl_c() => {
                let stopped = tracker.stop_all().await;
                display_info(&format!("Stopped {} session(s)", stopped));
                break;
            }
        }
    }

    Ok(())
}
