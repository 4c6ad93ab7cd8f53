mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{match_with, participant, FakeSource, PUUID};
use league_roast::analysis::history::HistoryAggregator;
use league_roast::analysis::recommender::ChampionRecommender;
use league_roast::error::AppError;

fn aggregator(source: &Arc<FakeSource>) -> HistoryAggregator {
    HistoryAggregator::new(source.clone(), Duration::from_secs(5))
}

fn three_games() -> FakeSource {
    FakeSource::with_matches(vec![
        match_with("NA1_3", vec![participant(PUUID, "Ahri", 8, 2, 6, true), participant("other", "Zed", 2, 8, 1, false)]),
        match_with("NA1_2", vec![participant("other", "Lux", 1, 1, 1, true), participant(PUUID, "Zed", 2, 9, 1, false)]),
        match_with("NA1_1", vec![participant(PUUID, "Ahri", 4, 4, 4, false)]),
    ])
}

#[tokio::test]
async fn analyze_keeps_most_recent_first() {
    let source = Arc::new(three_games());

    let stats = aggregator(&source).analyze(PUUID, 3).await.unwrap();

    let ids: Vec<&str> = stats.matches.iter().map(|m| m.match_id.as_str()).collect();
    assert_eq!(ids, vec!["NA1_3", "NA1_2", "NA1_1"]);
    assert_eq!(stats.total_games, 3);
    assert_eq!(stats.wins, 1);
    assert_eq!(stats.champions[0].name, "Ahri");
    assert_eq!(stats.champions[0].games, 2);
    assert_eq!(stats.champions[1].name, "Zed");
    assert_eq!(stats.high_death_games, 1);
    assert_eq!(stats.max_deaths_in_game, 9);
}

#[tokio::test]
async fn analyze_respects_requested_window() {
    let source = Arc::new(three_games());

    let stats = aggregator(&source).analyze(PUUID, 2).await.unwrap();

    assert_eq!(stats.total_games, 2);
    assert_eq!(source.requested_counts(), vec![2]);
}

#[tokio::test]
async fn analyze_caps_at_provider_maximum() {
    let source = Arc::new(three_games());

    aggregator(&source).analyze(PUUID, 500).await.unwrap();

    assert_eq!(source.requested_counts(), vec![100]);
}

#[tokio::test]
async fn empty_history_is_no_matches_found() {
    let source = Arc::new(FakeSource::default());

    assert_eq!(
        aggregator(&source).analyze(PUUID, 10).await.unwrap_err(),
        AppError::NoMatchesFound
    );
    assert_eq!(
        aggregator(&source).analyze(PUUID, 0).await.unwrap_err(),
        AppError::NoMatchesFound
    );
}

#[tokio::test]
async fn player_missing_from_a_match_fails_the_analysis() {
    let source = Arc::new(FakeSource::with_matches(vec![
        match_with("NA1_2", vec![participant(PUUID, "Ahri", 1, 1, 1, true)]),
        match_with("NA1_1", vec![participant("someone-else", "Lux", 1, 1, 1, true)]),
    ]));

    let err = aggregator(&source).analyze(PUUID, 5).await.unwrap_err();

    assert_eq!(err, AppError::PlayerNotInMatch("NA1_1".to_string()));
}

#[tokio::test]
async fn fetch_failure_propagates() {
    let source = Arc::new(three_games().failing_match(
        "NA1_2",
        AppError::Provider { status: 503, message: "unavailable".to_string() },
    ));

    let err = aggregator(&source).analyze(PUUID, 3).await.unwrap_err();

    assert!(err.is_transient());
    assert!(matches!(err, AppError::Provider { status: 503, .. }));
}

#[tokio::test]
async fn analyzed_history_feeds_recommendations() {
    let source = Arc::new(three_games());
    let stats = aggregator(&source).analyze(PUUID, 3).await.unwrap();

    let recs = ChampionRecommender::get_recommendations(&stats);

    assert_eq!(recs.all.len(), 2);
    assert_eq!(recs.recommended[0].name, "Ahri");
    assert_eq!(recs.discouraged.last().unwrap().name, "Zed");
}
