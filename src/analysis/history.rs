use std::sync::Arc;
use std::time::Duration;

use futures::future::try_join_all;
use tracing::{debug, info};

use super::champion_stats::AggregateStats;
use super::match_record::MatchRecord;
use crate::api::client::MAX_MATCH_IDS;
use crate::api::MatchSource;
use crate::error::{bounded, AppError};

/// Fetches a window of recent games and reduces them to `AggregateStats`.
pub struct HistoryAggregator {
    source: Arc<dyn MatchSource>,
    call_timeout: Duration,
}

impl HistoryAggregator {
    pub fn new(source: Arc<dyn MatchSource>, call_timeout: Duration) -> Self {
        HistoryAggregator {
            source,
            call_timeout,
        }
    }

    /// All-or-nothing: any failed fetch fails the whole analysis.
    pub async fn analyze(&self, puuid: &str, match_count: usize) -> Result<AggregateStats, AppError> {
        let wanted = match_count.min(MAX_MATCH_IDS);
        if wanted == 0 {
            return Err(AppError::NoMatchesFound);
        }

        let mut match_ids = bounded(
            self.call_timeout,
            "match history",
            self.source.match_ids(puuid, wanted),
        )
        .await?;
        match_ids.truncate(wanted);

        if match_ids.is_empty() {
            return Err(AppError::NoMatchesFound);
        }
        debug!(puuid, count = match_ids.len(), "fetching match details");

        // try_join_all keeps request order, so records stay most recent first.
        let records = try_join_all(match_ids.iter().map(|id| self.fetch_record(id, puuid))).await?;

        let stats = AggregateStats::from_matches(records)?;
        info!(
            puuid,
            games = stats.total_games,
            win_rate = stats.win_rate,
            "match history analyzed"
        );
        Ok(stats)
    }

    async fn fetch_record(&self, match_id: &str, puuid: &str) -> Result<MatchRecord, AppError> {
        let data = bounded(self.call_timeout, "match details", self.source.match_detail(match_id)).await?;
        MatchRecord::from_match(&data, puuid)
    }
}
