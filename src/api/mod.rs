pub mod client;
pub mod endpoints;
pub mod models;

use crate::error::AppError;
use async_trait::async_trait;
use models::{AccountDto, LiveGameDto, MatchDto, TimelineDto};

/// Remote match-data provider.
///
/// `live_game` fails with `AppError::NoActiveMatch` when the player is not in a game.
/// `match_ids` returns most recent first, clamped to the provider maximum.
#[async_trait]
pub trait MatchSource: Send + Sync {
    async fn account(&self, game_name: &str, tag_line: &str) -> Result<AccountDto, AppError>;

    async fn live_game(&self, puuid: &str) -> Result<LiveGameDto, AppError>;

    async fn match_ids(&self, puuid: &str, count: usize) -> Result<Vec<String>, AppError>;

    async fn match_detail(&self, match_id: &str) -> Result<MatchDto, AppError>;

    async fn timeline(&self, match_id: &str) -> Result<TimelineDto, AppError>;
}

/// Splits `Name#TAG` into its two halves.
pub fn parse_riot_id(riot_id: &str) -> Result<(String, String), AppError> {
    let (name, tag) = riot_id.split_once('#').ok_or(AppError::InvalidRiotId)?;
    let (name, tag) = (name.trim(), tag.trim());
    if name.is_empty() || tag.is_empty() || tag.contains('#') {
        return Err(AppError::InvalidRiotId);
    }
    Ok((name.to_string(), tag.to_string()))
}
