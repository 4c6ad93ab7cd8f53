use crate::config::Config;
use crate::error::AppError;
use async_trait::async_trait;
use governor::{Quota, RateLimiter, state::{InMemoryState, NotKeyed}, clock::DefaultClock};
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

use super::endpoints;
use super::models::*;
use super::MatchSource;

/// Provider-side ceiling for match id listings.
pub const MAX_MATCH_IDS: usize = 100;

const MAX_RETRIES: u32 = 2;

pub struct RiotApiClient {
    config: Config,
    agent: ureq::Agent,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl RiotApiClient {
    pub fn new(config: Config) -> Self {
        // 20 requests per second rate limit
        let rate_limiter = RateLimiter::direct(Quota::per_second(NonZeroU32::new(20).unwrap()));
        let agent = ureq::AgentBuilder::new()
            .timeout(config.tracker.call_timeout)
            .user_agent("league_roast/0.1.0")
            .build();
        RiotApiClient {
            config,
            agent,
            rate_limiter,
        }
    }

    async fn get_json<T>(&self, url: String) -> Result<T, AppError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.rate_limiter.until_ready().await;

        let agent = self.agent.clone();
        let api_key = self.config.api_key.clone();
        let body = tokio::task::spawn_blocking(move || execute_request(&agent, &url, &api_key))
            .await
            .map_err(|e| AppError::HttpError(format!("request task failed: {}", e)))??;

        serde_json::from_str(&body).map_err(|e| AppError::JsonError(e.to_string()))
    }
}

fn execute_request(agent: &ureq::Agent, url: &str, api_key: &str) -> Result<String, AppError> {
    let mut retry_count = 0;

    loop {
        let response = agent.get(url).set("X-Riot-Token", api_key).call();

        match response {
            Ok(resp) => {
                return resp.into_string().map_err(|e| AppError::HttpError(e.to_string()));
            }
            Err(ureq::Error::Status(429, _)) => {
                // Rate limited - back off and retry
                if retry_count >= MAX_RETRIES {
                    return Err(AppError::RateLimited);
                }
                let wait_ms = 2000 * (retry_count + 1) as u64;
                warn!(wait_ms, "Riot API rate limited, backing off");
                thread::sleep(Duration::from_millis(wait_ms));
                retry_count += 1;
            }
            Err(ureq::Error::Status(status, resp)) => {
                let message = resp.into_string().unwrap_or_default();
                debug!(status, %message, "Riot API returned an error status");
                return Err(AppError::Provider { status, message });
            }
            Err(ureq::Error::Transport(t)) => {
                return Err(AppError::HttpError(t.to_string()));
            }
        }
    }
}

fn is_missing(err: &AppError) -> bool {
    matches!(err, AppError::Provider { status: 404, .. })
}

#[async_trait]
impl MatchSource for RiotApiClient {
    async fn account(&self, game_name: &str, tag_line: &str) -> Result<AccountDto, AppError> {
        let url = endpoints::account_by_riot_id(&self.config.region, game_name, tag_line);
        self.get_json(url).await.map_err(|e| {
            if is_missing(&e) {
                AppError::PlayerNotFound(format!("{}#{}", game_name, tag_line))
            } else {
                e
            }
        })
    }

    async fn live_game(&self, puuid: &str) -> Result<LiveGameDto, AppError> {
        let url = endpoints::active_game(&self.config.region, puuid);
        self.get_json(url).await.map_err(|e| {
            if is_missing(&e) {
                AppError::NoActiveMatch
            } else {
                e
            }
        })
    }

    async fn match_ids(&self, puuid: &str, count: usize) -> Result<Vec<String>, AppError> {
        let url = endpoints::match_ids(&self.config.region, puuid, count.min(MAX_MATCH_IDS));
        self.get_json(url).await
    }

    async fn match_detail(&self, match_id: &str) -> Result<MatchDto, AppError> {
        let url = endpoints::match_detail(&self.config.region, match_id);
        self.get_json(url).await
    }

    async fn timeline(&self, match_id: &str) -> Result<TimelineDto, AppError> {
        let url = endpoints::match_timeline(&self.config.region, match_id);
        self.get_json(url).await
    }
}
