//! Chat-bot core that roasts League of Legends players: history analysis,
//! champion fit scoring and live-match narration.

pub mod analysis;
pub mod api;
pub mod commentary;
pub mod config;
pub mod display;
pub mod error;
pub mod live;
pub mod store;
pub mod transport;
