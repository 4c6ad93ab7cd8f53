pub mod champion_stats;
pub mod history;
pub mod match_record;
pub mod recommender;
pub mod roast;
pub mod timeline;
