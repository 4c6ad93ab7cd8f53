pub mod detector;
pub mod session;
pub mod tracker;

pub use tracker::SessionTracker;
