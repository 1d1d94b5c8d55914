//! Core data models for the bonus tracker.

mod leaderboard;
mod report;
mod summary;
mod tag;
mod war;

pub use leaderboard::*;
pub use report::*;
pub use summary::*;
pub use tag::*;
pub use war::*;
