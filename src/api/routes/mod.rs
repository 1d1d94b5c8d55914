pub mod leaderboard;
pub mod refresh;
pub mod root;
