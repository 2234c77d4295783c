//! Business logic services
//!
//! Services coordinate repositories with the scoring and gamification
//! engine in `fitquest-shared`.

pub mod game;
pub mod progress;

pub use game::GameService;
pub use progress::ProgressService;
