//! AI opponent: difficulty configuration and move selection
//!
//! - [`config`] - game mode and difficulty tiers
//! - [`policy`] - the (position, difficulty) -> move decision function
//!
//! The external engine itself lives behind [`crate::engine::MoveEngine`].

pub mod config;
pub mod policy;

pub use config::{Difficulty, GameMode};
pub use policy::{MovePolicy, ENGINE_TIME_BUDGET};
