//! Simulation Events
//!
//! Notable outcomes of a frame, queued on the [`World`](super::world::World)
//! and drained by the game-state collaborator. Win/lose screens, scoring
//! and audio react to these; the simulation itself keeps running.

use serde::{Deserialize, Serialize};

/// An event produced during a frame step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    /// The hero collected a coin.
    CoinCollected {
        /// Coins still uncollected in the level
        coins_remaining: u32,
    },
    /// The hero touched an enemy and was sent back to spawn.
    HeroHit {
        /// Lives left after the hit
        lives_remaining: u32,
    },
    /// The hero was hit with no lives left.
    HeroDied,
}

impl SimEvent {
    /// Coin pickup event.
    pub fn coin_collected(coins_remaining: u32) -> Self {
        SimEvent::CoinCollected { coins_remaining }
    }

    /// Enemy-contact event.
    pub fn hero_hit(lives_remaining: u32) -> Self {
        SimEvent::HeroHit { lives_remaining }
    }

    /// Final-life event.
    pub fn hero_died() -> Self {
        SimEvent::HeroDied
    }
}
