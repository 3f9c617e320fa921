//! Run simulation module
//!
//! All gameplay logic lives here. This module must stay free of platform and
//! rendering concerns:
//! - Fixed ticks only (the host converts frame deltas into ticks)
//! - Seeded RNG only
//! - Stable iteration order (spawn order per category)

pub mod collision;
pub mod difficulty;
pub mod effects;
pub mod motion;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{overlaps, resolve_collisions};
pub use motion::Direction;
pub use state::{
    DifficultyState, Entity, EntityKind, GameEvent, GameState, MAX_PARTICLES, Particle, Player,
    PowerUpKind, RunState, SpawnTimers,
};
pub use tick::{TickInput, tick};
