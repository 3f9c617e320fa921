//! Neon Drift - A lane-based endless runner
//!
//! Core modules:
//! - `sim`: Run simulation (lane motion, spawning, collisions, difficulty, run state)
//! - `economy`: Coins, best score, cosmetic catalog and garage
//! - `persistence`: Key-value storage contract
//! - `platform`: Browser/native platform abstraction
//! - `renderer`: Presentation adapter (canvas 2D on web)
//! - `tuning`: Data-driven game balance
//! - `layout`: Viewport-derived geometry

pub mod economy;
pub mod game;
pub mod layout;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use economy::{Economy, EconomyStore};
pub use game::{Game, Snapshot};
pub use layout::Layout;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep, one tick per 60 Hz frame
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;
    /// Frame deltas above this are clamped (tab switches, debugger pauses)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Storage key for the persisted economy
    pub const ECONOMY_KEY: &str = "neonDriftData";
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Cubic ease-out on [0, 1]
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}
