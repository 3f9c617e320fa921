//! Run state and core simulation types
//!
//! Everything a tick reads or writes lives in [`GameState`]. Rendering only
//! ever sees it through a shared borrow.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::layout::{Layout, OBSTACLE_SPAWN_Y, PICKUP_SPAWN_Y};
use crate::tuning::Tuning;

/// Top-level mode of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RunState {
    /// Title screen, waiting for the primary action
    #[default]
    Menu,
    /// Active run
    Playing,
    /// Run frozen, nothing advances
    Paused,
    /// Run ended by an obstacle
    GameOver,
}

/// The player's vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Lane the vehicle is leaving (or sitting in)
    pub current_lane: u8,
    /// Lane the vehicle is heading to
    pub target_lane: u8,
    /// Lane-change progress in [0, 1]
    pub progress: f32,
    /// A lane change is in flight
    pub moving: bool,
    /// Ticks of shield left (active while > 0)
    pub shield_ticks: u32,
    /// Horizontal center, derived from the lanes and progress
    pub x: f32,
    /// Vertical center, fixed by the layout
    pub y: f32,
}

impl Player {
    pub fn new(lane: u8, layout: &Layout) -> Self {
        Self {
            current_lane: lane,
            target_lane: lane,
            progress: 0.0,
            moving: false,
            shield_ticks: 0,
            x: layout.lane_x(lane),
            y: layout.player_y,
        }
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn shield_active(&self) -> bool {
        self.shield_ticks > 0
    }
}

/// Power-up flavors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Absorbs one obstacle hit
    Shield,
    /// Knocks speed down a notch
    SlowMo,
}

/// What an entity is, which decides its collision outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Obstacle,
    Coin,
    PowerUp(PowerUpKind),
}

impl EntityKind {
    /// Half-extent of the forgiving hit box for this category
    pub fn reach(&self, tuning: &Tuning) -> f32 {
        match self {
            EntityKind::Obstacle => tuning.obstacle_reach,
            EntityKind::Coin => tuning.coin_reach,
            EntityKind::PowerUp(_) => tuning.powerup_reach,
        }
    }

    /// Drawn size (width, height); circular entities report their diameter
    pub fn visual_size(&self) -> Vec2 {
        match self {
            EntityKind::Obstacle => Vec2::new(40.0, 30.0),
            EntityKind::Coin => Vec2::splat(20.0),
            EntityKind::PowerUp(_) => Vec2::splat(24.0),
        }
    }

    fn spawn_y(&self) -> f32 {
        match self {
            EntityKind::Obstacle => OBSTACLE_SPAWN_Y,
            EntityKind::Coin | EntityKind::PowerUp(_) => PICKUP_SPAWN_Y,
        }
    }
}

/// A scrolling entity (obstacle, coin or power-up)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub lane: u8,
    pub pos: Vec2,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0-1, decreases over time
    pub life: f32,
    pub size: f32,
}

/// Maximum live particles
pub const MAX_PARTICLES: usize = 128;

/// Current speed of the road
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyState {
    /// Pixels per tick, within [min_speed, max_speed]
    pub speed: f32,
}

/// Per-category spawn timers (ticks since the last expiry)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnTimers {
    pub obstacle: u32,
    pub coin: u32,
    pub powerup: u32,
}

/// Things that happened during a tick that the outside world cares about
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new run began
    RunStarted,
    /// A coin was picked up and is worth `value` coins
    CoinCollected { value: u64 },
    /// The shield ate an obstacle at `pos`
    ShieldAbsorbed { pos: Vec2 },
    /// A power-up took effect
    PowerUpCollected(PowerUpKind),
    /// The run ended. `coins_earned` is the score conversion owed to the player
    GameOver {
        score: u64,
        coins_earned: u64,
    },
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Balance parameters
    pub tuning: Tuning,
    /// Current viewport geometry
    pub layout: Layout,
    /// Current mode
    pub phase: RunState,
    pub player: Player,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Entity>,
    /// Live coins in spawn order
    pub coins: Vec<Entity>,
    /// Live power-ups in spawn order
    pub powerups: Vec<Entity>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub difficulty: DifficultyState,
    /// Accumulated score
    pub score: f64,
    pub timers: SpawnTimers,
    /// Lane marking scroll, in [0, ROAD_MARK_PERIOD)
    pub road_offset: f32,
    /// Playing ticks elapsed in this run
    pub time_ticks: u64,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a fresh state sitting on the menu
    pub fn new(tuning: Tuning, layout: Layout, seed: u64) -> Self {
        let player = Player::new(tuning.start_lane, &layout);
        let difficulty = DifficultyState {
            speed: tuning.min_speed,
        };
        Self {
            tuning,
            layout,
            phase: RunState::Menu,
            player,
            obstacles: Vec::new(),
            coins: Vec::new(),
            powerups: Vec::new(),
            particles: Vec::new(),
            difficulty,
            score: 0.0,
            timers: SpawnTimers::default(),
            road_offset: 0.0,
            time_ticks: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Reset everything run-scoped and enter Playing
    pub fn start_game(&mut self) {
        self.player = Player::new(self.tuning.start_lane, &self.layout);
        self.obstacles.clear();
        self.coins.clear();
        self.powerups.clear();
        self.particles.clear();
        self.difficulty.speed = self.tuning.min_speed;
        self.score = 0.0;
        self.timers = SpawnTimers::default();
        self.road_offset = 0.0;
        self.time_ticks = 0;
        self.phase = RunState::Playing;
        self.events.push(GameEvent::RunStarted);
        log::info!("Run started (speed {:.1})", self.difficulty.speed);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Spawn an entity above the visible area in `lane`
    pub fn spawn_entity(&mut self, kind: EntityKind, lane: u8) -> u32 {
        self.place_entity(kind, lane, kind.spawn_y())
    }

    /// Put an entity at an explicit height in `lane`
    pub fn place_entity(&mut self, kind: EntityKind, lane: u8, y: f32) -> u32 {
        let lane = lane.min(self.tuning.last_lane());
        let id = self.next_entity_id();
        let entity = Entity {
            id,
            kind,
            lane,
            pos: Vec2::new(self.layout.lane_x(lane), y),
        };
        match kind {
            EntityKind::Obstacle => self.obstacles.push(entity),
            EntityKind::Coin => self.coins.push(entity),
            EntityKind::PowerUp(_) => self.powerups.push(entity),
        }
        id
    }

    /// Swap in a new layout, re-deriving positions without touching the run
    pub fn resize(&mut self, layout: Layout) {
        self.layout = layout;
        let easing = self.tuning.lane_easing;
        super::motion::sync_player_x(&mut self.player, &self.layout, easing);
        self.player.y = layout.player_y;
        for entity in self
            .obstacles
            .iter_mut()
            .chain(self.coins.iter_mut())
            .chain(self.powerups.iter_mut())
        {
            entity.pos.x = layout.lane_x(entity.lane);
        }
    }

    /// Score as shown to the player
    pub fn floored_score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }

    /// Total live entities across all categories
    pub fn entity_count(&self) -> usize {
        self.obstacles.len() + self.coins.len() + self.powerups.len()
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(Tuning::default(), Layout::default(), 7)
    }

    #[test]
    fn test_new_state_on_menu() {
        let state = state();
        assert_eq!(state.phase, RunState::Menu);
        assert_eq!(state.player.current_lane, 1);
        assert_eq!(state.difficulty.speed, 5.0);
        assert_eq!(state.entity_count(), 0);
    }

    #[test]
    fn test_spawn_routes_to_category() {
        let mut state = state();
        state.spawn_entity(EntityKind::Obstacle, 0);
        state.spawn_entity(EntityKind::Coin, 1);
        state.spawn_entity(EntityKind::PowerUp(PowerUpKind::Shield), 2);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.coins.len(), 1);
        assert_eq!(state.powerups.len(), 1);
        assert_eq!(state.obstacles[0].pos.y, OBSTACLE_SPAWN_Y);
        assert_eq!(state.coins[0].pos.y, PICKUP_SPAWN_Y);
        assert_eq!(state.powerups[0].pos.x, state.layout.lane_x(2));
    }

    #[test]
    fn test_entity_ids_increase() {
        let mut state = state();
        let a = state.spawn_entity(EntityKind::Coin, 0);
        let b = state.spawn_entity(EntityKind::Coin, 0);
        assert!(b > a);
    }

    #[test]
    fn test_resize_keeps_run() {
        let mut state = state();
        state.start_game();
        state.score = 123.0;
        state.place_entity(EntityKind::Obstacle, 2, 100.0);

        state.resize(Layout::from_viewport(900.0, 1600.0, 3));

        assert_eq!(state.phase, RunState::Playing);
        assert_eq!(state.score, 123.0);
        assert_eq!(state.obstacles[0].pos.y, 100.0);
        assert_eq!(state.obstacles[0].pos.x, state.layout.lane_x(2));
        assert_eq!(state.player.x, state.layout.lane_x(1));
        assert_eq!(state.player.y, 1480.0);
    }

    #[test]
    fn test_start_game_emits_event() {
        let mut state = state();
        state.start_game();
        assert_eq!(state.drain_events(), vec![GameEvent::RunStarted]);
        assert!(state.drain_events().is_empty());
    }
}
