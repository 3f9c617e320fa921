//! The game instance
//!
//! Ties the run simulation to the economy. The host owns exactly one
//! [`Game`], feeds it input intents between frames, calls [`Game::update`]
//! with the frame delta and hands [`Game::snapshot`] to a presenter.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::economy::{CosmeticProvider, EconomyStore, GarageCursor, Palette};
use crate::layout::Layout;
use crate::persistence::KeyValueStore;
use crate::renderer::{GarageView, Presenter, shapes};
use crate::sim::{
    DifficultyState, Entity, GameEvent, GameState, Particle, Player, RunState, TickInput, tick,
};
use crate::tuning::{Tuning, TuningError};

/// Discrete input events from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    /// Start from the menu, dismiss the game-over screen
    PrimaryAction,
    PauseToggle,
}

/// Outcome of the last finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub score: u64,
    pub coins_earned: u64,
    pub new_best: bool,
}

/// Read-only view of everything needed to draw a frame
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub phase: RunState,
    pub layout: &'a Layout,
    pub player: &'a Player,
    pub obstacles: &'a [Entity],
    pub coins: &'a [Entity],
    pub powerups: &'a [Entity],
    pub particles: &'a [Particle],
    pub difficulty: DifficultyState,
    /// Floored score
    pub score: u64,
    pub road_offset: f32,
    pub balance: u64,
    pub best_score: u64,
    pub vehicle: &'a str,
    pub palette: Palette,
    pub last_run: Option<RunSummary>,
}

/// One game: run state, economy and pending input
pub struct Game<S: KeyValueStore, C: CosmeticProvider> {
    state: GameState,
    economy: EconomyStore<S, C>,
    input: TickInput,
    accumulator: f32,
    last_run: Option<RunSummary>,
}

impl<S: KeyValueStore, C: CosmeticProvider> Game<S, C> {
    /// Build a game with all collaborators supplied by the caller.
    ///
    /// The layout is derived from the viewport and the tuning's lane count,
    /// so the road always has exactly as many lanes as the simulation.
    pub fn new(
        tuning: Tuning,
        width: f32,
        height: f32,
        storage: S,
        catalog: C,
        seed: u64,
    ) -> Result<Self, TuningError> {
        tuning.validate()?;
        let layout = Layout::from_viewport(width, height, tuning.lane_count);
        log::info!("Game initialized with seed: {}", seed);
        Ok(Self {
            state: GameState::new(tuning, layout, seed),
            economy: EconomyStore::load(storage, catalog),
            input: TickInput::default(),
            accumulator: 0.0,
            last_run: None,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> RunState {
        self.state.phase
    }

    pub fn economy(&self) -> &EconomyStore<S, C> {
        &self.economy
    }

    /// Garage actions go through here
    pub fn economy_mut(&mut self) -> &mut EconomyStore<S, C> {
        &mut self.economy
    }

    pub fn last_run(&self) -> Option<RunSummary> {
        self.last_run
    }

    /// Record an intent; it is applied at the start of the next tick
    pub fn push_intent(&mut self, intent: Intent) {
        match intent {
            Intent::MoveLeft => self.input.move_left = true,
            Intent::MoveRight => self.input.move_right = true,
            Intent::PrimaryAction => self.input.primary = true,
            Intent::PauseToggle => self.input.pause = true,
        }
    }

    pub fn set_idle_mode(&mut self, idle: bool) {
        self.input.idle_mode = idle;
    }

    pub fn idle_mode(&self) -> bool {
        self.input.idle_mode
    }

    /// Reset the run and start playing, from any mode
    pub fn start_game(&mut self) {
        self.state.start_game();
        self.accumulator = 0.0;
        self.input.clear_one_shots();
        self.settle_events();
    }

    /// Viewport changed: recompute layout, keep the run
    pub fn resize(&mut self, width: f32, height: f32) {
        let layout = Layout::from_viewport(width, height, self.state.tuning.lane_count);
        self.state.resize(layout);
    }

    /// Advance by a frame delta (seconds). Returns the number of ticks run.
    pub fn update(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog rather than trying to catch up
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Run exactly one tick
    pub fn step(&mut self) {
        tick(&mut self.state, &self.input);
        // Clear one-shot inputs after processing
        self.input.clear_one_shots();
        self.settle_events();
    }

    /// Apply tick events to the economy
    fn settle_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::CoinCollected { value } => self.economy.credit(value),
                GameEvent::GameOver {
                    score,
                    coins_earned,
                } => {
                    let new_best = self.economy.record_run(score, coins_earned);
                    self.last_run = Some(RunSummary {
                        score,
                        coins_earned,
                        new_best,
                    });
                }
                GameEvent::RunStarted => self.last_run = None,
                GameEvent::ShieldAbsorbed { .. } | GameEvent::PowerUpCollected(_) => {}
            }
        }
    }

    /// Compose the current frame and hand it to a presenter. With a garage
    /// cursor the garage screen replaces the run screens.
    pub fn render<P: Presenter>(
        &self,
        presenter: &mut P,
        time_ms: f64,
        garage: Option<&GarageCursor>,
    ) -> Result<(), P::Error> {
        let view = garage.and_then(|cursor| {
            let entry = cursor.current(self.economy.catalog())?;
            Some(GarageView {
                tab: cursor.tab,
                entry,
                status: self.economy.status(cursor.tab, &entry.id),
            })
        });
        let shapes = shapes::frame(&self.snapshot(), time_ms, view.as_ref());
        presenter.present(&shapes)
    }

    /// Everything a presenter needs for the current frame
    pub fn snapshot(&self) -> Snapshot<'_> {
        let economy = self.economy.economy();
        Snapshot {
            phase: self.state.phase,
            layout: &self.state.layout,
            player: &self.state.player,
            obstacles: &self.state.obstacles,
            coins: &self.state.coins,
            powerups: &self.state.powerups,
            particles: &self.state.particles,
            difficulty: self.state.difficulty,
            score: self.state.floored_score(),
            road_offset: self.state.road_offset,
            balance: economy.balance,
            best_score: economy.best_score,
            vehicle: &economy.selected_vehicle,
            palette: self.economy.selected_palette(),
            last_run: self.last_run,
        }
    }
}
