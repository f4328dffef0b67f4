//! Game loop controller
//!
//! Owns the phase machine, the buffered direction, and tick dispatch into
//! the simulation. Timing stays outside: an outer driver (a browser interval
//! in production, a plain loop in tests and the native demo) reads
//! [`GameSession::tick_interval`] and decides when to call
//! [`GameSession::tick`]. That keeps the fixed-interval behavior
//! deterministically testable and guarantees a paused or reset session can
//! never receive a stale tick - the driver tears its timer down first.

use std::time::Duration;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::sim::{Direction, GameMode, GameState, StepResult, step};

/// Lifecycle of one game session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fresh session, never started (or just reset)
    Created,
    /// Ticks are flowing
    Running,
    Paused,
    /// Only `reset` leaves this phase
    GameOver,
}

/// Keyboard intent, decoupled from the event source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Turn(Direction),
    /// Space: start, pause, or reset depending on phase
    Toggle,
}

/// Map a DOM `KeyboardEvent.key` value to a command.
///
/// Arrow keys and WASD steer; Space toggles. The driver must call
/// `prevent_default` for every key this returns `Some` for, so arrows and
/// Space never scroll the page.
pub fn map_key(key: &str) -> Option<KeyCommand> {
    match key {
        "ArrowUp" | "w" | "W" => Some(KeyCommand::Turn(Direction::Up)),
        "ArrowDown" | "s" | "S" => Some(KeyCommand::Turn(Direction::Down)),
        "ArrowLeft" | "a" | "A" => Some(KeyCommand::Turn(Direction::Left)),
        "ArrowRight" | "d" | "D" => Some(KeyCommand::Turn(Direction::Right)),
        " " => Some(KeyCommand::Toggle),
        _ => None,
    }
}

/// One player's game session: state, mode, RNG, and the input buffer
pub struct GameSession {
    state: GameState,
    mode: GameMode,
    phase: Phase,
    /// Direction the next tick will use; input rate is decoupled from tick rate
    buffered_direction: Direction,
    rng: Pcg32,
}

impl GameSession {
    pub fn new(mode: GameMode, seed: u64) -> Self {
        Self {
            state: GameState::initial(),
            mode,
            phase: Phase::Created,
            buffered_direction: Direction::Right,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Direction the next tick will dispatch
    pub fn direction(&self) -> Direction {
        self.buffered_direction
    }

    /// Interval the driver should schedule the next tick at
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.state.speed)
    }

    /// Begin or resume ticking. No-op once the session is over.
    pub fn start(&mut self) {
        if matches!(self.phase, Phase::Created | Phase::Paused) {
            self.phase = Phase::Running;
            self.state.is_paused = false;
        }
    }

    /// Suspend ticking. Only meaningful while running.
    pub fn pause(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
            self.state.is_paused = true;
        }
    }

    /// Discard the session and return to a fresh initial state
    pub fn reset(&mut self) {
        self.state = GameState::initial();
        self.buffered_direction = Direction::Right;
        self.phase = Phase::Created;
    }

    /// Switch boundary topology. The mode is fixed per session, so this
    /// resets the game.
    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        self.reset();
    }

    /// Space-bar semantics: reset when over, otherwise start/pause
    pub fn toggle(&mut self) {
        match self.phase {
            Phase::GameOver => self.reset(),
            Phase::Created | Phase::Paused => self.start(),
            Phase::Running => self.pause(),
        }
    }

    /// Buffer a direction change for the next tick.
    ///
    /// A request for the exact opposite of the buffered direction is dropped
    /// silently - reversing into the second body segment is never allowed,
    /// and the rejection is normal flow rather than an error.
    pub fn change_direction(&mut self, next: Direction) {
        if next != self.buffered_direction.opposite() {
            self.buffered_direction = next;
        }
    }

    /// Advance one tick with the buffered direction.
    ///
    /// Idle unless running; transitions to `GameOver` when the step dies.
    pub fn tick(&mut self) -> StepResult {
        if self.phase != Phase::Running {
            return StepResult::Idle;
        }
        let result = step(&mut self.state, self.mode, self.buffered_direction, &mut self.rng);
        if self.state.is_game_over {
            self.phase = Phase::GameOver;
            log::info!(
                "game over: score {} in {} mode",
                self.state.score,
                self.mode.as_str()
            );
        }
        result
    }
}
