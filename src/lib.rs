//! Neon Snake - a grid snake arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (snake movement, food, spectator walk)
//! - `controller`: Loop controller (phase machine, direction buffer, tick dispatch)
//! - `api`: Account/leaderboard/player-feed collaborator contracts + mock store
//! - `settings`: Persisted user preferences

pub mod api;
pub mod controller;
pub mod settings;
pub mod sim;

pub use controller::{GameSession, Phase};
pub use settings::Settings;

use glam::IVec2;

/// Game configuration constants
pub mod consts {
    /// Board is a square grid of GRID_SIZE x GRID_SIZE cells
    pub const GRID_SIZE: i32 = 20;

    /// Tick interval for a fresh game (milliseconds per tick)
    pub const INITIAL_SPEED_MS: u64 = 150;
    /// Fastest allowed tick interval
    pub const MIN_SPEED_MS: u64 = 50;
    /// Speed-up applied at each score milestone
    pub const SPEED_STEP_MS: u64 = 10;

    /// Points per food eaten
    pub const FOOD_POINTS: u32 = 10;
    /// Every multiple of this score, the game speeds up
    pub const SPEED_MILESTONE: u32 = 50;

    /// Per-tick chance that a spectated snake picks a new random direction
    pub const DIRECTION_CHANGE_CHANCE: f32 = 0.2;
    /// Tick interval for the spectate card grid (milliseconds)
    pub const SPECTATE_GRID_TICK_MS: u64 = 300;
    /// Tick interval for a focused spectated player (milliseconds)
    pub const SPECTATE_FOCUS_TICK_MS: u64 = 200;
}

/// Whether a cell lies on the board
#[inline]
pub fn in_bounds(cell: IVec2) -> bool {
    cell.cmpge(IVec2::ZERO).all() && cell.cmplt(IVec2::splat(consts::GRID_SIZE)).all()
}

/// Wrap a cell onto the toroidal board (passthrough topology)
#[inline]
pub fn wrap(cell: IVec2) -> IVec2 {
    cell.rem_euclid(IVec2::splat(consts::GRID_SIZE))
}

/// Clamp a cell to the board edges (spectator walls topology)
#[inline]
pub fn clamp_to_board(cell: IVec2) -> IVec2 {
    cell.clamp(IVec2::ZERO, IVec2::splat(consts::GRID_SIZE - 1))
}
