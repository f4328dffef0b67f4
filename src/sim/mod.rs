//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Advancement happens only through explicit step calls
//! - Randomness comes from an injected `rand::Rng`, used only for food placement
//!   and spectator direction choice
//! - No timers, no rendering, no platform dependencies

pub mod spectator;
pub mod state;
pub mod step;

pub use spectator::{ActivePlayer, advance};
pub use state::{Direction, GameMode, GameState, random_food};
pub use step::{StepResult, step};
