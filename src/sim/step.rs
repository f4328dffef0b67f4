//! Single simulation step
//!
//! Advances one game session by one tick. Deterministic given the injected
//! RNG; the RNG is consulted only when food has to be replaced.

use rand::Rng;

use super::state::{Direction, GameMode, GameState, random_food};
use crate::consts::*;
use crate::{in_bounds, wrap};

/// What a tick did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// Paused or already over - nothing happened
    Idle,
    /// Head advanced one cell, tail followed
    Moved,
    /// Head landed on food - snake grew, score increased
    Ate,
    /// Wall hit or self-collision - session is now over
    Died,
}

/// Advance the game by one tick in `direction`.
///
/// The caller is responsible for never passing the exact opposite of the
/// previous direction; the direction buffer in the controller rejects those
/// before they reach the engine.
pub fn step<R: Rng + ?Sized>(
    state: &mut GameState,
    mode: GameMode,
    direction: Direction,
    rng: &mut R,
) -> StepResult {
    if state.is_game_over || state.is_paused {
        return StepResult::Idle;
    }

    let mut new_head = state.head() + direction.delta();

    match mode {
        GameMode::Passthrough => new_head = wrap(new_head),
        GameMode::Walls => {
            if !in_bounds(new_head) {
                state.is_game_over = true;
                return StepResult::Died;
            }
        }
    }

    // Self-collision is checked against the pre-move body, so moving into the
    // cell the tail is about to vacate still ends the game.
    if state.snake.contains(&new_head) {
        state.is_game_over = true;
        return StepResult::Died;
    }

    state.snake.push_front(new_head);

    let ate = new_head == state.food;
    if ate {
        state.food = random_food(&state.snake, rng);
        state.score += FOOD_POINTS;
        if state.score % SPEED_MILESTONE == 0 && state.speed > MIN_SPEED_MS {
            state.speed -= SPEED_STEP_MS;
        }
    } else {
        state.snake.pop_back();
    }

    state.direction = direction;

    if ate { StepResult::Ate } else { StepResult::Moved }
}
