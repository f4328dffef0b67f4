//! Game state and core simulation types
//!
//! Everything the renderer or a collaborator needs to observe lives here.

use std::collections::VecDeque;

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Heading of the snake, one grid cell per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// One-cell offset in grid coordinates (y grows downward)
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Boundary topology, fixed for the lifetime of one game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Leaving the board is fatal
    Walls,
    /// Toroidal board - exiting one edge re-enters the opposite edge
    #[default]
    Passthrough,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Walls => "walls",
            GameMode::Passthrough => "passthrough",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "walls" => Some(GameMode::Walls),
            "passthrough" | "pass" => Some(GameMode::Passthrough),
            _ => None,
        }
    }
}

/// Complete state of one game session (serializable)
///
/// Invariants at rest between ticks: the snake is non-empty and has no
/// duplicate cells, `food` is never inside the snake, `score` is a multiple
/// of 10, and `speed` only ever decreases down to `MIN_SPEED_MS`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Body cells, head first
    pub snake: VecDeque<IVec2>,
    pub food: IVec2,
    /// Heading the snake last moved in
    pub direction: Direction,
    pub score: u32,
    pub is_game_over: bool,
    pub is_paused: bool,
    /// Current tick interval in milliseconds
    pub speed: u64,
}

impl GameState {
    /// Fresh session: three segments mid-board heading right, paused until started
    pub fn initial() -> Self {
        Self {
            snake: VecDeque::from([
                IVec2::new(10, 10),
                IVec2::new(9, 10),
                IVec2::new(8, 10),
            ]),
            food: IVec2::new(15, 10),
            direction: Direction::Right,
            score: 0,
            is_game_over: false,
            is_paused: true,
            speed: INITIAL_SPEED_MS,
        }
    }

    /// Head cell. The snake is never empty.
    pub fn head(&self) -> IVec2 {
        *self.snake.front().expect("snake is never empty")
    }
}

/// Uniformly random unoccupied cell.
///
/// Retries until it lands off the snake; terminates because the board's 400
/// cells vastly exceed any reachable snake length.
pub fn random_food<R: Rng + ?Sized>(snake: &VecDeque<IVec2>, rng: &mut R) -> IVec2 {
    loop {
        let cell = IVec2::new(
            rng.random_range(0..GRID_SIZE),
            rng.random_range(0..GRID_SIZE),
        );
        if !snake.contains(&cell) {
            return cell;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_initial_state() {
        let state = GameState::initial();
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.head(), IVec2::new(10, 10));
        assert_eq!(state.food, IVec2::new(15, 10));
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(state.score, 0);
        assert!(state.is_paused);
        assert!(!state.is_game_over);
        assert_eq!(state.speed, INITIAL_SPEED_MS);
    }

    #[test]
    fn test_opposites_pair_up() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.opposite(), dir);
        }
    }

    #[test]
    fn test_delta_is_one_cell() {
        for dir in Direction::ALL {
            let d = dir.delta();
            assert_eq!(d.x.abs() + d.y.abs(), 1);
        }
    }

    #[test]
    fn test_random_food_avoids_snake() {
        let mut rng = Pcg32::seed_from_u64(7);
        // A snake hugging the top rows so the retry loop actually triggers
        let snake: VecDeque<IVec2> = (0..GRID_SIZE)
            .flat_map(|x| (0..3).map(move |y| IVec2::new(x, y)))
            .collect();
        for _ in 0..200 {
            let food = random_food(&snake, &mut rng);
            assert!(crate::in_bounds(food));
            assert!(!snake.contains(&food));
        }
    }

    #[test]
    fn test_state_roundtrips_through_json() {
        let state = GameState::initial();
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
