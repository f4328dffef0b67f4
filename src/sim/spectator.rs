//! Spectator random-walk simulation
//!
//! Animates remote players' boards between feed refreshes. This is a
//! deliberate stand-in, not a synchronized simulation: direction is a random
//! walk, and Walls mode clamps the head at the edge instead of ending the
//! session the way the real engine does. A spectated board never reaches
//! game over.

use std::collections::VecDeque;

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Direction, GameMode, random_food};
use crate::consts::*;
use crate::{clamp_to_board, wrap};

/// Snapshot of a remote player's session, advanced locally by [`advance`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivePlayer {
    pub id: String,
    pub username: String,
    pub mode: GameMode,
    pub snake: VecDeque<IVec2>,
    pub food: IVec2,
    pub direction: Direction,
    pub score: u32,
    /// ISO-8601 instant the feed reported the session starting
    pub started_at: String,
}

/// Advance a spectated player's board by one tick.
///
/// With probability `DIRECTION_CHANGE_CHANCE` the heading is replaced by a
/// uniformly random pick of all four directions - including reversals, since
/// there is no player input to protect.
pub fn advance<R: Rng + ?Sized>(player: &mut ActivePlayer, rng: &mut R) {
    if rng.random::<f32>() < DIRECTION_CHANGE_CHANCE {
        player.direction = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
    }

    let head = *player.snake.front().expect("snake is never empty");
    let new_head = match player.mode {
        GameMode::Passthrough => wrap(head + player.direction.delta()),
        // Diverges from the engine on purpose: a spectated session must not
        // end, so the snake stops at the wall instead of dying.
        GameMode::Walls => clamp_to_board(head + player.direction.delta()),
    };

    player.snake.push_front(new_head);

    if new_head == player.food {
        player.food = random_food(&player.snake, rng);
        player.score += FOOD_POINTS;
    } else {
        player.snake.pop_back();
    }
}

/// Random four-segment horizontal snake for a demo player card
pub fn random_snake<R: Rng + ?Sized>(rng: &mut R) -> VecDeque<IVec2> {
    let start = IVec2::new(rng.random_range(5..GRID_SIZE), rng.random_range(5..GRID_SIZE));
    (0..4).map(|i| start - IVec2::new(i, 0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn player(mode: GameMode) -> ActivePlayer {
        ActivePlayer {
            id: "ap1".into(),
            username: "LivePlayer1".into(),
            mode,
            snake: VecDeque::from([
                IVec2::new(10, 10),
                IVec2::new(9, 10),
                IVec2::new(8, 10),
                IVec2::new(7, 10),
            ]),
            food: IVec2::new(15, 10),
            direction: Direction::Right,
            score: 0,
            started_at: "2024-12-16T12:00:00Z".into(),
        }
    }

    #[test]
    fn test_walls_mode_clamps_and_never_ends() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut p = player(GameMode::Walls);
        for _ in 0..500 {
            advance(&mut p, &mut rng);
            let head = *p.snake.front().unwrap();
            assert!(crate::in_bounds(head));
        }
        // Still four segments unless it happened to eat
        assert!(p.snake.len() >= 4);
    }

    #[test]
    fn test_passthrough_wraps() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut p = player(GameMode::Passthrough);
        p.snake = VecDeque::from([IVec2::new(19, 10), IVec2::new(18, 10)]);
        for _ in 0..200 {
            advance(&mut p, &mut rng);
            assert!(crate::in_bounds(*p.snake.front().unwrap()));
        }
    }

    #[test]
    fn test_eating_grows_and_moves_food_off_snake() {
        let mut found_a_meal = false;
        for seed in 0..50u64 {
            let mut trial_rng = Pcg32::seed_from_u64(seed);
            let mut p = player(GameMode::Passthrough);
            p.food = IVec2::new(11, 10);
            let len_before = p.snake.len();
            advance(&mut p, &mut trial_rng);
            if p.score > 0 {
                found_a_meal = true;
                assert_eq!(p.score, FOOD_POINTS);
                assert_eq!(p.snake.len(), len_before + 1);
                assert!(!p.snake.contains(&p.food));
            } else {
                assert_eq!(p.snake.len(), len_before);
            }
        }
        assert!(found_a_meal, "no trial ate the food straight ahead");
    }

    #[test]
    fn test_direction_churns_under_random_walk() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut p = player(GameMode::Passthrough);
        let mut changes = 0;
        let mut dir = p.direction;
        for _ in 0..400 {
            advance(&mut p, &mut rng);
            if p.direction != dir {
                changes += 1;
                dir = p.direction;
            }
        }
        // 20% redraw chance and 3/4 of redraws change the heading, so ~60
        // changes are expected over 400 ticks
        assert!(changes > 20, "only {changes} direction changes");
    }

    #[test]
    fn test_random_snake_shape() {
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..100 {
            let snake = random_snake(&mut rng);
            assert_eq!(snake.len(), 4);
            for cell in &snake {
                assert!(crate::in_bounds(*cell));
            }
            let head = snake[0];
            assert_eq!(snake[1], head - IVec2::new(1, 0));
        }
    }
}
