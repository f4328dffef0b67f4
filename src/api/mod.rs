//! Collaborator contracts for accounts, leaderboard, and the player feed
//!
//! The simulation core never talks to storage directly: everything it needs
//! from the outside world is a capability trait here, implemented by
//! [`store::MemoryStore`] in this build and swappable for a real backend
//! later. Tests construct their own stores instead of sharing module state.

pub mod store;

pub use store::MemoryStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{ActivePlayer, GameMode};

/// A registered account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

/// One row on the leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: u32,
    pub username: String,
    pub score: u32,
    pub mode: GameMode,
    /// Unix timestamp (ms) when the score was achieved
    pub timestamp: f64,
}

/// Failures at the collaborator boundary.
///
/// These never touch simulation state - the driver surfaces them as
/// notifications and the game carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("must be logged in to submit score")]
    NotAuthenticated,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("email already exists")]
    EmailExists,
    #[error("username already taken")]
    UsernameTaken,
    #[error("password must be at least 6 characters")]
    PasswordTooShort,
}

/// Score storage capability
pub trait ScoreRepository {
    fn find_user(&self, username: &str) -> Option<User>;
    /// Store a score and return the entry as persisted (id assigned)
    fn insert_entry(
        &mut self,
        username: &str,
        score: u32,
        mode: GameMode,
        timestamp: f64,
    ) -> LeaderboardEntry;
    /// Entries sorted descending by score, optionally filtered by mode
    fn list_entries(&self, mode: Option<GameMode>) -> Vec<LeaderboardEntry>;
}

/// "Is someone logged in?" capability
pub trait AuthQuery {
    fn current_user(&self) -> Option<User>;

    fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }
}

/// Point-in-time auth view.
///
/// Snapshot the logged-in user before submitting, since the live store is
/// mutably borrowed as the repository during the same call.
pub struct AuthSnapshot(pub Option<User>);

impl AuthQuery for AuthSnapshot {
    fn current_user(&self) -> Option<User> {
        self.0.clone()
    }
}

/// Source of remote players to spectate. Snapshots only - the spectator
/// simulator advances local copies and never writes back.
pub trait PlayerFeed {
    fn active_players(&self) -> Vec<ActivePlayer>;
}

/// What became of a finished game's score
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Submitted(LeaderboardEntry),
    /// Player should be told to log in; local game state is unaffected
    NotLoggedIn,
    /// This terminal score was already submitted
    AlreadySubmitted,
    /// Zero scores are not worth a leaderboard row
    NoScore,
}

/// Submission guard: one submission per distinct terminal score.
///
/// The game-over state may be observed more than once (re-renders, repeated
/// driver callbacks); the guard makes the submit idempotent. `reset` clears
/// it when a new game starts.
#[derive(Debug, Default)]
pub struct ScoreSubmitter {
    last_submitted: Option<u32>,
}

impl ScoreSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous game's submission
    pub fn reset(&mut self) {
        self.last_submitted = None;
    }

    /// Called when a session is observed in game over
    pub fn submit(
        &mut self,
        repo: &mut dyn ScoreRepository,
        auth: &dyn AuthQuery,
        score: u32,
        mode: GameMode,
        timestamp: f64,
    ) -> SubmitOutcome {
        if score == 0 {
            return SubmitOutcome::NoScore;
        }
        if self.last_submitted == Some(score) {
            return SubmitOutcome::AlreadySubmitted;
        }
        self.last_submitted = Some(score);

        match auth.current_user() {
            Some(user) => {
                let entry = repo.insert_entry(&user.username, score, mode, timestamp);
                log::info!("score {score} submitted to leaderboard for {}", user.username);
                SubmitOutcome::Submitted(entry)
            }
            None => {
                log::warn!("score {score} not submitted: {}", ApiError::NotAuthenticated);
                SubmitOutcome::NotLoggedIn
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_requires_auth() {
        let mut store = MemoryStore::new();
        let mut guard = ScoreSubmitter::new();

        assert_eq!(submit(&mut guard, &mut store, 120), SubmitOutcome::NotLoggedIn);
        assert!(store.list_entries(None).is_empty());
    }

    #[test]
    fn test_submit_once_per_terminal_score() {
        let mut store = MemoryStore::new();
        store
            .signup("ProSnaker", "pro@snake.com", "hunter22", "2024-01-01")
            .unwrap();
        let mut guard = ScoreSubmitter::new();

        let first = submit(&mut guard, &mut store, 120);
        assert!(matches!(first, SubmitOutcome::Submitted(_)));

        // Game-over observed again: no duplicate row
        let second = submit(&mut guard, &mut store, 120);
        assert_eq!(second, SubmitOutcome::AlreadySubmitted);
        assert_eq!(store.list_entries(None).len(), 1);

        // New game, same final score: submits again after reset
        guard.reset();
        let third = submit(&mut guard, &mut store, 120);
        assert!(matches!(third, SubmitOutcome::Submitted(_)));
        assert_eq!(store.list_entries(None).len(), 2);
    }

    #[test]
    fn test_zero_score_is_skipped() {
        let mut store = MemoryStore::new();
        let mut guard = ScoreSubmitter::new();
        assert_eq!(submit(&mut guard, &mut store, 0), SubmitOutcome::NoScore);
    }

    #[test]
    fn test_failed_submit_leaves_no_entry() {
        let mut store = MemoryStore::new();
        let mut guard = ScoreSubmitter::new();
        // Not logged in: the attempt is consumed but nothing is stored
        assert_eq!(submit(&mut guard, &mut store, 50), SubmitOutcome::NotLoggedIn);
        assert!(store.list_entries(None).is_empty());
    }

    fn submit(guard: &mut ScoreSubmitter, store: &mut MemoryStore, score: u32) -> SubmitOutcome {
        let auth = AuthSnapshot(store.current_user());
        guard.submit(store, &auth, score, GameMode::Walls, 1_734_220_800_000.0)
    }
}
