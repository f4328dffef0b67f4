//! In-memory backend store
//!
//! Stands in for the real account/leaderboard service. The store is an
//! owned value handed to whoever needs it - there is no module-global
//! state, so each test (and each session) gets its own world.

use rand::Rng;

use super::{ApiError, AuthQuery, LeaderboardEntry, PlayerFeed, ScoreRepository, User};
use crate::sim::spectator::{ActivePlayer, random_snake};
use crate::sim::{Direction, GameMode, random_food};

const MIN_PASSWORD_LEN: usize = 6;

/// Mutable in-memory users + leaderboard + active-player feed
#[derive(Debug)]
pub struct MemoryStore {
    users: Vec<User>,
    entries: Vec<LeaderboardEntry>,
    players: Vec<ActivePlayer>,
    current_user: Option<User>,
    next_entry_id: u32,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty store - what tests should start from
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            entries: Vec::new(),
            players: Vec::new(),
            current_user: None,
            next_entry_id: 1,
        }
    }

    /// Store pre-loaded with demo accounts, a populated leaderboard, and
    /// three live players to spectate
    pub fn demo<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut store = Self::new();

        for (id, username, email, created_at) in [
            ("1", "ProSnaker", "pro@snake.com", "2024-01-01"),
            ("2", "RetroGamer", "retro@game.com", "2024-01-15"),
            ("3", "NeonMaster", "neon@master.com", "2024-02-01"),
        ] {
            store.users.push(User {
                id: id.into(),
                username: username.into(),
                email: email.into(),
                created_at: created_at.into(),
            });
        }

        let seed_scores: [(&str, u32, GameMode); 10] = [
            ("ProSnaker", 2500, GameMode::Walls),
            ("RetroGamer", 2100, GameMode::Walls),
            ("NeonMaster", 1800, GameMode::Passthrough),
            ("PixelKing", 1650, GameMode::Walls),
            ("ArcadeQueen", 1500, GameMode::Passthrough),
            ("SnakeByte", 1400, GameMode::Walls),
            ("GridRunner", 1250, GameMode::Passthrough),
            ("VectorViper", 1100, GameMode::Walls),
            ("NightCrawler", 950, GameMode::Passthrough),
            ("BitSlither", 800, GameMode::Walls),
        ];
        for (i, (username, score, mode)) in seed_scores.into_iter().enumerate() {
            let timestamp = 1_733_500_800_000.0 + i as f64 * 86_400_000.0;
            store.insert_entry(username, score, mode, timestamp);
        }

        for (id, username, score, mode, direction) in [
            ("ap1", "LivePlayer1", 450, GameMode::Walls, Direction::Right),
            ("ap2", "StreamSnake", 320, GameMode::Passthrough, Direction::Down),
            ("ap3", "WatchMe", 680, GameMode::Walls, Direction::Up),
        ] {
            let snake = random_snake(rng);
            let food = random_food(&snake, rng);
            store.players.push(ActivePlayer {
                id: id.into(),
                username: username.into(),
                mode,
                snake,
                food,
                direction,
                score,
                started_at: "2024-12-16T09:00:00Z".into(),
            });
        }

        store
    }

    /// Register an account and log it in
    pub fn signup(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
        created_at: &str,
    ) -> Result<User, ApiError> {
        if self.users.iter().any(|u| u.email == email) {
            return Err(ApiError::EmailExists);
        }
        if self.users.iter().any(|u| u.username == username) {
            return Err(ApiError::UsernameTaken);
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(ApiError::PasswordTooShort);
        }

        let user = User {
            id: (self.users.len() + 1).to_string(),
            username: username.into(),
            email: email.into(),
            created_at: created_at.into(),
        };
        self.users.push(user.clone());
        self.current_user = Some(user.clone());
        log::info!("signed up {username}");
        Ok(user)
    }

    /// Log in by email. The mock accepts any password of valid length for a
    /// known email, like the backend stub it replaces.
    pub fn login(&mut self, email: &str, password: &str) -> Result<User, ApiError> {
        let user = self
            .users
            .iter()
            .find(|u| u.email == email)
            .filter(|_| password.len() >= MIN_PASSWORD_LEN)
            .cloned()
            .ok_or(ApiError::InvalidCredentials)?;
        log::info!("logged in {}", user.username);
        self.current_user = Some(user.clone());
        Ok(user)
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.current_user.take() {
            log::info!("logged out {}", user.username);
        }
    }

    /// Rehydrate a session persisted by the driver (LocalStorage on web)
    pub fn restore_session(&mut self, user: User) {
        log::info!("restored session for {}", user.username);
        self.current_user = Some(user);
    }

    pub fn player_state(&self, player_id: &str) -> Option<ActivePlayer> {
        self.players.iter().find(|p| p.id == player_id).cloned()
    }
}

impl ScoreRepository for MemoryStore {
    fn find_user(&self, username: &str) -> Option<User> {
        self.users.iter().find(|u| u.username == username).cloned()
    }

    fn insert_entry(
        &mut self,
        username: &str,
        score: u32,
        mode: GameMode,
        timestamp: f64,
    ) -> LeaderboardEntry {
        let entry = LeaderboardEntry {
            id: self.next_entry_id,
            username: username.into(),
            score,
            mode,
            timestamp,
        };
        self.next_entry_id += 1;
        self.entries.push(entry.clone());
        entry
    }

    fn list_entries(&self, mode: Option<GameMode>) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self
            .entries
            .iter()
            .filter(|e| mode.is_none_or(|m| e.mode == m))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries
    }
}

impl AuthQuery for MemoryStore {
    fn current_user(&self) -> Option<User> {
        self.current_user.clone()
    }
}

impl PlayerFeed for MemoryStore {
    fn active_players(&self) -> Vec<ActivePlayer> {
        self.players.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_signup_validation() {
        let mut store = MemoryStore::new();
        store.signup("ProSnaker", "pro@snake.com", "hunter22", "2024-01-01").unwrap();

        assert_eq!(
            store.signup("Other", "pro@snake.com", "hunter22", "2024-01-02"),
            Err(ApiError::EmailExists)
        );
        assert_eq!(
            store.signup("ProSnaker", "other@snake.com", "hunter22", "2024-01-02"),
            Err(ApiError::UsernameTaken)
        );
        assert_eq!(
            store.signup("Short", "short@snake.com", "abc", "2024-01-02"),
            Err(ApiError::PasswordTooShort)
        );
    }

    #[test]
    fn test_login_and_logout() {
        let mut store = MemoryStore::new();
        store.signup("ProSnaker", "pro@snake.com", "hunter22", "2024-01-01").unwrap();
        store.logout();
        assert!(!store.is_authenticated());

        assert_eq!(
            store.login("nobody@snake.com", "hunter22"),
            Err(ApiError::InvalidCredentials)
        );
        assert_eq!(
            store.login("pro@snake.com", "abc"),
            Err(ApiError::InvalidCredentials)
        );

        let user = store.login("pro@snake.com", "hunter22").unwrap();
        assert_eq!(user.username, "ProSnaker");
        assert!(store.is_authenticated());

        store.logout();
        assert!(store.current_user().is_none());
    }

    #[test]
    fn test_list_entries_sorts_and_filters() {
        let mut rng = Pcg32::seed_from_u64(9);
        let store = MemoryStore::demo(&mut rng);

        let all = store.list_entries(None);
        assert_eq!(all.len(), 10);
        assert!(all.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(all[0].username, "ProSnaker");

        let walls = store.list_entries(Some(GameMode::Walls));
        assert_eq!(walls.len(), 6);
        assert!(walls.iter().all(|e| e.mode == GameMode::Walls));
    }

    #[test]
    fn test_demo_players_are_consistent() {
        let mut rng = Pcg32::seed_from_u64(11);
        let store = MemoryStore::demo(&mut rng);

        let players = store.active_players();
        assert_eq!(players.len(), 3);
        for p in &players {
            assert_eq!(p.snake.len(), 4);
            assert!(!p.snake.contains(&p.food));
            assert!(p.snake.iter().all(|c| crate::in_bounds(*c)));
        }
        assert!(store.player_state("ap2").is_some());
        assert!(store.player_state("nope").is_none());
    }

    #[test]
    fn test_find_user() {
        let mut rng = Pcg32::seed_from_u64(1);
        let store = MemoryStore::demo(&mut rng);
        assert!(store.find_user("NeonMaster").is_some());
        assert!(store.find_user("Nobody").is_none());
    }
}
