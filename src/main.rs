//! Neon Snake entry point
//!
//! Handles platform-specific initialization and owns the tick timer. The
//! controller never schedules anything itself: on the web the driver keeps
//! exactly one `setInterval` alive per running session, tearing it down and
//! recreating it on every pause/resume/reset and speed change; natively a
//! plain sleep loop paces a short self-playing demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use neon_snake::Settings;
    use neon_snake::api::{
        AuthQuery, AuthSnapshot, MemoryStore, PlayerFeed, ScoreSubmitter, SubmitOutcome, User,
    };
    use neon_snake::consts::*;
    use neon_snake::controller::{GameSession, KeyCommand, Phase, map_key};
    use neon_snake::sim::{ActivePlayer, StepResult, spectator};

    /// LocalStorage key the auth layer persists the logged-in user under
    const USER_STORAGE_KEY: &str = "neon_snake_user";

    /// Game instance holding all state
    struct Game {
        session: GameSession,
        store: MemoryStore,
        submitter: ScoreSubmitter,
        /// Local copies of the feed snapshots, advanced by the spectator sim
        spectated: Vec<ActivePlayer>,
        rng: Pcg32,
        /// Live tick timer, if any; exactly one per running session
        interval_id: Option<i32>,
        /// Speed the live timer was scheduled at, to detect milestone changes
        scheduled_speed: u64,
        /// Most recent submit outcome, for the status line
        notice: Option<String>,
    }

    impl Game {
        fn new(seed: u64, settings: &Settings) -> Self {
            let mut rng = Pcg32::seed_from_u64(seed ^ 0x5eed);
            let store = MemoryStore::demo(&mut rng);
            let spectated = store.active_players();
            Self {
                session: GameSession::new(settings.mode, seed),
                store,
                submitter: ScoreSubmitter::new(),
                spectated,
                rng,
                interval_id: None,
                scheduled_speed: 0,
                notice: None,
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Neon Snake starting...");

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, &settings)));

        if let Some(user) = load_stored_user() {
            game.borrow_mut().store.restore_session(user);
        }

        log::info!("Game initialized with seed: {seed}");

        setup_keyboard(game.clone());
        start_spectate_timer(game.clone());
        update_hud(&game);

        log::info!("Neon Snake running - press Space to start");
    }

    /// Load the persisted user session, if any
    fn load_stored_user() -> Option<User> {
        let storage = web_sys::window()?.local_storage().ok()??;
        let json = storage.get_item(USER_STORAGE_KEY).ok()??;
        serde_json::from_str(&json).ok()
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let Some(cmd) = map_key(event.key().as_str()) else {
                return;
            };
            // Arrows and Space must never scroll the page
            event.prevent_default();
            {
                let mut g = game.borrow_mut();
                match cmd {
                    KeyCommand::Turn(dir) => g.session.change_direction(dir),
                    KeyCommand::Toggle => {
                        let was_over = g.session.phase() == Phase::GameOver;
                        g.session.toggle();
                        if was_over {
                            // New game: allow its terminal score to submit
                            g.submitter.reset();
                            g.notice = None;
                        }
                    }
                }
            }
            sync_tick_timer(&game);
            update_hud(&game);
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Tear down the tick timer and, if the session is running, recreate it
    /// at the current speed. The stale timer is always cleared first so a
    /// superseded session can never receive a tick.
    fn sync_tick_timer(game: &Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        let speed = {
            let mut g = game.borrow_mut();
            if let Some(id) = g.interval_id.take() {
                window.clear_interval_with_handle(id);
            }
            if g.session.phase() != Phase::Running {
                return;
            }
            g.session.tick_interval().as_millis() as u64
        };

        let cb = {
            let game = game.clone();
            Closure::<dyn FnMut()>::new(move || on_tick(&game))
        };
        let id = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                speed as i32,
            )
            .expect("setInterval failed");
        cb.forget();

        let mut g = game.borrow_mut();
        g.interval_id = Some(id);
        g.scheduled_speed = speed;
    }

    fn on_tick(game: &Rc<RefCell<Game>>) {
        let result = game.borrow_mut().session.tick();

        if result == StepResult::Died {
            let mut g = game.borrow_mut();
            let score = g.session.state().score;
            let mode = g.session.mode();
            let auth = AuthSnapshot(g.store.current_user());
            let timestamp = js_sys::Date::now();
            let g = &mut *g;
            let outcome = g.submitter.submit(&mut g.store, &auth, score, mode, timestamp);
            g.notice = Some(match outcome {
                SubmitOutcome::Submitted(entry) => {
                    format!("Score {} submitted to leaderboard!", entry.score)
                }
                SubmitOutcome::NotLoggedIn => "Login to save your score!".into(),
                SubmitOutcome::AlreadySubmitted | SubmitOutcome::NoScore => String::new(),
            });
        }

        // Reschedule when the session stopped or a milestone changed the speed
        let needs_resync = {
            let g = game.borrow();
            g.session.phase() != Phase::Running
                || g.session.tick_interval().as_millis() as u64 != g.scheduled_speed
        };
        if needs_resync {
            sync_tick_timer(game);
        }
        update_hud(game);
    }

    /// Advance spectated boards on their own fixed cadence. This timer is
    /// independent of the game session and runs for the lifetime of the page.
    fn start_spectate_timer(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let cb = Closure::<dyn FnMut()>::new(move || {
            let mut g = game.borrow_mut();
            let g = &mut *g;
            for player in &mut g.spectated {
                spectator::advance(player, &mut g.rng);
            }
        });
        let _ = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                SPECTATE_GRID_TICK_MS as i32,
            )
            .expect("setInterval failed");
        cb.forget();
    }

    /// Update score/status text in the DOM
    fn update_hud(game: &Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let g = game.borrow();

        if let Some(el) = document.get_element_by_id("hud-score") {
            el.set_text_content(Some(&g.session.state().score.to_string()));
        }
        if let Some(el) = document.get_element_by_id("hud-mode") {
            el.set_text_content(Some(g.session.mode().as_str()));
        }
        if let Some(el) = document.get_element_by_id("hud-status") {
            let status = match g.session.phase() {
                Phase::Created => "PRESS SPACE TO START",
                Phase::Running => "",
                Phase::Paused => "PAUSED",
                Phase::GameOver => "GAME OVER - SPACE TO RESTART",
            };
            el.set_text_content(Some(status));
        }
        if let Some(el) = document.get_element_by_id("hud-notice") {
            el.set_text_content(Some(g.notice.as_deref().unwrap_or("")));
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Native headless demo: a bot plays one session at real tick pacing, the
/// spectated boards advance alongside, and the final score goes through the
/// submission path.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use neon_snake::Settings;
    use neon_snake::api::{
        AuthQuery, AuthSnapshot, MemoryStore, PlayerFeed, ScoreRepository, ScoreSubmitter,
        SubmitOutcome,
    };
    use neon_snake::controller::{GameSession, Phase};
    use neon_snake::sim::{Direction, spectator};

    env_logger::init();
    log::info!("Neon Snake (native demo) starting...");

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before unix epoch");
    let seed = now.as_millis() as u64;

    let settings = Settings::load();
    let mut rng = Pcg32::seed_from_u64(seed ^ 0x5eed);
    let mut store = MemoryStore::demo(&mut rng);
    store
        .login("pro@snake.com", "hunter22")
        .expect("demo login failed");

    let mut session = GameSession::new(settings.mode, seed);
    let mut submitter = ScoreSubmitter::new();
    let mut spectated = store.active_players();

    log::info!("bot playing one session in {} mode", session.mode().as_str());
    session.start();

    let mut ticks = 0u32;
    while session.phase() == Phase::Running && ticks < 100 {
        // Fumbling bot: occasionally requests a random turn; the direction
        // buffer silently drops illegal reversals like any other input source
        if rng.random::<f32>() < 0.3 {
            session.change_direction(Direction::ALL[rng.random_range(0..4)]);
        }
        session.tick();
        for player in &mut spectated {
            spectator::advance(player, &mut rng);
        }
        std::thread::sleep(session.tick_interval());
        ticks += 1;
    }

    let score = session.state().score;
    log::info!(
        "session finished after {ticks} ticks: score {score}, phase {:?}",
        session.phase()
    );

    if session.phase() == Phase::GameOver {
        let timestamp = now.as_millis() as f64;
        let auth = AuthSnapshot(store.current_user());
        match submitter.submit(&mut store, &auth, score, session.mode(), timestamp) {
            SubmitOutcome::Submitted(entry) => {
                log::info!("submitted as entry #{} for {}", entry.id, entry.username)
            }
            outcome => log::info!("score not submitted: {outcome:?}"),
        }
    }

    println!("\n=== LEADERBOARD ===");
    for (rank, entry) in store.list_entries(None).iter().take(10).enumerate() {
        println!(
            "{:>2}. {:<14} {:>5}  [{}]",
            rank + 1,
            entry.username,
            entry.score,
            entry.mode.as_str()
        );
    }

    println!("\n=== LIVE PLAYERS ===");
    for player in &spectated {
        println!(
            "{:<12} score {:>4}  head {:?}",
            player.username,
            player.score,
            player.snake.front().expect("snake is never empty")
        );
    }
}
