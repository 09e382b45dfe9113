//! Worker-global round controller.
//!
//! Uses `thread_local!` + `RefCell` for safe mutable access in single-threaded
//! WASM. The Web Worker keeps the WASM module alive, so the round persists
//! across `handle_request` calls for the whole page session.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::cell::RefCell;

use crate::game::config::GameConfig;
use crate::game::controller::RoundController;

pub type Game = RoundController<Box<dyn RngCore>>;

fn new_game() -> Game {
    build_game(GameConfig::default(), StdRng::from_entropy(), 0)
}

/// Build a controller with any RNG, boxed so it fits the worker slot.
pub fn build_game<R: RngCore + 'static>(config: GameConfig, rng: R, best_score: u32) -> Game {
    RoundController::new(config, Box::new(rng) as Box<dyn RngCore>, best_score)
}

thread_local! {
    static GAME: RefCell<Game> = RefCell::new(new_game());
}

/// Execute a closure with read access to the controller.
pub fn with_game<F, R>(f: F) -> R
where
    F: FnOnce(&Game) -> R,
{
    GAME.with(|g| f(&g.borrow()))
}

/// Execute a closure with mutable access to the controller.
pub fn with_game_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut Game) -> R,
{
    GAME.with(|g| f(&mut g.borrow_mut()))
}

/// Replace the whole controller.
pub fn replace_game(game: Game) {
    GAME.with(|g| {
        *g.borrow_mut() = game;
    });
}

/// Export the current game state as JSON.
pub fn export_state_json() -> String {
    with_game(|g| serde_json::to_string(g.state()).unwrap_or_else(|_| "{}".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::controller::RoundPhase;

    fn reset() {
        replace_game(new_game());
    }

    #[test]
    fn default_game_is_idle() {
        reset();
        with_game(|g| {
            assert_eq!(g.state().phase, RoundPhase::Idle);
            assert_eq!(g.state().time_left, 100);
            assert_eq!(g.pending_timers(), 0);
        });
    }

    #[test]
    fn mutations_persist_between_calls() {
        reset();
        with_game_mut(|g| g.start(0).unwrap());
        with_game(|g| assert!(g.state().started()));
        with_game_mut(|g| g.advance(3_000));
        with_game(|g| assert_eq!(g.state().time_left, 97));
        reset();
    }

    #[test]
    fn export_json_has_state_fields() {
        reset();
        let json = export_state_json();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["phase"], "Idle");
        assert_eq!(value["time_left"], 100);
        assert_eq!(value["score"], 0);
        assert!(value["target"].is_null());
        reset();
    }
}
