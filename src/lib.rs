//! Whack-a-Mole in-browser WASM server.
//!
//! Exports `handle_request(method, path, query, body)` for the Web Worker
//! bridge to call. Uses `matchit` for URL routing, the same router engine
//! that powers Axum.
//!
//! The page never runs game timers itself: the board fragment polls
//! `/api/mole/tick` with its clock and the round controller fires whatever
//! is due.

use wasm_bindgen::prelude::*;

pub mod error;
pub mod game;
pub mod routes;

/// Process an HTTP-like request and return an HTML fragment (or JSON for
/// `/api/mole/state`).
///
/// Called from JavaScript (Web Worker) via wasm-bindgen.
///
/// # Arguments
/// * `method` — HTTP method (e.g., "GET", "POST")
/// * `path`   — URL path (e.g., "/api/mole/click")
/// * `query`  — Query string, possibly empty
/// * `body`   — Request body (e.g., `slot=3&now=1520`). Empty string for GET.
#[wasm_bindgen]
pub fn handle_request(method: &str, path: &str, query: &str, body: &str) -> String {
    // The value is a &str tag we match on below
    let mut router = matchit::Router::new();
    router.insert("/api/mole/board", "board").ok();
    router.insert("/api/mole/state", "state").ok();
    router.insert("/api/mole/start", "start").ok();
    router.insert("/api/mole/click", "click").ok();
    router.insert("/api/mole/tick", "tick").ok();
    router.insert("/api/mole/reset", "reset").ok();
    router.insert("/api/mole/teardown", "teardown").ok();
    router.insert("/api/mole/info", "info").ok();
    router.insert("/api/mole/restore", "restore").ok();
    router.insert("/api/mole/config", "config").ok();

    match router.at(path) {
        Ok(matched) => match (*matched.value, method) {
            ("board", "GET") => routes::mole::handle_board_get(query),
            ("state", "GET") => routes::mole::handle_state_get(query),

            ("start", "POST") => routes::mole::handle_start_post(body),
            ("click", "POST") => routes::mole::handle_click_post(body),
            ("tick", "POST") => routes::mole::handle_tick_post(body),
            ("reset", "POST") => routes::mole::handle_reset_post(body),
            ("teardown", "POST") => routes::mole::handle_teardown_post(body),
            ("info", "POST") => routes::mole::handle_info_post(body),
            ("restore", "POST") => routes::mole::handle_restore_post(body),
            ("config", "POST") => routes::mole::handle_config_post(body),

            _ => method_not_allowed(),
        },
        Err(_) => not_found(),
    }
}

fn not_found() -> String {
    r#"<span class="text-red-500">404 — route not found</span>"#.to_string()
}

fn method_not_allowed() -> String {
    r#"<span class="text-red-500">405 — method not allowed</span>"#.to_string()
}

#[cfg(test)]
pub(crate) mod test_support {
    use tracing_subscriber::EnvFilter;

    /// Route `tracing` output to the test harness. Safe to call repeatedly.
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::GameConfig;
    use crate::game::state;
    use rand::rngs::mock::StepRng;

    /// Every spawn lands on slot 0 as a Primary target.
    fn reset_state() {
        test_support::init_tracing();
        state::replace_game(state::build_game(GameConfig::default(), StepRng::new(0, 0), 0));
    }

    #[test]
    fn returns_404_for_unknown_route() {
        let html = handle_request("GET", "/api/nonexistent", "", "");
        assert!(html.contains("404"));
    }

    #[test]
    fn returns_405_for_wrong_method() {
        assert!(handle_request("GET", "/api/mole/start", "", "").contains("405"));
        assert!(handle_request("POST", "/api/mole/state", "", "").contains("405"));
    }

    #[test]
    fn routes_board() {
        reset_state();
        let html = handle_request("GET", "/api/mole/board", "", "");
        assert!(html.contains("Whack-a-Mole Game"));
        reset_state();
    }

    #[test]
    fn full_round_through_router() {
        reset_state();
        handle_request("POST", "/api/mole/restore", "", "best=2");

        // start spawns at slot 0 immediately
        let html = handle_request("POST", "/api/mole/start", "", "now=1000");
        assert!(html.contains("target-mole"));
        let html = handle_request("POST", "/api/mole/click", "", "slot=0&now=1100");
        assert!(html.contains("Score: 1"));
        assert!(!html.contains("localStorage"));

        // next spawn at 3000, cooldown long over
        handle_request("POST", "/api/mole/tick", "", "now=3000");
        handle_request("POST", "/api/mole/click", "", "slot=0&now=3100");
        handle_request("POST", "/api/mole/tick", "", "now=5000");
        let html = handle_request("POST", "/api/mole/click", "", "slot=0&now=5100");
        assert!(html.contains("Score: 3"));
        assert!(html.contains("localStorage.setItem('bestScore','3')"));

        // let the clock run out
        let html = handle_request("POST", "/api/mole/tick", "", "now=101000");
        assert!(html.contains("Time's up! Your final score is: 3"));

        let html = handle_request("POST", "/api/mole/reset", "", "");
        assert!(html.contains("Best Score: 3"));
        assert!(html.contains("Time Left: 100s"));

        let json = handle_request("GET", "/api/mole/state", "", "");
        assert!(json.contains(r#""phase":"Idle""#));
        reset_state();
    }

    #[test]
    fn routes_info_and_teardown() {
        reset_state();
        let html = handle_request("POST", "/api/mole/info", "", "action=open");
        assert!(html.contains("How to Play"));
        assert_eq!(handle_request("POST", "/api/mole/teardown", "", ""), "ok");
        reset_state();
    }

    #[test]
    fn routes_config() {
        reset_state();
        let html = handle_request("POST", "/api/mole/config", "", r#"{"round_seconds": 20}"#);
        assert!(html.contains("Time Left: 20s"));
        reset_state();
    }
}
