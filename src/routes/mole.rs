//! `/api/mole/*` routes — round lifecycle, clicks, clock ticks and
//! best-score persistence.
//!
//! Every mutating route answers with the re-rendered board. When the request
//! produced a new best score the response also carries a `localStorage`
//! write for the page to execute.

use crate::error::{GameError, Result};
use crate::game::best_score;
use crate::game::board;
use crate::game::config::GameConfig;
use crate::game::controller::{ClickOutcome, GameEvent};
use crate::game::state::{self, with_game, with_game_mut};
use crate::routes::util::{escape_html, get_param, parse_clock, parse_form_body, parse_param};

/// Render the board and flush queued events into the response.
fn render_board_with_events() -> String {
    with_game_mut(|g| {
        let events = g.take_events();
        let mut html = board::render_board(g.state(), g.config());
        let new_best = events
            .iter()
            .map(|e| match e {
                GameEvent::NewBest(best) => *best,
            })
            .max();
        if let Some(best) = new_best {
            html.push_str(&best_score::persist_script(best));
        }
        html
    })
}

fn render_error(err: &GameError) -> String {
    tracing::warn!(error = %err, "Rejected mole request");
    format!(
        r#"<span class="text-red-500">{}</span>"#,
        escape_html(&err.to_string())
    )
}

/// Board on success; error message above the unchanged board otherwise.
fn respond(result: Result<()>) -> String {
    match result {
        Ok(()) => render_board_with_events(),
        Err(e) => {
            let mut html = render_error(&e);
            html.push_str(&render_board_with_events());
            html
        }
    }
}

// ── GET /api/mole/board ────────────────────────────────────────────

pub fn handle_board_get(_query: &str) -> String {
    render_board_with_events()
}

// ── GET /api/mole/state ────────────────────────────────────────────

/// Returns the game state as JSON.
pub fn handle_state_get(_query: &str) -> String {
    state::export_state_json()
}

// ── POST /api/mole/start ───────────────────────────────────────────

/// Body: `now={ms}`
pub fn handle_start_post(body: &str) -> String {
    let params = parse_form_body(body);
    respond(parse_clock(&params).and_then(|now| with_game_mut(|g| g.start(now))))
}

// ── POST /api/mole/click ───────────────────────────────────────────

/// Body: `slot={n}&now={ms}`
pub fn handle_click_post(body: &str) -> String {
    let params = parse_form_body(body);
    let result = parse_param::<usize>(&params, "slot").and_then(|slot| {
        let now = parse_clock(&params)?;
        let outcome = with_game_mut(|g| g.click(slot, now));
        if outcome == ClickOutcome::Ignored {
            tracing::debug!(slot, now, "Click ignored");
        }
        Ok(())
    });
    respond(result)
}

// ── POST /api/mole/tick ────────────────────────────────────────────

/// Body: `now={ms}`. Fires every timer due by `now`.
pub fn handle_tick_post(body: &str) -> String {
    let params = parse_form_body(body);
    respond(parse_clock(&params).map(|now| with_game_mut(|g| g.advance(now))))
}

// ── POST /api/mole/reset ───────────────────────────────────────────

/// Acknowledge the end-of-round notice and go back to the menu.
pub fn handle_reset_post(_body: &str) -> String {
    with_game_mut(|g| g.reset());
    render_board_with_events()
}

// ── POST /api/mole/teardown ────────────────────────────────────────

/// Called on `pagehide`: cancel every pending timer and drop the round.
pub fn handle_teardown_post(_body: &str) -> String {
    with_game_mut(|g| g.teardown());
    "ok".to_string()
}

// ── POST /api/mole/info ────────────────────────────────────────────

/// Body: `action=open|close`
pub fn handle_info_post(body: &str) -> String {
    let params = parse_form_body(body);
    let visible = match get_param(&params, "action") {
        Some("open") => Ok(true),
        Some("close") => Ok(false),
        Some(other) => Err(GameError::InvalidParam {
            name: "action",
            value: other.to_string(),
        }),
        None => Err(GameError::MissingParam("action")),
    };
    respond(visible.map(|v| with_game_mut(|g| g.set_info_visible(v))))
}

// ── POST /api/mole/restore ─────────────────────────────────────────

/// Handle POST /api/mole/restore
/// Body: `best={value}` (or the raw value) as read from `localStorage`.
/// Called once on page load. Corrupt values count as 0.
pub fn handle_restore_post(body: &str) -> String {
    let params = parse_form_body(body);
    let raw = get_param(&params, "best").unwrap_or(body.trim());
    let best = best_score::decode(Some(raw));
    with_game_mut(|g| g.restore_best(best));
    render_board_with_events()
}

// ── POST /api/mole/config ──────────────────────────────────────────

/// Body: a JSON `GameConfig` (missing fields take defaults). Idle only.
pub fn handle_config_post(body: &str) -> String {
    let result =
        GameConfig::from_json(body).and_then(|config| with_game_mut(|g| g.set_config(config)));
    if result.is_ok() {
        with_game(|g| tracing::info!(config = ?g.config(), "Config replaced"));
    }
    respond(result)
}
