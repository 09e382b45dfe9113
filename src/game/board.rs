//! Board rendering — the HTML fragment swapped into `#mole-board`.
//!
//! The fragment carries its own driver: while a round is running the root
//! element polls `POST /api/mole/tick` with `performance.now()`, so the page
//! needs no timer code of its own. Polling stops as soon as the round is
//! over because the next fragment no longer carries the trigger.

use crate::game::config::GameConfig;
use crate::game::controller::{GameState, RoundPhase};
use crate::game::target::TargetKind;

/// How often the page reports its clock while a round runs.
pub const POLL_MS: u64 = 100;

/// JS expression for the host clock, sent as the `now` value.
const NOW_JS: &str = "Math.round(performance.now())";

fn post_action(path: &str, extra: &str) -> String {
    format!(
        "htmx.ajax('POST', '{}', {{values: {{{}now: {}}}, target: '#mole-board', swap: 'innerHTML'}})",
        path, extra, NOW_JS
    )
}

/// Render the whole board for `state`.
pub fn render_board(state: &GameState, config: &GameConfig) -> String {
    let mut html = String::with_capacity(4096);

    if state.phase == RoundPhase::Running {
        html.push_str(&format!(
            r##"<div id="mole-driver" hx-post="/api/mole/tick" hx-trigger="every {}ms" hx-vals='js:{{now: {}}}' hx-target="#mole-board" hx-swap="innerHTML">"##,
            POLL_MS, NOW_JS
        ));
    } else {
        html.push_str(r#"<div id="mole-driver">"#);
    }

    html.push_str(r#"<div class="border-4 border-black p-4 bg-gray-800 rounded-lg">"#);
    html.push_str(r#"<div class="flex flex-col items-center justify-center">"#);
    html.push_str(
        r#"<img src="/images/megarabbit.png" alt="Mega Rabbit" width="150" height="150">"#,
    );
    html.push_str(r#"<h1 class="text-2xl font-bold mb-4 text-white">Whack-a-Mole Game</h1>"#);
    html.push_str(r#"</div>"#);

    html.push_str(&render_hud(state));

    if state.started() {
        html.push_str(&render_grid(state, config));
    } else {
        html.push_str(&render_menu());
    }

    if state.over() {
        html.push_str(&format!(
            r#"<button onclick="{}" class="bg-red-500 text-white font-semibold py-2 px-4 rounded hover:bg-red-600 transition mt-4">Back to Menu</button>"#,
            post_action("/api/mole/reset", "")
        ));
    }
    html.push_str(r#"</div>"#);

    if let Some(end) = state.round_end {
        html.push_str(&render_round_notice(&end.message(state.score)));
    }
    if state.show_info {
        html.push_str(&render_info());
    }

    html.push_str(r#"</div>"#);
    html
}

/// Score (or best score before a round) and the countdown.
fn render_hud(state: &GameState) -> String {
    let mut html = String::with_capacity(256);
    if state.started() {
        html.push_str(&format!(
            r#"<div class="text-lg mb-4 text-white">Score: {}</div>"#,
            state.score
        ));
    } else {
        html.push_str(&format!(
            r#"<div class="text-lg mb-4 text-white">Best Score: {}</div>"#,
            state.best_score
        ));
    }
    html.push_str(&format!(
        r#"<div class="text-lg mb-4 text-white">Time Left: {}s</div>"#,
        state.time_left
    ));
    html
}

fn render_menu() -> String {
    let mut html = String::with_capacity(512);
    html.push_str(r#"<div class="flex justify-between">"#);
    html.push_str(&format!(
        r#"<button onclick="{}" class="bg-blue-500 text-white font-semibold py-2 px-4 rounded hover:bg-blue-600 transition">Start Game</button>"#,
        post_action("/api/mole/start", "")
    ));
    html.push_str(
        r##"<button onclick="htmx.ajax('POST', '/api/mole/info', {values: {action: 'open'}, target: '#mole-board', swap: 'innerHTML'})" class="bg-green-500 text-white font-semibold py-2 px-4 rounded hover:bg-green-600 transition">Game Info</button>"##,
    );
    html.push_str(r#"</div>"#);
    html
}

fn image_for(kind: TargetKind) -> (&'static str, &'static str) {
    match kind {
        TargetKind::Primary => ("/images/mole.png", "Mole"),
        TargetKind::Penalty => ("/images/rabbit.png", "Rabbit"),
        TargetKind::Bonus => ("/images/megapass.png", "Mega Pass"),
    }
}

fn render_grid(state: &GameState, config: &GameConfig) -> String {
    let mut html = String::with_capacity(256 * config.slot_count);
    html.push_str(&format!(
        r#"<div class="grid grid-cols-{} gap-4">"#,
        config.grid_columns
    ));
    for slot in 0..config.slot_count {
        html.push_str(&format!(
            r#"<div data-slot="{}" onclick="{}" class="relative w-24 h-24 flex items-center justify-center overflow-hidden" style="background-image: url('/images/hole.png'); background-size: cover;">"#,
            slot,
            post_action("/api/mole/click", &format!("slot: '{}', ", slot))
        ));
        if let Some(target) = state.target.filter(|t| t.slot == slot) {
            let animation = match target.kind {
                TargetKind::Penalty => "animate-rabbit",
                _ => "animate-mole",
            };
            let (src, alt) = image_for(target.kind);
            html.push_str(&format!(
                r#"<div class="absolute transition-transform duration-500 {} target-{}"><img src="{}" alt="{}" width="100" height="100"></div>"#,
                animation,
                target.kind.label(),
                src,
                alt
            ));
        }
        html.push_str(r#"</div>"#);
    }
    html.push_str(r#"</div>"#);
    html
}

/// Blocking end-of-round notice. The only way out is "Back to Menu".
fn render_round_notice(message: &str) -> String {
    let mut html = String::with_capacity(512);
    html.push_str(
        r#"<div id="round-notice" role="alertdialog" class="fixed inset-0 flex items-center justify-center bg-black bg-opacity-50">"#,
    );
    html.push_str(r#"<div class="bg-gray-800 p-7 rounded-lg shadow-lg text-white">"#);
    html.push_str(&format!(r#"<p class="text-xl font-bold mb-4">{}</p>"#, message));
    html.push_str(&format!(
        r#"<div class="flex justify-end"><button onclick="{}" class="bg-red-500 text-white font-semibold py-2 px-4 rounded hover:bg-red-600 transition">Back to Menu</button></div>"#,
        post_action("/api/mole/reset", "")
    ));
    html.push_str(r#"</div></div>"#);
    html
}

fn render_info() -> String {
    let mut html = String::with_capacity(1024);
    html.push_str(
        r#"<div id="mole-info" class="fixed inset-0 flex items-center justify-center bg-black bg-opacity-50">"#,
    );
    html.push_str(r#"<div class="bg-gray-800 p-7 rounded-lg shadow-lg">"#);
    html.push_str(r#"<h2 class="text-xl font-bold mb-2">How to Play</h2>"#);
    for (kind, text) in [
        (TargetKind::Primary, "Click on the mole to score points!"),
        (TargetKind::Penalty, "Avoid clicking on the rabbit, or the game will end!"),
        (TargetKind::Bonus, "Hitting the Mega Pass gives you +5 points!"),
    ] {
        let (src, alt) = image_for(kind);
        html.push_str(&format!(
            r#"<div class="flex items-center"><img src="{}" alt="{}" width="100" height="100"><span>{}</span></div>"#,
            src, alt, text
        ));
    }
    html.push_str(
        r##"<div class="flex justify-end"><button onclick="htmx.ajax('POST', '/api/mole/info', {values: {action: 'close'}, target: '#mole-board', swap: 'innerHTML'})" class="bg-red-500 text-white font-semibold py-2 px-4 rounded hover:bg-red-600 transition">Close</button></div>"##,
    );
    html.push_str(r#"</div></div>"#);
    html
}
