//! Round controller — owns the game state, the round's timers and the RNG.
//!
//! Every mutation goes through a method on [`RoundController`]. Timer
//! callbacks are [`Task`]s in the controller's [`Scheduler`]; their handles
//! are kept in [`RoundTimers`] so a round end, reset or teardown can cancel
//! all of them and no stale callback ever touches a later round.
//!
//! Things the page needs to persist (a new best score) are queued as
//! [`GameEvent`]s and drained by the route layer after each request. Best
//! score writes are held back until the stored best has been restored.

use rand::Rng;
use serde::Serialize;

use crate::error::{GameError, Result};
use crate::game::config::GameConfig;
use crate::game::scheduler::{Scheduler, Task, TaskHandle};
use crate::game::target::{HitEffect, Target, draw_target};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoundPhase {
    Idle,
    Running,
    Over,
}

/// Why a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoundEnd {
    TimeUp,
    Penalty,
}

impl RoundEnd {
    /// End-of-round notice shown to the player.
    pub fn message(self, score: u32) -> String {
        match self {
            RoundEnd::TimeUp => format!("Time's up! Your final score is: {}", score),
            RoundEnd::Penalty => format!("Game Over! Your final score is: {}", score),
        }
    }
}

/// Everything the board needs to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    pub score: u32,
    pub phase: RoundPhase,
    pub time_left: u32,
    pub best_score: u32,
    pub clickable: bool,
    pub target: Option<Target>,
    /// Whether the "How to Play" overlay is open.
    pub show_info: bool,
    /// Set when a round ends; cleared by start/reset.
    pub round_end: Option<RoundEnd>,
}

impl GameState {
    fn idle(round_seconds: u32, best_score: u32) -> Self {
        Self {
            score: 0,
            phase: RoundPhase::Idle,
            time_left: round_seconds,
            best_score,
            clickable: true,
            target: None,
            show_info: false,
            round_end: None,
        }
    }

    pub fn started(&self) -> bool {
        self.phase != RoundPhase::Idle
    }

    pub fn over(&self) -> bool {
        self.phase == RoundPhase::Over
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// The best score rose and should be written to storage.
    NewBest(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Wrong slot, nothing showing, cooldown, or no round running.
    Ignored,
    Scored { points: u32, score: u32 },
    Penalty { score: u32 },
}

/// Handles of the tasks a round can have pending.
#[derive(Debug, Default)]
struct RoundTimers {
    tick: Option<TaskHandle>,
    spawn: Option<TaskHandle>,
    hide: Option<TaskHandle>,
    restore: Option<TaskHandle>,
}

pub struct RoundController<R> {
    config: GameConfig,
    state: GameState,
    rng: R,
    scheduler: Scheduler,
    timers: RoundTimers,
    /// Latest host clock reading (ms). Never moves backwards.
    clock: u64,
    /// Set once the stored best score has been read back.
    best_restored: bool,
    events: Vec<GameEvent>,
}

impl<R: Rng> RoundController<R> {
    pub fn new(config: GameConfig, rng: R, best_score: u32) -> Self {
        let state = GameState::idle(config.round_seconds, best_score);
        Self {
            config,
            state,
            rng,
            scheduler: Scheduler::new(),
            timers: RoundTimers::default(),
            clock: 0,
            best_restored: false,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Number of scheduled timers (round tick, spawner, expiry, cooldown).
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    /// Drain queued events, oldest first.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Swap in a new config. Only allowed while no round is in progress.
    pub fn set_config(&mut self, config: GameConfig) -> Result<()> {
        if self.state.phase != RoundPhase::Idle {
            return Err(GameError::ConfigLocked);
        }
        config.validate()?;
        self.state.time_left = config.round_seconds;
        self.config = config;
        Ok(())
    }

    /// Load the persisted best score. Never lowers a best already reached;
    /// a higher in-memory best is queued for writing back.
    pub fn restore_best(&mut self, best: u32) {
        self.best_restored = true;
        if self.state.best_score > best {
            self.events.push(GameEvent::NewBest(self.state.best_score));
        } else {
            self.state.best_score = best;
        }
    }

    pub fn set_info_visible(&mut self, visible: bool) {
        self.state.show_info = visible;
    }

    fn sync_clock(&mut self, now: u64) -> u64 {
        if now < self.clock {
            tracing::debug!(now, clock = self.clock, "Clock went backwards, clamping");
        }
        self.clock = self.clock.max(now);
        self.clock
    }

    /// Begin a round at `now` and show the first target immediately.
    pub fn start(&mut self, now: u64) -> Result<()> {
        if self.state.phase == RoundPhase::Running {
            return Err(GameError::RoundInProgress);
        }
        let now = self.sync_clock(now);
        self.cancel_timers();

        self.state.score = 0;
        self.state.phase = RoundPhase::Running;
        self.state.time_left = self.config.round_seconds;
        self.state.clickable = true;
        self.state.target = None;
        self.state.round_end = None;

        self.timers.tick = Some(self.scheduler.schedule_every(
            now,
            self.config.tick_ms,
            Task::RoundTick,
        ));
        self.timers.spawn = Some(self.scheduler.schedule_every(
            now,
            self.config.spawn_interval_ms,
            Task::SpawnTick,
        ));
        tracing::info!(now, seconds = self.config.round_seconds, "Round started");
        self.spawn(now);
        Ok(())
    }

    /// Back to Idle. Calling it again changes nothing.
    pub fn reset(&mut self) {
        self.cancel_timers();
        self.state.score = 0;
        self.state.phase = RoundPhase::Idle;
        self.state.time_left = self.config.round_seconds;
        self.state.clickable = true;
        self.state.target = None;
        self.state.round_end = None;
    }

    /// Called when the page goes away. A round cannot outlive its timers, so
    /// this is a reset.
    pub fn teardown(&mut self) {
        tracing::debug!(phase = ?self.state.phase, "Teardown");
        self.reset();
    }

    fn cancel_timers(&mut self) {
        let timers = std::mem::take(&mut self.timers);
        for handle in [timers.tick, timers.spawn, timers.hide, timers.restore]
            .into_iter()
            .flatten()
        {
            self.scheduler.cancel(handle);
        }
        debug_assert_eq!(self.scheduler.pending(), 0, "untracked timer left behind");
    }

    /// Fire every timer due at or before `now`.
    pub fn advance(&mut self, now: u64) {
        let now = self.sync_clock(now);
        while let Some((handle, task, due)) = self.scheduler.pop_due(now) {
            self.run(handle, task, due);
        }
    }

    fn run(&mut self, handle: TaskHandle, task: Task, at: u64) {
        match task {
            Task::RoundTick => {
                if self.state.phase != RoundPhase::Running {
                    return;
                }
                self.state.time_left = self.state.time_left.saturating_sub(1);
                if self.state.time_left == 0 {
                    self.finish(RoundEnd::TimeUp);
                }
            }
            Task::SpawnTick => {
                if self.state.phase == RoundPhase::Running {
                    self.spawn(at);
                }
            }
            Task::HideTarget => {
                if self.timers.hide == Some(handle) {
                    self.timers.hide = None;
                }
                self.state.target = None;
            }
            Task::RestoreClick => {
                if self.timers.restore == Some(handle) {
                    self.timers.restore = None;
                }
                self.state.clickable = true;
            }
        }
    }

    fn spawn(&mut self, at: u64) {
        let target = draw_target(&mut self.rng, self.config.slot_count);
        self.show_target(target, at);
    }

    /// Make `target` the active target and schedule it to disappear after
    /// the visible window. Replaces any target already showing.
    pub fn show_target(&mut self, target: Target, at: u64) {
        if let Some(old) = self.timers.hide.take() {
            self.scheduler.cancel(old);
        }
        tracing::debug!(slot = target.slot, kind = ?target.kind, at, "Target up");
        self.state.target = Some(target);
        self.timers.hide = Some(self.scheduler.schedule_once(
            at,
            self.config.target_visible_ms,
            Task::HideTarget,
        ));
    }

    /// Handle a click on `slot` at `now`. Timers due before the click fire
    /// first, so a target that already went down cannot be hit.
    pub fn click(&mut self, slot: usize, now: u64) -> ClickOutcome {
        self.advance(now);
        let now = self.clock;

        if self.state.phase != RoundPhase::Running || !self.state.clickable {
            return ClickOutcome::Ignored;
        }
        let target = match self.state.target {
            Some(t) if t.slot == slot => t,
            _ => return ClickOutcome::Ignored,
        };

        match target.kind.hit_effect() {
            HitEffect::Score(points) => {
                self.state.score += points;
                self.record_best();
                self.state.clickable = false;
                self.state.target = None;
                if let Some(hide) = self.timers.hide.take() {
                    self.scheduler.cancel(hide);
                }
                self.timers.restore = Some(self.scheduler.schedule_once(
                    now,
                    self.config.click_cooldown_ms,
                    Task::RestoreClick,
                ));
                tracing::debug!(slot, points, score = self.state.score, "Hit");
                ClickOutcome::Scored {
                    points,
                    score: self.state.score,
                }
            }
            HitEffect::EndRound => {
                self.finish(RoundEnd::Penalty);
                ClickOutcome::Penalty {
                    score: self.state.score,
                }
            }
        }
    }

    fn record_best(&mut self) {
        if self.state.score > self.state.best_score {
            self.state.best_score = self.state.score;
            if self.best_restored {
                self.events.push(GameEvent::NewBest(self.state.score));
            }
        }
    }

    fn finish(&mut self, reason: RoundEnd) {
        self.cancel_timers();
        self.state.phase = RoundPhase::Over;
        self.state.target = None;
        self.state.round_end = Some(reason);
        tracing::info!(?reason, score = self.state.score, "Round over");
    }
}
