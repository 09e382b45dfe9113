//! Game module — round controller, timers, target draws and board rendering.
//! The controller lives in WASM memory (thread_local) for the lifetime of
//! the Web Worker.

pub mod best_score;
pub mod board;
pub mod config;
pub mod controller;
pub mod scheduler;
pub mod state;
pub mod target;
