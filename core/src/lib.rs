//! Simulation core of a tick-driven incremental game.
//!
//! State changes only through `Action`s dispatched on a `GameEngine`.
//! Rendering, persistence and game content live in the host.

pub mod action;
pub mod button;
pub mod clock;
pub mod condition;
pub mod config;
pub mod engine;
pub mod error;
pub mod flag;
pub mod message;
pub mod queue;
pub mod resource;
pub mod snapshot;
pub mod state;
pub mod types;
