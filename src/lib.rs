//! # Connect Four AI
//!
//! A Connect Four board with gravity and win detection, plus a depth-limited
//! alpha-beta search engine offering three difficulty tiers.
//!
//! ## Modules
//!
//! - [`game`] — Core game logic: board, sides, round outcomes
//! - [`ai`] — Difficulty tiers, heuristic, search engine, agents
//! - [`session`] — Human vs engine rounds and the running score
//! - [`arena`] — Headless agent-vs-agent matches
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod ai;
pub mod arena;
pub mod config;
pub mod error;
pub mod game;
pub mod session;
