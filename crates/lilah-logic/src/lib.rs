//! Pure movement rules for Maha Lilah.
//!
//! This crate resolves a single die roll for a single token: gate opening,
//! the reflecting bounce zone at the end of the track, and the shortcut /
//! setback jump graph. It holds no game state and performs no I/O beyond
//! parsing the embedded board tables, so it can be called from any number of
//! rooms or threads at once. Turn order, persistence and UI belong to the
//! caller, which passes token state in and stores the returned `MoveResult`.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`board`] | Houses, jump graph, table validation, lookups and prompts |
//! | [`engine`] | Immutable rules + board context with the public move API |
//! | [`error`] | `MoveError` (bad input) and `ConfigError` (bad tables) |
//! | [`journey`] | Caller-side token state and visited-houses log |
//! | [`movement`] | Gate, bounce walk, single jump, completion check |
//! | [`rules`] | Grid geometry, gate and bounce-zone constants |

pub mod board;
pub mod engine;
pub mod error;
pub mod journey;
pub mod movement;
pub mod rules;
