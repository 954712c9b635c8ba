//! Caller-side token bookkeeping.
//!
//! The engine never stores token state. `TokenState` and `Journey` are
//! conveniences for callers (and the headless harness) that want to feed
//! `MoveResult`s back into a token and keep the visited-houses log.

use serde::{Deserialize, Serialize};

use crate::board::JumpType;
use crate::engine::Engine;
use crate::error::MoveError;
use crate::movement::{is_completed, MoveRequest, MoveResult};
use crate::rules::Rules;

/// Position and gate flag of one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenState {
    pub position_index: usize,
    pub has_started: bool,
}

impl TokenState {
    /// A fresh token waiting at the gate.
    pub fn at_gate(rules: &Rules) -> Self {
        Self {
            position_index: rules.start_index(),
            has_started: false,
        }
    }

    pub fn request(&self, dice: u8) -> MoveRequest {
        MoveRequest {
            position_index: self.position_index,
            dice,
            has_started: self.has_started,
        }
    }

    pub fn advance(&mut self, result: &MoveResult) {
        self.position_index = result.to_index;
        self.has_started = result.has_started_after;
    }
}

/// One token's game: current state, visited houses, and tallies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journey {
    token: TokenState,
    /// Houses visited in order. A followed jump logs both its source and target.
    path: Vec<u8>,
    rolls: u32,
    forward_jumps: u32,
    backward_jumps: u32,
    bounces: u32,
    completed_at: Option<u32>,
}

impl Journey {
    pub fn new(rules: &Rules) -> Self {
        Self::resume(TokenState::at_gate(rules))
    }

    /// Continue from a token persisted elsewhere. The path starts empty.
    pub fn resume(token: TokenState) -> Self {
        Self {
            token,
            path: Vec::new(),
            rolls: 0,
            forward_jumps: 0,
            backward_jumps: 0,
            bounces: 0,
            completed_at: None,
        }
    }

    /// Resolve a roll for this token and record it.
    pub fn roll(&mut self, engine: &Engine, dice: u8) -> Result<MoveResult, MoveError> {
        let result = engine.apply(self.token.request(dice))?;
        self.record(engine.rules(), &result);
        Ok(result)
    }

    /// Apply a result produced elsewhere to this token.
    pub fn record(&mut self, rules: &Rules, result: &MoveResult) {
        self.rolls += 1;
        self.token.advance(result);

        if result.record_in_path {
            if let Some(jump) = result.applied_jump {
                self.path.push(jump.from);
                match jump.kind {
                    JumpType::Forward => self.forward_jumps += 1,
                    JumpType::Backward => self.backward_jumps += 1,
                }
            }
            self.path.push(result.to_house);
        }
        if result.used_bounce {
            self.bounces += 1;
        }

        if self.completed_at.is_none()
            && is_completed(rules, self.token.position_index, self.token.has_started)
        {
            log::debug!("Token completed the circuit after {} rolls", self.rolls);
            self.completed_at = Some(self.rolls);
        }
    }

    pub fn token(&self) -> TokenState {
        self.token
    }

    pub fn path(&self) -> &[u8] {
        &self.path
    }

    pub fn rolls(&self) -> u32 {
        self.rolls
    }

    pub fn forward_jumps(&self) -> u32 {
        self.forward_jumps
    }

    pub fn backward_jumps(&self) -> u32 {
        self.backward_jumps
    }

    pub fn bounces(&self) -> u32 {
        self.bounces
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Roll count at which the token first returned to the gate.
    pub fn completed_at(&self) -> Option<u32> {
        self.completed_at
    }
}
