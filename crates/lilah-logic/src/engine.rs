//! The engine context: frozen rules plus the board built against them.
//!
//! An `Engine` is the single value callers thread into move resolution. It
//! holds no game state and is `Send + Sync`, so one instance can serve any
//! number of rooms concurrently.
//!
//! ```
//! use lilah_logic::engine::Engine;
//!
//! let engine = Engine::standard().unwrap();
//! let result = engine.apply_move(67, 6, false).unwrap();
//! assert_eq!(result.to_house, 6);
//! assert!(result.started_this_roll);
//! ```

use std::sync::OnceLock;

use crate::board::{Board, BoardTables, House, JumpType};
use crate::error::{ConfigError, MoveError};
use crate::movement::{self, MoveRequest, MoveResult};
use crate::rules::{Rules, RulesConfig};

static STANDARD: OnceLock<Result<Engine, ConfigError>> = OnceLock::new();

/// Validated rules and board, immutable for the life of the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Engine {
    rules: Rules,
    board: Board,
}

impl Engine {
    /// Build an engine, rejecting any configuration that breaks a board invariant.
    pub fn new(config: &RulesConfig, tables: BoardTables) -> Result<Self, ConfigError> {
        let rules = Rules::from_config(config)?;
        let board = Board::from_tables(&rules, tables)?;
        Ok(Self { rules, board })
    }

    pub fn from_json(config: &RulesConfig, json: &str) -> Result<Self, ConfigError> {
        Self::new(config, BoardTables::from_json(json)?)
    }

    /// Process-wide engine for the reference board, built on first use.
    pub fn standard() -> Result<&'static Engine, ConfigError> {
        STANDARD
            .get_or_init(|| {
                let tables = BoardTables::standard()?;
                Engine::new(&RulesConfig::default(), tables)
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Resolve one roll. Fails only on a die outside 1..=6 or a position off the board.
    pub fn apply_move(
        &self,
        position_index: usize,
        dice: u8,
        has_started: bool,
    ) -> Result<MoveResult, MoveError> {
        self.apply(MoveRequest {
            position_index,
            dice,
            has_started,
        })
    }

    pub fn apply(&self, request: MoveRequest) -> Result<MoveResult, MoveError> {
        movement::apply_move(&self.rules, &self.board, request)
    }

    pub fn is_completed(&self, position_index: usize, has_started: bool) -> bool {
        movement::is_completed(&self.rules, position_index, has_started)
    }

    pub fn house(&self, number: u8) -> Option<&House> {
        self.board.house(number)
    }

    pub fn jump_target(&self, from: u8) -> Option<u8> {
        self.board.jump_target(from)
    }

    pub fn jump_type(&self, from: u8) -> Option<JumpType> {
        self.board.jump_type(from)
    }

    pub fn house_prompt(&self, number: u8) -> Option<String> {
        self.board.house_prompt(number)
    }

    pub fn house_text(&self, number: u8) -> Option<String> {
        self.board.house_text(number)
    }
}
