//! Error types for move resolution and board loading.
//!
//! `MoveError` is a caller bug (bad die, bad position) and is never retried.
//! `ConfigError` means the board tables or rules violate an invariant and the
//! engine must not be built from them. "No house" / "no jump" are not errors;
//! lookups return `Option` for those.

use thiserror::Error;

/// Invalid input at the public move boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    /// Die value outside `1..=6`.
    #[error("die value {0} is outside 1..=6")]
    DiceOutOfRange(u8),
    /// Position index outside `0..total`.
    #[error("position index {index} is outside the board (0..{total})")]
    PositionOutOfRange { index: usize, total: usize },
}

/// Board or rules configuration violates a load-time invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Board tables could not be parsed.
    #[error("board tables are not valid JSON: {0}")]
    Parse(String),
    /// Grid has zero rows or columns.
    #[error("board grid has no cells")]
    EmptyGrid,
    /// House numbers must fit in a `u8`.
    #[error("board of {0} cells is larger than 255 houses")]
    BoardTooLarge(usize),
    #[error("start house {0} is not on the board")]
    StartHouseOutOfRange(u8),
    #[error("start-on house {0} is not on the board")]
    StartOnHouseOutOfRange(u8),
    /// Bounce zone must span at least two cells.
    #[error("bounce zone [{start}, {end}] must have start < end")]
    BounceZoneInvalid { start: usize, end: usize },
    /// Bounce zone must end on the last cell of the track.
    #[error("bounce zone ends at index {end}, expected last index {last}")]
    BounceZoneNotAtEnd { end: usize, last: usize },
    #[error("expected {expected} houses, found {found}")]
    HouseCountMismatch { expected: usize, found: usize },
    #[error("house {0} is defined more than once")]
    DuplicateHouse(u8),
    #[error("house {0} is missing")]
    MissingHouse(u8),
    #[error("house {0} is not on the board")]
    HouseOutOfRange(u8),
    #[error("house {0} has an empty title")]
    EmptyHouseTitle(u8),
    #[error("jump {from} -> {to} leaves the board")]
    JumpOutOfRange { from: u8, to: u8 },
    #[error("jump from house {0} points to itself")]
    SelfLoopJump(u8),
    /// At most one outgoing jump per house.
    #[error("house {0} has more than one outgoing jump")]
    DuplicateJump(u8),
}
