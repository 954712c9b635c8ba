//! Board geometry and gameplay constants.
//!
//! `RulesConfig` is the editable, serializable input. `Rules` is derived from
//! it once, validated, and read-only afterwards. Every derived value is a pure
//! function of the config, so rebuilding from the same config always yields an
//! identical `Rules`.
//!
//! ```
//! use lilah_logic::rules::{Rules, RulesConfig};
//!
//! let rules = Rules::from_config(&RulesConfig::default()).unwrap();
//! assert_eq!(rules.total_cells(), 72);
//! assert_eq!(rules.start_index(), 67);
//! assert_eq!(rules.bounce_zone(), (68, 71));
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Die face that opens the gate.
pub const GATE_DICE: u8 = 6;
/// Highest die face.
pub const MAX_DICE: u8 = 6;

/// Fixed configuration the geometry is derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    pub rows: u8,
    pub cols: u8,
    /// The gate. Tokens wait here until a 6 is rolled, and finish here.
    pub start_house: u8,
    /// House a token enters on when the gate opens.
    pub start_on_house: u8,
    /// Bounce zone bounds as zero-based indices, inclusive.
    pub bounce_start: usize,
    pub bounce_end: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            rows: 8,
            cols: 9,
            start_house: 68,
            start_on_house: 6,
            bounce_start: 68,
            bounce_end: 71,
        }
    }
}

/// Row/column of a house on the printed board.
///
/// Row 0 is the bottom row. Rows alternate direction: even rows run
/// left-to-right, odd rows right-to-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub row: u8,
    pub col: u8,
}

/// Frozen geometry derived from a `RulesConfig`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    rows: u8,
    cols: u8,
    total_cells: usize,
    start_house: u8,
    start_on_house: u8,
    bounce_start: usize,
    bounce_end: usize,
}

impl Rules {
    /// Derive and validate geometry.
    ///
    /// Rejects any config under which a resolved move could leave the board:
    /// the bounce zone must be at least two cells wide and end on the last
    /// index.
    pub fn from_config(config: &RulesConfig) -> Result<Self, ConfigError> {
        let total_cells = config.rows as usize * config.cols as usize;
        if total_cells == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if total_cells > u8::MAX as usize {
            return Err(ConfigError::BoardTooLarge(total_cells));
        }
        let on_board = |house: u8| house >= 1 && (house as usize) <= total_cells;
        if !on_board(config.start_house) {
            return Err(ConfigError::StartHouseOutOfRange(config.start_house));
        }
        if !on_board(config.start_on_house) {
            return Err(ConfigError::StartOnHouseOutOfRange(config.start_on_house));
        }
        if config.bounce_start >= config.bounce_end {
            return Err(ConfigError::BounceZoneInvalid {
                start: config.bounce_start,
                end: config.bounce_end,
            });
        }
        if config.bounce_end != total_cells - 1 {
            return Err(ConfigError::BounceZoneNotAtEnd {
                end: config.bounce_end,
                last: total_cells - 1,
            });
        }

        Ok(Self {
            rows: config.rows,
            cols: config.cols,
            total_cells,
            start_house: config.start_house,
            start_on_house: config.start_on_house,
            bounce_start: config.bounce_start,
            bounce_end: config.bounce_end,
        })
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn total_cells(&self) -> usize {
        self.total_cells
    }

    pub fn start_house(&self) -> u8 {
        self.start_house
    }

    pub fn start_index(&self) -> usize {
        self.start_house as usize - 1
    }

    pub fn start_on_house(&self) -> u8 {
        self.start_on_house
    }

    pub fn start_on_index(&self) -> usize {
        self.start_on_house as usize - 1
    }

    pub fn bounce_start(&self) -> usize {
        self.bounce_start
    }

    pub fn bounce_end(&self) -> usize {
        self.bounce_end
    }

    /// Inclusive `(start, end)` bounce zone indices.
    pub fn bounce_zone(&self) -> (usize, usize) {
        (self.bounce_start, self.bounce_end)
    }

    /// Number of cells in the bounce corridor.
    pub fn bounce_width(&self) -> usize {
        self.bounce_end - self.bounce_start + 1
    }

    pub fn contains_index(&self, index: usize) -> bool {
        index < self.total_cells
    }

    pub fn contains_house(&self, house: u8) -> bool {
        house >= 1 && (house as usize) <= self.total_cells
    }

    /// House number for a zero-based index.
    pub fn house_of(&self, index: usize) -> Option<u8> {
        self.contains_index(index).then(|| (index + 1) as u8)
    }

    /// Zero-based index for a house number.
    pub fn index_of(&self, house: u8) -> Option<usize> {
        self.contains_house(house).then(|| house as usize - 1)
    }

    /// Where a house sits on the printed grid.
    pub fn grid_cell(&self, house: u8) -> Option<GridCell> {
        let index = self.index_of(house)?;
        let cols = self.cols as usize;
        let row = index / cols;
        let offset = index % cols;
        let col = if row % 2 == 0 { offset } else { cols - 1 - offset };
        Some(GridCell {
            row: row as u8,
            col: col as u8,
        })
    }

    /// Inverse of [`Rules::grid_cell`].
    pub fn house_at(&self, cell: GridCell) -> Option<u8> {
        if cell.row >= self.rows || cell.col >= self.cols {
            return None;
        }
        let cols = self.cols as usize;
        let row = cell.row as usize;
        let offset = if row % 2 == 0 {
            cell.col as usize
        } else {
            cols - 1 - cell.col as usize
        };
        self.house_of(row * cols + offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mini_config() -> RulesConfig {
        RulesConfig {
            rows: 2,
            cols: 5,
            start_house: 9,
            start_on_house: 2,
            bounce_start: 7,
            bounce_end: 9,
        }
    }

    #[test]
    fn test_reference_geometry() {
        let rules = Rules::from_config(&RulesConfig::default()).unwrap();
        assert_eq!(rules.total_cells(), 72);
        assert_eq!(rules.start_house(), 68);
        assert_eq!(rules.start_index(), 67);
        assert_eq!(rules.start_on_index(), 5);
        assert_eq!(rules.bounce_zone(), (68, 71));
        assert_eq!(rules.bounce_width(), 4);
    }

    #[test]
    fn test_derivation_is_stable() {
        let a = Rules::from_config(&RulesConfig::default()).unwrap();
        let b = Rules::from_config(&RulesConfig::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_mini_board() {
        let rules = Rules::from_config(&mini_config()).unwrap();
        assert_eq!(rules.total_cells(), 10);
        assert_eq!(rules.start_index(), 8);
        assert_eq!(rules.bounce_width(), 3);
    }

    #[test]
    fn test_empty_grid_rejected() {
        let config = RulesConfig {
            rows: 0,
            ..RulesConfig::default()
        };
        assert_eq!(Rules::from_config(&config), Err(ConfigError::EmptyGrid));
    }

    #[test]
    fn test_oversized_grid_rejected() {
        let config = RulesConfig {
            rows: 16,
            cols: 16,
            ..RulesConfig::default()
        };
        assert_eq!(
            Rules::from_config(&config),
            Err(ConfigError::BoardTooLarge(256))
        );
    }

    #[test]
    fn test_start_houses_must_be_on_board() {
        let config = RulesConfig {
            start_house: 73,
            ..RulesConfig::default()
        };
        assert_eq!(
            Rules::from_config(&config),
            Err(ConfigError::StartHouseOutOfRange(73))
        );

        let config = RulesConfig {
            start_on_house: 0,
            ..RulesConfig::default()
        };
        assert_eq!(
            Rules::from_config(&config),
            Err(ConfigError::StartOnHouseOutOfRange(0))
        );
    }

    #[test]
    fn test_bounce_zone_needs_two_cells() {
        let config = RulesConfig {
            bounce_start: 71,
            ..RulesConfig::default()
        };
        assert_eq!(
            Rules::from_config(&config),
            Err(ConfigError::BounceZoneInvalid { start: 71, end: 71 })
        );
    }

    #[test]
    fn test_bounce_zone_must_end_on_last_cell() {
        let config = RulesConfig {
            bounce_start: 60,
            bounce_end: 70,
            ..RulesConfig::default()
        };
        assert_eq!(
            Rules::from_config(&config),
            Err(ConfigError::BounceZoneNotAtEnd { end: 70, last: 71 })
        );
    }

    #[test]
    fn test_house_index_conversion() {
        let rules = Rules::from_config(&RulesConfig::default()).unwrap();
        assert_eq!(rules.house_of(0), Some(1));
        assert_eq!(rules.house_of(71), Some(72));
        assert_eq!(rules.house_of(72), None);
        assert_eq!(rules.index_of(1), Some(0));
        assert_eq!(rules.index_of(0), None);
        assert_eq!(rules.index_of(73), None);
    }

    #[test]
    fn test_grid_is_serpentine() {
        let rules = Rules::from_config(&RulesConfig::default()).unwrap();
        assert_eq!(rules.grid_cell(1), Some(GridCell { row: 0, col: 0 }));
        assert_eq!(rules.grid_cell(9), Some(GridCell { row: 0, col: 8 }));
        assert_eq!(rules.grid_cell(10), Some(GridCell { row: 1, col: 8 }));
        assert_eq!(rules.grid_cell(18), Some(GridCell { row: 1, col: 0 }));
        assert_eq!(rules.grid_cell(19), Some(GridCell { row: 2, col: 0 }));
        assert_eq!(rules.grid_cell(72), Some(GridCell { row: 7, col: 0 }));
        assert_eq!(rules.grid_cell(73), None);
    }

    #[test]
    fn test_grid_round_trip_covers_board() {
        let rules = Rules::from_config(&RulesConfig::default()).unwrap();
        for house in 1..=72u8 {
            let cell = rules.grid_cell(house).unwrap();
            assert_eq!(rules.house_at(cell), Some(house));
        }
        assert_eq!(rules.house_at(GridCell { row: 8, col: 0 }), None);
        assert_eq!(rules.house_at(GridCell { row: 0, col: 9 }), None);
    }
}
