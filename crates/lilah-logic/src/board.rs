//! Static board tables — houses and the jump graph.
//!
//! Tables arrive as plain serde data (`BoardTables`), are checked against the
//! geometry in [`Rules`], and are frozen into a `Board` with O(1) lookups.
//! A `Board` is never mutated after construction; to change content, build a
//! new one and swap the whole value.
//!
//! Lookups take house numbers (1-based) and return `None` for anything off the
//! board or without a jump. "No jump here" is the common case, not an error.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::rules::Rules;

/// Reference board tables (72 houses, 10 forward and 10 backward jumps).
pub const STANDARD_BOARD_JSON: &str = include_str!("../data/board.json");

/// A numbered cell of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct House {
    pub number: u8,
    pub title: String,
    pub description: String,
}

/// A directed shortcut or setback between two houses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Jump {
    pub from: u8,
    pub to: u8,
}

impl Jump {
    /// Direction of the jump, derived from its endpoints.
    ///
    /// Only `None` for a self-loop, which board validation rejects.
    pub fn kind(&self) -> Option<JumpType> {
        JumpType::between(self.from, self.to)
    }
}

/// Whether a jump moves the token up or down the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JumpType {
    Forward,
    Backward,
}

impl JumpType {
    pub fn between(from: u8, to: u8) -> Option<Self> {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Some(JumpType::Forward),
            std::cmp::Ordering::Less => Some(JumpType::Backward),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JumpType::Forward => "forward",
            JumpType::Backward => "backward",
        }
    }
}

impl fmt::Display for JumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unvalidated board tables as loaded from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardTables {
    pub houses: Vec<House>,
    #[serde(default)]
    pub jumps: Vec<Jump>,
}

impl BoardTables {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// The embedded reference tables.
    pub fn standard() -> Result<Self, ConfigError> {
        Self::from_json(STANDARD_BOARD_JSON)
    }
}

/// Check tables against the board geometry, returning every violation found.
pub fn validate_tables(rules: &Rules, tables: &BoardTables) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    let total = rules.total_cells();

    if tables.houses.len() != total {
        errors.push(ConfigError::HouseCountMismatch {
            expected: total,
            found: tables.houses.len(),
        });
    }

    let mut seen = HashSet::new();
    for house in &tables.houses {
        if !rules.contains_house(house.number) {
            errors.push(ConfigError::HouseOutOfRange(house.number));
            continue;
        }
        if !seen.insert(house.number) {
            errors.push(ConfigError::DuplicateHouse(house.number));
        }
        if house.title.trim().is_empty() {
            errors.push(ConfigError::EmptyHouseTitle(house.number));
        }
    }
    for number in 1..=total as u8 {
        if !seen.contains(&number) {
            errors.push(ConfigError::MissingHouse(number));
        }
    }

    let mut sources = HashSet::new();
    for jump in &tables.jumps {
        if !rules.contains_house(jump.from) || !rules.contains_house(jump.to) {
            errors.push(ConfigError::JumpOutOfRange {
                from: jump.from,
                to: jump.to,
            });
            continue;
        }
        if jump.from == jump.to {
            errors.push(ConfigError::SelfLoopJump(jump.from));
        }
        if !sources.insert(jump.from) {
            errors.push(ConfigError::DuplicateJump(jump.from));
        }
    }

    errors
}

/// Validated, immutable board tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Sorted by number; house `n` lives at `n - 1`.
    houses: Vec<House>,
    /// Outgoing jump target per house, same indexing as `houses`.
    jumps: Vec<Option<u8>>,
}

impl Board {
    /// Validate `tables` against `rules` and freeze them.
    ///
    /// Fails with the first violation; use [`validate_tables`] for the full list.
    pub fn from_tables(rules: &Rules, tables: BoardTables) -> Result<Self, ConfigError> {
        if let Some(first) = validate_tables(rules, &tables).into_iter().next() {
            return Err(first);
        }

        let BoardTables { mut houses, jumps } = tables;
        houses.sort_by_key(|h| h.number);

        let mut targets = vec![None; houses.len()];
        for jump in &jumps {
            targets[jump.from as usize - 1] = Some(jump.to);
        }

        log::info!(
            "Board loaded: {} houses, {} jumps",
            houses.len(),
            jumps.len()
        );

        Ok(Self {
            houses,
            jumps: targets,
        })
    }

    /// Number of houses.
    pub fn len(&self) -> usize {
        self.houses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.houses.is_empty()
    }

    /// All houses in number order.
    pub fn houses(&self) -> &[House] {
        &self.houses
    }

    pub fn house(&self, number: u8) -> Option<&House> {
        self.houses.get((number as usize).checked_sub(1)?)
    }

    pub fn jump_target(&self, from: u8) -> Option<u8> {
        *self.jumps.get((from as usize).checked_sub(1)?)?
    }

    pub fn jump(&self, from: u8) -> Option<Jump> {
        self.jump_target(from).map(|to| Jump { from, to })
    }

    pub fn jump_type(&self, from: u8) -> Option<JumpType> {
        self.jump(from).and_then(|j| j.kind())
    }

    /// Every jump, ordered by source house.
    pub fn jumps(&self) -> impl Iterator<Item = Jump> + '_ {
        self.jumps
            .iter()
            .enumerate()
            .filter_map(|(i, to)| to.map(|to| Jump { from: i as u8 + 1, to }))
    }

    /// Number of jumps of the given direction.
    pub fn count_jumps(&self, kind: JumpType) -> usize {
        self.jumps().filter(|j| j.kind() == Some(kind)).count()
    }

    /// One-line summary of a house for logs and listings.
    pub fn house_text(&self, number: u8) -> Option<String> {
        let house = self.house(number)?;
        let mut text = format!("{}: {}", house.title, house.description);
        if let Some(note) = self.jump_note(number) {
            text.push(' ');
            text.push_str(&note);
        }
        Some(text)
    }

    /// Reflective prompt shown to a player who lands on a house.
    pub fn house_prompt(&self, number: u8) -> Option<String> {
        let house = self.house(number)?;
        let mut prompt = format!(
            "House {} · {}\n{}\nWhat does this house awaken in you right now?",
            house.number, house.title, house.description
        );
        if let Some(note) = self.jump_note(number) {
            prompt.push('\n');
            prompt.push_str(&note);
        }
        Some(prompt)
    }

    fn jump_note(&self, from: u8) -> Option<String> {
        let jump = self.jump(from)?;
        let target = self.house(jump.to)?;
        let note = match jump.kind()? {
            JumpType::Forward => format!(
                "Shortcut: climbs to house {} ({}).",
                jump.to, target.title
            ),
            JumpType::Backward => format!(
                "Setback: falls back to house {} ({}).",
                jump.to, target.title
            ),
        };
        Some(note)
    }
}
