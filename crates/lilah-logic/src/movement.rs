//! Pure move resolution — gate, bounce zone, single jump.
//!
//! Algorithm for a token that has already started:
//! 1. `raw = position + dice`
//! 2. If `raw` stops short of the bounce zone, or lands exactly on its last
//!    cell, the token goes to `raw`
//! 3. Otherwise walk `dice` steps one at a time, reversing at the zone walls
//! 4. If the landing house has an outgoing jump, follow it once (never chained)
//!
//! A token still at the gate only moves on a 6, and then enters on the
//! start-on house with no jump applied.

use serde::{Deserialize, Serialize};

use crate::board::{Board, JumpType};
use crate::error::MoveError;
use crate::rules::{Rules, GATE_DICE, MAX_DICE};

/// One roll for one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub position_index: usize,
    pub dice: u8,
    pub has_started: bool,
}

/// A jump that was followed during a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedJump {
    pub from: u8,
    pub to: u8,
    #[serde(rename = "type")]
    pub kind: JumpType,
}

/// Full description of one resolved roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    pub from_index: usize,
    pub from_house: u8,
    pub to_index: usize,
    pub to_house: u8,
    pub dice: u8,
    pub has_started_before: bool,
    pub has_started_after: bool,
    /// The gate opened on this roll.
    pub started_this_roll: bool,
    pub used_bounce: bool,
    pub applied_jump: Option<AppliedJump>,
    /// False only while still waiting at the gate.
    pub record_in_path: bool,
}

impl MoveResult {
    /// Token did not move (waiting at the gate).
    pub fn is_noop(&self) -> bool {
        !self.record_in_path
    }
}

/// Walk `steps` cells from `start`, bouncing between `zone_start` and
/// `zone_end` (inclusive walls).
///
/// Direction flips to backward on reaching `zone_end` and back to forward on
/// reaching `zone_start` while moving backward. A walk that begins on
/// `zone_end` starts out moving backward. Requires `zone_start < zone_end`.
pub fn bounce_walk(start: usize, steps: u8, zone_start: usize, zone_end: usize) -> usize {
    let mut pos = start;
    let mut backward = start >= zone_end;
    for _ in 0..steps {
        if backward {
            pos = pos.saturating_sub(1);
        } else {
            pos += 1;
        }
        if pos == zone_end {
            backward = true;
        } else if backward && pos == zone_start {
            backward = false;
        }
    }
    pos
}

/// Validate a request and resolve it.
pub fn apply_move(
    rules: &Rules,
    board: &Board,
    request: MoveRequest,
) -> Result<MoveResult, MoveError> {
    if !(1..=MAX_DICE).contains(&request.dice) {
        return Err(MoveError::DiceOutOfRange(request.dice));
    }
    if !rules.contains_index(request.position_index) {
        return Err(MoveError::PositionOutOfRange {
            index: request.position_index,
            total: rules.total_cells(),
        });
    }
    Ok(resolve_move(rules, board, request))
}

/// Resolve a request already known to be in range.
fn resolve_move(rules: &Rules, board: &Board, request: MoveRequest) -> MoveResult {
    let MoveRequest {
        position_index,
        dice,
        has_started,
    } = request;

    if !has_started {
        return resolve_gate(rules, position_index, dice);
    }

    let (bounce_start, bounce_end) = rules.bounce_zone();
    let raw = position_index + dice as usize;
    let (landed, used_bounce) = if raw < bounce_start || raw == bounce_end {
        (raw, false)
    } else {
        let landed = bounce_walk(position_index, dice, bounce_start, bounce_end);
        log::debug!(
            "Bounce: {} + {} reflected to index {}",
            position_index,
            dice,
            landed
        );
        (landed, true)
    };

    let applied_jump = board.jump(house_number(landed)).and_then(|jump| {
        jump.kind().map(|kind| AppliedJump {
            from: jump.from,
            to: jump.to,
            kind,
        })
    });
    let mut to_index = match applied_jump {
        Some(jump) => {
            log::debug!("Jump: house {} -> {} ({})", jump.from, jump.to, jump.kind);
            jump.to as usize - 1
        }
        None => landed,
    };

    // Unreachable for validated geometry.
    let last = rules.total_cells() - 1;
    if to_index > last {
        log::warn!("Move resolved off the board at index {to_index}; clamped to {last}");
        to_index = last;
    }

    MoveResult {
        from_index: position_index,
        from_house: house_number(position_index),
        to_index,
        to_house: house_number(to_index),
        dice,
        has_started_before: true,
        has_started_after: true,
        started_this_roll: false,
        used_bounce,
        applied_jump,
        record_in_path: true,
    }
}

fn resolve_gate(rules: &Rules, position_index: usize, dice: u8) -> MoveResult {
    let opened = dice == GATE_DICE;
    let to_index = if opened {
        rules.start_on_index()
    } else {
        position_index
    };
    MoveResult {
        from_index: position_index,
        from_house: house_number(position_index),
        to_index,
        to_house: house_number(to_index),
        dice,
        has_started_before: false,
        has_started_after: opened,
        started_this_roll: opened,
        used_bounce: false,
        applied_jump: None,
        record_in_path: opened,
    }
}

/// Token has completed the circuit: started and back on the gate.
pub fn is_completed(rules: &Rules, position_index: usize, has_started: bool) -> bool {
    has_started && position_index == rules.start_index()
}

fn house_number(index: usize) -> u8 {
    (index + 1) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardTables, House, Jump};
    use crate::rules::RulesConfig;

    // 10-cell board: gate at house 9, enter on house 2, bounce zone [7, 9].
    fn mini() -> (Rules, Board) {
        let rules = Rules::from_config(&RulesConfig {
            rows: 2,
            cols: 5,
            start_house: 9,
            start_on_house: 2,
            bounce_start: 7,
            bounce_end: 9,
        })
        .unwrap();
        let tables = BoardTables {
            houses: (1..=10)
                .map(|n| House {
                    number: n,
                    title: format!("H{n}"),
                    description: String::new(),
                })
                .collect(),
            jumps: vec![Jump { from: 4, to: 6 }, Jump { from: 6, to: 1 }],
        };
        let board = Board::from_tables(&rules, tables).unwrap();
        (rules, board)
    }

    fn req(position_index: usize, dice: u8, has_started: bool) -> MoveRequest {
        MoveRequest {
            position_index,
            dice,
            has_started,
        }
    }

    #[test]
    fn test_bounce_walk_reference_case() {
        // 67 -> 68, 69, 70, 71 (wall), 70
        assert_eq!(bounce_walk(67, 5, 68, 71), 70);
        assert_eq!(bounce_walk(67, 6, 68, 71), 69);
        assert_eq!(bounce_walk(66, 6, 68, 71), 70);
    }

    #[test]
    fn test_bounce_walk_turns_at_zone_start() {
        // 70 -> 71 (wall), 70, 69, 68 (wall), 69, 70
        assert_eq!(bounce_walk(70, 6, 68, 71), 70);
        assert_eq!(bounce_walk(70, 4, 68, 71), 68);
    }

    #[test]
    fn test_bounce_walk_from_far_wall() {
        assert_eq!(bounce_walk(71, 1, 68, 71), 70);
        assert_eq!(bounce_walk(71, 3, 68, 71), 68);
        assert_eq!(bounce_walk(71, 6, 68, 71), 71);
    }

    #[test]
    fn test_bounce_walk_zero_steps() {
        assert_eq!(bounce_walk(65, 0, 68, 71), 65);
    }

    #[test]
    fn test_gate_waits_without_six() {
        let (rules, board) = mini();
        for dice in 1..=5 {
            let r = apply_move(&rules, &board, req(8, dice, false)).unwrap();
            assert_eq!(r.to_index, 8);
            assert!(!r.has_started_after);
            assert!(!r.record_in_path);
            assert!(r.is_noop());
        }
    }

    #[test]
    fn test_gate_opens_on_six() {
        let (rules, board) = mini();
        let r = apply_move(&rules, &board, req(8, 6, false)).unwrap();
        assert_eq!(r.to_index, 1);
        assert_eq!(r.to_house, 2);
        assert!(r.started_this_roll);
        assert!(r.has_started_after);
        assert!(r.record_in_path);
        assert_eq!(r.applied_jump, None);
    }

    #[test]
    fn test_plain_move() {
        let (rules, board) = mini();
        let r = apply_move(&rules, &board, req(0, 1, true)).unwrap();
        assert_eq!(r.to_index, 1);
        assert!(!r.used_bounce);
        assert_eq!(r.applied_jump, None);
        assert!(!r.started_this_roll);
    }

    #[test]
    fn test_jump_applied_once() {
        let (rules, board) = mini();
        // Land on house 4 -> 6; house 6 has its own jump to 1 that must not fire.
        let r = apply_move(&rules, &board, req(1, 2, true)).unwrap();
        assert_eq!(r.to_house, 6);
        assert_eq!(
            r.applied_jump,
            Some(AppliedJump {
                from: 4,
                to: 6,
                kind: JumpType::Forward
            })
        );
    }

    #[test]
    fn test_landing_on_zone_end_goes_straight() {
        let (rules, board) = mini();
        let r = apply_move(&rules, &board, req(6, 3, true)).unwrap();
        assert_eq!(r.to_index, 9);
        assert!(!r.used_bounce);
    }

    #[test]
    fn test_overshoot_bounces() {
        let (rules, board) = mini();
        // 6 -> 7, 8, 9 (wall), 8, 7 (wall), 8
        let r = apply_move(&rules, &board, req(6, 6, true)).unwrap();
        assert_eq!(r.to_index, 8);
        assert!(r.used_bounce);
    }

    #[test]
    fn test_entering_zone_without_overshoot_flags_bounce() {
        let (rules, board) = mini();
        let r = apply_move(&rules, &board, req(5, 2, true)).unwrap();
        assert_eq!(r.to_index, 7);
        assert!(r.used_bounce);
    }

    #[test]
    fn test_invalid_dice_rejected() {
        let (rules, board) = mini();
        assert_eq!(
            apply_move(&rules, &board, req(0, 0, true)),
            Err(MoveError::DiceOutOfRange(0))
        );
        assert_eq!(
            apply_move(&rules, &board, req(0, 7, false)),
            Err(MoveError::DiceOutOfRange(7))
        );
    }

    #[test]
    fn test_invalid_position_rejected() {
        let (rules, board) = mini();
        assert_eq!(
            apply_move(&rules, &board, req(10, 3, true)),
            Err(MoveError::PositionOutOfRange {
                index: 10,
                total: 10
            })
        );
    }

    #[test]
    fn test_is_completed() {
        let (rules, _) = mini();
        assert!(is_completed(&rules, 8, true));
        assert!(!is_completed(&rules, 8, false));
        assert!(!is_completed(&rules, 7, true));
    }

    #[test]
    fn test_move_result_serializes_jump_type() {
        let (rules, board) = mini();
        let r = apply_move(&rules, &board, req(1, 2, true)).unwrap();
        let json = serde_json::to_value(r).unwrap();
        assert_eq!(json["applied_jump"]["type"], "forward");
        assert_eq!(json["to_house"], 6);
    }
}
