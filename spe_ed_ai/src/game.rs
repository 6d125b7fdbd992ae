//! spe_ed game model: directions, actions, players and the board.
//!
//! The types mirror the JSON snapshot a spe_ed server sends every tick:
//! ```json
//! {
//!   "width": 5, "height": 5,
//!   "cells": [[0, 0, 0, 0, 0], ...],
//!   "players": {"1": {"x": 2, "y": 1, "direction": "down", "speed": 1, "active": true}},
//!   "you": 1,
//!   "running": true
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

use crate::rules::Rules;

// =============================================================================
// Direction
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    #[inline(always)]
    pub const fn all() -> [Direction; 4] {
        [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
    }

    /// Left turn: Left -> Down -> Right -> Up -> Left.
    #[inline(always)]
    pub const fn turn_left(self) -> Direction {
        match self {
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
            Direction::Up => Direction::Left,
        }
    }

    #[inline(always)]
    pub const fn turn_right(self) -> Direction {
        match self {
            Direction::Left => Direction::Up,
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
        }
    }

    /// Per-cell coordinate delta; y grows downwards.
    #[inline(always)]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Action
// =============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown action '{0}'")]
pub struct UnknownAction(pub String);

/// One answer per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    TurnLeft,
    TurnRight,
    Faster,
    Slower,
    NoOp,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::TurnLeft,
        Action::TurnRight,
        Action::Faster,
        Action::Slower,
        Action::NoOp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::TurnLeft => "TurnLeft",
            Action::TurnRight => "TurnRight",
            Action::Faster => "Faster",
            Action::Slower => "Slower",
            Action::NoOp => "NoOp",
        }
    }

    /// Speculatively applies the action to a copy of `kin`.
    ///
    /// Returns `None` when the action would leave the speed range
    /// `1..=rules.max_speed`; such a candidate is rejected outright.
    pub fn apply(self, kin: Kinematics, rules: &Rules) -> Option<Kinematics> {
        let mut next = kin;
        match self {
            Action::TurnLeft => next.direction = kin.direction.turn_left(),
            Action::TurnRight => next.direction = kin.direction.turn_right(),
            Action::Faster => {
                next.speed = kin.speed.saturating_add(1);
                if next.speed > rules.max_speed {
                    return None;
                }
            }
            Action::Slower => {
                next.speed = kin.speed.checked_sub(1).filter(|speed| *speed >= 1)?;
            }
            Action::NoOp => {}
        }
        Some(next)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

// =============================================================================
// Players
// =============================================================================

pub type PlayerId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub x: i32,
    pub y: i32,
    pub direction: Direction,
    pub speed: u32,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Ticks this player has already taken.
    ///
    /// spe_ed snapshots do not carry this field, so it stays 0 unless the
    /// caller counts ticks itself and fills it in. Hole ticks are derived
    /// from it; with the default of 0 they only happen when
    /// `holes_each_step` is 1.
    #[serde(default)]
    pub step_counter: u32,
}

fn default_active() -> bool {
    true
}

/// The movement-relevant part of a player, copied for speculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kinematics {
    pub x: i32,
    pub y: i32,
    pub direction: Direction,
    pub speed: u32,
    pub step_counter: u32,
}

impl From<&Player> for Kinematics {
    fn from(player: &Player) -> Self {
        Kinematics {
            x: player.x,
            y: player.y,
            direction: player.direction,
            speed: player.speed,
            step_counter: player.step_counter,
        }
    }
}

// =============================================================================
// Board
// =============================================================================

/// Occupancy grid indexed as `cells[y][x]`; any nonzero cell is blocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub width: i32,
    pub height: i32,
    pub cells: Vec<Vec<i32>>,
}

impl Board {
    pub fn empty(width: i32, height: i32) -> Self {
        let row = vec![0; width.max(0) as usize];
        Board {
            width,
            height,
            cells: vec![row; height.max(0) as usize],
        }
    }

    #[inline(always)]
    pub const fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Cells outside the grid, or missing from a ragged `cells` array, count
    /// as occupied.
    #[inline(always)]
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        if !self.in_bounds(x, y) {
            return true;
        }
        self.cells
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .map_or(true, |&cell| cell != 0)
    }

    pub fn set(&mut self, x: i32, y: i32, value: i32) {
        if !self.in_bounds(x, y) {
            return;
        }
        if let Some(cell) = self
            .cells
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
        {
            *cell = value;
        }
    }
}

// =============================================================================
// Game snapshot
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    #[serde(flatten)]
    pub board: Board,
    pub players: HashMap<PlayerId, Player>,
    pub you: PlayerId,
    pub running: bool,
    /// Server-side answer deadline, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

impl Game {
    pub fn me(&self) -> Option<&Player> {
        self.players.get(&self.you)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turns_are_inverse() {
        for dir in Direction::all() {
            assert_eq!(dir.turn_left().turn_right(), dir);
            assert_eq!(dir.turn_right().turn_left(), dir);
        }
    }

    #[test]
    fn test_turn_left_cycle() {
        let mut dir = Direction::Left;
        let mut seen = Vec::new();
        for _ in 0..4 {
            dir = dir.turn_left();
            seen.push(dir);
        }
        assert_eq!(
            seen,
            vec![Direction::Down, Direction::Right, Direction::Up, Direction::Left]
        );
    }

    fn kin(speed: u32) -> Kinematics {
        Kinematics {
            x: 3,
            y: 3,
            direction: Direction::Right,
            speed,
            step_counter: 0,
        }
    }

    #[test]
    fn test_speed_bounds_reject() {
        let rules = Rules::default();
        assert_eq!(Action::Faster.apply(kin(rules.max_speed), &rules), None);
        assert_eq!(Action::Slower.apply(kin(1), &rules), None);
        assert_eq!(Action::Faster.apply(kin(4), &rules).map(|k| k.speed), Some(5));
        assert_eq!(Action::Slower.apply(kin(4), &rules).map(|k| k.speed), Some(3));
    }

    #[test]
    fn test_apply_leaves_input_untouched() {
        let rules = Rules::default();
        let start = kin(2);
        for action in Action::ALL {
            let _ = action.apply(start, &rules);
        }
        assert_eq!(start, kin(2));
        assert_eq!(Action::NoOp.apply(start, &rules), Some(start));
        assert_eq!(
            Action::TurnLeft.apply(start, &rules).map(|k| k.direction),
            Some(Direction::Up)
        );
        assert_eq!(
            Action::TurnRight.apply(start, &rules).map(|k| k.direction),
            Some(Direction::Down)
        );
    }

    #[test]
    fn test_action_strings() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>(), Ok(action));
        }
        assert_eq!(
            "jump".parse::<Action>(),
            Err(UnknownAction("jump".to_string()))
        );
        assert_eq!(serde_json::to_string(&Action::NoOp).unwrap(), r#""NoOp""#);
    }

    #[test]
    fn test_board_occupancy() {
        let mut board = Board::empty(3, 2);
        assert!(!board.is_occupied(2, 1));
        board.set(2, 1, -1);
        assert!(board.is_occupied(2, 1));
        assert!(board.is_occupied(3, 0));
        assert!(board.is_occupied(0, -1));
    }

    #[test]
    fn test_parse_snapshot() {
        let json = r#"{
            "width": 3, "height": 2,
            "cells": [[0, 1, 0], [0, 1, 0]],
            "players": {
                "1": {"x": 1, "y": 1, "direction": "up", "speed": 1, "active": true, "name": ""},
                "2": {"x": 0, "y": 0, "direction": "right", "speed": 2, "active": false}
            },
            "you": 1,
            "running": true,
            "deadline": "2021-01-01T12:00:00Z"
        }"#;

        let game: Game = serde_json::from_str(json).unwrap();
        assert_eq!(game.board.width, 3);
        assert!(game.board.is_occupied(1, 0));
        assert_eq!(game.players.len(), 2);
        let me = game.me().unwrap();
        assert_eq!(me.direction, Direction::Up);
        assert_eq!(me.step_counter, 0);
        assert!(!game.players[&2].active);
        assert_eq!(game.deadline.as_deref(), Some("2021-01-01T12:00:00Z"));
    }
}
