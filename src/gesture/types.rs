use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical keys shared by both target games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    /// Full key vocabulary, released unconditionally on shutdown
    pub const ALL: [Key; 4] = [Key::Up, Key::Down, Key::Left, Key::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Key::Up => "up",
            Key::Down => "down",
            Key::Left => "left",
            Key::Right => "right",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "up" => Some(Key::Up),
            "down" => Some(Key::Down),
            "left" => Some(Key::Left),
            "right" => Some(Key::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discrete command symbol resolved from the hands in one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Brake,
    Gas,
    LeanForward,
    Jump,
    Slide,
    MoveLeft,
    MoveRight,
    /// No hand in view
    Idle,
    /// Hand in view but the pattern maps to nothing
    None,
}

impl Action {
    /// Whether this action drives keys (IDLE and NONE do not)
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Action::Idle | Action::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Brake => "BRAKE",
            Action::Gas => "GAS",
            Action::LeanForward => "LEAN_FORWARD",
            Action::Jump => "JUMP",
            Action::Slide => "SLIDE",
            Action::MoveLeft => "MOVE_LEFT",
            Action::MoveRight => "MOVE_RIGHT",
            Action::Idle => "IDLE",
            Action::None => "NONE",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "BRAKE" => Some(Action::Brake),
            "GAS" => Some(Action::Gas),
            "LEAN_FORWARD" => Some(Action::LeanForward),
            "JUMP" => Some(Action::Jump),
            "SLIDE" => Some(Action::Slide),
            "MOVE_LEFT" => Some(Action::MoveLeft),
            "MOVE_RIGHT" => Some(Action::MoveRight),
            "IDLE" => Some(Action::Idle),
            "NONE" => Some(Action::None),
            _ => Option::None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse per-hand state used by the dual-hand rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FingerState {
    Open,
    Closed,
    Partial,
    /// Hand absent this frame
    None,
}

impl FingerState {
    /// Bucket an extended-finger count; `None` is the no-hand sentinel
    pub fn from_count(count: Option<u8>) -> Self {
        match count {
            Option::None => FingerState::None,
            Some(n) if n >= 4 => FingerState::Open,
            Some(n) if n <= 1 => FingerState::Closed,
            Some(_) => FingerState::Partial,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FingerState::Open => "OPEN",
            FingerState::Closed => "CLOSED",
            FingerState::Partial => "PARTIAL",
            FingerState::None => "NONE",
        }
    }
}

impl fmt::Display for FingerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extension flag per finger, thumb first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerPattern(pub [bool; 5]);

impl FingerPattern {
    pub fn count(&self) -> u8 {
        self.0.iter().filter(|extended| **extended).count() as u8
    }

    pub fn thumb(&self) -> bool {
        self.0[0]
    }
}

impl fmt::Display for FingerPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for extended in self.0 {
            f.write_str(if extended { "1" } else { "0" })?;
        }
        Ok(())
    }
}
