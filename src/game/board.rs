use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::errors::{AppError, AppResult};

/// The marker a square or a client can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SquareCharacter {
    #[default]
    #[serde(rename = "")]
    Empty,
    X,
    O,
}

impl SquareCharacter {
    /// Parses the content of a select-character instruction. Only `X` and `O` can be chosen.
    pub fn from_content(content: &Value) -> AppResult<Self> {
        let invalid = || AppError::InvalidCharacter {
            content: content.to_string(),
        };

        match content.as_str().map(|s| s.trim().to_ascii_uppercase()) {
            Some(s) if s == "X" => Ok(SquareCharacter::X),
            Some(s) if s == "O" => Ok(SquareCharacter::O),
            _ => Err(invalid()),
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            SquareCharacter::X => SquareCharacter::O,
            SquareCharacter::O => SquareCharacter::X,
            SquareCharacter::Empty => SquareCharacter::Empty,
        }
    }

    pub fn is_empty(self) -> bool {
        self == SquareCharacter::Empty
    }
}

impl fmt::Display for SquareCharacter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareCharacter::Empty => write!(f, ""),
            SquareCharacter::X => write!(f, "X"),
            SquareCharacter::O => write!(f, "O"),
        }
    }
}

/// Square index on the 3x3 grid, row by row from the top left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Position(u8);

impl Position {
    pub const TOP_LEFT: Position = Position(0);
    pub const TOP_CENTER: Position = Position(1);
    pub const TOP_RIGHT: Position = Position(2);
    pub const CENTER_LEFT: Position = Position(3);
    pub const CENTER: Position = Position(4);
    pub const CENTER_RIGHT: Position = Position(5);
    pub const BOTTOM_LEFT: Position = Position(6);
    pub const BOTTOM_CENTER: Position = Position(7);
    pub const BOTTOM_RIGHT: Position = Position(8);

    const NAMES: [&'static str; 9] = [
        "top_left",
        "top_center",
        "top_right",
        "center_left",
        "center",
        "center_right",
        "bottom_left",
        "bottom_center",
        "bottom_right",
    ];

    pub fn all() -> impl Iterator<Item = Position> {
        (0..9).map(Position)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Parses the content of a choose-square instruction: an index (number or
    /// numeric string) or a square name such as `"center"` or `"BOTTOM_CENTER"`.
    pub fn from_content(content: &Value) -> AppResult<Self> {
        let invalid = || AppError::InvalidPosition {
            content: content.to_string(),
        };

        match content {
            Value::Number(n) => n
                .as_u64()
                .and_then(|n| u8::try_from(n).ok())
                .ok_or_else(invalid)
                .and_then(|n| Position::try_from(n).map_err(|_| invalid())),
            Value::String(s) => s.parse().map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<u8> for Position {
    type Error = AppError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value < 9 {
            Ok(Position(value))
        } else {
            Err(AppError::InvalidPosition {
                content: value.to_string(),
            })
        }
    }
}

impl From<Position> for u8 {
    fn from(position: Position) -> Self {
        position.0
    }
}

impl std::str::FromStr for Position {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(index) = trimmed.parse::<u8>() {
            return Position::try_from(index);
        }

        let normalized = trimmed.to_ascii_lowercase().replace([' ', '-'], "_");
        Position::NAMES
            .iter()
            .position(|name| *name == normalized)
            .map(|index| Position(index as u8))
            .ok_or_else(|| AppError::InvalidPosition {
                content: s.to_string(),
            })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Position::NAMES[self.index()])
    }
}

/// Immutable snapshot of the nine squares. Serialized as `["X", "", "O", ...]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board([SquareCharacter; 9]);

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn square(&self, position: Position) -> SquareCharacter {
        self.0[position.index()]
    }

    pub fn is_free(&self, position: Position) -> bool {
        self.square(position).is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.0.iter().all(|square| !square.is_empty())
    }

    /// Returns a copy of the board with `character` placed at `position`.
    pub fn with_square(mut self, position: Position, character: SquareCharacter) -> Self {
        self.0[position.index()] = character;
        self
    }
}
