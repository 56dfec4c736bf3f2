use serde::{Deserialize, Serialize};

use crate::game::board::{Board, Position, SquareCharacter};

pub const WINNING_COMBINATIONS: [[Position; 3]; 8] = [
    // Rows
    [Position::TOP_LEFT, Position::TOP_CENTER, Position::TOP_RIGHT],
    [Position::CENTER_LEFT, Position::CENTER, Position::CENTER_RIGHT],
    [
        Position::BOTTOM_LEFT,
        Position::BOTTOM_CENTER,
        Position::BOTTOM_RIGHT,
    ],
    // Columns
    [Position::TOP_LEFT, Position::CENTER_LEFT, Position::BOTTOM_LEFT],
    [Position::TOP_CENTER, Position::CENTER, Position::BOTTOM_CENTER],
    [
        Position::TOP_RIGHT,
        Position::CENTER_RIGHT,
        Position::BOTTOM_RIGHT,
    ],
    // Diagonals
    [Position::TOP_LEFT, Position::CENTER, Position::BOTTOM_RIGHT],
    [Position::TOP_RIGHT, Position::CENTER, Position::BOTTOM_LEFT],
];

/// Outcome of a finished game. Keys are PascalCase on the wire, as the browser client reads them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GameResult {
    pub winning_combination: Vec<Position>,
    pub winning_character: SquareCharacter,
    pub has_winner: bool,
}

impl GameResult {
    pub fn winner(character: SquareCharacter, combination: [Position; 3]) -> Self {
        Self {
            winning_combination: combination.to_vec(),
            winning_character: character,
            has_winner: true,
        }
    }

    pub fn draw() -> Self {
        Self::default()
    }
}

/// Returns the result once the board is decided, `None` while play can continue.
pub fn evaluate(board: &Board) -> Option<GameResult> {
    for combination in WINNING_COMBINATIONS {
        let first = board.square(combination[0]);
        if !first.is_empty() && combination.iter().all(|p| board.square(*p) == first) {
            return Some(GameResult::winner(first, combination));
        }
    }

    if board.is_full() {
        Some(GameResult::draw())
    } else {
        None
    }
}
