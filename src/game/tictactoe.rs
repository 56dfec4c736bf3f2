use tracing::debug;

use crate::game::board::{Board, Position, SquareCharacter};
use crate::game::rules::{evaluate, GameResult};
use crate::game::service::GameService;

#[derive(Debug, Clone, Default)]
pub struct TicTacToe {
    board: Board,
    next_to_move: SquareCharacter,
    started: bool,
    result: Option<GameResult>,
}

impl TicTacToe {
    pub fn new() -> Self {
        Self::default()
    }

    /// The character whose move is expected, `Empty` outside a running game.
    pub fn next_to_move(&self) -> SquareCharacter {
        self.next_to_move
    }

    fn accepts_move(&self, character: SquareCharacter, position: Position) -> bool {
        self.started
            && self.result.is_none()
            && !character.is_empty()
            && character == self.next_to_move
            && self.board.is_free(position)
    }
}

impl GameService for TicTacToe {
    fn start_game(&mut self) -> Board {
        self.board = Board::new();
        self.next_to_move = SquareCharacter::X;
        self.started = true;
        self.result = None;
        self.board
    }

    fn choose_square(&mut self, character: SquareCharacter, position: Position) -> Board {
        if !self.accepts_move(character, position) {
            debug!(%position, ?character, "move ignored");
            return self.board;
        }

        self.board = self.board.with_square(position, character);
        self.result = evaluate(&self.board);
        self.next_to_move = if self.result.is_some() {
            SquareCharacter::Empty
        } else {
            character.opponent()
        };
        self.board
    }

    fn board(&self) -> Board {
        self.board
    }

    fn is_started(&self) -> bool {
        self.started
    }

    fn is_game_over(&self) -> bool {
        self.result.is_some()
    }

    fn result(&self) -> GameResult {
        self.result.clone().unwrap_or_default()
    }
}
