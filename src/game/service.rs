use crate::game::board::{Board, Position, SquareCharacter};
use crate::game::rules::GameResult;

/// Board state and turn rules, as seen by the session coordinator.
///
/// Illegal moves are not errors: `choose_square` hands back the unchanged board.
pub trait GameService: Send {
    fn start_game(&mut self) -> Board;

    /// Plays `position` for `character`. The service decides whether it is that character's turn.
    fn choose_square(&mut self, character: SquareCharacter, position: Position) -> Board;

    fn board(&self) -> Board;

    fn is_started(&self) -> bool;

    fn is_game_over(&self) -> bool;

    fn result(&self) -> GameResult;
}
