pub mod board;
pub mod rules;
pub mod service;
pub mod tictactoe;

pub use board::{Board, Position, SquareCharacter};
pub use rules::GameResult;
pub use service::GameService;
pub use tictactoe::TicTacToe;
