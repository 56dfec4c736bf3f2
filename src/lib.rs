pub mod actors;
pub mod cli;
pub mod config;
pub mod errors;
pub mod game;
pub mod network;
pub mod session;


// Re-export commonly used items for convenience
pub use actors::{ChannelStrategy, DispatchStrategy, SequentialStrategy};
pub use errors::{AppError, AppResult};
pub use network::messages::{GameMessage, GameResponse, ResponseKind};
pub use session::{Client, ClientId, SessionCoordinator, SessionPhase};
