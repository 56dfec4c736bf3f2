pub mod connection;
pub mod outbound;
pub mod server;

pub use connection::ConnectionHandler;
pub use outbound::ChannelOutbound;
pub use server::WebsocketServer;
