pub mod client;
pub mod coordinator;
pub mod registry;

pub use client::{Client, ClientId, Messageable};
pub use coordinator::{SessionCoordinator, SessionEvent, SessionPhase};
pub use registry::ClientRegistry;
