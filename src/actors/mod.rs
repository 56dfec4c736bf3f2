pub mod dispatch;
pub mod session_actor;

pub use dispatch::{ChannelStrategy, DispatchStrategy, SequentialStrategy};
pub use session_actor::SessionActor;
