use std::ops::ControlFlow;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::game::service::GameService;
use crate::session::coordinator::{SessionCoordinator, SessionEvent};

/// The single consumer of a session's event queue.
pub struct SessionActor<G: GameService> {
    session: SessionCoordinator<G>,
}

impl<G: GameService> SessionActor<G> {
    pub fn new(session: SessionCoordinator<G>) -> Self {
        Self { session }
    }

    /// Processes events in arrival order until every sender is gone or a
    /// broadcast fails. Hands the session back when it stops.
    pub async fn run(
        mut self,
        mut receiver: mpsc::UnboundedReceiver<SessionEvent>,
    ) -> SessionCoordinator<G> {
        info!("Session actor started");

        while let Some(event) = receiver.recv().await {
            if let ControlFlow::Break(error) = self.session.process(event) {
                error!(
                    reason = error.variant_name(),
                    "Session actor halted, restart required: {}", error
                );
                break;
            }
        }

        info!("Session actor stopped");
        self.session
    }
}
