use std::cell::{Cell, Ref, RefCell};
use std::ops::ControlFlow;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::actors::session_actor::SessionActor;
use crate::errors::{AppError, AppResult};
use crate::game::service::GameService;
use crate::network::messages::GameMessage;
use crate::session::client::{Client, ClientId};
use crate::session::coordinator::{SessionCoordinator, SessionEvent};

/// How events reach a session. Implementations guarantee that no two
/// handlers ever run against the session at the same time.
pub trait DispatchStrategy {
    fn register(&self, client: Client) -> AppResult<()>;

    fn unregister(&self, client_id: ClientId) -> AppResult<()>;

    fn broadcast(&self, message: GameMessage) -> AppResult<()>;
}

/// Runs every handler inline on the caller. Each call has been fully applied,
/// broadcasts included, when it returns. Meant for single-threaded use such as tests.
pub struct SequentialStrategy<G: GameService> {
    session: RefCell<SessionCoordinator<G>>,
    halted: Cell<bool>,
}

impl<G: GameService> SequentialStrategy<G> {
    pub fn new(session: SessionCoordinator<G>) -> Self {
        Self {
            session: RefCell::new(session),
            halted: Cell::new(false),
        }
    }

    pub fn session(&self) -> Ref<'_, SessionCoordinator<G>> {
        self.session.borrow()
    }

    pub fn is_halted(&self) -> bool {
        self.halted.get()
    }

    fn dispatch(&self, event: SessionEvent) -> AppResult<()> {
        if self.halted.get() {
            return Err(AppError::SessionClosed);
        }

        match self.session.borrow_mut().process(event) {
            ControlFlow::Continue(()) => Ok(()),
            ControlFlow::Break(error) => {
                self.halted.set(true);
                Err(error)
            }
        }
    }
}

impl<G: GameService> DispatchStrategy for SequentialStrategy<G> {
    fn register(&self, client: Client) -> AppResult<()> {
        self.dispatch(SessionEvent::Register(client))
    }

    fn unregister(&self, client_id: ClientId) -> AppResult<()> {
        self.dispatch(SessionEvent::Unregister(client_id))
    }

    fn broadcast(&self, message: GameMessage) -> AppResult<()> {
        self.dispatch(SessionEvent::Message(message))
    }
}

/// Queues events for a dedicated [`SessionActor`] task and returns immediately.
/// Cheap to clone; every connection holds one.
#[derive(Debug, Clone)]
pub struct ChannelStrategy {
    sender: mpsc::UnboundedSender<SessionEvent>,
}

impl ChannelStrategy {
    /// Spawns the session's actor on the current tokio runtime. The handle
    /// resolves to the session once the actor stops.
    pub fn spawn<G>(session: SessionCoordinator<G>) -> (Self, JoinHandle<SessionCoordinator<G>>)
    where
        G: GameService + 'static,
    {
        let (sender, receiver) = mpsc::unbounded_channel();
        let handle = tokio::spawn(SessionActor::new(session).run(receiver));
        (Self { sender }, handle)
    }

    fn submit(&self, event: SessionEvent) -> AppResult<()> {
        self.sender
            .send(event)
            .map_err(|_| AppError::SessionClosed)
    }
}

impl DispatchStrategy for ChannelStrategy {
    fn register(&self, client: Client) -> AppResult<()> {
        self.submit(SessionEvent::Register(client))
    }

    fn unregister(&self, client_id: ClientId) -> AppResult<()> {
        self.submit(SessionEvent::Unregister(client_id))
    }

    fn broadcast(&self, message: GameMessage) -> AppResult<()> {
        self.submit(SessionEvent::Message(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::service::GameService;
    use crate::game::board::{Board, SquareCharacter};
    use crate::game::tictactoe::TicTacToe;
    use crate::network::messages::{deserialize_response, GameResponse};
    use crate::network::websocket::outbound::ChannelOutbound;
    use crate::session::coordinator::SessionPhase;
    use serde_json::json;
    use std::sync::Arc;

    fn connect(name: &str) -> (Client, mpsc::UnboundedReceiver<String>) {
        let (outbound, receiver) = ChannelOutbound::channel();
        (Client::new(name, Arc::new(outbound)), receiver)
    }

    fn drain(receiver: &mut mpsc::UnboundedReceiver<String>) -> Vec<GameResponse> {
        let mut responses = Vec::new();
        while let Ok(json) = receiver.try_recv() {
            responses.push(deserialize_response(&json).unwrap());
        }
        responses
    }

    #[test]
    fn test_sequential_strategy_applies_before_returning() {
        let strategy = SequentialStrategy::new(SessionCoordinator::new(TicTacToe::new()));
        let (alice, _alice_rx) = connect("Alice");
        let alice_id = alice.id();

        strategy.register(alice).unwrap();
        assert_eq!(strategy.session().registry().len(), 1);

        strategy
            .broadcast(GameMessage::new("select character", json!("X"), alice_id))
            .unwrap();
        assert_eq!(strategy.session().registry().x_client(), Some(alice_id));

        strategy.unregister(alice_id).unwrap();
        assert!(strategy.session().registry().is_empty());
    }

    #[test]
    fn test_sequential_strategy_halts_on_failed_broadcast() {
        let strategy = SequentialStrategy::new(SessionCoordinator::new(TicTacToe::new()));
        let (alice, alice_rx) = connect("Alice");
        drop(alice_rx);

        let error = strategy.register(alice).unwrap_err();
        assert!(error.is_fatal());
        assert!(strategy.is_halted());

        let (bob, _bob_rx) = connect("Bob");
        assert_eq!(strategy.register(bob), Err(AppError::SessionClosed));
    }

    #[test]
    fn test_sequential_strategy_swallows_rejections() {
        let strategy = SequentialStrategy::new(SessionCoordinator::new(TicTacToe::new()));
        let (alice, _alice_rx) = connect("Alice");
        let alice_id = alice.id();
        strategy.register(alice).unwrap();

        strategy
            .broadcast(GameMessage::new("start game", json!(null), alice_id))
            .unwrap();
        strategy
            .broadcast(GameMessage::new("jump", json!(null), alice_id))
            .unwrap();

        assert!(!strategy.is_halted());
        assert_eq!(strategy.session().phase(), SessionPhase::Lobby);
    }

    #[tokio::test]
    async fn test_channel_strategy_serializes_concurrent_producers() {
        let (strategy, handle) = ChannelStrategy::spawn(SessionCoordinator::new(TicTacToe::new()));

        let mut producers = Vec::new();
        for i in 0..16 {
            let strategy = strategy.clone();
            producers.push(tokio::spawn(async move {
                let (client, receiver) = connect(&format!("Player{}", i));
                let client_id = client.id();
                strategy.register(client).unwrap();
                for character in ["X", "O"] {
                    strategy
                        .broadcast(GameMessage::new("select character", json!(character), client_id))
                        .unwrap();
                }
                receiver
            }));
        }

        let mut receivers = Vec::new();
        for producer in producers {
            receivers.push(producer.await.unwrap());
        }
        drop(strategy);

        let session = handle.await.unwrap();
        let registry = session.registry();
        assert_eq!(registry.len(), 16);

        let x = registry.x_client().unwrap();
        let o = registry.o_client().unwrap();
        assert_ne!(x, o);
        let holders = registry
            .clients()
            .filter(|c| !registry.character_of(c.id()).unwrap().is_empty())
            .count();
        assert_eq!(holders, 2);
        assert!(!session.game().is_started());
    }

    #[tokio::test]
    async fn test_channel_strategy_keeps_producer_order() {
        let (strategy, handle) = ChannelStrategy::spawn(SessionCoordinator::new(TicTacToe::new()));
        let (alice, mut alice_rx) = connect("Alice");
        let (bob, mut bob_rx) = connect("Bob");
        let alice_id = alice.id();
        let bob_id = bob.id();

        strategy.register(alice).unwrap();
        strategy.register(bob).unwrap();
        strategy
            .broadcast(GameMessage::new("select character", json!("X"), alice_id))
            .unwrap();
        strategy
            .broadcast(GameMessage::new("get board", json!(null), alice_id))
            .unwrap();
        strategy
            .broadcast(GameMessage::new("start game", json!(null), bob_id))
            .unwrap();

        // The actor has not been polled yet, so every call above returned without it.
        assert!(alice_rx.try_recv().is_err());
        assert!(bob_rx.try_recv().is_err());

        drop(strategy);
        let session = handle.await.unwrap();
        assert_eq!(session.registry().x_client(), Some(alice_id));
        assert_eq!(session.phase(), SessionPhase::Lobby);

        let alice_tail: Vec<_> = drain(&mut alice_rx).into_iter().skip(3).collect();
        assert_eq!(
            alice_tail,
            vec![
                GameResponse::CharacterSelected(SquareCharacter::X),
                GameResponse::Board(Board::new()),
            ]
        );

        let bob_responses = drain(&mut bob_rx);
        assert!(matches!(bob_responses[0], GameResponse::Welcome(_)));
        assert_eq!(
            bob_responses[1..],
            [
                GameResponse::NewMessage("Bob joined the game".to_string()),
                GameResponse::CharacterSelected(SquareCharacter::X),
                GameResponse::Board(Board::new()),
            ]
        );
    }

    #[tokio::test]
    async fn test_channel_strategy_closes_after_fatal_broadcast() {
        let (strategy, handle) = ChannelStrategy::spawn(SessionCoordinator::new(TicTacToe::new()));
        let (alice, alice_rx) = connect("Alice");
        drop(alice_rx);

        strategy.register(alice).unwrap();
        let session = handle.await.unwrap();
        assert_eq!(session.registry().len(), 1);

        let (bob, _bob_rx) = connect("Bob");
        assert_eq!(strategy.register(bob), Err(AppError::SessionClosed));
    }
}
