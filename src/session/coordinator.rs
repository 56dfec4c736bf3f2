use serde::Serialize;
use std::ops::ControlFlow;
use tracing::{debug, error, info, warn};

use crate::errors::{AppError, AppResult};
use crate::game::board::{Position, SquareCharacter};
use crate::game::service::GameService;
use crate::network::messages::{GameMessage, GameResponse, Instruction, Welcome};
use crate::session::client::{Client, ClientId};
use crate::session::registry::ClientRegistry;

/// Session phases only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    Lobby,
    InProgress,
    Over,
}

/// Everything a producer can submit to a session.
#[derive(Debug)]
pub enum SessionEvent {
    Register(Client),
    Unregister(ClientId),
    Message(GameMessage),
}

/// Owns one game session and applies events to it, one at a time.
///
/// Handlers take `&mut self`; exclusive access comes from whichever dispatch
/// strategy drives the coordinator, never from locking.
#[derive(Debug)]
pub struct SessionCoordinator<G: GameService> {
    registry: ClientRegistry,
    game: G,
    phase: SessionPhase,
}

impl<G: GameService> SessionCoordinator<G> {
    pub fn new(game: G) -> Self {
        Self {
            registry: ClientRegistry::new(),
            game,
            phase: SessionPhase::Lobby,
        }
    }

    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Applies one event and decides whether the session can keep going.
    ///
    /// Rejections and malformed input are logged and swallowed; a failed
    /// broadcast breaks with the error.
    pub fn process(&mut self, event: SessionEvent) -> ControlFlow<AppError> {
        let error = match self.handle_event(event) {
            Ok(()) => return ControlFlow::Continue(()),
            Err(error) => error,
        };

        if error.is_fatal() {
            error!(error = %error, "broadcast failed, session stops processing events");
            return ControlFlow::Break(error);
        }

        if error.should_log() {
            warn!(reason = error.variant_name(), "could not handle event: {}", error);
        } else {
            debug!(reason = error.variant_name(), "action rejected: {}", error);
        }
        ControlFlow::Continue(())
    }

    pub fn handle_event(&mut self, event: SessionEvent) -> AppResult<()> {
        match event {
            SessionEvent::Register(client) => self.on_register(client),
            SessionEvent::Unregister(client_id) => self.on_unregister(client_id),
            SessionEvent::Message(message) => self.on_message(message),
        }
    }

    pub fn on_register(&mut self, client: Client) -> AppResult<()> {
        let name = client.name().to_string();
        if !self.registry.register(client.clone()) {
            debug!(client_id = %client.id(), "client already registered");
            return Ok(());
        }
        info!(client_id = %client.id(), %name, clients = self.registry.len(), "client registered");

        client.send(&self.welcome())?;
        self.broadcast(&GameResponse::NewMessage(format!("{} joined the game", name)))
    }

    pub fn on_unregister(&mut self, client_id: ClientId) -> AppResult<()> {
        let Some(client) = self.registry.unregister(client_id) else {
            return Ok(());
        };
        info!(%client_id, clients = self.registry.len(), "client unregistered");

        self.broadcast(&GameResponse::NewMessage(format!(
            "{} left the game",
            client.name()
        )))
    }

    pub fn on_message(&mut self, message: GameMessage) -> AppResult<()> {
        for response in self.execute_message(&message)? {
            self.broadcast(&response)?;
        }
        Ok(())
    }

    fn execute_message(&mut self, message: &GameMessage) -> AppResult<Vec<GameResponse>> {
        let client_id = message.client();
        if !self.registry.contains(client_id) {
            return Err(AppError::ClientNotRegistered {
                client_id: client_id.to_string(),
            });
        }

        let instruction = message.parse_instruction()?;
        debug!(%client_id, %instruction, "handling message");

        match instruction {
            Instruction::SelectCharacter => {
                let character = SquareCharacter::from_content(message.content())?;
                self.on_select_character(client_id, character)
            }
            Instruction::StartGame => self.on_start_game(client_id),
            Instruction::ChooseSquare => {
                let position = Position::from_content(message.content())?;
                self.on_choose_square(client_id, position)
            }
            Instruction::GetBoard => self.on_get_board(client_id),
        }
    }

    pub fn on_select_character(
        &mut self,
        client_id: ClientId,
        character: SquareCharacter,
    ) -> AppResult<Vec<GameResponse>> {
        self.registry.select_character(client_id, character)?;
        info!(%client_id, %character, "character selected");

        Ok(vec![GameResponse::CharacterSelected(character)])
    }

    pub fn on_start_game(&mut self, client_id: ClientId) -> AppResult<Vec<GameResponse>> {
        if self.phase != SessionPhase::Lobby {
            return Err(AppError::GameAlreadyStarted);
        }
        if !self.registry.has_both_players() {
            return Err(AppError::PlayersMissing);
        }
        if !self.registry.is_player(client_id) {
            return Err(AppError::NotAPlayer {
                client_id: client_id.to_string(),
            });
        }

        let board = self.game.start_game();
        self.phase = SessionPhase::InProgress;
        info!(%client_id, "game started");

        Ok(vec![GameResponse::Board(board), GameResponse::GameStarted(true)])
    }

    /// Forwards the move with the mover's character; the game decides whether it
    /// is legal. The resulting board is always broadcast, changed or not.
    pub fn on_choose_square(
        &mut self,
        client_id: ClientId,
        position: Position,
    ) -> AppResult<Vec<GameResponse>> {
        let character = self
            .registry
            .character_of(client_id)
            .unwrap_or(SquareCharacter::Empty);

        let board = self.game.choose_square(character, position);
        let mut responses = vec![GameResponse::Board(board)];

        if self.phase == SessionPhase::InProgress && self.game.is_game_over() {
            self.phase = SessionPhase::Over;
            let result = self.game.result();
            info!(winner = %result.winning_character, has_winner = result.has_winner, "game over");

            responses.push(GameResponse::GameOver(true));
            responses.push(GameResponse::Result(result));
        }
        Ok(responses)
    }

    pub fn on_get_board(&self, _client_id: ClientId) -> AppResult<Vec<GameResponse>> {
        Ok(vec![GameResponse::Board(self.game.board())])
    }

    /// Sends `response` to every registered client, stopping at the first failed write.
    pub fn broadcast(&self, response: &GameResponse) -> AppResult<()> {
        debug!(kind = %response.kind(), clients = self.registry.len(), "broadcasting");
        for client in self.registry.clients() {
            client.send(response)?;
        }
        Ok(())
    }

    fn welcome(&self) -> GameResponse {
        let holder_name = |character| {
            self.registry
                .holder(character)
                .map(|client| client.name().to_string())
                .unwrap_or_default()
        };

        GameResponse::Welcome(Welcome {
            is_game_started: self.game.is_started(),
            x_client: holder_name(SquareCharacter::X),
            o_client: holder_name(SquareCharacter::O),
            board: self.game.board(),
        })
    }
}
