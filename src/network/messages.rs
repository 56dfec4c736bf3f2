use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::errors::{AppError, AppResult};
use crate::game::board::{Board, SquareCharacter};
use crate::game::rules::GameResult;
use crate::session::client::ClientId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    SelectCharacter,
    StartGame,
    ChooseSquare,
    GetBoard,
}

impl Instruction {
    pub const ALL: [Instruction; 4] = [
        Instruction::SelectCharacter,
        Instruction::StartGame,
        Instruction::ChooseSquare,
        Instruction::GetBoard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Instruction::SelectCharacter => "select character",
            Instruction::StartGame => "start game",
            Instruction::ChooseSquare => "choose square",
            Instruction::GetBoard => "get board",
        }
    }
}

impl FromStr for Instruction {
    type Err = AppError;

    /// Accepts both `"choose square"` and `"CHOOSE_SQUARE"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', " ");
        Instruction::ALL
            .into_iter()
            .find(|instruction| instruction.as_str() == normalized)
            .ok_or_else(|| AppError::UnrecognizedInstruction {
                instruction: s.to_string(),
            })
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct ClientEnvelope {
    instruction: String,
    #[serde(default)]
    content: Value,
}

/// A client intent, tagged with the client that sent it.
///
/// The instruction is kept as received and only interpreted by the session,
/// so unknown instructions are reported where every other event is handled.
#[derive(Debug, Clone, PartialEq)]
pub struct GameMessage {
    instruction: String,
    content: Value,
    client: ClientId,
}

impl GameMessage {
    pub fn new(instruction: impl Into<String>, content: Value, client: ClientId) -> Self {
        Self {
            instruction: instruction.into(),
            content,
            client,
        }
    }

    /// Decodes an inbound `{"instruction": ..., "content": ...}` text frame.
    pub fn from_text(text: &str, client: ClientId) -> AppResult<Self> {
        let envelope: ClientEnvelope =
            serde_json::from_str(text).map_err(|err| AppError::MalformedMessage {
                message: err.to_string(),
            })?;
        Ok(Self::new(envelope.instruction, envelope.content, client))
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn parse_instruction(&self) -> AppResult<Instruction> {
        self.instruction.parse()
    }

    pub fn content(&self) -> &Value {
        &self.content
    }

    pub fn client(&self) -> ClientId {
        self.client
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Welcome {
    pub is_game_started: bool,
    pub x_client: String,
    pub o_client: String,
    pub board: Board,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    Board,
    GameOver,
    Result,
    NewMessage,
    CharacterSelected,
    GameStarted,
    Welcome,
}

impl ResponseKind {
    /// Canonical wire name. Clients match on this string, never on an ordinal.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseKind::Board => "board",
            ResponseKind::GameOver => "game over",
            ResponseKind::Result => "result",
            ResponseKind::NewMessage => "new message",
            ResponseKind::CharacterSelected => "character selected",
            ResponseKind::GameStarted => "game started",
            ResponseKind::Welcome => "welcome",
        }
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server broadcast, encoded as `{"responseKind": "<name>", "body": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "responseKind", content = "body")]
pub enum GameResponse {
    #[serde(rename = "board")]
    Board(Board),
    #[serde(rename = "game over")]
    GameOver(bool),
    #[serde(rename = "result")]
    Result(GameResult),
    #[serde(rename = "new message")]
    NewMessage(String),
    #[serde(rename = "character selected")]
    CharacterSelected(SquareCharacter),
    #[serde(rename = "game started")]
    GameStarted(bool),
    #[serde(rename = "welcome")]
    Welcome(Welcome),
}

impl GameResponse {
    pub fn kind(&self) -> ResponseKind {
        match self {
            GameResponse::Board(_) => ResponseKind::Board,
            GameResponse::GameOver(_) => ResponseKind::GameOver,
            GameResponse::Result(_) => ResponseKind::Result,
            GameResponse::NewMessage(_) => ResponseKind::NewMessage,
            GameResponse::CharacterSelected(_) => ResponseKind::CharacterSelected,
            GameResponse::GameStarted(_) => ResponseKind::GameStarted,
            GameResponse::Welcome(_) => ResponseKind::Welcome,
        }
    }
}

pub fn serialize_response(response: &GameResponse) -> AppResult<String> {
    Ok(serde_json::to_string(response)?)
}

pub fn deserialize_response(json: &str) -> AppResult<GameResponse> {
    Ok(serde_json::from_str(json)?)
}
