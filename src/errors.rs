use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Serialize, Clone, PartialEq, Eq)]
pub enum AppError {
    // Rejected actions: expected outcomes, never broadcast
    #[error("Character '{character}' is already taken")]
    CharacterTaken { character: String },

    #[error("Client '{client_id}' already plays as '{character}'")]
    CharacterAlreadySelected { client_id: String, character: String },

    #[error("Cannot start game - both X and O must be selected")]
    PlayersMissing,

    #[error("Client '{client_id}' is not playing and cannot start the game")]
    NotAPlayer { client_id: String },

    #[error("Game has already been started")]
    GameAlreadyStarted,

    #[error("Client '{client_id}' is not registered")]
    ClientNotRegistered { client_id: String },

    // Malformed content
    #[error("Invalid character: {content}")]
    InvalidCharacter { content: String },

    #[error("Invalid position: {content}")]
    InvalidPosition { content: String },

    #[error("Malformed message: {message}")]
    MalformedMessage { message: String },

    #[error("GameInstruction could not be found: {instruction}")]
    UnrecognizedInstruction { instruction: String },

    // Fan-out and session lifecycle
    #[error("Failed to broadcast to client '{client_id}': {reason}")]
    BroadcastFailed { client_id: String, reason: String },

    #[error("Session event loop is no longer running")]
    SessionClosed,

    #[error("Failed to serialize response: {message}")]
    SerializationError { message: String },

    #[error("WebSocket error: {message}")]
    WebSocketError { message: String },
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Rejected,
    ClientError,
    Fatal,
    ServerError,
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::CharacterTaken { .. }
            | AppError::CharacterAlreadySelected { .. }
            | AppError::PlayersMissing
            | AppError::NotAPlayer { .. }
            | AppError::GameAlreadyStarted
            | AppError::ClientNotRegistered { .. } => ErrorCategory::Rejected,

            AppError::InvalidCharacter { .. }
            | AppError::InvalidPosition { .. }
            | AppError::MalformedMessage { .. }
            | AppError::UnrecognizedInstruction { .. } => ErrorCategory::ClientError,

            AppError::BroadcastFailed { .. } => ErrorCategory::Fatal,

            AppError::SessionClosed
            | AppError::SerializationError { .. }
            | AppError::WebSocketError { .. } => ErrorCategory::ServerError,
        }
    }

    /// A fatal error stops the session's processing loop.
    pub fn is_fatal(&self) -> bool {
        matches!(self.category(), ErrorCategory::Fatal)
    }

    pub fn should_log(&self) -> bool {
        !matches!(self.category(), ErrorCategory::Rejected)
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            AppError::CharacterTaken { .. } => "CharacterTaken",
            AppError::CharacterAlreadySelected { .. } => "CharacterAlreadySelected",
            AppError::PlayersMissing => "PlayersMissing",
            AppError::NotAPlayer { .. } => "NotAPlayer",
            AppError::GameAlreadyStarted => "GameAlreadyStarted",
            AppError::ClientNotRegistered { .. } => "ClientNotRegistered",
            AppError::InvalidCharacter { .. } => "InvalidCharacter",
            AppError::InvalidPosition { .. } => "InvalidPosition",
            AppError::MalformedMessage { .. } => "MalformedMessage",
            AppError::UnrecognizedInstruction { .. } => "UnrecognizedInstruction",
            AppError::BroadcastFailed { .. } => "BroadcastFailed",
            AppError::SessionClosed => "SessionClosed",
            AppError::SerializationError { .. } => "SerializationError",
            AppError::WebSocketError { .. } => "WebSocketError",
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_broadcast_failures_are_fatal() {
        let fatal = AppError::BroadcastFailed {
            client_id: "c1".to_string(),
            reason: "closed".to_string(),
        };
        assert!(fatal.is_fatal());
        assert!(fatal.should_log());

        assert!(!AppError::PlayersMissing.is_fatal());
        assert!(!AppError::UnrecognizedInstruction {
            instruction: "dance".to_string()
        }
        .is_fatal());
    }

    #[test]
    fn test_rejections_are_not_logged_as_faults() {
        let rejection = AppError::CharacterTaken {
            character: "X".to_string(),
        };
        assert_eq!(rejection.category(), ErrorCategory::Rejected);
        assert!(!rejection.should_log());
        assert_eq!(rejection.variant_name(), "CharacterTaken");
    }

    #[test]
    fn test_error_display() {
        let error = AppError::UnrecognizedInstruction {
            instruction: "fly".to_string(),
        };
        assert_eq!(error.to_string(), "GameInstruction could not be found: fly");
    }
}
