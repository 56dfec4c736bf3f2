use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::network::messages::{serialize_response, GameResponse};

/// Outbound-write capability of one connection. Failures are reported synchronously.
pub trait Messageable: Send + Sync {
    fn send_message(&self, message: String) -> AppResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ClientId(Uuid);

impl ClientId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A connected party. The connection itself is owned by the transport; the
/// session only keeps a handle to its write side.
#[derive(Clone)]
pub struct Client {
    id: ClientId,
    name: String,
    outbound: Arc<dyn Messageable>,
}

impl Client {
    pub fn new(name: impl Into<String>, outbound: Arc<dyn Messageable>) -> Self {
        Self {
            id: ClientId::new(),
            name: name.into(),
            outbound,
        }
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn send(&self, response: &GameResponse) -> AppResult<()> {
        let json = serialize_response(response)?;
        self.outbound
            .send_message(json)
            .map_err(|err| AppError::BroadcastFailed {
                client_id: self.id.to_string(),
                reason: err.to_string(),
            })
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Client {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Client {}
