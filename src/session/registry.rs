use std::collections::HashMap;

use crate::errors::{AppError, AppResult};
use crate::game::board::SquareCharacter;
use crate::session::client::{Client, ClientId};

#[derive(Debug)]
struct RegisteredClient {
    client: Client,
    character: SquareCharacter,
}

/// Connected clients and the character each one plays.
///
/// At most one client holds `X` and at most one holds `O`; `x_client` and
/// `o_client` always point at those holders.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: HashMap<ClientId, RegisteredClient>,
    x_client: Option<ClientId>,
    o_client: Option<ClientId>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the client as a spectator. Returns `false` if it was already registered.
    pub fn register(&mut self, client: Client) -> bool {
        if self.clients.contains_key(&client.id()) {
            return false;
        }

        self.clients.insert(
            client.id(),
            RegisteredClient {
                client,
                character: SquareCharacter::Empty,
            },
        );
        true
    }

    /// Removes the client and releases its character, if any.
    pub fn unregister(&mut self, client_id: ClientId) -> Option<Client> {
        let removed = self.clients.remove(&client_id)?;

        if self.x_client == Some(client_id) {
            self.x_client = None;
        }
        if self.o_client == Some(client_id) {
            self.o_client = None;
        }

        Some(removed.client)
    }

    pub fn select_character(
        &mut self,
        client_id: ClientId,
        character: SquareCharacter,
    ) -> AppResult<()> {
        if character.is_empty() {
            return Err(AppError::InvalidCharacter {
                content: character.to_string(),
            });
        }

        let current = self
            .character_of(client_id)
            .ok_or_else(|| AppError::ClientNotRegistered {
                client_id: client_id.to_string(),
            })?;

        if current == character {
            return Ok(());
        }
        if !current.is_empty() {
            return Err(AppError::CharacterAlreadySelected {
                client_id: client_id.to_string(),
                character: current.to_string(),
            });
        }
        if self.holder_id(character).is_some() {
            return Err(AppError::CharacterTaken {
                character: character.to_string(),
            });
        }

        if let Some(entry) = self.clients.get_mut(&client_id) {
            entry.character = character;
        }
        match character {
            SquareCharacter::X => self.x_client = Some(client_id),
            SquareCharacter::O => self.o_client = Some(client_id),
            SquareCharacter::Empty => {}
        }
        Ok(())
    }

    pub fn contains(&self, client_id: ClientId) -> bool {
        self.clients.contains_key(&client_id)
    }

    pub fn get(&self, client_id: ClientId) -> Option<&Client> {
        self.clients.get(&client_id).map(|entry| &entry.client)
    }

    pub fn character_of(&self, client_id: ClientId) -> Option<SquareCharacter> {
        self.clients.get(&client_id).map(|entry| entry.character)
    }

    fn holder_id(&self, character: SquareCharacter) -> Option<ClientId> {
        match character {
            SquareCharacter::X => self.x_client,
            SquareCharacter::O => self.o_client,
            SquareCharacter::Empty => None,
        }
    }

    pub fn holder(&self, character: SquareCharacter) -> Option<&Client> {
        self.holder_id(character).and_then(|id| self.get(id))
    }

    pub fn x_client(&self) -> Option<ClientId> {
        self.x_client
    }

    pub fn o_client(&self) -> Option<ClientId> {
        self.o_client
    }

    /// Both characters are held, by two different clients.
    pub fn has_both_players(&self) -> bool {
        matches!((self.x_client, self.o_client), (Some(x), Some(o)) if x != o)
    }

    pub fn is_player(&self, client_id: ClientId) -> bool {
        self.x_client == Some(client_id) || self.o_client == Some(client_id)
    }

    pub fn clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.values().map(|entry| &entry.client)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::websocket::outbound::ChannelOutbound;
    use std::sync::Arc;

    fn test_client(name: &str) -> Client {
        let (outbound, _receiver) = ChannelOutbound::channel();
        Client::new(name, Arc::new(outbound))
    }

    #[test]
    fn test_register_and_unregister() {
        let mut registry = ClientRegistry::new();
        let alice = test_client("Alice");
        let alice_id = alice.id();

        assert!(registry.register(alice.clone()));
        assert!(!registry.register(alice));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.character_of(alice_id), Some(SquareCharacter::Empty));

        assert!(registry.unregister(alice_id).is_some());
        assert!(registry.unregister(alice_id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_select_character_is_exclusive() {
        let mut registry = ClientRegistry::new();
        let alice = test_client("Alice");
        let bob = test_client("Bob");
        registry.register(alice.clone());
        registry.register(bob.clone());

        registry.select_character(alice.id(), SquareCharacter::X).unwrap();
        let error = registry
            .select_character(bob.id(), SquareCharacter::X)
            .unwrap_err();

        assert!(matches!(error, AppError::CharacterTaken { .. }));
        assert_eq!(registry.character_of(bob.id()), Some(SquareCharacter::Empty));
        assert_eq!(registry.x_client(), Some(alice.id()));
    }

    #[test]
    fn test_player_cannot_switch_character() {
        let mut registry = ClientRegistry::new();
        let alice = test_client("Alice");
        registry.register(alice.clone());

        registry.select_character(alice.id(), SquareCharacter::X).unwrap();
        registry.select_character(alice.id(), SquareCharacter::X).unwrap();
        let error = registry
            .select_character(alice.id(), SquareCharacter::O)
            .unwrap_err();

        assert!(matches!(error, AppError::CharacterAlreadySelected { .. }));
        assert_eq!(registry.x_client(), Some(alice.id()));
        assert_eq!(registry.o_client(), None);
    }

    #[test]
    fn test_unregister_releases_character() {
        let mut registry = ClientRegistry::new();
        let alice = test_client("Alice");
        let bob = test_client("Bob");
        registry.register(alice.clone());
        registry.register(bob.clone());
        registry.select_character(alice.id(), SquareCharacter::O).unwrap();

        registry.unregister(alice.id());

        assert_eq!(registry.o_client(), None);
        registry.select_character(bob.id(), SquareCharacter::O).unwrap();
        assert_eq!(registry.holder(SquareCharacter::O), Some(&bob));
    }

    #[test]
    fn test_unregistered_client_cannot_select() {
        let mut registry = ClientRegistry::new();
        let ghost = test_client("Ghost");

        let error = registry
            .select_character(ghost.id(), SquareCharacter::X)
            .unwrap_err();
        assert!(matches!(error, AppError::ClientNotRegistered { .. }));
    }

    #[test]
    fn test_has_both_players() {
        let mut registry = ClientRegistry::new();
        let alice = test_client("Alice");
        let bob = test_client("Bob");
        registry.register(alice.clone());
        registry.register(bob.clone());

        registry.select_character(alice.id(), SquareCharacter::X).unwrap();
        assert!(!registry.has_both_players());

        registry.select_character(bob.id(), SquareCharacter::O).unwrap();
        assert!(registry.has_both_players());
        assert!(registry.is_player(bob.id()));
    }
}
