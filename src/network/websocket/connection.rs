use futures_util::StreamExt;
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::actors::dispatch::{ChannelStrategy, DispatchStrategy};
use crate::network::messages::GameMessage;
use crate::network::websocket::outbound::ChannelOutbound;
use crate::session::client::Client;

pub struct ConnectionHandler;

impl ConnectionHandler {
    pub async fn handle_connection(
        stream: TcpStream,
        strategy: ChannelStrategy,
        default_name: String,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut requested_name = None;
        let read_name = |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
            requested_name = name_from_query(request.uri().query());
            Ok(response)
        };
        let ws_stream = accept_hdr_async(stream, read_name).await?;

        let (ws_sender, mut ws_receiver) = ws_stream.split();
        let (outbound, _writer) = ChannelOutbound::spawn_writer(ws_sender);

        let client = Client::new(requested_name.unwrap_or(default_name), Arc::new(outbound));
        let client_id = client.id();
        info!(%client_id, name = client.name(), "✅ WebSocket connection established");
        strategy.register(client)?;

        while let Some(msg) = ws_receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => match GameMessage::from_text(&text, client_id) {
                    Ok(message) => strategy.broadcast(message)?,
                    Err(e) => warn!(%client_id, "❌ Dropping frame: {}", e),
                },
                Ok(Message::Close(_)) => {
                    info!(%client_id, "👋 Connection requested close");
                    break;
                }
                Ok(_) => {
                    debug!(%client_id, "Ignoring non-text frame");
                }
                Err(e) => {
                    warn!(%client_id, "Connection read failed: {}", e);
                    break;
                }
            }
        }

        strategy.unregister(client_id)?;
        info!(%client_id, "📴 Connection closed");
        Ok(())
    }
}

/// Reads the percent-decoded `name` parameter of a `?name=...` query string.
fn name_from_query(query: Option<&str>) -> Option<String> {
    query?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "name")
        .map(|(_, value)| {
            let value = value.replace('+', " ");
            urlencoding::decode(&value)
                .map(|decoded| decoded.into_owned())
                .unwrap_or(value)
        })
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}
