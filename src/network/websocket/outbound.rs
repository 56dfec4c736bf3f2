use futures_util::{Sink, SinkExt};
use std::fmt::Display;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};
use crate::session::client::Messageable;

/// Write side of one connection: serialized frames go through an unbounded
/// channel to a writer task that owns the websocket sink.
#[derive(Debug, Clone)]
pub struct ChannelOutbound {
    sender: mpsc::UnboundedSender<String>,
}

impl ChannelOutbound {
    pub fn new(sender: mpsc::UnboundedSender<String>) -> Self {
        Self { sender }
    }

    /// An outbound handle together with the receiving end of its frames.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }

    /// Spawns the writer task forwarding frames into `sink` as text messages.
    /// The task ends when every handle is dropped or a write fails.
    pub fn spawn_writer<S>(sink: S) -> (Self, JoinHandle<()>)
    where
        S: Sink<Message> + Unpin + Send + 'static,
        S::Error: Display,
    {
        let (outbound, receiver) = Self::channel();
        let handle = tokio::spawn(write_frames(sink, receiver));
        (outbound, handle)
    }
}

impl Messageable for ChannelOutbound {
    fn send_message(&self, message: String) -> AppResult<()> {
        self.sender
            .send(message)
            .map_err(|_| AppError::WebSocketError {
                message: "connection writer is closed".to_string(),
            })
    }
}

async fn write_frames<S>(mut sink: S, mut receiver: mpsc::UnboundedReceiver<String>)
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    while let Some(text) = receiver.recv().await {
        if let Err(e) = sink.send(Message::Text(text)).await {
            warn!("Failed to write frame: {}", e);
            return;
        }
    }

    if let Err(e) = sink.close().await {
        debug!("Failed to close sink: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::pin::Pin;
    use std::sync::{Arc, Mutex};
    use std::task::{Context, Poll};

    #[derive(Clone, Default)]
    struct RecordingSink(Arc<Mutex<Vec<Message>>>);

    impl Sink<Message> for RecordingSink {
        type Error = Infallible;

        fn poll_ready(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Infallible>> {
            Poll::Ready(Ok(()))
        }

        fn start_send(self: Pin<&mut Self>, item: Message) -> Result<(), Infallible> {
            self.0.lock().unwrap().push(item);
            Ok(())
        }

        fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Infallible>> {
            Poll::Ready(Ok(()))
        }

        fn poll_close(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Infallible>> {
            Poll::Ready(Ok(()))
        }
    }

    #[test]
    fn test_send_fails_once_receiver_is_gone() {
        let (outbound, receiver) = ChannelOutbound::channel();
        outbound.send_message("first".to_string()).unwrap();

        drop(receiver);
        let error = outbound.send_message("second".to_string()).unwrap_err();
        assert!(matches!(error, AppError::WebSocketError { .. }));
    }

    #[tokio::test]
    async fn test_writer_forwards_frames_in_order() {
        let sink = RecordingSink::default();
        let (outbound, writer) = ChannelOutbound::spawn_writer(sink.clone());

        outbound.send_message("one".to_string()).unwrap();
        outbound.send_message("two".to_string()).unwrap();
        drop(outbound);
        writer.await.unwrap();

        let frames = sink.0.lock().unwrap().clone();
        assert_eq!(
            frames,
            vec![
                Message::Text("one".to_string()),
                Message::Text("two".to_string())
            ]
        );
    }
}
