//! Network Receive Actor
//!
//! Owns the accept loop for the inbound leg. One opponent connection
//! at a time: accept, emit `ServerConnected`, forward decoded messages
//! to the engine until the peer closes or the stream breaks, emit
//! `ServerDisconnected`, accept the next connection.

use std::net::SocketAddr;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::game::events::Event;
use crate::network::protocol::read_message;

/// Errors fatal to the receive actor itself.
///
/// Per-connection failures are handled locally by re-accepting; only
/// the inability to listen at all surfaces.
#[derive(Debug, thiserror::Error)]
pub enum ReceiverError {
    /// Failed to bind the listen socket.
    #[error("failed to bind listener: {0}")]
    BindFailed(#[from] std::io::Error),

    /// The engine hung up its event queue.
    #[error("event queue closed")]
    EventQueueClosed,
}

/// Accept-loop actor for the inbound leg.
pub struct ReceiveActor {
    bind_addr: SocketAddr,
    events: UnboundedSender<Event>,
}

impl ReceiveActor {
    /// Create an actor that will listen on `bind_addr`.
    pub fn new(bind_addr: SocketAddr, events: UnboundedSender<Event>) -> Self {
        Self { bind_addr, events }
    }

    /// Run the accept loop. Only returns on bind failure or when the
    /// engine is gone.
    pub async fn run(self) -> Result<(), ReceiverError> {
        let listener = TcpListener::bind(self.bind_addr).await?;
        info!("listening on {}", self.bind_addr);
        self.accept_loop(listener).await
    }

    /// Accept connections on an already-bound listener.
    async fn accept_loop(self, listener: TcpListener) -> Result<(), ReceiverError> {
        loop {
            let (stream, peer) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!("accept failed: {}", e);
                    continue;
                }
            };
            info!("opponent connected from {}", peer);
            self.emit(Event::ServerConnected)?;

            self.serve_connection(stream).await?;

            info!("opponent connection closed");
            self.emit(Event::ServerDisconnected)?;
        }
    }

    /// Forward messages from one connection until it ends.
    async fn serve_connection(&self, mut stream: TcpStream) -> Result<(), ReceiverError> {
        loop {
            match read_message(&mut stream).await {
                Ok(Some(message)) => {
                    self.emit(Event::MessageReceived(message))?;
                }
                Ok(None) => {
                    debug!("peer closed the connection");
                    return Ok(());
                }
                Err(e) if e.is_recoverable() => {
                    // The frame was consumed; drop just this message.
                    warn!("malformed message dropped: {}", e);
                }
                Err(e) => {
                    warn!("connection broken: {}", e);
                    return Ok(());
                }
            }
        }
    }

    fn emit(&self, event: Event) -> Result<(), ReceiverError> {
        self.events
            .send(event)
            .map_err(|_| ReceiverError::EventQueueClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::commitment::Reveal;
    use crate::game::choice::Choice;
    use crate::network::protocol::Message;
    use tokio::io::AsyncWriteExt;
    use tokio::sync::mpsc;

    /// Bind on an ephemeral port and run the actor against it.
    async fn spawn_actor() -> (
        std::net::SocketAddr,
        mpsc::UnboundedReceiver<Event>,
        tokio::task::JoinHandle<Result<(), ReceiverError>>,
    ) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let actor = ReceiveActor::new(addr, event_tx);
        let handle = tokio::spawn(actor.accept_loop(listener));
        (addr, event_rx, handle)
    }

    #[tokio::test]
    async fn test_connection_lifecycle_and_reaccept() {
        let (addr, mut event_rx, handle) = spawn_actor().await;

        let mut peer = TcpStream::connect(addr).await.unwrap();
        assert!(matches!(
            event_rx.recv().await,
            Some(Event::ServerConnected)
        ));

        let reveal = Reveal::new(Choice::Rock).unwrap();
        peer.write_all(&Message::Commitment(reveal.commitment()).encode())
            .await
            .unwrap();
        assert!(matches!(
            event_rx.recv().await,
            Some(Event::MessageReceived(Message::Commitment(_)))
        ));

        // Peer closes; the actor reports it and goes back to accepting.
        drop(peer);
        assert!(matches!(
            event_rx.recv().await,
            Some(Event::ServerDisconnected)
        ));

        let _peer2 = TcpStream::connect(addr).await.unwrap();
        assert!(matches!(
            event_rx.recv().await,
            Some(Event::ServerConnected)
        ));

        handle.abort();
    }

    #[tokio::test]
    async fn test_bad_choice_byte_drops_message_not_connection() {
        let (addr, mut event_rx, handle) = spawn_actor().await;

        let mut peer = TcpStream::connect(addr).await.unwrap();
        assert!(matches!(
            event_rx.recv().await,
            Some(Event::ServerConnected)
        ));

        // A reveal with a corrupted choice byte, then a valid
        // commitment on the same connection.
        let reveal = Reveal::new(Choice::Paper).unwrap();
        let mut corrupt = Message::Reveal(reveal.clone()).encode();
        corrupt[1] = 0x07;
        peer.write_all(&corrupt).await.unwrap();
        peer.write_all(&Message::Commitment(reveal.commitment()).encode())
            .await
            .unwrap();

        // The corrupt message never surfaces; the next event is the
        // commitment, still on the original connection.
        assert!(matches!(
            event_rx.recv().await,
            Some(Event::MessageReceived(Message::Commitment(_)))
        ));

        handle.abort();
    }
}
