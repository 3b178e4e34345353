//! Network Send Actor
//!
//! Owns the reconnect loop for the outbound leg. While disconnected it
//! retries the opponent's address at a fixed one-second interval,
//! indefinitely -- the peer is expected to come back eventually (e.g.
//! a human restarts it), so there is no backoff and no retry cap.
//! While connected it drains the outbound queue onto the wire and
//! watches for the peer closing its read side.

use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::game::events::Event;
use crate::network::protocol::{write_message, Message};

/// Fixed delay between reconnect attempts.
pub const RECONNECT_INTERVAL: Duration = Duration::from_secs(1);

/// Reconnect-loop actor for the outbound leg.
pub struct SendActor {
    opponent_addr: String,
    outbound: UnboundedReceiver<Message>,
    events: UnboundedSender<Event>,
}

impl SendActor {
    /// Create an actor that will keep connecting to `opponent_addr`
    /// (a `host:port` string).
    pub fn new(
        opponent_addr: String,
        outbound: UnboundedReceiver<Message>,
        events: UnboundedSender<Event>,
    ) -> Self {
        Self {
            opponent_addr,
            outbound,
            events,
        }
    }

    /// Run the reconnect loop. Returns when the engine drops the
    /// outbound queue or the event queue.
    pub async fn run(mut self) {
        loop {
            let stream = match TcpStream::connect(&self.opponent_addr).await {
                Ok(stream) => stream,
                Err(e) => {
                    debug!("connect to {} failed: {}", self.opponent_addr, e);
                    sleep(RECONNECT_INTERVAL).await;
                    continue;
                }
            };
            info!("connected to opponent at {}", self.opponent_addr);
            if self.events.send(Event::ClientConnected).is_err() {
                return;
            }

            let engine_alive = self.forward_messages(stream).await;

            // Whatever is still queued belongs to a round that is being
            // abandoned; it must not leak into the next connection.
            self.drain_outbound();
            if self.events.send(Event::ClientDisconnected).is_err() || !engine_alive {
                return;
            }
        }
    }

    /// Forward queued messages until the connection dies.
    ///
    /// Returns `false` when the outbound queue itself closed (engine
    /// gone), `true` when the connection failed and we should retry.
    async fn forward_messages(&mut self, mut stream: TcpStream) -> bool {
        // The opponent never sends on this leg, so any read completion
        // means it closed (or reset) its end.
        let mut liveness_buf = [0u8; 1];
        loop {
            tokio::select! {
                message = self.outbound.recv() => {
                    let Some(message) = message else {
                        debug!("outbound queue closed");
                        return false;
                    };
                    if let Err(e) = write_message(&mut stream, &message).await {
                        warn!("send failed: {}", e);
                        return true;
                    }
                }
                read = stream.read(&mut liveness_buf) => {
                    match read {
                        Ok(0) => info!("opponent closed the connection"),
                        Ok(_) => warn!("unexpected data on send leg, dropping connection"),
                        Err(e) => warn!("connection lost: {}", e),
                    }
                    return true;
                }
            }
        }
    }

    /// Discard everything still queued for sending.
    fn drain_outbound(&mut self) {
        let mut dropped = 0usize;
        while self.outbound.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            debug!("discarded {} stale outbound messages", dropped);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::commitment::Reveal;
    use crate::game::choice::Choice;
    use tokio::sync::mpsc;

    #[test]
    fn test_drain_discards_queued_messages() {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (event_tx, _event_rx) = mpsc::unbounded_channel();
        let mut actor = SendActor::new("127.0.0.1:0".to_string(), out_rx, event_tx);

        let reveal = Reveal::new(Choice::Rock).unwrap();
        out_tx.send(Message::Commitment(reveal.commitment())).unwrap();
        out_tx.send(Message::Reveal(reveal)).unwrap();

        actor.drain_outbound();

        assert!(actor.outbound.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_forward_messages_reaches_the_wire() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let actor = SendActor::new(addr.to_string(), out_rx, event_tx);
        let actor_handle = tokio::spawn(actor.run());

        let (mut peer, _) = listener.accept().await.unwrap();
        assert!(matches!(
            event_rx.recv().await,
            Some(Event::ClientConnected)
        ));

        let reveal = Reveal::new(Choice::Paper).unwrap();
        out_tx.send(Message::Commitment(reveal.commitment())).unwrap();

        let decoded = crate::network::protocol::read_message(&mut peer)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(decoded, Message::Commitment(_)));

        // Dropping the engine side shuts the actor down.
        drop(out_tx);
        drop(event_rx);
        actor_handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_peer_close_emits_client_disconnected() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (_out_tx, out_rx) = mpsc::unbounded_channel();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let actor = SendActor::new(addr.to_string(), out_rx, event_tx);
        let actor_handle = tokio::spawn(actor.run());

        let (peer, _) = listener.accept().await.unwrap();
        assert!(matches!(
            event_rx.recv().await,
            Some(Event::ClientConnected)
        ));

        // Peer closes; the liveness read must notice and the actor must
        // report the disconnect before retrying.
        drop(peer);
        assert!(matches!(
            event_rx.recv().await,
            Some(Event::ClientDisconnected)
        ));

        // It then reconnects on its own.
        let (_peer, _) = listener.accept().await.unwrap();
        assert!(matches!(
            event_rx.recv().await,
            Some(Event::ClientConnected)
        ));

        actor_handle.abort();
    }
}
