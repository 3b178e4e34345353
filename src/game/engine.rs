//! Game Engine
//!
//! Single-consumer state machine driving the commit-reveal protocol.
//! The engine owns all protocol and score state; the three actors
//! (receiver, sender, input) only ever talk to it through the inbound
//! event queue, and it only ever talks to the wire through the
//! outbound message queue. No other shared state exists.
//!
//! Reveal timing is symmetric: whichever event completes the "both
//! sides committed" condition triggers our reveal, so it does not
//! matter whether the local player or the opponent commits first.

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

use crate::crypto::commitment::{Commitment, CryptoError, Reveal};
use crate::game::choice::{Choice, Outcome};
use crate::game::events::{Event, Notice, RoundOutcome};
use crate::game::state::{GameState, RoundRecord, Score};
use crate::network::protocol::Message;

/// Produces the choice-plus-secret pair for a commit attempt.
///
/// Indirection over [`Reveal::new`] so the entropy-failure path can be
/// driven without breaking the system entropy source.
type RevealFactory = fn(Choice) -> Result<Reveal, CryptoError>;

/// The commit-reveal game engine.
///
/// Consumes [`Event`]s, produces wire [`Message`]s and presentation
/// [`Notice`]s. Runs on a single task; its state needs no locking.
pub struct Engine {
    events: UnboundedReceiver<Event>,
    outbound: UnboundedSender<Message>,
    notices: UnboundedSender<Notice>,
    make_reveal: RevealFactory,
    state: GameState,
    score: Score,
    round: RoundRecord,
}

impl Engine {
    /// Create an engine wired to its three channels.
    pub fn new(
        events: UnboundedReceiver<Event>,
        outbound: UnboundedSender<Message>,
        notices: UnboundedSender<Notice>,
    ) -> Self {
        Self {
            events,
            outbound,
            notices,
            make_reveal: Reveal::new,
            state: GameState::default(),
            score: Score::default(),
            round: RoundRecord::default(),
        }
    }

    /// Snapshot of the current state flags.
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Snapshot of the current score.
    pub fn score(&self) -> Score {
        self.score
    }

    /// Consume events until every producer has hung up.
    pub async fn run(mut self) {
        while let Some(event) = self.events.recv().await {
            self.handle_event(event);
        }
        info!("event queue closed, engine stopping");
    }

    /// Apply one event to the state machine.
    pub fn handle_event(&mut self, event: Event) {
        debug!(?event, "engine event");
        match event {
            Event::ServerConnected => {
                self.state.server_connected = true;
                self.prompt_if_ready();
            }
            Event::ClientConnected => {
                self.state.client_connected = true;
                self.prompt_if_ready();
            }
            Event::ServerDisconnected => {
                let was_playing = self.state.both_connected();
                self.state.server_connected = false;
                self.handle_disconnect("server", was_playing);
            }
            Event::ClientDisconnected => {
                let was_playing = self.state.both_connected();
                self.state.client_connected = false;
                self.handle_disconnect("client", was_playing);
            }
            Event::UserChoice(choice) => self.handle_user_choice(choice),
            Event::MessageReceived(Message::Commitment(commitment)) => {
                self.handle_opponent_commitment(commitment);
            }
            Event::MessageReceived(Message::Reveal(reveal)) => {
                self.handle_opponent_reveal(reveal);
            }
        }
    }

    /// Prompt for a choice once both legs are up.
    fn prompt_if_ready(&mut self) {
        if self.state.both_connected() {
            info!("both connections established");
            self.notify(Notice::Prompt);
        }
    }

    fn handle_disconnect(&mut self, leg: &str, was_playing: bool) {
        // A dropped leg abandons the round and the score: the opponent
        // that comes back may not be mid-round with us anymore.
        self.state.reset_round();
        self.round.clear();
        self.score.reset();

        if was_playing {
            info!(leg, "connection lost, score reset");
            self.notify(Notice::Disconnected);
        } else {
            debug!(leg, "connection lost while not fully connected");
        }
    }

    fn handle_user_choice(&mut self, choice: Choice) {
        if !self.state.both_connected() {
            debug!(%choice, "choice ignored, not fully connected");
            return;
        }
        if self.state.user_committed {
            // A player cannot change their choice mid-round.
            debug!(%choice, "duplicate choice ignored, already committed");
            return;
        }

        let reveal = match (self.make_reveal)(choice) {
            Ok(reveal) => reveal,
            Err(e) => {
                // Without a fresh unpredictable secret the commitment
                // would be forgeable; abort this attempt, the player
                // can retry since no flags were touched.
                error!("cannot commit choice: {}", e);
                return;
            }
        };

        let commitment = reveal.commitment();
        self.round.own_reveal = Some(reveal);
        self.state.user_committed = true;
        self.send(Message::Commitment(commitment));
        self.notify(Notice::WaitingForOpponent);

        self.reveal_if_both_committed();
    }

    fn handle_opponent_commitment(&mut self, commitment: Commitment) {
        if self.state.opponent_committed {
            warn!("duplicate opponent commitment dropped");
            return;
        }

        self.round.opponent_commitment = Some(commitment);
        self.state.opponent_committed = true;

        self.reveal_if_both_committed();
    }

    /// Send our reveal exactly once, the first time both sides have
    /// committed. Called from both commit paths so arrival order does
    /// not matter.
    fn reveal_if_both_committed(&mut self) {
        if self.state.user_revealed
            || !self.state.user_committed
            || !self.state.opponent_committed
        {
            return;
        }
        let Some(reveal) = self.round.own_reveal.clone() else {
            // user_committed without a recorded reveal would be a bug
            // in this module, not a peer problem.
            error!("committed without round record, dropping reveal");
            return;
        };

        self.state.user_revealed = true;
        self.send(Message::Reveal(reveal));
        self.notify(Notice::WaitingForReveal);
    }

    fn handle_opponent_reveal(&mut self, reveal: Reveal) {
        // A reveal is only meaningful against a previously recorded
        // commitment; anything else is a protocol violation.
        let Some(commitment) = self.round.opponent_commitment else {
            warn!("reveal before commitment dropped");
            return;
        };
        let Some(own) = self.round.own_reveal.clone() else {
            warn!("opponent reveal before we committed dropped");
            return;
        };

        let result = if commitment.verify(&reveal) {
            let opponent_choice = reveal.choice;
            info!(%opponent_choice, "opponent reveal verified");
            match own.choice.against(opponent_choice) {
                Outcome::Win => {
                    self.score.wins += 1;
                    Notice::RoundOver {
                        outcome: RoundOutcome::Win,
                        opponent_choice: Some(opponent_choice),
                        score: self.score,
                    }
                }
                Outcome::Lose => {
                    self.score.losses += 1;
                    Notice::RoundOver {
                        outcome: RoundOutcome::Lose,
                        opponent_choice: Some(opponent_choice),
                        score: self.score,
                    }
                }
                Outcome::Tie => Notice::RoundOver {
                    outcome: RoundOutcome::Tie,
                    opponent_choice: Some(opponent_choice),
                    score: self.score,
                },
            }
        } else {
            // The opponent could not produce a reveal matching its own
            // commitment: either it tried to swap choices after seeing
            // ours, or it sent garbage. Both count as a win for us.
            warn!("opponent reveal failed verification");
            self.score.wins += 1;
            Notice::RoundOver {
                outcome: RoundOutcome::OpponentCheated,
                opponent_choice: None,
                score: self.score,
            }
        };

        // Round boundary: clear progress flags and material together,
        // keep connectivity, ask for the next choice.
        self.state.reset_round();
        self.round.clear();
        self.notify(result);
        self.notify(Notice::Prompt);
    }

    fn send(&self, message: Message) {
        if self.outbound.send(message).is_err() {
            warn!("outbound channel closed, message dropped");
        }
    }

    fn notify(&self, notice: Notice) {
        if self.notices.send(notice).is_err() {
            debug!("notice channel closed");
        }
    }
}
