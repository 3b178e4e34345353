//! Game Events
//!
//! The inbound event union consumed by the engine and the outbound
//! notices it emits for whatever front end presents the game.

use crate::game::choice::Choice;
use crate::game::state::Score;
use crate::network::protocol::Message;

/// An event delivered to the engine over the inbound queue.
///
/// The three actors (receiver, sender, input) are the only producers;
/// the engine is the only consumer. Ordering is FIFO per producer,
/// with no cross-producer ordering beyond arrival at the queue.
#[derive(Debug)]
pub enum Event {
    /// The opponent connected to our listener.
    ServerConnected,
    /// The inbound connection closed.
    ServerDisconnected,
    /// Our outbound connection to the opponent is up.
    ClientConnected,
    /// The outbound connection dropped.
    ClientDisconnected,
    /// The local player picked a hand.
    UserChoice(Choice),
    /// A protocol message arrived from the opponent.
    MessageReceived(Message),
}

/// How a resolved round went for the local player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Beat the opponent's revealed choice.
    Win,
    /// Lost to the opponent's revealed choice.
    Lose,
    /// Same choice on both sides.
    Tie,
    /// The opponent's reveal did not match its commitment.
    /// Automatic win for the honest party.
    OpponentCheated,
}

/// A presentation hook emitted by the engine.
///
/// The engine never prints; a console presenter (or any other front
/// end) consumes these.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    /// Both legs are connected; ask the player for a choice.
    Prompt,
    /// Our commitment is out; waiting on the opponent's commitment.
    WaitingForOpponent,
    /// Our reveal is out; waiting on the opponent's reveal.
    WaitingForReveal,
    /// A leg dropped while fully connected; score was reset.
    Disconnected,
    /// A round resolved.
    RoundOver {
        /// Result from the local player's perspective.
        outcome: RoundOutcome,
        /// The opponent's revealed choice; `None` when the reveal
        /// failed verification and no choice can be trusted.
        opponent_choice: Option<Choice>,
        /// Score after applying the outcome.
        score: Score,
    },
}
