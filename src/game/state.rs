//! Game State Definitions
//!
//! Connection flags, round-progress flags, score, and the in-progress
//! round record. All of it is owned exclusively by the engine task;
//! observers get copies, never references into live state.

use crate::crypto::commitment::{Commitment, Reveal};

/// The engine's state flags.
///
/// Round-progress flags (`user_committed`, `opponent_committed`,
/// `user_revealed`) only ever go false -> true within a round and are
/// cleared together, exactly once, at a round boundary or disconnect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameState {
    /// The inbound leg (opponent connected to our listener) is up.
    pub server_connected: bool,
    /// The outbound leg (our connection to the opponent) is up.
    pub client_connected: bool,
    /// We have committed a choice this round.
    pub user_committed: bool,
    /// The opponent's commitment has arrived this round.
    pub opponent_committed: bool,
    /// Our reveal has been sent this round.
    pub user_revealed: bool,
}

impl GameState {
    /// Both legs of the duplex link are up.
    #[inline]
    pub fn both_connected(&self) -> bool {
        self.server_connected && self.client_connected
    }

    /// Clear the round-progress flags, keeping connectivity flags.
    pub fn reset_round(&mut self) {
        self.user_committed = false;
        self.opponent_committed = false;
        self.user_revealed = false;
    }
}

/// Running score against the current opponent.
///
/// Reset to zero whenever either leg of the connection drops; ties
/// leave it untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Score {
    /// Rounds won.
    pub wins: u32,
    /// Rounds lost.
    pub losses: u32,
}

impl Score {
    /// Zero the score (new opponent connection).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Everything the engine holds for the in-progress round.
///
/// Created empty at round start, populated as events arrive, cleared
/// atomically when the round resolves or connectivity is lost.
#[derive(Debug, Default)]
pub struct RoundRecord {
    /// Our own choice and secret, kept until reveal time.
    pub own_reveal: Option<Reveal>,
    /// The opponent's commitment, recorded when it arrives.
    pub opponent_commitment: Option<Commitment>,
}

impl RoundRecord {
    /// Drop all round material.
    pub fn clear(&mut self) {
        self.own_reveal = None;
        self.opponent_commitment = None;
    }
}
