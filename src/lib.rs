//! # RPS Duel
//!
//! Cheat-proof rock-paper-scissors between two peers over TCP.
//! Neither side can change its choice after seeing the opponent's:
//! each round runs a commit-reveal exchange where a choice is bound by
//! an HMAC digest before either side discloses anything.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         RPS DUEL                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  crypto/          - Commit-reveal primitives                 │
//! │  └── commitment.rs- Secrets, HMAC digests, verification      │
//! │                                                              │
//! │  game/            - Protocol state machine                   │
//! │  ├── choice.rs    - Hands and cyclic outcome arithmetic      │
//! │  ├── state.rs     - Flags, score, round record               │
//! │  ├── events.rs    - Event and notice unions                  │
//! │  └── engine.rs    - Single-consumer event loop               │
//! │                                                              │
//! │  network/         - Transport actors                         │
//! │  ├── protocol.rs  - Fixed-layout wire codec                  │
//! │  ├── receiver.rs  - Accept loop (inbound leg)                │
//! │  └── sender.rs    - Reconnect loop (outbound leg)            │
//! │                                                              │
//! │  ui.rs            - Stdin reader and console presenter       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Coordination model
//!
//! Four concurrent tasks: engine, receive actor, send actor, input
//! reader. All coordination crosses exactly two unbounded MPSC
//! channels -- events into the engine, wire messages out to the send
//! actor. The engine is the only task that touches protocol or score
//! state, so none of it is locked.
//!
//! Both peers run the same binary: each listens for the opponent's
//! messages on its own port and keeps dialing the opponent's port for
//! its outgoing messages, reconnecting forever on a fixed interval.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod crypto;
pub mod game;
pub mod network;
pub mod ui;

// Re-export commonly used types
pub use crypto::commitment::{Commitment, Reveal, Secret, DIGEST_SIZE, SECRET_LENGTH};
pub use game::choice::{Choice, Outcome};
pub use game::engine::Engine;
pub use game::events::{Event, Notice, RoundOutcome};
pub use game::state::{GameState, Score};
pub use network::protocol::Message;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
