//! Game Logic Module
//!
//! The commit-reveal state machine and everything it owns:
//!
//! - `choice` - the three hands and outcome arithmetic
//! - `state` - state flags, score, round record
//! - `events` - inbound event union, outbound notices
//! - `engine` - the event-driven protocol engine

pub mod choice;
pub mod engine;
pub mod events;
pub mod state;

pub use choice::{Choice, Outcome};
pub use engine::Engine;
pub use events::{Event, Notice, RoundOutcome};
pub use state::{GameState, RoundRecord, Score};
