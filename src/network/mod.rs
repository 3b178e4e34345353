//! Network Layer
//!
//! Transport actors and wire protocol (non-deterministic side):
//!
//! - `protocol` - fixed-layout message codec
//! - `receiver` - accept loop for the inbound leg
//! - `sender` - reconnect loop for the outbound leg

pub mod protocol;
pub mod receiver;
pub mod sender;

pub use protocol::{Message, ProtocolError};
pub use receiver::ReceiveActor;
pub use sender::SendActor;
