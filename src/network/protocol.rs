//! Protocol Messages
//!
//! Wire format for the peer-to-peer connection: a stream of
//! fixed-layout messages, each a one-byte type tag followed by a
//! fixed-size payload. Both sides agree on digest and secret lengths
//! out of band; there is no length framing or negotiation.
//!
//! Layout:
//!
//! ```text
//! Commitment: [0x01][digest: 32 bytes]
//! Reveal:     [0x02][choice: 1 byte][secret: 64 bytes]
//! ```

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::crypto::commitment::{Commitment, Reveal, Secret, DIGEST_SIZE, SECRET_LENGTH};
use crate::game::choice::Choice;

/// Wire tag for a commitment message.
const TAG_COMMITMENT: u8 = 0x01;

/// Wire tag for a reveal message.
const TAG_REVEAL: u8 = 0x02;

/// A protocol message exchanged between peers.
///
/// Exactly one message flows per direction per protocol step.
#[derive(Clone, Debug)]
pub enum Message {
    /// The sender has locked in a choice without disclosing it.
    Commitment(Commitment),
    /// The sender discloses its choice and the binding secret.
    Reveal(Reveal),
}

/// Wire decoding errors.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Socket read/write failure.
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),

    /// Unrecognized message tag. Framing is lost past this point, so
    /// the connection cannot be salvaged.
    #[error("unknown message tag: {0:#04x}")]
    UnknownTag(u8),

    /// A reveal frame carried an invalid choice byte. The frame was
    /// fully consumed, so the stream itself is still in sync.
    #[error("invalid choice byte in reveal: {0:#04x}")]
    BadChoice(u8),
}

impl Message {
    /// Encode to the fixed wire layout.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Message::Commitment(commitment) => {
                let mut buf = Vec::with_capacity(1 + DIGEST_SIZE);
                buf.push(TAG_COMMITMENT);
                buf.extend_from_slice(commitment.as_bytes());
                buf
            }
            Message::Reveal(reveal) => {
                let mut buf = Vec::with_capacity(2 + SECRET_LENGTH);
                buf.push(TAG_REVEAL);
                buf.push(reveal.choice.as_byte());
                buf.extend_from_slice(reveal.secret.as_bytes());
                buf
            }
        }
    }
}

/// Write one message to the wire.
pub async fn write_message<W>(writer: &mut W, message: &Message) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&message.encode()).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one message from the wire.
///
/// Returns `Ok(None)` when the peer closed the connection cleanly at a
/// message boundary. EOF mid-message is an error (truncated frame).
pub async fn read_message<R>(reader: &mut R) -> Result<Option<Message>, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    let mut tag = [0u8; 1];
    if reader.read(&mut tag).await? == 0 {
        return Ok(None);
    }

    match tag[0] {
        TAG_COMMITMENT => {
            let mut digest = [0u8; DIGEST_SIZE];
            reader.read_exact(&mut digest).await?;
            Ok(Some(Message::Commitment(Commitment::from_bytes(digest))))
        }
        TAG_REVEAL => {
            let mut choice_byte = [0u8; 1];
            reader.read_exact(&mut choice_byte).await?;
            let mut secret = [0u8; SECRET_LENGTH];
            reader.read_exact(&mut secret).await?;

            // Validate the choice tag only after the whole frame is
            // consumed, so a bad byte costs one message, not the stream.
            let choice =
                Choice::from_byte(choice_byte[0]).ok_or(ProtocolError::BadChoice(choice_byte[0]))?;
            Ok(Some(Message::Reveal(Reveal {
                choice,
                secret: Secret::from_bytes(secret),
            })))
        }
        other => Err(ProtocolError::UnknownTag(other)),
    }
}

impl ProtocolError {
    /// Whether the stream is still framed after this error.
    ///
    /// Only a bad choice byte leaves the stream usable; everything
    /// else forces a disconnect.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ProtocolError::BadChoice(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn roundtrip(message: &Message) -> Message {
        let (mut client, mut server) = tokio::io::duplex(256);
        write_message(&mut client, message).await.unwrap();
        read_message(&mut server).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_commitment_roundtrip() {
        let reveal = Reveal::new(Choice::Paper).unwrap();
        let commitment = reveal.commitment();

        let decoded = roundtrip(&Message::Commitment(commitment)).await;
        match decoded {
            Message::Commitment(c) => assert_eq!(c.as_bytes(), commitment.as_bytes()),
            other => panic!("wrong message type: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_reveal_roundtrip() {
        let reveal = Reveal::new(Choice::Scissors).unwrap();

        let decoded = roundtrip(&Message::Reveal(reveal.clone())).await;
        match decoded {
            Message::Reveal(r) => {
                assert_eq!(r.choice, Choice::Scissors);
                assert_eq!(r.secret.as_bytes(), reveal.secret.as_bytes());
            }
            other => panic!("wrong message type: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_clean_close_is_none() {
        let (client, mut server) = tokio::io::duplex(256);
        drop(client);

        let result = read_message(&mut server).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_unknown_tag_rejected() {
        let (mut client, mut server) = tokio::io::duplex(256);
        tokio::io::AsyncWriteExt::write_all(&mut client, &[0xff])
            .await
            .unwrap();

        let err = read_message(&mut server).await.unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownTag(0xff)));
        assert!(!err.is_recoverable());
    }

    #[tokio::test]
    async fn test_bad_choice_byte_rejected_but_recoverable() {
        let (mut client, mut server) = tokio::io::duplex(256);
        let mut frame = vec![TAG_REVEAL, 0x07];
        frame.extend_from_slice(&[0u8; SECRET_LENGTH]);
        // A valid commitment follows the corrupt reveal; the reader
        // must be able to pick it up.
        let reveal = Reveal::new(Choice::Rock).unwrap();
        frame.extend_from_slice(&Message::Commitment(reveal.commitment()).encode());
        tokio::io::AsyncWriteExt::write_all(&mut client, &frame)
            .await
            .unwrap();

        let err = read_message(&mut server).await.unwrap_err();
        assert!(matches!(err, ProtocolError::BadChoice(0x07)));
        assert!(err.is_recoverable());

        let next = read_message(&mut server).await.unwrap().unwrap();
        assert!(matches!(next, Message::Commitment(_)));
    }

    #[tokio::test]
    async fn test_truncated_frame_is_error() {
        let (mut client, mut server) = tokio::io::duplex(256);
        tokio::io::AsyncWriteExt::write_all(&mut client, &[TAG_COMMITMENT, 0x01, 0x02])
            .await
            .unwrap();
        drop(client);

        let err = read_message(&mut server).await.unwrap_err();
        assert!(matches!(err, ProtocolError::Io(_)));
    }

    #[test]
    fn test_encoded_sizes_are_fixed() {
        let reveal = Reveal::new(Choice::Rock).unwrap();
        assert_eq!(
            Message::Commitment(reveal.commitment()).encode().len(),
            1 + DIGEST_SIZE
        );
        assert_eq!(Message::Reveal(reveal).encode().len(), 2 + SECRET_LENGTH);
    }
}
