//! Player Choices
//!
//! The three throwable hands and the cyclic win/lose arithmetic
//! between them.

use std::fmt;

/// A player's hand for one round.
///
/// The discriminant doubles as the one-byte wire encoding and as the
/// HMAC message when binding a commitment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Choice {
    /// Beats scissors, loses to paper.
    Rock = 0,
    /// Beats rock, loses to scissors.
    Paper = 1,
    /// Beats paper, loses to rock.
    Scissors = 2,
}

/// Result of comparing two choices, from the first choice's perspective.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// First choice beats the second.
    Win,
    /// First choice loses to the second.
    Lose,
    /// Same choice on both sides.
    Tie,
}

impl Choice {
    /// One-byte encoding for the wire and for commitment binding.
    #[inline]
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Decode from a wire byte. Unknown tags are rejected here so an
    /// invalid value never enters protocol state.
    pub fn from_byte(byte: u8) -> Option<Choice> {
        match byte {
            0 => Some(Choice::Rock),
            1 => Some(Choice::Paper),
            2 => Some(Choice::Scissors),
            _ => None,
        }
    }

    /// Parse a user-typed token. Anything unrecognized is discarded at
    /// the input boundary.
    pub fn parse(token: &str) -> Option<Choice> {
        match token {
            "rock" => Some(Choice::Rock),
            "paper" => Some(Choice::Paper),
            "scissors" => Some(Choice::Scissors),
            _ => None,
        }
    }

    /// Compare against an opponent's choice.
    ///
    /// Uses the 3-way cyclic ordering: each choice beats the one
    /// directly below it (mod 3) and loses to the one directly above.
    pub fn against(self, opponent: Choice) -> Outcome {
        match (3 + self as u8 - opponent as u8) % 3 {
            1 => Outcome::Win,
            2 => Outcome::Lose,
            _ => Outcome::Tie,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Choice::Rock => "rock",
            Choice::Paper => "paper",
            Choice::Scissors => "scissors",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    #[test]
    fn test_every_choice_ties_itself() {
        for c in ALL {
            assert_eq!(c.against(c), Outcome::Tie);
        }
    }

    #[test]
    fn test_winning_pairs() {
        assert_eq!(Choice::Rock.against(Choice::Scissors), Outcome::Win);
        assert_eq!(Choice::Paper.against(Choice::Rock), Outcome::Win);
        assert_eq!(Choice::Scissors.against(Choice::Paper), Outcome::Win);
    }

    #[test]
    fn test_losing_pairs_are_the_reverse() {
        assert_eq!(Choice::Scissors.against(Choice::Rock), Outcome::Lose);
        assert_eq!(Choice::Rock.against(Choice::Paper), Outcome::Lose);
        assert_eq!(Choice::Paper.against(Choice::Scissors), Outcome::Lose);
    }

    #[test]
    fn test_byte_roundtrip() {
        for c in ALL {
            assert_eq!(Choice::from_byte(c.as_byte()), Some(c));
        }
        assert_eq!(Choice::from_byte(3), None);
        assert_eq!(Choice::from_byte(255), None);
    }

    #[test]
    fn test_parse_tokens() {
        assert_eq!(Choice::parse("rock"), Some(Choice::Rock));
        assert_eq!(Choice::parse("paper"), Some(Choice::Paper));
        assert_eq!(Choice::parse("scissors"), Some(Choice::Scissors));
        assert_eq!(Choice::parse("Rock"), None);
        assert_eq!(Choice::parse("lizard"), None);
        assert_eq!(Choice::parse(""), None);
    }
}
