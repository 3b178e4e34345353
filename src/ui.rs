//! Console Front End
//!
//! The input actor reads move tokens from stdin and the presenter
//! prints prompts, outcomes, and the running score. Both sit outside
//! the engine: malformed input dies here and never becomes an event,
//! and the engine never prints.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::game::choice::Choice;
use crate::game::events::{Event, Notice, RoundOutcome};

/// Input actor: read move tokens from stdin and emit `UserChoice`.
///
/// Unrecognized lines are silently discarded at this boundary.
/// Returns when stdin closes or the engine goes away.
pub async fn read_choices(events: UnboundedSender<Event>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        match Choice::parse(line.trim()) {
            Some(choice) => {
                if events.send(Event::UserChoice(choice)).is_err() {
                    return;
                }
            }
            None => debug!(input = %line.trim(), "unrecognized input discarded"),
        }
    }
}

/// Presenter: print notices from the engine until it stops.
pub async fn present(mut notices: UnboundedReceiver<Notice>) {
    while let Some(notice) = notices.recv().await {
        print_notice(&notice);
    }
}

fn print_notice(notice: &Notice) {
    match notice {
        Notice::Prompt => {
            print!("Make a choice: ");
            // The prompt has no newline; push it out now.
            let _ = std::io::stdout().flush();
        }
        Notice::WaitingForOpponent => {
            println!("Waiting for opponent's choice");
        }
        Notice::WaitingForReveal => {
            println!("Waiting for opponent's reveal");
        }
        Notice::Disconnected => {
            println!("Opponent disconnected, score reset. Reconnecting...");
        }
        Notice::RoundOver {
            outcome,
            opponent_choice,
            score,
        } => {
            if let Some(choice) = opponent_choice {
                println!("Opponent's choice: {}", choice);
            }
            match outcome {
                RoundOutcome::Win => println!("YOU WIN!"),
                RoundOutcome::Lose => println!("YOU LOSE!"),
                RoundOutcome::Tie => println!("TIE!"),
                RoundOutcome::OpponentCheated => {
                    println!("Opponent's hash doesn't match.");
                    println!("YOU WIN!");
                }
            }
            println!("Score: {} - {}", score.wins, score.losses);
        }
    }
}
