//! RPS Duel
//!
//! Peer-to-peer rock-paper-scissors with commit-reveal fairness.
//! Spawns the three actors and runs the game engine on the main task.

use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rps_duel::game::engine::Engine;
use rps_duel::network::receiver::ReceiveActor;
use rps_duel::network::sender::SendActor;
use rps_duel::{ui, VERSION};

/// Play fair rock-paper-scissors against a remote opponent.
///
/// Type `rock`, `paper`, or `scissors` once both connections are up.
#[derive(Debug, Parser)]
#[command(name = "rps-duel", version)]
struct Args {
    /// Port to listen on for the opponent's messages.
    listen_port: u16,

    /// Opponent's host name or address.
    opponent_host: String,

    /// Opponent's listen port.
    opponent_port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout belongs to the game prompts.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    info!("RPS Duel v{}", VERSION);

    let bind_addr = SocketAddr::from(([0, 0, 0, 0], args.listen_port));
    let opponent_addr = format!("{}:{}", args.opponent_host, args.opponent_port);

    // The two queues of the design: events in, wire messages out.
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let (notice_tx, notice_rx) = mpsc::unbounded_channel();

    let receiver = ReceiveActor::new(bind_addr, event_tx.clone());
    let sender = SendActor::new(opponent_addr, outbound_rx, event_tx.clone());

    tokio::spawn(sender.run());
    tokio::spawn(ui::read_choices(event_tx));
    tokio::spawn(ui::present(notice_rx));

    let engine = Engine::new(event_rx, outbound_tx, notice_tx);
    let engine_handle = tokio::spawn(engine.run());

    // If the listener cannot bind there is no game to play; surface it.
    // Everything else runs until the process is killed.
    let receiver_result = receiver.run().await;
    engine_handle.abort();
    receiver_result.context("receive actor failed")?;
    Ok(())
}
