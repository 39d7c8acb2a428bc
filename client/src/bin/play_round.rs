//! Play one janken round, locally or against a settlement service.

use anyhow::{bail, Result};
use clap::Parser;
use janken_client::{Client, RoundController};
use janken_types::{Identity, Move, DEFAULT_STAKE};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play one rock/paper/scissors round")]
struct Args {
    /// Move to play: rock, paper, or scissors (r/p/s)
    #[arg(long = "move")]
    mv: String,

    /// Settlement service base URL (http(s)://host:port); omit for local play
    #[arg(long)]
    url: Option<String>,

    /// Identity to submit under (required with --url)
    #[arg(long)]
    identity: Option<String>,

    /// Stake attached to a remote submission
    #[arg(long, default_value_t = DEFAULT_STAKE)]
    stake: u64,

    /// Seconds to wait for settlement before giving up
    #[arg(long, default_value = "60")]
    wait_secs: u64,
}

fn parse_move(raw: &str) -> Result<Move> {
    match raw.to_lowercase().as_str() {
        "r" | "rock" => Ok(Move::Rock),
        "p" | "paper" => Ok(Move::Paper),
        "s" | "scissors" => Ok(Move::Scissors),
        other => bail!("unknown move: {other} (expected rock, paper, or scissors)"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let mv = parse_move(&args.mv)?;
    let mut controller = RoundController::new()
        .with_stake(args.stake)
        .with_settle_wait(Duration::from_secs(args.wait_secs));

    if let Some(url) = &args.url {
        let Some(identity) = &args.identity else {
            bail!("--identity is required with --url");
        };
        let client = Client::new(url, Identity::new(identity.clone()))?;
        controller.connect(client);
    }

    let round = controller.play(mv).await?;
    println!("{}", round.transcript());

    let score = controller.session().score();
    println!(
        "score: you {} / computer {}",
        score.player_wins(),
        score.opponent_wins()
    );

    Ok(())
}
