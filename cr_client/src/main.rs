//! Player client for the board-game state relay.
//!
//! Subscribes to the server's snapshot stream, renders the board after
//! every change, and submits moves from the configured provider whenever
//! it is our turn.

mod api_client;
mod provider;
mod render;

use anyhow::{Context, Result};
use api_client::ApiClient;
use chess_relay::{
    game::{Color, GameStatus},
    messages::Snapshot,
};
use futures_util::StreamExt;
use pico_args::Arguments;
use provider::{InteractiveProvider, MoveProvider, SuggestionProvider};
use tokio_tungstenite::{connect_async, tungstenite::Message};

const HELP: &str = "\
Play or watch a relayed board game

USAGE:
  cr_client --player COLOR [OPTIONS]

OPTIONS:
  --player     COLOR       Which side you play: white|black
  --game       ID          Game identifier  [default: lobby]
  --server     URL         Server base URL  [default: http://127.0.0.1:8000]
  --provider   KIND        Move source: interactive|suggest  [default: interactive]

FLAGS:
  --reset                  Reset the board and exit
  -h, --help               Print help information

ENVIRONMENT:
  SUGGESTION_URL           Move-suggestion service endpoint (suggest provider)
  SUGGESTION_API_KEY       Bearer token for the suggestion service
";

struct Args {
    player: Color,
    game: String,
    server: String,
    provider: String,
    reset: bool,
}

fn parse_args() -> Result<Args> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let reset = pargs.contains("--reset");
    let args = Args {
        player: pargs
            .value_from_str::<_, String>("--player")
            .context("--player is required (white or black)")?
            .parse()
            .map_err(|e| anyhow::anyhow!("{e}"))?,
        game: pargs
            .opt_value_from_str("--game")?
            .unwrap_or_else(|| "lobby".to_string()),
        server: pargs
            .opt_value_from_str("--server")?
            .unwrap_or_else(|| "http://127.0.0.1:8000".to_string()),
        provider: pargs
            .opt_value_from_str("--provider")?
            .unwrap_or_else(|| "interactive".to_string()),
        reset,
    };
    Ok(args)
}

fn ws_url(server: &str, game: &str) -> String {
    let base = server
        .trim_end_matches('/')
        .replacen("http://", "ws://", 1)
        .replacen("https://", "wss://", 1);
    format!("{base}/ws/{game}")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args()?;
    let api = ApiClient::new(args.server.clone());

    if args.reset {
        let state = api.reset(&args.game).await?;
        println!("Game reset; {} to move.", state.turn);
        return Ok(());
    }

    let mut provider: Box<dyn MoveProvider> = match args.provider.as_str() {
        "interactive" => Box::new(InteractiveProvider),
        "suggest" => Box::new(SuggestionProvider::from_env()?),
        other => anyhow::bail!("unknown provider '{other}'; expected interactive or suggest"),
    };

    let url = ws_url(&args.server, &args.game);
    println!("Connecting to {url} as {}...", args.player);
    let (ws_stream, _) = connect_async(&url)
        .await
        .with_context(|| format!("failed to connect to {url}"))?;
    let (_write, mut read) = ws_stream.split();

    while let Some(msg) = read.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let snapshot: Snapshot =
                    serde_json::from_str(&text).context("invalid snapshot from server")?;
                render::draw(&snapshot)?;
                handle_snapshot(&api, &args, provider.as_mut(), &snapshot).await?;
            }
            Ok(Message::Close(_)) => {
                println!("Server closed connection");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Connection error: {e}");
                break;
            }
        }
    }

    Ok(())
}

/// React to a freshly rendered snapshot: submit a move when it is our
/// turn, otherwise wait for the next push.
async fn handle_snapshot(
    api: &ApiClient,
    args: &Args,
    provider: &mut dyn MoveProvider,
    snapshot: &Snapshot,
) -> Result<()> {
    if let GameStatus::Concluded(outcome) = snapshot.status {
        println!("Game over: {outcome}. Run with --reset to play again.");
        return Ok(());
    }

    if snapshot.turn != args.player {
        println!("Waiting for {}...", snapshot.turn);
        return Ok(());
    }

    // Keep prompting until the server accepts a move; every rejection
    // comes back with a reason we can show.
    loop {
        let (from, to) = provider.next_move(snapshot).await?;
        match api.post_move(&args.game, args.player, from, to).await? {
            Ok(_) => return Ok(()),
            Err(rejected) => {
                println!("Move rejected ({}): {}", rejected.reason, rejected.message);
                if rejected.reason == "game_over" || rejected.reason == "wrong_turn" {
                    // The board moved under us; wait for the next snapshot.
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ws_url;

    #[test]
    fn test_ws_url_derivation() {
        assert_eq!(
            ws_url("http://127.0.0.1:8000", "lobby"),
            "ws://127.0.0.1:8000/ws/lobby"
        );
        assert_eq!(
            ws_url("https://relay.example.com/", "g1"),
            "wss://relay.example.com/ws/g1"
        );
    }
}
