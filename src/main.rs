use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;

use tile_chess::frontend::terminal::run_stdio_loop;
use tile_chess::game_state::chess_types::Color;
use tile_chess::session::config::{OpponentKind, SessionConfig};
use tile_chess::session::game_session::GameSession;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Side {
    White,
    Black,
}

/// Play chess in the terminal against the computer or another person.
#[derive(Debug, Parser)]
#[command(name = "tile_chess", version)]
struct Args {
    /// Computer search depth in plies (1-6).
    #[arg(long, default_value_t = 3)]
    depth: u8,

    /// Search depth used for hints (1-6).
    #[arg(long, default_value_t = 3)]
    hint_depth: u8,

    /// Side played by the human.
    #[arg(long, value_enum, default_value_t = Side::White)]
    color: Side,

    /// Both sides are entered at the terminal.
    #[arg(long)]
    two_player: bool,

    /// Seed for the computer's choice between equally good moves.
    #[arg(long)]
    seed: Option<u64>,

    /// Start from this position instead of the initial one.
    #[arg(long)]
    fen: Option<String>,
}

impl Args {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            search_depth: self.depth,
            hint_depth: self.hint_depth,
            human_color: match self.color {
                Side::White => Color::White,
                Side::Black => Color::Black,
            },
            opponent: if self.two_player {
                OpponentKind::Human
            } else {
                OpponentKind::Computer
            },
            seed: self.seed,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.session_config();
    let session = match &args.fen {
        Some(fen) => match GameSession::from_fen(config, fen) {
            Ok(session) => session,
            Err(err) => {
                error!(%err, fen = %fen, "cannot start from position");
                eprintln!("cannot start from `{fen}`: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => GameSession::new(config),
    };

    match run_stdio_loop(session) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "terminal i/o failed");
            ExitCode::FAILURE
        }
    }
}
