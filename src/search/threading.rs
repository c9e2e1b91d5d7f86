//! Background search worker.
//!
//! A search runs on its own thread over an owned board snapshot and reports
//! back over a channel. At most one search is in flight at a time; the owner
//! polls for the outcome and applies it on its own thread, so nothing here
//! shares mutable state.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::engines::engine_minimax::MinimaxEngine;
use crate::engines::engine_trait::{Engine, GoParams};
use crate::errors::{EngineError, SessionError, SessionResult};
use crate::game_state::board::Board;
use crate::game_state::chess_types::Color;
use crate::moves::chess_move::Move;

/// Why a search was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPurpose {
    /// The computer's own move, applied when it arrives.
    ComputerMove,
    /// A suggestion for the human, only displayed.
    Hint,
}

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub purpose: SearchPurpose,
    pub board: Board,
    pub depth: u8,
    pub color_to_optimize: Color,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub purpose: SearchPurpose,
    /// Board the search ran on.
    pub board: Board,
    pub best_move: Option<Move>,
    pub score: i32,
    pub nodes: u64,
    pub elapsed: Duration,
}

#[derive(Debug, Default)]
pub struct SearchWorker {
    handle: Option<JoinHandle<()>>,
    receiver: Option<Receiver<Result<SearchOutcome, EngineError>>>,
}

impl SearchWorker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_busy(&self) -> bool {
        self.receiver.is_some()
    }

    /// Start `request` on a new thread. Refused while another search runs.
    pub fn dispatch(&mut self, request: SearchRequest) -> SessionResult<()> {
        if self.is_busy() {
            return Err(SessionError::SearchInFlight);
        }

        let (tx, rx) = mpsc::channel();
        debug!(
            purpose = ?request.purpose,
            depth = request.depth,
            optimize = %request.color_to_optimize,
            "dispatching search"
        );

        let handle = thread::spawn(move || {
            let outcome = run_search(request);
            // The receiver may be gone if the owner was dropped mid-search.
            let _ = tx.send(outcome);
        });

        self.handle = Some(handle);
        self.receiver = Some(rx);
        Ok(())
    }

    /// Non-blocking check for a finished search.
    pub fn poll(&mut self) -> Option<SessionResult<SearchOutcome>> {
        let receiver = self.receiver.as_ref()?;
        let received = match receiver.try_recv() {
            Ok(result) => result.map_err(SessionError::from),
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(SessionError::WorkerLost),
        };
        self.finish();
        Some(received)
    }

    /// Block until the running search finishes.
    pub fn wait(&mut self) -> SessionResult<SearchOutcome> {
        let receiver = self.receiver.as_ref().ok_or(SessionError::WorkerLost)?;
        let received = receiver.recv().map_err(|_| SessionError::WorkerLost);
        self.finish();
        received?.map_err(SessionError::from)
    }

    fn finish(&mut self) {
        self.receiver = None;
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_search(request: SearchRequest) -> Result<SearchOutcome, EngineError> {
    let started = Instant::now();
    let mut engine = configured_engine(&request)?;
    let params = GoParams {
        depth: None,
        color_to_optimize: Some(request.color_to_optimize),
    };
    let output = engine.choose_move(&request.board, &params)?;
    let elapsed = started.elapsed();

    for line in &output.info_lines {
        debug!(engine = engine.name(), "{line}");
    }
    info!(
        engine = engine.name(),
        purpose = ?request.purpose,
        depth = request.depth,
        nodes = output.nodes,
        score = output.score,
        elapsed_ms = elapsed.as_millis() as u64,
        best = ?output.best_move.as_ref().map(ToString::to_string),
        "search finished"
    );

    Ok(SearchOutcome {
        purpose: request.purpose,
        board: request.board,
        best_move: output.best_move,
        score: output.score,
        nodes: output.nodes,
        elapsed,
    })
}

fn configured_engine(request: &SearchRequest) -> Result<Box<dyn Engine>, EngineError> {
    let mut engine: Box<dyn Engine> = Box::new(MinimaxEngine::default());
    engine.set_option("Depth", &request.depth.to_string())?;
    if let Some(seed) = request.seed {
        engine.set_option("Seed", &seed.to_string())?;
    }
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::{configured_engine, SearchPurpose, SearchRequest, SearchWorker};
    use crate::errors::EngineError;
    use crate::errors::SessionError;
    use crate::utils::fen_parser::parse_fen;

    fn request(fen: &str, purpose: SearchPurpose) -> SearchRequest {
        let board = parse_fen(fen).expect("FEN should parse");
        SearchRequest {
            purpose,
            color_to_optimize: board.turn(),
            board,
            depth: 2,
            seed: Some(11),
        }
    }

    #[test]
    fn worker_delivers_one_outcome() {
        let mut worker = SearchWorker::new();
        worker
            .dispatch(request("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", SearchPurpose::Hint))
            .expect("idle worker accepts a search");
        assert!(worker.is_busy());

        let outcome = worker.wait().expect("search should finish");
        assert_eq!(outcome.purpose, SearchPurpose::Hint);
        assert_eq!(outcome.best_move.map(|mv| mv.to_string()).as_deref(), Some("a1a8"));
        assert!(!worker.is_busy());
        assert!(worker.poll().is_none());
    }

    #[test]
    fn out_of_range_depth_is_reported_by_the_engine() {
        let mut bad = request("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", SearchPurpose::Hint);
        bad.depth = 9;
        assert!(matches!(
            configured_engine(&bad),
            Err(EngineError::InvalidOptionValue { .. })
        ));

        let mut worker = SearchWorker::new();
        worker.dispatch(bad).expect("idle worker accepts a search");
        assert!(matches!(worker.wait(), Err(SessionError::Engine(_))));
    }

    #[test]
    fn second_dispatch_is_refused_while_busy() {
        let mut worker = SearchWorker::new();
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        worker
            .dispatch(request(fen, SearchPurpose::ComputerMove))
            .expect("idle worker accepts a search");
        assert!(matches!(
            worker.dispatch(request(fen, SearchPurpose::Hint)),
            Err(SessionError::SearchInFlight)
        ));
        worker.wait().expect("search should finish");
    }
}

