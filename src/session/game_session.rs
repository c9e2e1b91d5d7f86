//! A running game.
//!
//! `GameSession` owns everything that changes as the game progresses: the
//! current board, both players, the clocks, the position history used for
//! repetition, the undo stack and the background search worker. The rules
//! engine underneath stays pure; this is the only place that mutates.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::errors::{LoadError, SessionError, SessionResult};
use crate::game_state::board::Board;
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::{Color, Piece, PieceKind};
use crate::game_state::game_status::{evaluate_game_state, GameState};
use crate::game_state::player::Player;
use crate::moves::chess_move::Move;
use crate::search::threading::{SearchOutcome, SearchPurpose, SearchRequest, SearchWorker};
use crate::session::config::SessionConfig;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::FenRecord;
use crate::utils::fen_validator::check_playable;
use crate::utils::long_algebraic::{move_to_long_algebraic, parse_long_algebraic, resolve_move, MoveRequest};

/// Everything needed to step back one ply.
#[derive(Debug, Clone)]
struct UndoState {
    board: Board,
    halfmove_clock: u32,
    fullmove_number: u32,
    positions: HashMap<String, u32>,
    white_captured: Vec<Piece>,
    black_captured: Vec<Piece>,
    state: GameState,
}

/// What a finished background search amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// The computer played `notation`, leaving the game in `state`.
    ComputerMoved { notation: String, state: GameState },
    /// Suggested move for the side to move, if it has one.
    Hint(Option<String>),
    /// The position changed while the search ran; its result was dropped.
    Discarded,
}

pub struct GameSession {
    config: SessionConfig,
    board: Board,
    white: Player,
    black: Player,
    halfmove_clock: u32,
    fullmove_number: u32,
    positions: HashMap<String, u32>,
    history: Vec<UndoState>,
    move_log: Vec<String>,
    state: GameState,
    worker: SearchWorker,
    started_at: DateTime<Local>,
}

impl GameSession {
    /// A fresh game from the standard starting position.
    pub fn new(config: SessionConfig) -> Self {
        let config = config.normalized();
        let mut session = Self {
            white: Player::new(Color::White, config.player_kind(Color::White)),
            black: Player::new(Color::Black, config.player_kind(Color::Black)),
            config,
            board: Board::starting_position(),
            halfmove_clock: 0,
            fullmove_number: 1,
            positions: HashMap::new(),
            history: Vec::new(),
            move_log: Vec::new(),
            state: GameState::Normal,
            worker: SearchWorker::new(),
            started_at: Local::now(),
        };
        session.reset_to(FenRecord {
            board: Board::starting_position(),
            halfmove_clock: 0,
            fullmove_number: 1,
        });
        session
    }

    /// A game starting from `fen`, which must be playable.
    pub fn from_fen(config: SessionConfig, fen: &str) -> Result<Self, LoadError> {
        let record = check_playable(fen.trim(), config.human_color)?;
        let mut session = Self::new(config);
        session.reset_to(record);
        Ok(session)
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[inline]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[inline]
    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Moves played since the game (or loaded position) started.
    pub fn move_log(&self) -> &[String] {
        &self.move_log
    }

    pub fn player(&self, color: Color) -> &Player {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    /// Pieces `color` has captured so far.
    pub fn captured_by(&self, color: Color) -> &[Piece] {
        self.player(color).captured_pieces()
    }

    #[inline]
    pub fn is_busy(&self) -> bool {
        self.worker.is_busy()
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Six-field FEN of the current position.
    pub fn fen(&self) -> String {
        generate_fen(&self.board, self.halfmove_clock, self.fullmove_number)
    }

    /// True when the side to move is played by the computer.
    pub fn computer_to_move(&self) -> bool {
        !self.is_game_over() && self.player(self.board.turn()).is_computer()
    }

    pub fn set_search_depth(&mut self, depth: u8) {
        self.config = SessionConfig {
            search_depth: depth,
            ..self.config.clone()
        }
        .normalized();
        info!(depth = self.config.search_depth, "search depth changed");
    }

    pub fn set_hint_depth(&mut self, depth: u8) {
        self.config = SessionConfig {
            hint_depth: depth,
            ..self.config.clone()
        }
        .normalized();
    }

    /// Back to the starting position with the same configuration.
    pub fn new_game(&mut self) -> SessionResult<()> {
        self.ensure_idle()?;
        self.reset_to(FenRecord {
            board: Board::starting_position(),
            halfmove_clock: 0,
            fullmove_number: 1,
        });
        info!(fen = STARTING_POSITION_FEN, "new game");
        Ok(())
    }

    /// Play the legal move from `request.from` to `request.to`. Promotions
    /// default to a queen.
    pub fn play_move(&mut self, request: &MoveRequest) -> SessionResult<GameState> {
        self.ensure_idle()?;
        self.ensure_not_over()?;
        let mv = resolve_move(&self.board, request)?;
        Ok(self.apply(&mv, request.promotion))
    }

    /// Play a move given in long algebraic notation (`e2e4`, `e7e8n`).
    pub fn play_text(&mut self, text: &str) -> SessionResult<GameState> {
        let request = parse_long_algebraic(text)?;
        self.play_move(&request)
    }

    /// Take back the last ply.
    pub fn undo(&mut self) -> SessionResult<()> {
        self.ensure_idle()?;
        let snapshot = self.history.pop().ok_or(SessionError::NothingToUndo)?;
        self.board = snapshot.board;
        self.halfmove_clock = snapshot.halfmove_clock;
        self.fullmove_number = snapshot.fullmove_number;
        self.positions = snapshot.positions;
        self.white.set_captured_pieces(snapshot.white_captured);
        self.black.set_captured_pieces(snapshot.black_captured);
        self.state = snapshot.state;
        self.move_log.pop();
        self.refresh_players();
        debug!(fen = %self.fen(), "undo");
        Ok(())
    }

    /// Take back plies until a human is to move again, so an undo against
    /// the computer also removes the computer's reply.
    pub fn undo_turn(&mut self) -> SessionResult<()> {
        self.undo()?;
        while self.player(self.board.turn()).is_computer() && !self.history.is_empty() {
            self.undo()?;
        }
        Ok(())
    }

    /// Start the computer's search for the side to move.
    pub fn request_computer_move(&mut self) -> SessionResult<()> {
        self.ensure_not_over()?;
        let request = self.search_request(SearchPurpose::ComputerMove, self.config.search_depth);
        self.worker.dispatch(request)
    }

    /// Start a search suggesting a move for the side to move.
    pub fn request_hint(&mut self) -> SessionResult<()> {
        self.ensure_not_over()?;
        let request = self.search_request(SearchPurpose::Hint, self.config.hint_depth);
        self.worker.dispatch(request)
    }

    /// Collect a finished search without blocking.
    pub fn poll_search(&mut self) -> Option<SessionResult<SearchEvent>> {
        let outcome = self.worker.poll()?;
        Some(outcome.map(|outcome| self.handle_outcome(outcome)))
    }

    /// Block until the running search finishes and handle its result.
    pub fn wait_search(&mut self) -> SessionResult<SearchEvent> {
        let outcome = self.worker.wait()?;
        Ok(self.handle_outcome(outcome))
    }

    pub fn save_to(&self, path: &Path) -> SessionResult<()> {
        fs::write(path, format!("{}\n", self.fen())).map_err(SessionError::Save)?;
        info!(path = %path.display(), "game saved");
        Ok(())
    }

    /// Replace the game with the position stored at `path`. The session is
    /// unchanged when the file cannot be read or holds a bad position.
    pub fn load_from(&mut self, path: &Path) -> SessionResult<()> {
        self.ensure_idle()?;
        let text = fs::read_to_string(path).map_err(LoadError::Io)?;
        let line = text.lines().next().unwrap_or_default();
        self.load_fen(line)?;
        info!(path = %path.display(), "game loaded");
        Ok(())
    }

    pub fn load_fen(&mut self, fen: &str) -> SessionResult<()> {
        self.ensure_idle()?;
        let record = check_playable(fen.trim(), self.config.human_color).map_err(|err| {
            warn!(%err, fen, "rejected position");
            LoadError::from(err)
        })?;
        self.reset_to(record);
        Ok(())
    }

    fn ensure_idle(&self) -> SessionResult<()> {
        if self.worker.is_busy() {
            return Err(SessionError::SearchInFlight);
        }
        Ok(())
    }

    fn ensure_not_over(&self) -> SessionResult<()> {
        if self.state.is_game_over() {
            return Err(SessionError::GameOver(self.state));
        }
        Ok(())
    }

    fn search_request(&self, purpose: SearchPurpose, depth: u8) -> SearchRequest {
        SearchRequest {
            purpose,
            board: self.board.clone(),
            depth,
            color_to_optimize: self.board.turn(),
            seed: self
                .config
                .seed
                .map(|seed| seed.wrapping_add(self.history.len() as u64)),
        }
    }

    fn handle_outcome(&mut self, outcome: SearchOutcome) -> SearchEvent {
        if outcome.board != self.board {
            debug!(purpose = ?outcome.purpose, "discarding stale search result");
            return SearchEvent::Discarded;
        }
        match outcome.purpose {
            SearchPurpose::Hint => SearchEvent::Hint(outcome.best_move.map(|mv| mv.to_string())),
            SearchPurpose::ComputerMove => match outcome.best_move {
                Some(mv) => {
                    let notation = move_to_long_algebraic(&mv, Some(PieceKind::Queen));
                    let state = self.apply(&mv, None);
                    SearchEvent::ComputerMoved { notation, state }
                }
                None => SearchEvent::Hint(None),
            },
        }
    }

    fn apply(&mut self, mv: &Move, promotion: Option<PieceKind>) -> GameState {
        self.history.push(UndoState {
            board: self.board.clone(),
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            positions: self.positions.clone(),
            white_captured: self.white.captured_pieces().to_vec(),
            black_captured: self.black.captured_pieces().to_vec(),
            state: self.state,
        });

        let mover = mv.piece().color;
        let promotion = promotion.unwrap_or(PieceKind::Queen);
        self.board = mv.board_after_promoting(promotion);

        if let Some(victim) = mv.captured() {
            match mover {
                Color::White => self.white.record_capture(victim),
                Color::Black => self.black.record_capture(victim),
            }
        }
        if mv.is_irreversible() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if mover == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        *self.positions.entry(self.board.to_string()).or_insert(0) += 1;
        self.move_log.push(move_to_long_algebraic(mv, Some(promotion)));

        self.refresh_players();
        self.state = self.evaluate();
        info!(
            mv = %mv,
            state = %self.state,
            fen = %self.fen(),
            "move applied"
        );
        self.state
    }

    fn evaluate(&self) -> GameState {
        let mover = self.player(self.board.turn());
        let opponent = self.player(self.board.turn().reverse());
        evaluate_game_state(
            mover,
            opponent,
            &self.board,
            self.halfmove_clock,
            Some(&self.positions),
        )
    }

    fn refresh_players(&mut self) {
        self.white.refresh(&self.board);
        self.black.refresh(&self.board);
    }

    fn reset_to(&mut self, record: FenRecord) {
        self.board = record.board;
        self.halfmove_clock = record.halfmove_clock;
        self.fullmove_number = record.fullmove_number;
        self.positions.clear();
        self.positions.insert(self.board.to_string(), 1);
        self.history.clear();
        self.move_log.clear();
        self.white.set_captured_pieces(Vec::new());
        self.black.set_captured_pieces(Vec::new());
        self.started_at = Local::now();
        self.refresh_players();
        self.state = self.evaluate();
        debug!(
            fen = %self.fen(),
            opponent = ?self.config.opponent,
            human = %self.config.human_color,
            started = %self.started_at.to_rfc3339(),
            "session reset"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{GameSession, SearchEvent};
    use crate::errors::{FenError, LoadError, MoveGenerationError, PlayabilityError, SessionError};
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::{Color, PieceKind};
    use crate::game_state::game_status::GameState;
    use crate::session::config::{OpponentKind, SessionConfig};

    fn two_player() -> SessionConfig {
        SessionConfig {
            opponent: OpponentKind::Human,
            seed: Some(1),
            ..SessionConfig::default()
        }
    }

    fn play_all(session: &mut GameSession, moves: &[&str]) {
        for mv in moves {
            session.play_text(mv).expect("scripted move should be legal");
        }
    }

    #[test]
    fn clocks_follow_pawn_moves_and_captures() {
        let mut session = GameSession::new(two_player());
        play_all(&mut session, &["g1f3", "b8c6"]);
        assert_eq!(session.halfmove_clock(), 2);
        assert_eq!(session.fullmove_number(), 2);

        play_all(&mut session, &["e2e4"]);
        assert_eq!(session.halfmove_clock(), 0);
        assert_eq!(
            session.fen(),
            "r1bqkbnr/pppppppp/2n5/8/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq e3 0 2"
        );
    }

    #[test]
    fn undo_restores_board_clocks_and_captures() {
        let mut session = GameSession::new(two_player());
        play_all(&mut session, &["e2e4", "d7d5"]);
        let before = session.fen();

        session.play_text("e4d5").expect("exd5 is legal");
        assert_eq!(session.captured_by(Color::White).len(), 1);
        assert_eq!(session.halfmove_clock(), 0);

        session.undo().expect("one ply to undo");
        assert_eq!(session.fen(), before);
        assert!(session.captured_by(Color::White).is_empty());
        assert_eq!(session.move_log(), ["e2e4", "d7d5"]);
    }

    #[test]
    fn undo_on_fresh_game_is_an_error() {
        let mut session = GameSession::new(two_player());
        assert!(matches!(session.undo(), Err(SessionError::NothingToUndo)));
    }

    #[test]
    fn illegal_moves_leave_the_game_unchanged() {
        let mut session = GameSession::new(two_player());
        assert!(matches!(
            session.play_text("e2e5"),
            Err(SessionError::Move(MoveGenerationError::NoSuchMove(_)))
        ));
        assert_eq!(session.fen(), STARTING_POSITION_FEN);
    }

    #[test]
    fn fools_mate_latches_game_over() {
        let mut session = GameSession::new(two_player());
        play_all(&mut session, &["f2f3", "e7e5", "g2g4"]);
        let state = session.play_text("d8h4").expect("Qh4 is legal");
        assert_eq!(state, GameState::Checkmate);
        assert!(session.is_game_over());
        assert!(matches!(
            session.play_text("e1f2"),
            Err(SessionError::GameOver(GameState::Checkmate))
        ));
    }

    #[test]
    fn knight_shuffle_reaches_threefold_repetition() {
        let mut session = GameSession::new(two_player());
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
        play_all(&mut session, &shuffle);
        assert_eq!(session.state(), GameState::Normal);
        play_all(&mut session, &shuffle);
        assert_eq!(session.state(), GameState::ThreefoldRepetition);
    }

    #[test]
    fn promotion_choice_is_honoured() {
        let mut session =
            GameSession::from_fen(two_player(), "4k3/1P6/8/8/8/8/8/4K3 w - - 0 1").expect("playable FEN");
        session.play_text("b7b8n").expect("underpromotion is legal");
        let b8 = crate::utils::algebraic::algebraic_to_square("b8").expect("b8");
        assert_eq!(session.board().piece_at(b8).map(|p| p.kind), Some(PieceKind::Knight));
        assert_eq!(session.move_log(), ["b7b8n"]);
    }

    #[test]
    fn computer_replies_through_the_worker() {
        let config = SessionConfig {
            search_depth: 2,
            seed: Some(5),
            ..SessionConfig::default()
        };
        let mut session = GameSession::new(config);
        session.play_text("e2e4").expect("e4 is legal");
        assert!(session.computer_to_move());

        session.request_computer_move().expect("worker is idle");
        assert!(matches!(
            session.play_text("d2d4"),
            Err(SessionError::SearchInFlight)
        ));
        assert!(matches!(session.request_hint(), Err(SessionError::SearchInFlight)));

        let event = session.wait_search().expect("search should finish");
        assert!(matches!(event, SearchEvent::ComputerMoved { .. }));
        assert_eq!(session.board().turn(), Color::White);
        assert_eq!(session.move_log().len(), 2);

        session.undo_turn().expect("two plies to undo");
        assert_eq!(session.fen(), STARTING_POSITION_FEN);
    }

    #[test]
    fn hint_does_not_change_the_position() {
        let mut session = GameSession::from_fen(two_player(), "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1")
            .expect("playable FEN");
        session.request_hint().expect("worker is idle");
        let event = session.wait_search().expect("search should finish");
        assert_eq!(event, SearchEvent::Hint(Some("a1a8".to_owned())));
        assert_eq!(session.fen(), "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("tile_chess_session_{}", std::process::id()));
        fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("game.fen");

        let mut session = GameSession::new(two_player());
        play_all(&mut session, &["e2e4", "c7c5", "g1f3"]);
        session.save_to(&path).expect("save should succeed");

        let mut restored = GameSession::new(two_player());
        restored.load_from(&path).expect("load should succeed");
        assert_eq!(restored.fen(), session.fen());

        fs::remove_dir_all(&dir).expect("clean up temp dir");
    }

    #[test]
    fn fullmove_number_is_capped_on_load_and_keeps_counting() {
        let config = two_player();
        assert!(matches!(
            GameSession::from_fen(config.clone(), "4k3/8/8/8/8/8/4P3/4K3 b - - 0 4294967295"),
            Err(LoadError::Unparsable(FenError::InvalidFullmoveNumber(_)))
        ));

        let mut session = GameSession::from_fen(config, "4k3/8/8/8/8/8/4P3/4K3 b - - 0 100000")
            .expect("fullmove at the cap is accepted");
        session.play_text("e8d8").expect("king move is legal");
        assert_eq!(session.fullmove_number(), 100_001);
        assert_eq!(session.fen(), "3k4/8/8/8/8/8/4P3/4K3 w - - 1 100001");
    }

    #[test]
    fn failed_loads_keep_the_session_and_say_why() {
        let mut session = GameSession::new(two_player());
        session.play_text("e2e4").expect("e4 is legal");
        let before = session.fen();

        assert!(matches!(
            session.load_fen("not a fen"),
            Err(SessionError::Load(LoadError::Unparsable(_)))
        ));
        assert!(matches!(
            session.load_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(SessionError::Load(LoadError::Unplayable(PlayabilityError::AlreadyDecided(_))))
        ));
        let missing = std::env::temp_dir().join("tile_chess_missing_game_file.fen");
        assert!(matches!(
            session.load_from(&missing),
            Err(SessionError::Load(LoadError::Io(_)))
        ));
        assert_eq!(session.fen(), before);
    }
}
