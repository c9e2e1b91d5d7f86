//! Line-oriented terminal front-end.
//!
//! Reads one command per line, drives a `GameSession` and prints the board
//! after every change. Computer moves and hints are searched in the
//! background, so the loop keeps accepting input while a search runs and
//! reports the result as soon as it arrives.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::game_state::chess_types::Color;
use crate::game_state::game_status::GameState;
use crate::session::game_session::{GameSession, SearchEvent};
use crate::utils::render_game_state::{piece_to_unicode, render_board};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

const HELP: &str = "\
commands:
  <move>            play a move in long algebraic form, e.g. e2e4 or e7e8n
  move <move>       same as above
  undo              take back your last move (and the computer's reply)
  hint              suggest a move for the side to move
  go                let the computer move for the side to move
  new               start a new game
  board             show the board
  fen               print the current position
  position <fen>    set up a position
  load <path>       load a position saved with `save`
  save <path>       save the current position
  depth <n>         computer search depth (1-6)
  hintdepth <n>     hint search depth (1-6)
  help              show this text
  quit              leave";

/// Run the interactive loop on stdin/stdout until `quit` or end of input.
pub fn run_stdio_loop(session: GameSession) -> io::Result<()> {
    let (line_tx, line_rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut stdout = io::stdout();
    let mut terminal = Terminal::new(session);
    terminal.start(&mut stdout)?;
    stdout.flush()?;

    loop {
        terminal.poll(&mut stdout)?;
        match line_rx.recv_timeout(POLL_INTERVAL) {
            Ok(line) => {
                let should_quit = terminal.handle_command(&line, &mut stdout)?;
                stdout.flush()?;
                if should_quit {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                // Input closed; let a running search finish before leaving.
                terminal.finish_search(&mut stdout)?;
                break;
            }
        }
        stdout.flush()?;
    }

    Ok(())
}

pub struct Terminal {
    session: GameSession,
}

impl Terminal {
    pub fn new(session: GameSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Greet and, when the computer has the first move, start thinking.
    pub fn start(&mut self, out: &mut impl Write) -> io::Result<()> {
        writeln!(
            out,
            "tile_chess: game started {}, type `help` for commands",
            self.session.started_at().format("%Y-%m-%d %H:%M")
        )?;
        self.show_board(out)?;
        self.kick_computer(out)
    }

    /// Report a finished background search, if any.
    pub fn poll(&mut self, out: &mut impl Write) -> io::Result<()> {
        match self.session.poll_search() {
            Some(Ok(event)) => self.report(event, out),
            Some(Err(err)) => writeln!(out, "search failed: {err}"),
            None => Ok(()),
        }
    }

    /// Block on a running search and report it.
    pub fn finish_search(&mut self, out: &mut impl Write) -> io::Result<()> {
        if !self.session.is_busy() {
            return Ok(());
        }
        match self.session.wait_search() {
            Ok(event) => self.report(event, out),
            Err(err) => writeln!(out, "search failed: {err}"),
        }
    }

    /// Handle one input line. Returns `true` when the user asked to quit.
    pub fn handle_command(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }

        let (cmd, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (trimmed, ""),
        };
        debug!(cmd, rest, "terminal command");

        match cmd {
            "quit" | "exit" => return Ok(true),
            "help" => writeln!(out, "{HELP}")?,
            "board" => self.show_board(out)?,
            "fen" => writeln!(out, "{}", self.session.fen())?,
            "move" => self.play(rest, out)?,
            "undo" => match self.session.undo_turn() {
                Ok(()) => {
                    self.show_board(out)?;
                    // The computer may be to move again.
                    self.kick_computer(out)?;
                }
                Err(err) => writeln!(out, "cannot undo: {err}")?,
            },
            "hint" => match self.session.request_hint() {
                Ok(()) => writeln!(out, "looking for a hint...")?,
                Err(err) => writeln!(out, "no hint: {err}")?,
            },
            "go" => match self.session.request_computer_move() {
                Ok(()) => writeln!(out, "thinking...")?,
                Err(err) => writeln!(out, "cannot search: {err}")?,
            },
            "new" => match self.session.new_game() {
                Ok(()) => {
                    self.show_board(out)?;
                    self.kick_computer(out)?;
                }
                Err(err) => writeln!(out, "cannot start a new game: {err}")?,
            },
            "position" => match self.session.load_fen(rest) {
                Ok(()) => {
                    self.show_board(out)?;
                    self.kick_computer(out)?;
                }
                Err(err) => writeln!(out, "position rejected: {err}")?,
            },
            "load" => match self.session.load_from(Path::new(rest)) {
                Ok(()) => {
                    self.show_board(out)?;
                    self.kick_computer(out)?;
                }
                Err(err) => writeln!(out, "load failed: {err}")?,
            },
            "save" => match self.session.save_to(Path::new(rest)) {
                Ok(()) => writeln!(out, "saved to {rest}")?,
                Err(err) => writeln!(out, "save failed: {err}")?,
            },
            "depth" | "hintdepth" => match rest.parse::<u8>() {
                Ok(depth) => {
                    if cmd == "depth" {
                        self.session.set_search_depth(depth);
                    } else {
                        self.session.set_hint_depth(depth);
                    }
                    let config = self.session.config();
                    writeln!(
                        out,
                        "search depth {}, hint depth {}",
                        config.search_depth, config.hint_depth
                    )?;
                }
                Err(_) => writeln!(out, "expected a number, got `{rest}`")?,
            },
            _ => self.play(trimmed, out)?,
        }

        Ok(false)
    }

    fn play(&mut self, text: &str, out: &mut impl Write) -> io::Result<()> {
        if self.session.computer_to_move() {
            return writeln!(out, "it is the computer's turn");
        }
        match self.session.play_text(text) {
            Ok(state) => {
                self.show_board(out)?;
                self.announce(state, out)?;
                self.kick_computer(out)
            }
            Err(err) => {
                warn!(%err, text, "move rejected");
                writeln!(out, "illegal move `{text}`: {err}")
            }
        }
    }

    fn kick_computer(&mut self, out: &mut impl Write) -> io::Result<()> {
        if !self.session.computer_to_move() || self.session.is_busy() {
            return Ok(());
        }
        match self.session.request_computer_move() {
            Ok(()) => writeln!(out, "thinking..."),
            Err(err) => writeln!(out, "cannot search: {err}"),
        }
    }

    fn report(&mut self, event: SearchEvent, out: &mut impl Write) -> io::Result<()> {
        match event {
            SearchEvent::ComputerMoved { notation, state } => {
                writeln!(out, "computer plays {notation}")?;
                self.show_board(out)?;
                self.announce(state, out)?;
                // Both sides may be computer-driven after `go`.
                self.kick_computer(out)
            }
            SearchEvent::Hint(Some(mv)) => writeln!(out, "hint: {mv}"),
            SearchEvent::Hint(None) => writeln!(out, "hint: no legal moves"),
            SearchEvent::Discarded => Ok(()),
        }
    }

    fn announce(&self, state: GameState, out: &mut impl Write) -> io::Result<()> {
        let to_move = self.session.board().turn();
        match state {
            GameState::Normal => Ok(()),
            GameState::Check => writeln!(out, "{to_move} is in check"),
            GameState::Checkmate => writeln!(out, "checkmate, {} wins", to_move.reverse()),
            _ if state.is_draw() => writeln!(out, "game drawn: {state}"),
            _ => writeln!(out, "{state}"),
        }
    }

    fn show_board(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "{}", render_board(self.session.board()))?;
        for color in [Color::White, Color::Black] {
            let captured: String = self
                .session
                .captured_by(color)
                .iter()
                .map(piece_to_unicode)
                .collect();
            if !captured.is_empty() {
                writeln!(out, "{color} captured: {captured}")?;
            }
        }
        writeln!(
            out,
            "{} to move, move {}",
            self.session.board().turn(),
            self.session.fullmove_number()
        )
    }
}
