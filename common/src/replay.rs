use crate::board::{Board, Mark};
use crate::history::HistoryRecord;
use crate::ledger::Ledger;
use crate::win::{self, Win};
use crate::GameError;

/// Rebuild the board as it stood after `step` moves: an empty board of the
/// given dimensions with moves `[0, step)` written in ledger order. No
/// terminal evaluation happens at intermediate steps.
pub fn reconstruct_at(
    ledger: &Ledger,
    rows: usize,
    cols: usize,
    step: usize,
) -> Result<Board, GameError> {
    if step > ledger.len() {
        return Err(GameError::InvalidStep {
            step,
            len: ledger.len(),
        });
    }
    let mut board = Board::new(rows, cols)?;
    for game_move in &ledger.moves()[..step] {
        board.set(
            game_move.position.row,
            game_move.position.col,
            game_move.symbol,
        )?;
    }
    Ok(board)
}

/// Whose turn it is at `step`: symbols strictly alternate starting with X,
/// so even steps are X and odd steps are O. Bot actor tagging never shifts
/// this parity.
pub fn current_turn_at(step: usize) -> Mark {
    if step % 2 == 0 {
        Mark::X
    } else {
        Mark::O
    }
}

/// Terminal state at a ledger prefix. Any proper prefix is non-terminal by
/// construction (a well-formed ledger has no moves after a terminal one);
/// at the full length the detector is re-run on the reconstructed board
/// rather than trusting the stored summary, so the replay stays consistent
/// with the move log even if the summary were corrupted.
pub fn terminal_state_at(
    ledger: &Ledger,
    rows: usize,
    cols: usize,
    step: usize,
) -> Result<Option<Win>, GameError> {
    if step > ledger.len() {
        return Err(GameError::InvalidStep {
            step,
            len: ledger.len(),
        });
    }
    if step < ledger.len() {
        return Ok(None);
    }
    let board = reconstruct_at(ledger, rows, cols, step)?;
    Ok(win::detect_win(&board))
}

/// Cursor over a finalized record for step-by-step playback. Pure compute
/// over the immutable ledger; shares no state with a live game, so it can
/// be stepped or scrubbed at any time.
#[derive(Clone, Debug)]
pub struct Replay {
    ledger: Ledger,
    rows: usize,
    cols: usize,
    step: usize,
}

impl Replay {
    pub fn new(record: &HistoryRecord) -> Result<Replay, GameError> {
        let rows = record.game_setting.board_rows;
        let cols = record.game_setting.board_cols;
        // Validate dimensions up front so every later reconstruction holds
        Board::new(rows, cols)?;
        Ok(Replay {
            ledger: Ledger::from(record.moves.clone()),
            rows,
            cols,
            step: 0,
        })
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn total_moves(&self) -> usize {
        self.ledger.len()
    }

    /// Advance one ply, clamped at the end
    pub fn next(&mut self) -> usize {
        self.step = (self.step + 1).min(self.ledger.len());
        self.step
    }

    /// Rewind one ply, clamped at the start
    pub fn prev(&mut self) -> usize {
        self.step = self.step.saturating_sub(1);
        self.step
    }

    /// Jump to an arbitrary step
    pub fn seek(&mut self, step: usize) -> Result<usize, GameError> {
        if step > self.ledger.len() {
            return Err(GameError::InvalidStep {
                step,
                len: self.ledger.len(),
            });
        }
        self.step = step;
        Ok(self.step)
    }

    pub fn board(&self) -> Result<Board, GameError> {
        reconstruct_at(&self.ledger, self.rows, self.cols, self.step)
    }

    pub fn current_turn(&self) -> Mark {
        current_turn_at(self.step)
    }

    pub fn terminal_state(&self) -> Result<Option<Win>, GameError> {
        terminal_state_at(&self.ledger, self.rows, self.cols, self.step)
    }
}
