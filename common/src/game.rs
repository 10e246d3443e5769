use serde::{Deserialize, Serialize};

use crate::board::{Board, Mark, Position};
use crate::ledger::{Ledger, Move, MoveActor};
use crate::utils::time;
use crate::win::{self, Win};
use crate::GameError;

/// Who sits on the O side
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameMode {
    #[serde(rename = "vs-human")]
    VsHuman,
    #[serde(rename = "vs-bot")]
    VsBot,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Playing,
    Finished,
    Draw,
}

/// The complete state of one live game: board, turn, status, derived
/// winner data and the move ledger. Mutated exclusively through the pure
/// transitions [`Game::apply_move`] and [`Game::restart`], which return a
/// new value and leave the input untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct Game {
    board: Board,
    current_player: Mark,
    status: GameStatus,
    winner: Option<Mark>,
    winning_line: Option<Vec<Position>>,
    ledger: Ledger,
    mode: GameMode,
    started_at: i64,
}

impl Game {
    /// Start a fresh game: empty board, empty ledger, X to move
    pub fn new(rows: usize, cols: usize, mode: GameMode) -> Result<Game, GameError> {
        Ok(Game {
            board: Board::new(rows, cols)?,
            current_player: Mark::X,
            status: GameStatus::Playing,
            winner: None,
            winning_line: None,
            ledger: Ledger::new(),
            mode,
            started_at: time::now_millis(),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Mark {
        self.current_player
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn winner(&self) -> Option<Mark> {
        self.winner
    }

    pub fn winning_line(&self) -> Option<&[Position]> {
        self.winning_line.as_deref()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn started_at(&self) -> i64 {
        self.started_at
    }

    /// Whole seconds elapsed since game start
    pub fn elapsed_secs(&self) -> i64 {
        ((time::now_millis() - self.started_at) / 1000).max(0)
    }

    /// Apply the current player's move at `(row, col)`.
    ///
    /// Validates status and cell, writes the mark, runs the win detector,
    /// transitions the status, appends the ledger entry and flips the turn
    /// while the game stays in progress. Errors leave the prior `Game`
    /// value exactly as it was; persistence of finished games is the
    /// caller's responsibility.
    pub fn apply_move(&self, row: usize, col: usize) -> Result<Game, GameError> {
        if self.status != GameStatus::Playing {
            return Err(GameError::GameNotPlaying);
        }

        let mut next = self.clone();
        next.board.set(row, col, self.current_player)?;

        // In vs-bot mode the O side is the bot; otherwise X is the host
        // player and O the guest. Metadata only, never read by game logic.
        let actor = match (self.mode, self.current_player) {
            (GameMode::VsBot, Mark::O) => MoveActor::Bot,
            (_, Mark::X) => MoveActor::Host,
            (_, Mark::O) => MoveActor::Guest,
        };
        next.ledger.append(Move {
            actor,
            symbol: self.current_player,
            position: Position { row, col },
            move_number: self.ledger.len() as u32 + 1,
            timestamp: time::now_millis(),
        });

        if let Some(Win { winner, line }) = win::detect_win(&next.board) {
            next.status = GameStatus::Finished;
            next.winner = Some(winner);
            next.winning_line = Some(line);
        } else if next.board.is_full() {
            next.status = GameStatus::Draw;
        } else {
            next.current_player = self.current_player.other();
        }

        Ok(next)
    }

    /// A fresh game with the same board dimensions and mode
    pub fn restart(&self) -> Game {
        Game {
            board: self.board.cleared(),
            current_player: Mark::X,
            status: GameStatus::Playing,
            winner: None,
            winning_line: None,
            ledger: Ledger::new(),
            mode: self.mode,
            started_at: time::now_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: usize, col: usize) -> Position {
        Position { row, col }
    }

    fn play(game: Game, moves: &[(usize, usize)]) -> Game {
        moves
            .iter()
            .fold(game, |g, &(row, col)| g.apply_move(row, col).unwrap())
    }

    #[test]
    fn test_new_game() {
        let game = Game::new(3, 3, GameMode::VsHuman).unwrap();
        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.current_player(), Mark::X);
        assert_eq!(game.winner(), None);
        assert!(game.ledger().is_empty());
    }

    #[test]
    fn test_new_game_rejects_bad_dimensions() {
        assert!(matches!(
            Game::new(2, 3, GameMode::VsHuman),
            Err(GameError::InvalidDimension { .. })
        ));
        assert!(matches!(
            Game::new(3, 11, GameMode::VsBot),
            Err(GameError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_apply_move_alternates_turns() {
        let game = Game::new(3, 3, GameMode::VsHuman).unwrap();
        let game = game.apply_move(0, 0).unwrap();
        assert_eq!(game.current_player(), Mark::O);
        assert_eq!(game.board().get(0, 0).unwrap(), Some(Mark::X));

        let game = game.apply_move(1, 1).unwrap();
        assert_eq!(game.current_player(), Mark::X);
        assert_eq!(game.board().get(1, 1).unwrap(), Some(Mark::O));
    }

    #[test]
    fn test_apply_move_occupied_cell_leaves_game_unchanged() {
        let game = Game::new(3, 3, GameMode::VsHuman).unwrap();
        let game = game.apply_move(0, 0).unwrap();

        let before = game.clone();
        let result = game.apply_move(0, 0);
        assert_eq!(result, Err(GameError::CellOccupied { row: 0, col: 0 }));
        assert_eq!(game, before);
    }

    #[test]
    fn test_apply_move_out_of_bounds() {
        let game = Game::new(3, 3, GameMode::VsHuman).unwrap();
        assert_eq!(
            game.apply_move(3, 0),
            Err(GameError::OutOfBounds { row: 3, col: 0 })
        );
    }

    #[test]
    fn test_x_wins_top_row_scenario() {
        // X:(0,0) O:(1,1) X:(0,1) O:(2,2) X:(0,2)
        let game = Game::new(3, 3, GameMode::VsHuman).unwrap();
        let game = play(game, &[(0, 0), (1, 1), (0, 1), (2, 2), (0, 2)]);

        assert_eq!(game.status(), GameStatus::Finished);
        assert_eq!(game.winner(), Some(Mark::X));
        assert_eq!(
            game.winning_line().unwrap(),
            &[pos(0, 0), pos(0, 1), pos(0, 2)]
        );
        assert_eq!(game.ledger().len(), 5);
        // Turn does not flip past a terminal move
        assert_eq!(game.current_player(), Mark::X);
    }

    #[test]
    fn test_no_moves_after_finish() {
        let game = Game::new(3, 3, GameMode::VsHuman).unwrap();
        let game = play(game, &[(0, 0), (1, 1), (0, 1), (2, 2), (0, 2)]);

        assert_eq!(game.apply_move(2, 0), Err(GameError::GameNotPlaying));
    }

    #[test]
    fn test_full_board_without_run_is_a_draw() {
        // X O X / X O O / O X X, move by move, never forms a 3-run
        let game = Game::new(3, 3, GameMode::VsHuman).unwrap();
        let game = play(
            game,
            &[
                (0, 0),
                (0, 1),
                (0, 2),
                (1, 1),
                (1, 0),
                (1, 2),
                (2, 1),
                (2, 0),
                (2, 2),
            ],
        );

        assert_eq!(game.status(), GameStatus::Draw);
        assert_eq!(game.winner(), None);
        assert_eq!(game.winning_line(), None);
        assert!(game.board().is_full());
        assert_eq!(game.apply_move(0, 0), Err(GameError::GameNotPlaying));
    }

    #[test]
    fn test_move_numbers_increase_by_one() {
        let game = Game::new(3, 3, GameMode::VsHuman).unwrap();
        let game = play(game, &[(0, 0), (1, 1), (0, 1)]);

        let numbers: Vec<u32> = game.ledger().moves().iter().map(|m| m.move_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_actor_tagging_vs_human() {
        let game = Game::new(3, 3, GameMode::VsHuman).unwrap();
        let game = play(game, &[(0, 0), (1, 1)]);

        let moves = game.ledger().moves();
        assert_eq!(moves[0].actor, MoveActor::Host);
        assert_eq!(moves[0].symbol, Mark::X);
        assert_eq!(moves[1].actor, MoveActor::Guest);
        assert_eq!(moves[1].symbol, Mark::O);
    }

    #[test]
    fn test_actor_tagging_vs_bot() {
        let game = Game::new(3, 3, GameMode::VsBot).unwrap();
        let game = play(game, &[(0, 0), (1, 1)]);

        let moves = game.ledger().moves();
        assert_eq!(moves[0].actor, MoveActor::Host);
        assert_eq!(moves[1].actor, MoveActor::Bot);
        assert_eq!(moves[1].symbol, Mark::O);
    }

    #[test]
    fn test_restart_preserves_dimensions_and_mode() {
        let game = Game::new(4, 6, GameMode::VsBot).unwrap();
        let game = play(game, &[(0, 0), (1, 1), (2, 2)]);

        let fresh = game.restart();
        assert_eq!(fresh.board().rows(), 4);
        assert_eq!(fresh.board().cols(), 6);
        assert_eq!(fresh.mode(), GameMode::VsBot);
        assert_eq!(fresh.status(), GameStatus::Playing);
        assert_eq!(fresh.current_player(), Mark::X);
        assert!(fresh.ledger().is_empty());
        assert_eq!(fresh.board().get(0, 0).unwrap(), None);
    }

    #[test]
    fn test_transitions_leave_input_untouched() {
        let game = Game::new(3, 3, GameMode::VsHuman).unwrap();
        let _next = game.apply_move(1, 1).unwrap();

        assert!(game.ledger().is_empty());
        assert_eq!(game.board().get(1, 1).unwrap(), None);
        assert_eq!(game.current_player(), Mark::X);
    }

    #[test]
    fn test_win_on_wide_board() {
        // 3x10 board, win length 3: X stacks column 5
        let game = Game::new(3, 10, GameMode::VsHuman).unwrap();
        let game = play(game, &[(0, 5), (0, 0), (1, 5), (0, 1), (2, 5)]);

        assert_eq!(game.status(), GameStatus::Finished);
        assert_eq!(game.winner(), Some(Mark::X));
        assert_eq!(
            game.winning_line().unwrap(),
            &[pos(0, 5), pos(1, 5), pos(2, 5)]
        );
    }
}
