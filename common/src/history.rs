use serde::{Deserialize, Serialize};

use crate::board::Mark;
use crate::bot::Difficulty;
use crate::game::{Game, GameStatus};
use crate::ledger::Move;

/// Board and bot configuration a game was played under, plus its duration
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameSetting {
    pub board_rows: usize,
    pub board_cols: usize,
    pub ai_difficulty: Difficulty,
    pub duration_seconds: i64,
}

/// How a recorded game ended. `Abandoned` marks a game discarded mid-play
/// with its partial ledger still saved.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Finished,
    Draw,
    Abandoned,
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordStatus::Finished => write!(f, "finished"),
            RecordStatus::Draw => write!(f, "draw"),
            RecordStatus::Abandoned => write!(f, "abandoned"),
        }
    }
}

impl RecordStatus {
    pub fn from_string(s: &str) -> Option<RecordStatus> {
        match s {
            "finished" => Some(RecordStatus::Finished),
            "draw" => Some(RecordStatus::Draw),
            "abandoned" => Some(RecordStatus::Abandoned),
            _ => None,
        }
    }
}

/// The payload handed to persistence when a game concludes. The core
/// builds it once at game end and never mutates it afterwards.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPayload {
    pub game_status: RecordStatus,
    pub winner: Option<Mark>,
    pub game_setting: GameSetting,
    pub moves: Vec<Move>,
}

impl HistoryPayload {
    /// Build the save payload for a game that reached a terminal status.
    /// Returns `None` while the game is still in progress.
    pub fn from_finished_game(game: &Game, difficulty: Difficulty) -> Option<HistoryPayload> {
        let game_status = match game.status() {
            GameStatus::Playing => return None,
            GameStatus::Finished => RecordStatus::Finished,
            GameStatus::Draw => RecordStatus::Draw,
        };
        Some(HistoryPayload {
            game_status,
            winner: game.winner(),
            game_setting: Self::setting_of(game, difficulty),
            moves: game.ledger().moves().to_vec(),
        })
    }

    /// Build the save payload for a game abandoned mid-play
    pub fn from_abandoned_game(game: &Game, difficulty: Difficulty) -> HistoryPayload {
        HistoryPayload {
            game_status: RecordStatus::Abandoned,
            winner: None,
            game_setting: Self::setting_of(game, difficulty),
            moves: game.ledger().moves().to_vec(),
        }
    }

    fn setting_of(game: &Game, difficulty: Difficulty) -> GameSetting {
        GameSetting {
            board_rows: game.board().rows(),
            board_cols: game.board().cols(),
            ai_difficulty: difficulty,
            duration_seconds: game.elapsed_secs(),
        }
    }
}

/// A stored game, as returned by persistence. Immutable once finalized;
/// consumed read-only by replay.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: i64,
    pub game_status: RecordStatus,
    pub winner: Option<Mark>,
    pub game_setting: GameSetting,
    pub moves: Vec<Move>,
    pub created_at: i64,
    pub updated_at: i64,
}
