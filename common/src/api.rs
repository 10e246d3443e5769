use serde::{Deserialize, Serialize};

use crate::board::{Mark, Position};
use crate::bot::Difficulty;
use crate::game::{Game, GameMode, GameStatus};
use crate::ledger::Move;

pub const HEADER_AUTH: &str = "authorization";
/// Identifies an anonymous live game across requests
pub const HEADER_GAME_KEY: &str = "x-game-key";

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SignInRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AuthResponse {
    pub session_token: String,
    pub user: UserInfo,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StartGameRequest {
    pub board_rows: usize,
    pub board_cols: usize,
    pub mode: GameMode,
    #[serde(default)]
    pub ai_difficulty: Difficulty,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MoveRequest {
    pub row: usize,
    pub col: usize,
}

/// Snapshot of a live game sent to clients
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub board_rows: usize,
    pub board_cols: usize,
    pub board: Vec<Vec<Option<Mark>>>,
    pub current_player: Mark,
    pub status: GameStatus,
    pub winner: Option<Mark>,
    pub winning_line: Option<Vec<Position>>,
    pub moves: Vec<Move>,
    pub mode: GameMode,
    /// True while a scheduled bot reply is outstanding; input should stay
    /// disabled until the next snapshot
    pub awaiting_bot: bool,
    /// Set on the first snapshot of an anonymous game; clients echo it in
    /// the `x-game-key` header on subsequent requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_key: Option<String>,
}

impl GameView {
    pub fn from_game(game: &Game, awaiting_bot: bool) -> GameView {
        GameView {
            board_rows: game.board().rows(),
            board_cols: game.board().cols(),
            board: game.board().grid(),
            current_player: game.current_player(),
            status: game.status(),
            winner: game.winner(),
            winning_line: game.winning_line().map(|line| line.to_vec()),
            moves: game.ledger().moves().to_vec(),
            mode: game.mode(),
            awaiting_bot,
            game_key: None,
        }
    }
}
