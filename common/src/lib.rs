mod error;

pub mod api;
pub mod board;
pub mod bot;
pub mod game;
pub mod history;
pub mod ledger;
pub mod replay;
pub mod utils;
pub mod win;

pub use board::{Board, Mark, Position};
pub use bot::{strategy_for, BotStrategy, Difficulty, RandomBot};
pub use error::GameError;
pub use game::{Game, GameMode, GameStatus};
pub use history::{GameSetting, HistoryPayload, HistoryRecord, RecordStatus};
pub use ledger::{Ledger, Move, MoveActor};
pub use replay::Replay;
pub use utils::time;
pub use win::{detect_win, Win};
