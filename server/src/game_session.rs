use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::AbortHandle;
use tokio::time::{sleep, Duration};

use quintris_common::{
    strategy_for, BotStrategy, Difficulty, Game, GameError, GameMode, GameStatus, HistoryPayload,
    Mark,
};

use crate::database::Database;
use crate::repository;

/// Fixed "thinking" pause before a scheduled bot reply lands
pub const BOT_REPLY_DELAY_MS: u64 = 600;

#[derive(Debug, PartialEq)]
pub enum SessionError {
    NoActiveGame,
    AwaitingBot,
    Game(GameError),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::NoActiveGame => write!(f, "No active game for this session"),
            SessionError::AwaitingBot => write!(f, "A bot reply is still pending"),
            SessionError::Game(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<GameError> for SessionError {
    fn from(e: GameError) -> SessionError {
        SessionError::Game(e)
    }
}

/// One live game plus the session-scoped machinery around it
struct LiveGame {
    game: Game,
    difficulty: Difficulty,
    bot: Box<dyn BotStrategy>,
    /// Bumped whenever the game under this key is replaced; a bot reply
    /// carrying a stale generation is dropped on arrival
    generation: u64,
    bot_task: Option<AbortHandle>,
    user_id: Option<i64>,
}

/// True exactly while a scheduled bot reply is outstanding
fn awaiting_bot(live: &LiveGame) -> bool {
    live.game.mode() == GameMode::VsBot
        && live.game.status() == GameStatus::Playing
        && live.game.current_player() == Mark::O
}

/// Registry of live games keyed by session key ("user:{id}" for
/// authenticated players, a generated game key for anonymous ones)
pub struct GameRegistry {
    sessions: RwLock<HashMap<String, LiveGame>>,
}

pub type SharedGameRegistry = Arc<GameRegistry>;

impl GameRegistry {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a fresh game under `key`, replacing any game already there.
    /// A pending bot reply for the replaced game is cancelled.
    pub async fn start_game(
        &self,
        key: &str,
        rows: usize,
        cols: usize,
        mode: GameMode,
        difficulty: Difficulty,
        user_id: Option<i64>,
    ) -> Result<(Game, bool), GameError> {
        let game = Game::new(rows, cols, mode)?;

        let mut sessions = self.sessions.write().await;
        let generation = match sessions.remove(key) {
            Some(mut previous) => {
                if let Some(handle) = previous.bot_task.take() {
                    handle.abort();
                }
                previous.generation + 1
            }
            None => 0,
        };
        sessions.insert(
            key.to_string(),
            LiveGame {
                game: game.clone(),
                difficulty,
                bot: strategy_for(difficulty),
                generation,
                bot_task: None,
                user_id,
            },
        );
        println!("Game {key}: started {rows}x{cols} ({mode:?})");

        Ok((game, false))
    }

    pub async fn snapshot(&self, key: &str) -> Option<(Game, bool)> {
        let sessions = self.sessions.read().await;
        sessions.get(key).map(|live| (live.game.clone(), awaiting_bot(live)))
    }

    /// Apply a human move. In vs-bot games a reply task is scheduled after
    /// the move; further human moves are rejected until it lands. Terminal
    /// games belonging to an authenticated user are saved before returning.
    pub async fn human_move(
        &self,
        key: &str,
        row: usize,
        col: usize,
        db: Arc<Database>,
        registry: SharedGameRegistry,
    ) -> Result<(Game, bool), SessionError> {
        let (result, pending_save) = {
            let mut sessions = self.sessions.write().await;
            let live = sessions.get_mut(key).ok_or(SessionError::NoActiveGame)?;

            if awaiting_bot(live) {
                return Err(SessionError::AwaitingBot);
            }

            live.game = live.game.apply_move(row, col)?;

            let mut pending_save = None;
            if live.game.status() == GameStatus::Playing {
                if awaiting_bot(live) {
                    schedule_bot_reply(live, key, db.clone(), registry);
                }
            } else if let Some(user_id) = live.user_id {
                pending_save = HistoryPayload::from_finished_game(&live.game, live.difficulty)
                    .map(|payload| (user_id, payload));
            }

            ((live.game.clone(), awaiting_bot(live)), pending_save)
        };

        if let Some((user_id, payload)) = pending_save {
            persist(&db, user_id, &payload).await;
        }

        Ok(result)
    }

    /// Reset the game under `key` to an empty board with the same
    /// dimensions and mode. Cancels any pending bot reply.
    pub async fn restart(&self, key: &str) -> Result<(Game, bool), SessionError> {
        let mut sessions = self.sessions.write().await;
        let live = sessions.get_mut(key).ok_or(SessionError::NoActiveGame)?;

        if let Some(handle) = live.bot_task.take() {
            handle.abort();
        }
        live.generation += 1;
        live.game = live.game.restart();
        println!("Game {key}: restarted");

        Ok((live.game.clone(), false))
    }

    /// Drop the game under `key`. An in-progress game with moves on the
    /// ledger is saved as abandoned when it belongs to a user.
    pub async fn abandon(&self, key: &str, db: Arc<Database>) -> Result<(), SessionError> {
        let pending_save = {
            let mut sessions = self.sessions.write().await;
            let mut live = sessions.remove(key).ok_or(SessionError::NoActiveGame)?;

            if let Some(handle) = live.bot_task.take() {
                handle.abort();
            }
            println!("Game {key}: abandoned");

            match live.user_id {
                Some(user_id)
                    if live.game.status() == GameStatus::Playing
                        && !live.game.ledger().is_empty() =>
                {
                    Some((
                        user_id,
                        HistoryPayload::from_abandoned_game(&live.game, live.difficulty),
                    ))
                }
                _ => None,
            }
        };

        if let Some((user_id, payload)) = pending_save {
            persist(&db, user_id, &payload).await;
        }

        Ok(())
    }

    /// Landing point of a scheduled bot reply. Dropped silently when the
    /// game was replaced, restarted or abandoned in the meantime.
    async fn resolve_bot_reply(&self, key: &str, generation: u64, db: Arc<Database>) {
        let pending_save = {
            let mut sessions = self.sessions.write().await;
            let Some(live) = sessions.get_mut(key) else {
                return;
            };
            if live.generation != generation || !awaiting_bot(live) {
                return;
            }

            let legal = live.game.board().legal_positions();
            if legal.is_empty() {
                return;
            }
            let pick = live.bot.select_move(live.game.board(), &legal);

            match live.game.apply_move(pick.row, pick.col) {
                Ok(next) => live.game = next,
                Err(e) => {
                    println!("Game {key}: bot reply rejected: {e}");
                    return;
                }
            }
            live.bot_task = None;

            match live.user_id {
                Some(user_id) if live.game.status() != GameStatus::Playing => {
                    HistoryPayload::from_finished_game(&live.game, live.difficulty)
                        .map(|payload| (user_id, payload))
                }
                _ => None,
            }
        };

        if let Some((user_id, payload)) = pending_save {
            persist(&db, user_id, &payload).await;
        }
    }
}

/// Abort any previous reply task for this game and arm a fresh one
fn schedule_bot_reply(
    live: &mut LiveGame,
    key: &str,
    db: Arc<Database>,
    registry: SharedGameRegistry,
) {
    if let Some(handle) = live.bot_task.take() {
        handle.abort();
    }

    let generation = live.generation;
    let key = key.to_string();
    let task = tokio::spawn(async move {
        sleep(Duration::from_millis(BOT_REPLY_DELAY_MS)).await;
        registry.resolve_bot_reply(&key, generation, db).await;
    });
    live.bot_task = Some(task.abort_handle());
}

/// Save failures are logged but never fail the request that triggered them
async fn persist(db: &Database, user_id: i64, payload: &HistoryPayload) {
    match repository::save_history(db, user_id, payload).await {
        Ok(id) => println!("Saved history {id} for user {user_id}"),
        Err(e) => println!("Failed to save history for user {user_id}: {e:#?}"),
    }
}
