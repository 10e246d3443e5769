use quintris_common::api::UserInfo;
use quintris_common::{GameSetting, HistoryPayload, HistoryRecord, Mark, Move, RecordStatus};

use crate::database::{Database, HistoryRow, UserRecord};

pub async fn fetch_user(database: &Database, user_id: i64) -> Option<UserInfo> {
    database
        .get_user_by_id(user_id)
        .await
        .map(|record| record.to_user_info())
}

/// Persist a finalized game once. Failures are reported to the caller and
/// logged; the live game state is never rolled back over them.
pub async fn save_history(
    database: &Database,
    user_id: i64,
    payload: &HistoryPayload,
) -> Result<i64, sqlx::Error> {
    let game_setting = serde_json::to_string(&payload.game_setting).unwrap_or_default();
    let moves = serde_json::to_string(&payload.moves).unwrap_or_else(|_| "[]".to_string());

    database
        .insert_history(
            user_id,
            &payload.game_status.to_string(),
            payload.winner.map(|w| w.to_string()).as_deref(),
            &game_setting,
            &moves,
        )
        .await
}

impl UserRecord {
    pub fn to_user_info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

impl HistoryRow {
    /// Decode the JSON columns into the shared record type. Returns `None`
    /// when a stored row is unreadable rather than failing the whole list.
    pub fn to_record(&self) -> Option<HistoryRecord> {
        let game_status = RecordStatus::from_string(&self.game_status)?;
        let winner = match &self.winner {
            Some(symbol) => Some(Mark::from_string(symbol)?),
            None => None,
        };
        let game_setting: GameSetting = serde_json::from_str(&self.game_setting).ok()?;
        let moves: Vec<Move> = serde_json::from_str(&self.moves).ok()?;

        Some(HistoryRecord {
            id: self.id,
            game_status,
            winner,
            game_setting,
            moves,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quintris_common::{Difficulty, Game, GameMode};
    use sqlx::SqlitePool;

    async fn create_test_db() -> Database {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        let db = Database::from_pool(pool);
        db.initialize().await.unwrap();
        db
    }

    fn finished_payload() -> HistoryPayload {
        let game = Game::new(3, 3, GameMode::VsBot).unwrap();
        let game = [(0, 0), (1, 1), (0, 1), (2, 2), (0, 2)]
            .iter()
            .fold(game, |g, &(row, col)| g.apply_move(row, col).unwrap());
        HistoryPayload::from_finished_game(&game, Difficulty::Medium).unwrap()
    }

    #[tokio::test]
    async fn test_save_and_decode_round_trip() {
        let db = create_test_db().await;
        let user = db
            .create_user("erin", "erin@example.com", "hash", "salt")
            .await
            .unwrap();

        let payload = finished_payload();
        let id = save_history(&db, user, &payload).await.unwrap();

        let row = db.get_history_by_id(id).await.unwrap();
        let record = row.to_record().unwrap();

        assert_eq!(record.id, id);
        assert_eq!(record.game_status, RecordStatus::Finished);
        assert_eq!(record.winner, Some(Mark::X));
        assert_eq!(record.moves.len(), 5);
        assert_eq!(record.game_setting.board_rows, 3);
    }

    #[tokio::test]
    async fn test_unreadable_row_is_skipped() {
        let row = HistoryRow {
            id: 1,
            user_id: 1,
            game_status: "finished".to_string(),
            winner: Some("Z".to_string()),
            game_setting: "{}".to_string(),
            moves: "[]".to_string(),
            created_at: 0,
            updated_at: 0,
        };
        assert!(row.to_record().is_none());
    }
}
