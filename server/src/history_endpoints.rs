use axum::{
    extract::{Json, Path, State},
    http::{HeaderMap, StatusCode},
};

use quintris_common::replay::reconstruct_at;
use quintris_common::{HistoryPayload, HistoryRecord, Ledger};

use crate::{auth, repository, AppState};

pub async fn list_histories(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<HistoryRecord>>, StatusCode> {
    let user_id = auth::authenticate_request(&state.sessions, &headers).await?;

    let records = state
        .db
        .get_histories_for_user(user_id)
        .await
        .iter()
        .filter_map(|row| row.to_record())
        .collect();

    Ok(Json(records))
}

/// Direct save path for clients that ran the game locally
pub async fn save_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<HistoryPayload>,
) -> Result<Json<HistoryRecord>, StatusCode> {
    let user_id = auth::authenticate_request(&state.sessions, &headers).await?;

    // Replaying the submitted moves checks dimensions, bounds and
    // duplicate cells in one pass
    let setting = &payload.game_setting;
    let ledger = Ledger::from(payload.moves.clone());
    reconstruct_at(&ledger, setting.board_rows, setting.board_cols, ledger.len())
        .map_err(|_| StatusCode::BAD_REQUEST)?;

    let id = repository::save_history(&state.db, user_id, &payload)
        .await
        .map_err(|e| {
            println!("Failed to save history for user {user_id}: {e:#?}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let record = state
        .db
        .get_history_by_id(id)
        .await
        .and_then(|row| row.to_record())
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(record))
}

pub async fn get_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(history_id): Path<i64>,
) -> Result<Json<HistoryRecord>, StatusCode> {
    let user_id = auth::authenticate_request(&state.sessions, &headers).await?;

    let row = state
        .db
        .get_history_by_id(history_id)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;

    if row.user_id != user_id {
        return Err(StatusCode::FORBIDDEN);
    }

    let record = row.to_record().ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::game_session::GameRegistry;
    use crate::session_cache::SessionCache;
    use crate::AppState;
    use axum::http::HeaderMap;
    use quintris_common::api::HEADER_AUTH;
    use quintris_common::{Difficulty, Game, GameMode, Position, RecordStatus};
    use sqlx::SqlitePool;
    use std::sync::Arc;

    async fn test_state() -> AppState {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        let db = Database::from_pool(pool);
        db.initialize().await.unwrap();
        AppState {
            db: Arc::new(db),
            sessions: Arc::new(SessionCache::new()),
            games: Arc::new(GameRegistry::new()),
        }
    }

    async fn signed_in_headers(state: &AppState) -> (HeaderMap, i64) {
        let user = state
            .db
            .create_user("gail", "gail@example.com", "hash", "salt")
            .await
            .unwrap();
        let token = state.sessions.create_session(user).await;

        let mut headers = HeaderMap::new();
        headers.insert(HEADER_AUTH, format!("Bearer {token}").parse().unwrap());
        (headers, user)
    }

    fn abandoned_payload(moves: &[(usize, usize)]) -> HistoryPayload {
        let game = Game::new(3, 3, GameMode::VsHuman).unwrap();
        let game = moves
            .iter()
            .fold(game, |g, &(row, col)| g.apply_move(row, col).unwrap());
        HistoryPayload::from_abandoned_game(&game, Difficulty::Medium)
    }

    #[tokio::test]
    async fn test_save_accepts_valid_payload() {
        let state = test_state().await;
        let (headers, user) = signed_in_headers(&state).await;

        let payload = abandoned_payload(&[(0, 0), (1, 1)]);
        let record = save_history(State(state.clone()), headers, Json(payload))
            .await
            .unwrap();

        assert_eq!(record.game_status, RecordStatus::Abandoned);
        assert_eq!(record.moves.len(), 2);
        assert_eq!(state.db.get_histories_for_user(user).await.len(), 1);
    }

    #[tokio::test]
    async fn test_save_rejects_out_of_bounds_move() {
        let state = test_state().await;
        let (headers, user) = signed_in_headers(&state).await;

        let mut payload = abandoned_payload(&[(0, 0)]);
        payload.moves[0].position = Position { row: 7, col: 0 };

        let result = save_history(State(state.clone()), headers, Json(payload)).await;
        assert_eq!(result.err(), Some(StatusCode::BAD_REQUEST));
        assert!(state.db.get_histories_for_user(user).await.is_empty());
    }

    #[tokio::test]
    async fn test_save_rejects_duplicate_cell() {
        let state = test_state().await;
        let (headers, user) = signed_in_headers(&state).await;

        let mut payload = abandoned_payload(&[(0, 0), (1, 1)]);
        payload.moves[1].position = Position { row: 0, col: 0 };

        let result = save_history(State(state.clone()), headers, Json(payload)).await;
        assert_eq!(result.err(), Some(StatusCode::BAD_REQUEST));
        assert!(state.db.get_histories_for_user(user).await.is_empty());
    }

    #[tokio::test]
    async fn test_save_rejects_bad_dimensions() {
        let state = test_state().await;
        let (headers, _) = signed_in_headers(&state).await;

        let mut payload = abandoned_payload(&[(0, 0)]);
        payload.game_setting.board_rows = 2;

        let result = save_history(State(state), headers, Json(payload)).await;
        assert_eq!(result.err(), Some(StatusCode::BAD_REQUEST));
    }
}
