use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
};
use uuid::Uuid;

use quintris_common::api::*;
use quintris_common::GameError;

use crate::game_session::SessionError;
use crate::{auth, AppState};

/// Resolve the caller to a registry key. Authenticated users play under a
/// stable per-user key; anonymous callers identify their game with the
/// `x-game-key` header.
async fn session_key(state: &AppState, headers: &HeaderMap) -> Option<(String, Option<i64>)> {
    if let Some(user_id) = auth::optional_identity(&state.sessions, headers).await {
        return Some((format!("user:{user_id}"), Some(user_id)));
    }

    headers
        .get(HEADER_GAME_KEY)
        .and_then(|h| h.to_str().ok())
        .map(|key| (key.to_string(), None))
}

fn status_of(error: SessionError) -> StatusCode {
    match error {
        SessionError::NoActiveGame => StatusCode::NOT_FOUND,
        SessionError::AwaitingBot => StatusCode::CONFLICT,
        SessionError::Game(GameError::GameNotPlaying) => StatusCode::CONFLICT,
        SessionError::Game(_) => StatusCode::BAD_REQUEST,
    }
}

pub async fn start_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<StartGameRequest>,
) -> Result<Json<GameView>, StatusCode> {
    // Anonymous callers without a game key yet get a fresh one
    let (key, user_id) = match session_key(&state, &headers).await {
        Some(resolved) => resolved,
        None => (Uuid::new_v4().to_string(), None),
    };

    let (game, awaiting) = state
        .games
        .start_game(
            &key,
            request.board_rows,
            request.board_cols,
            request.mode,
            request.ai_difficulty,
            user_id,
        )
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?;

    let mut view = GameView::from_game(&game, awaiting);
    if user_id.is_none() {
        view.game_key = Some(key);
    }
    Ok(Json(view))
}

pub async fn get_game(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<GameView>, StatusCode> {
    let (key, _) = session_key(&state, &headers)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;

    let (game, awaiting) = state
        .games
        .snapshot(&key)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(GameView::from_game(&game, awaiting)))
}

pub async fn make_move(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<MoveRequest>,
) -> Result<Json<GameView>, StatusCode> {
    let (key, _) = session_key(&state, &headers)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;

    let (game, awaiting) = state
        .games
        .human_move(
            &key,
            request.row,
            request.col,
            state.db.clone(),
            state.games.clone(),
        )
        .await
        .map_err(status_of)?;

    Ok(Json(GameView::from_game(&game, awaiting)))
}

pub async fn restart_game(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<GameView>, StatusCode> {
    let (key, _) = session_key(&state, &headers)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;

    let (game, awaiting) = state.games.restart(&key).await.map_err(status_of)?;

    Ok(Json(GameView::from_game(&game, awaiting)))
}

pub async fn abandon_game(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    let (key, _) = session_key(&state, &headers)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;

    state
        .games
        .abandon(&key, state.db.clone())
        .await
        .map_err(status_of)?;

    Ok(StatusCode::OK)
}
