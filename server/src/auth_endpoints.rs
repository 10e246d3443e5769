use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
};

use quintris_common::api::*;

use crate::{auth, repository, AppState};

pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> Result<Json<AuthResponse>, StatusCode> {
    let username = request.username.trim();
    let email = request.email.trim();
    if username.is_empty() || email.is_empty() || request.password.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let salt = auth::generate_salt();
    let password_hash = auth::hash_password(&request.password, &salt);

    // None covers duplicate usernames/emails as well, the unique
    // constraints reject the insert
    let user_id = state
        .db
        .create_user(username, email, &password_hash, &salt)
        .await
        .ok_or(StatusCode::BAD_REQUEST)?;

    let user = repository::fetch_user(&state.db, user_id)
        .await
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

    let session_token = state.sessions.create_session(user_id).await;
    println!("User '{username}' signed up with ID: {user_id}");

    Ok(Json(AuthResponse {
        session_token,
        user,
    }))
}

pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<AuthResponse>, StatusCode> {
    let record = state
        .db
        .get_user_by_username(request.username.trim())
        .await
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !auth::verify_password(&request.password, &record.salt, &record.password_hash) {
        println!("Password verification failed for user {}", record.id);
        return Err(StatusCode::UNAUTHORIZED);
    }

    let session_token = state.sessions.create_session(record.id).await;

    Ok(Json(AuthResponse {
        session_token,
        user: record.to_user_info(),
    }))
}

pub async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    let token = auth::bearer_token(&headers).ok_or(StatusCode::UNAUTHORIZED)?;
    state.sessions.revoke_session(token).await;
    Ok(StatusCode::OK)
}

pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserInfo>, StatusCode> {
    let user_id = auth::authenticate_request(&state.sessions, &headers).await?;
    let user = repository::fetch_user(&state.db, user_id)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(user))
}
