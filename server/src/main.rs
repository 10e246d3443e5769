use axum::{
    http::Method,
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::cors::{Any, CorsLayer};

mod auth;
mod auth_endpoints;
mod database;
mod game_endpoints;
mod game_session;
mod history_endpoints;
mod log_requests;
mod rate_limit;
mod repository;
mod session_cache;

use database::Database;
use game_session::{GameRegistry, SharedGameRegistry};
use log_requests::log_request_middleware;
use session_cache::SessionCache;

const DATABASE_URL: &str = "sqlite://quintris.db";

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub sessions: Arc<SessionCache>,
    pub games: SharedGameRegistry,
}

fn server_addr() -> String {
    std::env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string())
}

#[tokio::main]
async fn main() {
    println!("Quintris server starting...");

    dotenvy::dotenv().ok();

    let db = Database::new(DATABASE_URL)
        .await
        .expect("Failed to connect to database");
    db.initialize()
        .await
        .expect("Failed to initialize database schema");
    println!("Database initialized successfully");

    let state = AppState {
        db: Arc::new(db),
        sessions: Arc::new(SessionCache::new()),
        games: Arc::new(GameRegistry::new()),
    };

    // Expired session tokens are swept in the background
    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(tokio::time::Duration::from_secs(3600)).await;
            sessions.cleanup_expired().await;
        }
    });

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any)
        .allow_origin(Any);

    let api_routes = Router::new()
        .route("/api/auth/sign-up", post(auth_endpoints::sign_up))
        .route("/api/auth/sign-in", post(auth_endpoints::sign_in))
        .route("/api/auth/sign-out", post(auth_endpoints::sign_out))
        .route("/api/auth/me", get(auth_endpoints::me))
        .route("/api/history", get(history_endpoints::list_histories))
        .route("/api/history", post(history_endpoints::save_history))
        .route("/api/history/:id", get(history_endpoints::get_history))
        .route("/api/game", post(game_endpoints::start_game))
        .route("/api/game", get(game_endpoints::get_game))
        .route("/api/game", delete(game_endpoints::abandon_game))
        .route("/api/game/move", post(game_endpoints::make_move))
        .route("/api/game/restart", post(game_endpoints::restart_game))
        .layer(rate_limit::create_rate_limiter())
        .with_state(state.clone());

    let app = Router::new()
        .merge(api_routes)
        .layer(cors)
        .layer(middleware::from_fn(log_request_middleware))
        .with_state(state);

    let addr = server_addr();

    // TLS when certificates are configured, plain HTTP otherwise
    let ssl_cert_path = std::env::var("SSL_CERT_PATH").ok();
    let ssl_key_path = std::env::var("SSL_KEY_PATH").ok();

    match (ssl_cert_path, ssl_key_path) {
        (Some(cert_path), Some(key_path)) => {
            let config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                PathBuf::from(&cert_path),
                PathBuf::from(&key_path),
            )
            .await
            .expect("Failed to load SSL certificates");

            println!("HTTPS server running on {addr}");
            axum_server::bind_rustls(addr.parse().expect("Invalid server address"), config)
                .serve(app.into_make_service_with_connect_info::<SocketAddr>())
                .await
                .expect("Server error");
        }
        _ => {
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .expect("Failed to bind server address");
            println!("Server running on {addr}");
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("Server error");
        }
    }
}
