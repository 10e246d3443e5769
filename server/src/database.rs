use sqlx::{FromRow, SqlitePool};

use quintris_common::time;

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

#[derive(Debug, FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub salt: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One stored game, JSON columns still serialized
#[derive(Debug, FromRow)]
pub struct HistoryRow {
    pub id: i64,
    pub user_id: i64,
    pub game_status: String,
    pub winner: Option<String>,
    pub game_setting: String,
    pub moves: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Database {
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Database { pool }
    }

    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        if let Some(file_path) = database_url.strip_prefix("sqlite://") {
            if !std::path::Path::new(file_path).exists() {
                std::fs::File::create(file_path).map_err(sqlx::Error::Io)?;
            }
        }

        let pool = SqlitePool::connect(database_url).await?;
        Ok(Database { pool })
    }

    pub async fn initialize(&self) -> Result<(), sqlx::Error> {
        // Run migrations from the migrations directory
        sqlx::migrate!("../migrations").run(&self.pool).await?;
        Ok(())
    }

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        salt: &str,
    ) -> Option<i64> {
        let now = time::now_millis();
        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash, salt, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(salt)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(result) => {
                let user_id = result.last_insert_rowid();
                println!("DB: User '{username}' inserted with ID: {user_id}");
                Some(user_id)
            }
            Err(e) => {
                println!("DB: Error during user insert: {e:#?}");
                None
            }
        }
    }

    pub async fn get_user_by_id(&self, id: i64) -> Option<UserRecord> {
        sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .ok()
            .flatten()
    }

    pub async fn get_user_by_username(&self, username: &str) -> Option<UserRecord> {
        sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .ok()
            .flatten()
    }

    // History operations. Rows are inserted once at game end and never
    // updated afterwards.

    pub async fn insert_history(
        &self,
        user_id: i64,
        game_status: &str,
        winner: Option<&str>,
        game_setting: &str,
        moves: &str,
    ) -> Result<i64, sqlx::Error> {
        let now = time::now_millis();
        let result = sqlx::query(
            "INSERT INTO histories (user_id, game_status, winner, game_setting, moves, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(game_status)
        .bind(winner)
        .bind(game_setting)
        .bind(moves)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn get_histories_for_user(&self, user_id: i64) -> Vec<HistoryRow> {
        sqlx::query_as::<_, HistoryRow>(
            "SELECT * FROM histories WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default()
    }

    pub async fn get_history_by_id(&self, history_id: i64) -> Option<HistoryRow> {
        sqlx::query_as::<_, HistoryRow>("SELECT * FROM histories WHERE id = ?")
            .bind(history_id)
            .fetch_optional(&self.pool)
            .await
            .ok()
            .flatten()
    }
}
