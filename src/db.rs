use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
  id TEXT PRIMARY KEY,
  username TEXT UNIQUE NOT NULL,
  password_hash TEXT NOT NULL,
  email TEXT UNIQUE NOT NULL,
  about_me TEXT,
  created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS rooms (
  id TEXT PRIMARY KEY,
  name TEXT NOT NULL,
  banner TEXT,
  join_code TEXT UNIQUE NOT NULL,
  creator_id TEXT NOT NULL REFERENCES users(id),
  created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS room_members (
  room_id TEXT NOT NULL REFERENCES rooms(id),
  user_id TEXT NOT NULL REFERENCES users(id),
  PRIMARY KEY (room_id, user_id)
);

CREATE TABLE IF NOT EXISTS messages (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  room_id TEXT NOT NULL REFERENCES rooms(id),
  sender_id TEXT NOT NULL REFERENCES users(id),
  body TEXT NOT NULL,
  created_at INTEGER NOT NULL
);
"#;

/// Open the pool and make sure the schema exists.
pub async fn connect(url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(16)
        .connect_with(options)
        .await?;
    sqlx::raw_sql(SCHEMA).execute(&pool).await?;
    Ok(pool)
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: String,
    pub about_me: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub banner: Option<String>,
    pub join_code: String,
    pub creator_id: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: i64,
    pub room_id: String,
    pub sender_id: String,
    pub body: String,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    async fn test_pool() -> SqlitePool {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        sqlx::raw_sql(SCHEMA).execute(&pool).await.unwrap();
        pool
    }

    async fn insert_user(pool: &SqlitePool, username: &str, email: &str) -> Result<String, sqlx::Error> {
        let id = Uuid::now_v7().to_string();
        sqlx::query("INSERT INTO users (id,username,password_hash,email,created_at) VALUES (?,?,'x',?,0)")
            .bind(&id)
            .bind(username)
            .bind(email)
            .execute(pool)
            .await?;
        Ok(id)
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let pool = test_pool().await;
        insert_user(&pool, "mario", "mario@example.com").await.unwrap();

        let err = insert_user(&pool, "mario", "other@example.com").await.unwrap_err();
        let sqlx::Error::Database(db_err) = err else {
            panic!("expected a database error, got {err:?}");
        };
        assert!(db_err.is_unique_violation());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let pool = test_pool().await;
        insert_user(&pool, "mario", "mario@example.com").await.unwrap();

        let err = insert_user(&pool, "luigi", "mario@example.com").await.unwrap_err();
        let sqlx::Error::Database(db_err) = err else {
            panic!("expected a database error, got {err:?}");
        };
        assert!(db_err.is_unique_violation());
    }

    #[tokio::test]
    async fn message_requires_existing_room_and_sender() {
        let pool = test_pool().await;
        let user_id = insert_user(&pool, "mario", "mario@example.com").await.unwrap();

        let err = sqlx::query("INSERT INTO messages (room_id,sender_id,body,created_at) VALUES (?,?,?,0)")
            .bind(Uuid::now_v7().to_string())
            .bind(&user_id)
            .bind("hello?")
            .execute(&pool)
            .await
            .unwrap_err();
        let sqlx::Error::Database(db_err) = err else {
            panic!("expected a database error, got {err:?}");
        };
        assert!(db_err.is_foreign_key_violation());
    }

    #[tokio::test]
    async fn membership_pairs_are_unique() {
        let pool = test_pool().await;
        let user_id = insert_user(&pool, "mario", "mario@example.com").await.unwrap();
        let room_id = Uuid::now_v7().to_string();
        sqlx::query("INSERT INTO rooms (id,name,join_code,creator_id,created_at) VALUES (?,?,?,?,0)")
            .bind(&room_id)
            .bind("lounge")
            .bind("abc123")
            .bind(&user_id)
            .execute(&pool)
            .await
            .unwrap();

        for _ in 0..2 {
            // second round must be a no-op, not an error
            sqlx::query("INSERT OR IGNORE INTO room_members (room_id,user_id) VALUES (?,?)")
                .bind(&room_id)
                .bind(&user_id)
                .execute(&pool)
                .await
                .unwrap();
        }

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM room_members")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
