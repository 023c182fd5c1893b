mod join;
mod msg;
mod new;
mod room;
mod ws;

use axum::{Router, routing::get};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{AppResult, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", get(new::create_room_page).post(new::create_room))
        .route("/join", get(join::join_page).post(join::join_room))
        .route("/message_room/{id}", get(room::room).post(room::post_message))
        .route("/message_room/{id}/ws", get(ws::room_ws))
}

pub(crate) async fn is_member(
    db_pool: &SqlitePool,
    room_id: &Uuid,
    user_id: &str,
) -> AppResult<bool> {
    Ok(sqlx::query("SELECT 1 FROM room_members WHERE room_id=? AND user_id=?")
        .bind(room_id.to_string())
        .bind(user_id)
        .fetch_optional(db_pool)
        .await?
        .is_some())
}
