use axum::{
    Form, debug_handler,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use sqlx::SqlitePool;
use tokio::sync::broadcast;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{AppResult, AppState, RoomEvent, db, include_res, res, session};

use super::msg;

#[debug_handler]
pub(crate) async fn room(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Path(room_id): Path<Uuid>,
) -> AppResult<Response> {
    let sorry = res::sorry("room");

    let Some(user_id) = session::current_user(&session).await? else {
        return Ok(Redirect::to("/login").into_response());
    };

    let Some(room): Option<db::Room> = sqlx::query_as("SELECT * FROM rooms WHERE id=?")
        .bind(room_id.to_string())
        .fetch_optional(&db_pool)
        .await?
    else {
        return sorry;
    };

    // non-members get the same page as a missing room
    if !super::is_member(&db_pool, &room_id, &user_id).await? {
        return sorry;
    }

    let msgs: Vec<db::Message> =
        sqlx::query_as("SELECT * FROM messages WHERE room_id=? ORDER BY id")
            .bind(room_id.to_string())
            .fetch_all(&db_pool)
            .await?;

    let mut messages = String::new();
    for msg in &msgs {
        messages += &msg::msg_to_html(&db_pool, msg).await?;
    }

    let flash = session::take_flash(&session).await?;
    let body = include_res!(str, "/pages/room.html")
        .replace("{room_id}", &room.id)
        .replace("{room_name}", &room.name)
        .replace("{banner}", room.banner.as_deref().unwrap_or(""))
        .replace("{join_code}", &room.join_code)
        .replace("{messages}", &messages)
        .replace("{flash}", &res::flash_html(flash));

    Ok(Html(body).into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn post_message(
    State(db_pool): State<SqlitePool>,
    State(tx): State<broadcast::Sender<RoomEvent>>,
    session: Session,
    Path(room_id): Path<Uuid>,
    Form(msg::SendMessage { body }): Form<msg::SendMessage>,
) -> AppResult<Response> {
    let Some(user_id) = session::current_user(&session).await? else {
        return Ok(Redirect::to("/login").into_response());
    };

    if sqlx::query("SELECT 1 FROM rooms WHERE id=?")
        .bind(room_id.to_string())
        .fetch_optional(&db_pool)
        .await?
        .is_none()
        || !super::is_member(&db_pool, &room_id, &user_id).await?
    {
        return res::sorry("room");
    }

    if body.trim().is_empty() {
        session::flash(&session, "Message cannot be empty").await?;
    } else {
        msg::send_msg(&db_pool, &tx, &user_id, room_id, &body).await?;
    }

    Ok(Redirect::to(&format!("/message_room/{room_id}")).into_response())
}
