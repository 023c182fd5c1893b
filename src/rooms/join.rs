use axum::{debug_handler, extract::State, response::{Html, IntoResponse, Redirect, Response}, Form};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{AppResult, include_res, res, session};

#[derive(Debug, Deserialize)]
pub(crate) struct JoinForm {
    room: String,
}

#[debug_handler]
pub(crate) async fn join_page(session: Session) -> AppResult<Response> {
    if session::current_user(&session).await?.is_none() {
        return Ok(Redirect::to("/login").into_response());
    }

    let flash = session::take_flash(&session).await?;
    Ok(Html(
        include_res!(str, "/pages/join_room.html").replace("{flash}", &res::flash_html(flash)),
    )
    .into_response())
}

#[debug_handler]
pub(crate) async fn join_room(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(JoinForm { room }): Form<JoinForm>,
) -> AppResult<Response> {
    let Some(user_id) = session::current_user(&session).await? else {
        return Ok(Redirect::to("/login").into_response());
    };

    let room = room.trim();
    let mut found: Option<(String,)> = sqlx::query_as("SELECT id FROM rooms WHERE join_code=?")
        .bind(room)
        .fetch_optional(&db_pool)
        .await?;
    if found.is_none() {
        // the share code is the usual way in, but a plain room name works too
        found = sqlx::query_as("SELECT id FROM rooms WHERE name=? LIMIT 1")
            .bind(room)
            .fetch_optional(&db_pool)
            .await?;
    }

    let Some((room_id,)) = found else {
        session::flash(&session, "No such room").await?;
        return Ok(Redirect::to("/join").into_response());
    };

    // rejoining is a no-op
    sqlx::query("INSERT OR IGNORE INTO room_members (room_id,user_id) VALUES (?,?)")
        .bind(&room_id)
        .bind(&user_id)
        .execute(&db_pool)
        .await?;

    tracing::info!(room = %room_id, user = %user_id, "joined room");
    Ok(Redirect::to(&format!("/message_room/{room_id}")).into_response())
}
