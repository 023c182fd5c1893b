use axum::{debug_handler, extract::State, response::{Html, IntoResponse, Redirect, Response}, Form};
use rand::{Rng, distr::Alphanumeric};
use serde::Deserialize;
use sqlx::SqlitePool;
use time::OffsetDateTime;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{AppResult, include_res, res, session};

#[derive(Debug, Deserialize)]
pub(crate) struct NewRoomForm {
    name: String,
    banner: Option<String>,
}

/// Shareable code other users paste into /join.
pub(crate) fn join_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(char::from)
        .collect()
}

#[debug_handler]
pub(crate) async fn create_room_page(session: Session) -> AppResult<Response> {
    if session::current_user(&session).await?.is_none() {
        return Ok(Redirect::to("/login").into_response());
    }

    let flash = session::take_flash(&session).await?;
    Ok(Html(
        include_res!(str, "/pages/create_room.html").replace("{flash}", &res::flash_html(flash)),
    )
    .into_response())
}

#[debug_handler]
pub(crate) async fn create_room(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(NewRoomForm { name, banner }): Form<NewRoomForm>,
) -> AppResult<Response> {
    let Some(user_id) = session::current_user(&session).await? else {
        return Ok(Redirect::to("/login").into_response());
    };

    let name = name.trim();
    if name.is_empty() {
        session::flash(&session, "Room name is required").await?;
        return Ok(Redirect::to("/create").into_response());
    }

    let room_id = Uuid::now_v7();
    let code = join_code();
    sqlx::query(
        "INSERT INTO rooms (id,name,banner,join_code,creator_id,created_at) VALUES (?,?,?,?,?,?)",
    )
    .bind(room_id.to_string())
    .bind(name)
    .bind(banner.as_deref().map(str::trim).filter(|s| !s.is_empty()))
    .bind(&code)
    .bind(&user_id)
    .bind(OffsetDateTime::now_utc().unix_timestamp())
    .execute(&db_pool)
    .await?;

    // the creator is a member from the start
    sqlx::query("INSERT INTO room_members (room_id,user_id) VALUES (?,?)")
        .bind(room_id.to_string())
        .bind(&user_id)
        .execute(&db_pool)
        .await?;

    tracing::info!(room = %room_id, %name, "created room");
    Ok(Redirect::to(&format!("/message_room/{room_id}")).into_response())
}
