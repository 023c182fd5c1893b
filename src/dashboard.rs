use axum::{debug_handler, extract::State, response::{Html, IntoResponse, Redirect, Response}};
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{AppResult, db::{Room, User}, include_res, res, session};

#[debug_handler]
pub async fn dashboard(
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    let Some(user_id) = session::current_user(&session).await? else {
        return Ok(Redirect::to("/login").into_response());
    };

    let user: User = sqlx::query_as("SELECT * FROM users WHERE id=?")
        .bind(&user_id)
        .fetch_one(&db_pool)
        .await?;

    let rooms: Vec<Room> = sqlx::query_as(
        "SELECT rooms.* FROM rooms \
         JOIN room_members ON room_members.room_id=rooms.id \
         WHERE room_members.user_id=? ORDER BY rooms.created_at",
    )
    .bind(&user_id)
    .fetch_all(&db_pool)
    .await?;

    let mut room_items = String::new();
    for room in rooms {
        room_items += &include_res!(str, "/pages/room_item.html")
            .replace("{id}", &room.id)
            .replace("{name}", &room.name);
    }

    let flash = session::take_flash(&session).await?;
    Ok(Html(
        include_res!(str, "/pages/dashboard.html")
            .replace("{username}", &user.username)
            .replace("{email}", &user.email)
            .replace("{about_me}", user.about_me.as_deref().unwrap_or(""))
            .replace("{room_items}", &room_items)
            .replace("{flash}", &res::flash_html(flash)),
    )
    .into_response())
}
