use serde::Deserialize;
use sqlx::SqlitePool;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::{AppResult, RoomEvent, db::Message, include_res};

/// Body of a message, from the POST form or a websocket frame.
#[derive(Debug, Deserialize)]
pub(crate) struct SendMessage {
    pub(crate) body: String,
}

/// Persist a message, then fan its rendered HTML out to the room.
pub(crate) async fn send_msg(
    db_pool: &SqlitePool,
    tx: &broadcast::Sender<RoomEvent>,
    sender_id: &str,
    room_id: Uuid,
    body: &str,
) -> AppResult<()> {
    let created_at = OffsetDateTime::now_utc().unix_timestamp();
    let result =
        sqlx::query("INSERT INTO messages (room_id,sender_id,body,created_at) VALUES (?,?,?,?)")
            .bind(room_id.to_string())
            .bind(sender_id)
            .bind(body)
            .bind(created_at)
            .execute(db_pool)
            .await?;

    let msg = Message {
        id: result.last_insert_rowid(),
        room_id: room_id.to_string(),
        sender_id: sender_id.to_owned(),
        body: body.to_owned(),
        created_at,
    };
    tracing::debug!(room = %room_id, id = msg.id, "message stored");

    // no subscribers is fine
    let _ = tx.send((room_id, msg_to_html(db_pool, &msg).await?));

    Ok(())
}

pub(crate) async fn msg_to_html(db_pool: &SqlitePool, msg: &Message) -> AppResult<String> {
    let (username,): (String,) = sqlx::query_as("SELECT username FROM users WHERE id=?")
        .bind(&msg.sender_id)
        .fetch_optional(db_pool)
        .await?
        .unwrap_or(("Anonymous".to_owned(),));

    let mut body_html = String::new();
    pulldown_cmark::html::push_html(&mut body_html, pulldown_cmark::Parser::new(&msg.body));

    let sent_at = OffsetDateTime::from_unix_timestamp(msg.created_at)?.format(&Rfc3339)?;

    Ok(include_res!(str, "/pages/message.html")
        .replace("{id}", &msg.id.to_string())
        .replace("{username}", &username)
        .replace("{sent_at}", &sent_at)
        .replace("{body}", &body_html))
}
