use axum::{
    debug_handler,
    extract::{Path, State, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use sqlx::SqlitePool;
use tokio::sync::broadcast;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{AppResult, AppState, RoomEvent, session};

use super::msg;

#[debug_handler(state = AppState)]
pub(crate) async fn room_ws(
    Path(room_id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
    State(tx): State<broadcast::Sender<RoomEvent>>,
    session: Session,
    ws: WebSocketUpgrade,
) -> AppResult<Response> {
    let Some(user_id) = session::current_user(&session).await? else {
        return Ok(StatusCode::UNAUTHORIZED.into_response());
    };

    if !super::is_member(&db_pool, &room_id, &user_id).await? {
        return Ok(StatusCode::FORBIDDEN.into_response());
    }

    Ok(ws.on_upgrade(move |stream| async move {
        tracing::debug!(room = %room_id, user = %user_id, "socket open");
        let mut rx = tx.subscribe();
        let (mut sender, mut receiver) = stream.split();

        let forward_task = tokio::spawn(async move {
            while let Ok((id, html)) = rx.recv().await {
                if id != room_id {
                    continue;
                }
                if sender.send(html.into()).await.is_err() {
                    break;
                }
            }
        });

        while let Some(Ok(frame)) = receiver.next().await {
            let Ok(msg::SendMessage { body }) = serde_json::from_slice(&frame.into_data()) else {
                continue;
            };
            if body.trim().is_empty() {
                continue;
            }
            let _ = msg::send_msg(&db_pool, &tx, &user_id, room_id, &body).await;
        }

        forward_task.abort();
    }))
}
