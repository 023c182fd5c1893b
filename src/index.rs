use axum::{debug_handler, response::{Html, IntoResponse, Redirect, Response}};
use tower_sessions::Session;

use crate::{AppResult, include_res, session};

#[debug_handler]
pub async fn index(session: Session) -> AppResult<Response> {
    if session::current_user(&session).await?.is_some() {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    Ok(Html(include_res!(str, "/pages/index.html")).into_response())
}
