use axum::{debug_handler, extract::State, response::{Html, IntoResponse, Redirect, Response}, Form};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{AppResult, include_res, res, session};

use super::password::verify_password;

#[derive(Deserialize)]
pub(crate) struct LoginForm {
    username: String,
    password: String,
}

#[debug_handler]
pub(crate) async fn login_page(session: Session) -> AppResult<Response> {
    let flash = session::take_flash(&session).await?;
    Ok(Html(
        include_res!(str, "/pages/login.html").replace("{flash}", &res::flash_html(flash)),
    )
    .into_response())
}

#[debug_handler]
pub(crate) async fn login(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(LoginForm { username, password }): Form<LoginForm>,
) -> AppResult<Redirect> {
    let row: Option<(String, String)> =
        sqlx::query_as("SELECT id,password_hash FROM users WHERE username=?")
            .bind(&username)
            .fetch_optional(&db_pool)
            .await?;

    match row {
        Some((user_id, hash)) if verify_password(&password, &hash) => {
            session.insert(session::USER_ID, user_id).await?;
            tracing::info!(%username, "logged in");
            Ok(Redirect::to("/dashboard"))
        }
        // unknown username and bad password look the same from outside
        _ => {
            session::flash(&session, "Invalid username or password").await?;
            Ok(Redirect::to("/login"))
        }
    }
}
