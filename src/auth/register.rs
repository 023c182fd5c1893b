use axum::{debug_handler, extract::State, response::{Html, IntoResponse, Redirect, Response}, Form};
use serde::Deserialize;
use sqlx::SqlitePool;
use time::OffsetDateTime;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{AppResult, include_res, res, session};

use super::password::hash_password;

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterForm {
    username: String,
    email: String,
    password: String,
    password2: String,
    about_me: Option<String>,
}

#[debug_handler]
pub(crate) async fn register_page(session: Session) -> AppResult<Response> {
    let flash = session::take_flash(&session).await?;
    Ok(Html(
        include_res!(str, "/pages/register.html").replace("{flash}", &res::flash_html(flash)),
    )
    .into_response())
}

#[debug_handler]
pub(crate) async fn register(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    let username = form.username.trim();
    let email = form.email.trim();

    if username.is_empty() || email.is_empty() || form.password.is_empty() {
        session::flash(&session, "All fields are required").await?;
        return Ok(Redirect::to("/register").into_response());
    }
    if form.password != form.password2 {
        session::flash(&session, "Passwords do not match").await?;
        return Ok(Redirect::to("/register").into_response());
    }

    if sqlx::query("SELECT 1 FROM users WHERE username=?")
        .bind(username)
        .fetch_optional(&db_pool)
        .await?
        .is_some()
    {
        session::flash(&session, "Username already taken").await?;
        return Ok(Redirect::to("/register").into_response());
    }
    if sqlx::query("SELECT 1 FROM users WHERE email=?")
        .bind(email)
        .fetch_optional(&db_pool)
        .await?
        .is_some()
    {
        session::flash(&session, "Please use a different email").await?;
        return Ok(Redirect::to("/register").into_response());
    }

    let user_id = Uuid::now_v7();
    let insert = sqlx::query(
        "INSERT INTO users (id,username,password_hash,email,about_me,created_at) VALUES (?,?,?,?,?,?)",
    )
    .bind(user_id.to_string())
    .bind(username)
    .bind(hash_password(&form.password)?)
    .bind(email)
    .bind(form.about_me.as_deref().map(str::trim).filter(|s| !s.is_empty()))
    .bind(OffsetDateTime::now_utc().unix_timestamp())
    .execute(&db_pool)
    .await;

    match insert {
        Ok(_) => {
            tracing::info!(%username, "registered");
            session::flash(&session, "Account created, please log in").await?;
            Ok(Redirect::to("/login").into_response())
        }
        // lost the race between the pre-checks and the insert
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            session::flash(&session, "Username already taken").await?;
            Ok(Redirect::to("/register").into_response())
        }
        Err(e) => Err(e)?,
    }
}
