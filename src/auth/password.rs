use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use axum::{debug_handler, extract::State, response::Redirect, Form};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{AppResult, session};

/// Hash a password with argon2id and a fresh salt.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[derive(Deserialize)]
pub(crate) struct PasswordForm {
    current_password: String,
    new_password: String,
}

/// The one in-place update users get: rotating their own password hash.
#[debug_handler]
pub(crate) async fn change_password(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(PasswordForm { current_password, new_password }): Form<PasswordForm>,
) -> AppResult<Redirect> {
    let Some(user_id) = session::current_user(&session).await? else {
        return Ok(Redirect::to("/login"));
    };

    let (stored,): (String,) = sqlx::query_as("SELECT password_hash FROM users WHERE id=?")
        .bind(&user_id)
        .fetch_one(&db_pool)
        .await?;

    if new_password.is_empty() || !verify_password(&current_password, &stored) {
        session::flash(&session, "Current password is incorrect").await?;
        return Ok(Redirect::to("/dashboard"));
    }

    sqlx::query("UPDATE users SET password_hash=? WHERE id=?")
        .bind(hash_password(&new_password)?)
        .bind(&user_id)
        .execute(&db_pool)
        .await?;

    tracing::info!(user = %user_id, "password changed");
    session::flash(&session, "Password updated").await?;
    Ok(Redirect::to("/dashboard"))
}
