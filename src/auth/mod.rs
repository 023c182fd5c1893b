mod login;
mod logout;
mod password;
mod register;

use axum::{Router, routing::{get, post}};

use crate::AppState;

pub use password::{hash_password, verify_password};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login::login_page).post(login::login))
        .route("/register", get(register::register_page).post(register::register))
        .route("/logout", get(logout::logout))
        .route("/password", post(password::change_password))
}
