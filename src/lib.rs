pub mod appresult;
pub mod auth;
pub mod dashboard;
pub mod db;
pub mod index;
pub mod res;
pub mod rooms;
pub mod session;

use axum::{Router, extract::FromRef, routing::get};
use sqlx::SqlitePool;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::SameSite};
use uuid::Uuid;

pub use appresult::{AppError, AppResult};

/// One new message, fanned out to every socket: the room it belongs to
/// and its rendered HTML.
pub type RoomEvent = (Uuid, String);

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub tx: broadcast::Sender<RoomEvent>,
}

impl AppState {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self {
            db_pool,
            tx: broadcast::channel(64).0,
        }
    }
}

pub fn app(state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(2)));

    Router::new()
        .route("/", get(index::index))
        .route("/dashboard", get(dashboard::dashboard))
        .merge(auth::router())
        .merge(rooms::router())
        .with_state(state)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
}
