use tower_sessions::Session;

use crate::AppResult;

pub const USER_ID: &str = "user_id";
pub const FLASH: &str = "flash";

/// Id of the logged-in user, if any.
pub async fn current_user(session: &Session) -> AppResult<Option<String>> {
    Ok(session.get::<String>(USER_ID).await?)
}

/// Queue a one-shot message for the next page render.
pub async fn flash(session: &Session, msg: &str) -> AppResult<()> {
    session.insert(FLASH, msg.to_owned()).await?;
    Ok(())
}

/// Remove and return the pending flash message, if any.
pub async fn take_flash(session: &Session) -> AppResult<Option<String>> {
    Ok(session.remove::<String>(FLASH).await?)
}
