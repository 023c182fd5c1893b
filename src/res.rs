use axum::{http::StatusCode, response::{Html, IntoResponse, Response}};

use crate::AppResult;

#[macro_export]
macro_rules! include_res {
    (bytes, $p:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

/// 404 page for a missing (or hidden) entity.
pub fn sorry(what: &str) -> AppResult<Response> {
    Ok((
        StatusCode::NOT_FOUND,
        Html(include_res!(str, "/pages/sorry.html").replace("{what}", what)),
    )
        .into_response())
}

pub fn flash_html(flash: Option<String>) -> String {
    match flash {
        Some(msg) => format!(r#"<p class="flash">{msg}</p>"#),
        None => String::new(),
    }
}
