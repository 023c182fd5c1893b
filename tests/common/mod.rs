#![allow(dead_code)]

use std::net::SocketAddr;

use parlor::{AppState, app, db};

/// Serve the real router on an ephemeral port against a throwaway database.
pub async fn spawn_server() -> (SocketAddr, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("parlor.db");
    let pool = db::connect(&format!("sqlite://{}", db_path.display()))
        .await
        .unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app(AppState::new(pool))).await.unwrap();
    });
    (addr, tmp)
}

/// Client with a cookie jar but no redirect following, so tests can
/// assert on the redirects themselves.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

pub async fn register(
    client: &reqwest::Client,
    addr: SocketAddr,
    username: &str,
    email: &str,
    password: &str,
) -> reqwest::Response {
    client
        .post(format!("http://{addr}/register"))
        .form(&[
            ("username", username),
            ("email", email),
            ("password", password),
            ("password2", password),
        ])
        .send()
        .await
        .unwrap()
}

pub async fn login(
    client: &reqwest::Client,
    addr: SocketAddr,
    username: &str,
    password: &str,
) -> reqwest::Response {
    client
        .post(format!("http://{addr}/login"))
        .form(&[("username", username), ("password", password)])
        .send()
        .await
        .unwrap()
}

/// Register, log in, and assert both worked.
pub async fn register_and_login(
    client: &reqwest::Client,
    addr: SocketAddr,
    username: &str,
    password: &str,
) {
    let resp = register(client, addr, username, &format!("{username}@example.com"), password).await;
    assert_eq!(resp.status(), 303);
    let resp = login(client, addr, username, password).await;
    assert_eq!(resp.status(), 303);
    assert_eq!(resp.headers()["location"], "/dashboard");
}

/// Create a room and return its page path (`/message_room/<id>`).
pub async fn create_room(client: &reqwest::Client, addr: SocketAddr, name: &str) -> String {
    let resp = client
        .post(format!("http://{addr}/create"))
        .form(&[("name", name)])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 303);
    resp.headers()["location"].to_str().unwrap().to_owned()
}

/// Session cookie from a response that set one, in `name=value` form.
pub fn session_cookie(resp: &reqwest::Response) -> String {
    resp.headers()[reqwest::header::SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_owned()
}

/// First substring of `body` between `start` and `end`.
pub fn extract_between(body: &str, start: &str, end: &str) -> String {
    let from = body.find(start).expect("start marker") + start.len();
    let len = body[from..].find(end).expect("end marker");
    body[from..from + len].to_owned()
}
