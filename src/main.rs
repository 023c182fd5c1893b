use anyhow::Context;
use parlor::{AppState, app, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let database_url =
        dotenv::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://parlor.db".to_owned());
    let bind_addr = dotenv::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_owned());

    let db_pool = db::connect(&database_url)
        .await
        .with_context(|| format!("opening {database_url}"))?;

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "listening");
    axum::serve(listener, app(AppState::new(db_pool))).await?;
    Ok(())
}
