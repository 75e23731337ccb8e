use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use quill_api::{AppState, AppStateInner, password, router};
use quill_db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quill=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("QUILL_DB_PATH").unwrap_or_else(|_| "quill.db".into());
    let host = std::env::var("QUILL_HOST").unwrap_or_else(|_| "127.0.0.1".into());
    let port: u16 = std::env::var("QUILL_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Init database
    let db = Database::open(&PathBuf::from(&db_path))?;

    if std::env::var("QUILL_SKIP_SEED").is_err() {
        seed_test_user(&db)?;
    }

    let state: AppState = Arc::new(AppStateInner { db });

    let app = router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Quill server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Make sure a well-known account exists for the e2e suites.
fn seed_test_user(db: &Database) -> anyhow::Result<()> {
    const USERNAME: &str = "testuser";
    const PASSWORD: &str = "testpassword";

    if db.get_user_by_username(USERNAME)?.is_some() {
        info!("Test data ready for e2e tests. Username: {USERNAME}, Password: {PASSWORD}");
        return Ok(());
    }

    info!("Creating test user in database for e2e tests...");
    let digest = password::hash_password(PASSWORD)?;
    db.create_user(&uuid::Uuid::new_v4().to_string(), USERNAME, &digest)?;
    info!("Test user created successfully. Username: {USERNAME}, Password: {PASSWORD}");
    Ok(())
}
