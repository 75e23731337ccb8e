use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id              TEXT PRIMARY KEY,
            username        TEXT NOT NULL UNIQUE,
            password        TEXT NOT NULL,
            favoriteBook    TEXT
        );

        CREATE TABLE IF NOT EXISTS posts (
            id          TEXT PRIMARY KEY,
            title       TEXT NOT NULL,
            content     TEXT NOT NULL,
            authorId    TEXT NOT NULL REFERENCES users(id),
            createdAt   TEXT NOT NULL,
            updatedAt   TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_posts_created
            ON posts(createdAt);

        CREATE TABLE IF NOT EXISTS sessions (
            id          TEXT PRIMARY KEY,
            userId      TEXT NOT NULL REFERENCES users(id),
            token       TEXT NOT NULL UNIQUE,
            createdAt   TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_token
            ON sessions(token);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
