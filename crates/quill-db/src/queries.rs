use crate::Database;
use crate::models::{PostRow, SessionRow, UserRow};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

impl Database {
    // -- Users --

    pub fn create_user(&self, id: &str, username: &str, password_hash: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, password) VALUES (?1, ?2, ?3)",
                (id, username, password_hash),
            )?;
            Ok(())
        })
    }

    pub fn get_user(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username", username))
    }

    /// Rewrites username and favoriteBook together; merging with the stored
    /// record happens at the route layer. The password column stays as-is.
    pub fn update_user(&self, id: &str, username: &str, favorite_book: Option<&str>) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE users SET username = ?1, favoriteBook = ?2 WHERE id = ?3",
                (username, favorite_book, id),
            )?;
            Ok(())
        })
    }

    // -- Posts --

    pub fn insert_post(
        &self,
        id: &str,
        title: &str,
        content: &str,
        author_id: &str,
        timestamp: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO posts (id, title, content, authorId, createdAt, updatedAt)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                (id, title, content, author_id, timestamp),
            )?;
            Ok(())
        })
    }

    pub fn get_post(&self, id: &str) -> Result<Option<PostRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, title, content, authorId, createdAt, updatedAt
                     FROM posts WHERE id = ?1",
                    [id],
                    post_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn all_posts(&self) -> Result<Vec<PostRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, content, authorId, createdAt, updatedAt
                 FROM posts ORDER BY createdAt DESC",
            )?;
            let rows = stmt
                .query_map([], post_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Rewrites title/content and stamps a new updatedAt; createdAt is
    /// preserved by never appearing in the statement.
    pub fn update_post(&self, id: &str, title: &str, content: &str, updated_at: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE posts SET title = ?1, content = ?2, updatedAt = ?3 WHERE id = ?4",
                (title, content, updated_at, id),
            )?;
            Ok(())
        })
    }

    /// Returns the number of rows deleted so the route layer can pick its
    /// not-found contract.
    pub fn delete_post(&self, id: &str) -> Result<usize> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM posts WHERE id = ?1", [id])?;
            Ok(deleted)
        })
    }

    // -- Sessions --

    pub fn insert_session(&self, id: &str, user_id: &str, token: &str, created_at: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO sessions (id, userId, token, createdAt) VALUES (?1, ?2, ?3, ?4)",
                (id, user_id, token, created_at),
            )?;
            Ok(())
        })
    }

    /// Hot path for auth checks: absence is an Ok(None), never an error.
    pub fn get_session_by_token(&self, token: &str) -> Result<Option<SessionRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, userId, token, createdAt FROM sessions WHERE token = ?1",
                    [token],
                    session_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn delete_session(&self, id: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM sessions WHERE id = ?1", [id])?;
            Ok(())
        })
    }
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    let sql = format!(
        "SELECT id, username, password, favoriteBook FROM users WHERE {} = ?1",
        column
    );
    let row = conn
        .query_row(&sql, [value], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                favorite_book: row.get(3)?,
            })
        })
        .optional()?;
    Ok(row)
}

fn post_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PostRow> {
    Ok(PostRow {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        author_id: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn session_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SessionRow> {
    Ok(SessionRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        token: row.get(2)?,
        created_at: row.get(3)?,
    })
}
