//! Row-to-wire mapping. Timestamp parsing and favorite-book JSON decoding
//! happen here and nowhere else; corrupt stored values degrade with a warning
//! instead of failing the request.

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use tracing::warn;

use quill_db::models::{PostRow, SessionRow, UserRow};
use quill_types::api::{FavoriteBook, Post, Session, User};

/// Current time truncated to microseconds, the precision timestamps are
/// stored with, so responses built in-memory agree with later re-reads.
pub fn now() -> DateTime<Utc> {
    let now = Utc::now();
    now.duration_trunc(TimeDelta::microseconds(1)).unwrap_or(now)
}

pub fn parse_timestamp(value: &str, context: &str) -> DateTime<Utc> {
    value
        .parse::<DateTime<Utc>>()
        .or_else(|_| {
            // SQLite's datetime() stores "YYYY-MM-DD HH:MM:SS" without a
            // timezone; treat it as UTC.
            chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .map(|naive| naive.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}' on {}: {}", value, context, e);
            DateTime::default()
        })
}

pub fn session_dto(row: SessionRow) -> Session {
    let created_at = parse_timestamp(&row.created_at, &format!("session '{}'", row.id));
    Session {
        id: row.id,
        user_id: row.user_id,
        token: row.token,
        created_at,
    }
}

pub fn user_dto(row: UserRow) -> User {
    let favorite_book = row.favorite_book.as_deref().and_then(|raw| {
        serde_json::from_str::<FavoriteBook>(raw)
            .map_err(|e| warn!("Corrupt favoriteBook on user '{}': {}", row.id, e))
            .ok()
    });
    User {
        id: row.id,
        username: row.username,
        favorite_book,
    }
}

pub fn post_dto(row: PostRow) -> Post {
    let created_at = parse_timestamp(&row.created_at, &format!("post '{}'", row.id));
    let updated_at = parse_timestamp(&row.updated_at, &format!("post '{}'", row.id));
    Post {
        id: row.id,
        title: row.title,
        content: row.content,
        author_id: row.author_id,
        created_at,
        updated_at,
    }
}
