//! Database row types mapping directly to SQLite rows. Distinct from the
//! quill-types wire models: timestamps stay as the stored text and
//! `favorite_book` stays as its serialized JSON string. Parsing both is the
//! route layer's job.

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub favorite_book: Option<String>,
}

pub struct PostRow {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub created_at: String,
    pub updated_at: String,
}

pub struct SessionRow {
    pub id: String,
    pub user_id: String,
    pub token: String,
    pub created_at: String,
}
