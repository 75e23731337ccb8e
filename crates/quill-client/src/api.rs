use reqwest::Method;
use serde_json::json;
use thiserror::Error;

use quill_types::api::{ApiMessage, Post, Session, UpdateUserRequest, User};

use crate::fetch::{Fetch, FetchError, RequestOptions, display_error};
use crate::storage::{SessionStorage, store_session, stored_session};

#[derive(Debug, Error)]
pub enum ClientError {
    /// No usable session is stored locally; the UI should land on the login
    /// view. No request was sent.
    #[error("Unauthorized")]
    RedirectToLogin,
    #[error("{}", display_error(.0))]
    Api(FetchError),
}

/// Authenticated wrapper over [`Fetch`]: joins paths onto the base URL,
/// attaches the stored bearer token verbatim, and exposes one typed
/// operation per endpoint the views need.
pub struct ApiClient<S: SessionStorage> {
    base_url: String,
    storage: S,
}

impl<S: SessionStorage> ApiClient<S> {
    pub fn new(base_url: impl Into<String>, storage: S) -> Self {
        Self {
            base_url: base_url.into(),
            storage,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn token(&self) -> Result<String, ClientError> {
        stored_session(&self.storage)
            .map(|session| session.token)
            .ok_or(ClientError::RedirectToLogin)
    }

    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, ClientError> {
        let token = self.token()?;
        let mut fetch = Fetch::new();
        fetch
            .execute(
                &self.url(path),
                RequestOptions {
                    method,
                    token: Some(token),
                    body,
                },
            )
            .await;
        fetch.into_result().map_err(ClientError::Api)
    }

    // -- Auth --

    /// On success the session is stored, so subsequent calls authenticate.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ClientError> {
        let mut fetch = Fetch::new();
        fetch
            .execute(
                &self.url("/auth/login"),
                RequestOptions {
                    method: Method::POST,
                    token: None,
                    body: Some(json!({ "username": username, "password": password })),
                },
            )
            .await;
        let session: Session = fetch.into_result().map_err(ClientError::Api)?;
        store_session(&self.storage, &session);
        Ok(session)
    }

    /// Registration logs the new account in, exactly like [`login`].
    ///
    /// [`login`]: ApiClient::login
    pub async fn register(&self, username: &str, password: &str) -> Result<Session, ClientError> {
        let mut fetch = Fetch::new();
        fetch
            .execute(
                &self.url("/users"),
                RequestOptions {
                    method: Method::POST,
                    token: None,
                    body: Some(json!({ "username": username, "password": password })),
                },
            )
            .await;
        let session: Session = fetch.into_result().map_err(ClientError::Api)?;
        store_session(&self.storage, &session);
        Ok(session)
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        let _: ApiMessage = self.request(Method::POST, "/auth/logout", None).await?;
        self.storage.clear();
        Ok(())
    }

    // -- Users --

    pub async fn user(&self, user_id: &str) -> Result<User, ClientError> {
        self.request(Method::GET, &format!("/users/{user_id}"), None)
            .await
    }

    pub async fn update_user(
        &self,
        user_id: &str,
        update: &UpdateUserRequest,
    ) -> Result<User, ClientError> {
        let mut body = serde_json::Map::new();
        if let Some(username) = &update.username {
            body.insert("username".into(), json!(username));
        }
        if let Some(book) = &update.favorite_book {
            body.insert("favoriteBook".into(), json!(book));
        }
        self.request(
            Method::PUT,
            &format!("/users/{user_id}"),
            Some(body.into()),
        )
        .await
    }

    // -- Posts --

    pub async fn posts(&self) -> Result<Vec<Post>, ClientError> {
        self.request(Method::GET, "/posts", None).await
    }

    pub async fn post(&self, post_id: &str) -> Result<Post, ClientError> {
        self.request(Method::GET, &format!("/posts/{post_id}"), None)
            .await
    }

    pub async fn create_post(&self, title: &str, content: &str) -> Result<Post, ClientError> {
        self.request(
            Method::POST,
            "/posts",
            Some(json!({ "title": title, "content": content })),
        )
        .await
    }

    pub async fn update_post(
        &self,
        post_id: &str,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Result<Post, ClientError> {
        let mut body = serde_json::Map::new();
        if let Some(title) = title {
            body.insert("title".into(), json!(title));
        }
        if let Some(content) = content {
            body.insert("content".into(), json!(content));
        }
        self.request(
            Method::PUT,
            &format!("/posts/{post_id}"),
            Some(body.into()),
        )
        .await
    }

    pub async fn delete_post(&self, post_id: &str) -> Result<ApiMessage, ClientError> {
        self.request(Method::DELETE, &format!("/posts/{post_id}"), None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn protected_calls_short_circuit_without_a_session() {
        // Bogus base URL: a redirect decision must not touch the network.
        let client = ApiClient::new("http://127.0.0.1:1", MemoryStorage::new());
        match client.posts().await {
            Err(ClientError::RedirectToLogin) => {}
            other => panic!("expected RedirectToLogin, got {other:?}"),
        }
    }

    #[test]
    fn urls_join_without_double_slashes() {
        let client = ApiClient::new("http://localhost:3000/", MemoryStorage::new());
        assert_eq!(client.url("/posts"), "http://localhost:3000/posts");
    }
}
