use serde::Deserialize;

use quill_types::api::FavoriteBook;

use crate::fetch::FetchError;

pub const DEFAULT_BASE_URL: &str = "https://openlibrary.org";
const MIN_QUERY_LENGTH: usize = 2;
const RESULT_LIMIT: u32 = 5;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    docs: Vec<FavoriteBook>,
}

/// Client for the external book-search API the profile view uses to pick a
/// favorite book.
pub struct BookSearch {
    base_url: String,
    client: reqwest::Client,
}

impl Default for BookSearch {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl BookSearch {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Free-text search. Queries shorter than two characters return empty
    /// without a network call, matching the search box's debounce behavior.
    pub async fn search(&self, query: &str) -> Result<Vec<FavoriteBook>, FetchError> {
        if query.chars().count() < MIN_QUERY_LENGTH {
            return Ok(Vec::new());
        }

        let url = format!("{}/search.json", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("limit", &RESULT_LIMIT.to_string())])
            .send()
            .await
            .map_err(|e| FetchError::Message(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Message(format!(
                "Book search failed with status {}",
                response.status()
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Message(e.to_string()))?;
        Ok(body.docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn short_queries_never_hit_the_network() {
        // Unroutable base URL: reaching it would fail the test.
        let search = BookSearch::new("http://127.0.0.1:1");
        assert_eq!(search.search("a").await.unwrap(), Vec::new());
        assert_eq!(search.search("").await.unwrap(), Vec::new());
    }

    #[test]
    fn docs_parse_with_optional_fields_absent() {
        let body: SearchResponse = serde_json::from_str(
            r#"{"docs":[{"key":"/works/OL1W","title":"Dune"},
                        {"key":"/works/OL2W","title":"Emma","author_name":["Jane Austen"],"first_publish_year":1815}]}"#,
        )
        .unwrap();
        assert_eq!(body.docs.len(), 2);
        assert_eq!(body.docs[1].author_name.as_deref(), Some(&["Jane Austen".to_string()][..]));
    }
}
