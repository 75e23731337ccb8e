use reqwest::{Method, header};
use serde::de::DeserializeOwned;
use serde_json::Value;

use quill_types::error::{ErrorBody, FieldError};

/// What a request can surface to the UI: a field-error list (422 validation
/// bodies) or a single message (everything else, transport failures
/// included).
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    Validation(Vec<FieldError>),
    Message(String),
}

/// Render an error for display: validation messages joined with ", ",
/// anything else as-is.
pub fn display_error(error: &FetchError) -> String {
    match error {
        FetchError::Validation(errors) => errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        FetchError::Message(message) => message.clone(),
    }
}

#[derive(Debug, Default, Clone)]
pub struct RequestOptions {
    pub method: Method,
    /// Bearer token, sent verbatim in the `Authorization` header.
    pub token: Option<String>,
    pub body: Option<Value>,
}

type SuccessCallback<T> = Box<dyn Fn(&T) + Send + Sync>;
type ErrorCallback = Box<dyn Fn(&FetchError) + Send + Sync>;

/// One in-flight request's worth of state. A second `execute` before the
/// first result is inspected simply overwrites it; there is no cancellation
/// or de-duplication.
pub struct Fetch<T> {
    client: reqwest::Client,
    pub data: Option<T>,
    pub error: Option<FetchError>,
    pub is_loading: bool,
    on_success: Option<SuccessCallback<T>>,
    on_error: Option<ErrorCallback>,
}

impl<T: DeserializeOwned> Default for Fetch<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> Fetch<T> {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            data: None,
            error: None,
            is_loading: false,
            on_success: None,
            on_error: None,
        }
    }

    pub fn on_success(mut self, callback: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl Fn(&FetchError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    /// Perform the request: set loading, clear the previous error, then land
    /// either in `data` or `error` and fire the matching callback.
    pub async fn execute(&mut self, url: &str, options: RequestOptions) {
        self.is_loading = true;
        self.error = None;

        let mut request = self.client.request(options.method, url);
        if let Some(token) = &options.token {
            request = request.header(header::AUTHORIZATION, token);
        }
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let outcome = request.send().await;
        self.is_loading = false;

        match outcome {
            Ok(response) if response.status().is_success() => {
                match response.json::<T>().await {
                    Ok(data) => {
                        if let Some(callback) = &self.on_success {
                            callback(&data);
                        }
                        self.data = Some(data);
                    }
                    Err(e) => self.set_error(FetchError::Message(e.to_string())),
                }
            }
            Ok(response) => {
                let status = response.status();
                let error = match response.json::<ErrorBody>().await {
                    Ok(ErrorBody::Validation { errors }) => FetchError::Validation(errors),
                    Ok(ErrorBody::Message { message }) => FetchError::Message(message),
                    Err(_) => FetchError::Message(
                        status
                            .canonical_reason()
                            .unwrap_or("Request failed")
                            .to_string(),
                    ),
                };
                self.set_error(error);
            }
            Err(e) => self.set_error(FetchError::Message(e.to_string())),
        }
    }

    /// Consume the state as a plain result, for callers that want one answer
    /// rather than observable state.
    pub fn into_result(self) -> Result<T, FetchError> {
        match (self.data, self.error) {
            (_, Some(error)) => Err(error),
            (Some(data), None) => Ok(data),
            (None, None) => Err(FetchError::Message("No response".into())),
        }
    }

    fn set_error(&mut self, error: FetchError) {
        if let Some(callback) = &self.on_error {
            callback(&error);
        }
        self.error = Some(error);
    }
}
