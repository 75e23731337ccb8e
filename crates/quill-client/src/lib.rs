//! Data-access layer for quill front ends: a generic fetch primitive with
//! `{data, error, is_loading}` state, a session storage context, the
//! authenticated API wrapper, and the external book-search client. No
//! rendering lives here.

pub mod api;
pub mod books;
pub mod fetch;
pub mod routes;
pub mod storage;

pub use api::{ApiClient, ClientError};
pub use fetch::{Fetch, FetchError, RequestOptions, display_error};
pub use routes::{Route, landing_route};
pub use storage::{MemoryStorage, SessionStorage};
