use crate::storage::SessionStorage;

/// The two places the landing view can send the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Posts,
}

/// Landing decision, evaluated once per mount: a stored session that parses
/// as JSON goes to the posts view, anything else to login. The session is
/// not verified against the server here; a stale token surfaces as a 401 on
/// the first protected call.
pub fn landing_route(storage: &dyn SessionStorage) -> Route {
    match storage.read() {
        Some(raw) if serde_json::from_str::<serde_json::Value>(&raw).is_ok() => Route::Posts,
        _ => Route::Login,
    }
}
