use std::sync::Mutex;

use quill_types::api::Session;

/// Where the client keeps its session between calls. The browser build backs
/// this with local storage; tests inject [`MemoryStorage`].
pub trait SessionStorage: Send + Sync {
    fn read(&self) -> Option<String>;
    fn write(&self, value: &str);
    fn clear(&self);
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    inner: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn read(&self) -> Option<String> {
        self.inner.lock().ok().and_then(|slot| slot.clone())
    }

    fn write(&self, value: &str) {
        if let Ok(mut slot) = self.inner.lock() {
            *slot = Some(value.to_string());
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.inner.lock() {
            *slot = None;
        }
    }
}

pub fn store_session(storage: &dyn SessionStorage, session: &Session) {
    match serde_json::to_string(session) {
        Ok(raw) => storage.write(&raw),
        Err(e) => tracing::warn!("Failed to serialize session: {}", e),
    }
}

/// The stored session, if present and still parseable.
pub fn stored_session(storage: &dyn SessionStorage) -> Option<Session> {
    let raw = storage.read()?;
    serde_json::from_str(&raw).ok()
}
