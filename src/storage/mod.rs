//! Key-value persistence for client session state. Implementations never
//! surface failures to callers: storage is assumed to be available, and the
//! file-backed store logs I/O problems and keeps serving its in-memory view.
//! Callers own serialization of the values they store.

mod file;
mod memory;
pub mod session;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use session::SessionStore;

/// String key-value storage shared by the session store and the API client.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
    fn clear(&self);
}
