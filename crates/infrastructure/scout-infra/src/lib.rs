pub mod cache;
pub mod notify;
pub mod session;
pub mod transport;

pub use cache::InMemoryCacheTracker;
pub use notify::{NoopNotifier, TermNotifier};
pub use session::{FileSessionStore, PersistedSession};
pub use transport::SseTransport;
