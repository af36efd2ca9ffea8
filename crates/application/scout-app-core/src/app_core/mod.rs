pub mod commands;
pub mod events;
pub mod reducer;
pub mod store;

pub use commands::SyncCommand;
pub use events::SyncEvent;
pub use reducer::reduce;
pub use store::{Subscription, SyncStore};
