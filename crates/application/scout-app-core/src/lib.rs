pub mod app_core;
pub mod connection;
pub mod domain;
pub mod invalidation;
pub mod kernel;
pub mod notifier;
pub mod ports;

pub use app_core::*;
pub use connection::ConnectionSupervisor;
pub use domain::SyncState;
pub use invalidation::{invalidate_for, stale_keys};
pub use kernel::SyncKernel;
pub use notifier::NotificationDispatcher;
pub use ports::*;
