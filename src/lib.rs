pub mod agent;
pub mod api;
pub mod config;
pub mod core;
pub mod errors;
pub mod monitoring;
pub mod registry;

// Re-exports
pub use api::routes::{create_router, AppState};
pub use core::dispatch::Dispatcher;
pub use errors::{DispatchError, DispatchResult};
