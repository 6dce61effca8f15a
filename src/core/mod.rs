pub mod dispatch;
pub mod models;

pub use dispatch::Dispatcher;
pub use models::{Container, ContainerListing, Host, Operation};
