//! Shared test fakes and utilities for the Orderflow service.

mod publisher;
mod store;
mod users;

pub use publisher::{FailingPublisher, RecordingPublisher};
pub use store::{InMemoryItems, InMemoryOrders};
pub use users::{FailingUserDirectory, StaticUserDirectory, user_fixture};
