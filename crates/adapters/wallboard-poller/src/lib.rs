pub mod config;
pub mod fetch;
pub mod poller;

pub use fetch::{SnapshotClient, SnapshotSource};
pub use poller::WallboardPoller;
