//! Stateful orchestration on top of the stateless services.

pub mod tracker_manager;

pub use tracker_manager::{Applied, SyncStatus, TrackerManager, UserProfile};
