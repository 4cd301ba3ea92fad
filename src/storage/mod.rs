//! Remote persistence for the tracker.

pub mod rest_backend;

pub use rest_backend::RestBackend;
