//! spendbook-core
//!
//! Query engine and services for Spendbook.
//! Depends on spendbook-domain. No CLI, no terminal I/O, no filesystem access.

pub mod category_service;
pub mod error;
pub mod exchange_service;
pub mod filter_service;
pub mod insight_service;
pub mod storage;
pub mod summary_service;
pub mod time;
pub mod transaction_service;
pub mod trend_service;
pub mod view_service;

pub use category_service::*;
pub use error::{CoreError, CoreResult};
pub use exchange_service::*;
pub use filter_service::*;
pub use insight_service::*;
pub use storage::*;
pub use summary_service::*;
pub use time::*;
pub use transaction_service::*;
pub use trend_service::*;
pub use view_service::*;

#[cfg(test)]
mod tests;
