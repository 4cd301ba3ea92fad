//! spendbook-domain
//!
//! Pure domain models (Book, Category, Transaction, ViewState).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod book;
pub mod category;
pub mod common;
pub mod transaction;
pub mod view;

pub use book::*;
pub use category::*;
pub use common::*;
pub use transaction::*;
pub use view::*;
