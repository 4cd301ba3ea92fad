#![doc(test(attr(deny(warnings))))]

//! Spendbook tracks income and expenses per category and answers period
//! questions about them: what came in, what went out, and how this month
//! compares with the last few.

pub mod cli;
pub mod core;
pub mod currency;
pub mod errors;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    init_with_filter(None);
}

/// Like [`init`], adding `filter` (an `EnvFilter` directive list) when given.
pub fn init_with_filter(filter: Option<&str>) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(filter);
        tracing::info!("Spendbook tracing initialized.");
    });
}
