#![doc(test(attr(deny(warnings))))]

//! School Core implements the grading, report-card and fee-ledger rules of a
//! multi-branch school administration console, together with the record store
//! and terminal shell that drive them.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod errors;
pub mod fees;
pub mod grading;
pub mod records;
pub mod roles;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("School Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
