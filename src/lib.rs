#![doc(test(attr(deny(warnings))))]

//! Splitmatch keeps shared-expense ledgers and amateur tournament schedules
//! in one workspace: expenses are split by weights and netted into payment
//! proposals, teams are timetabled onto courts and ranked from set scores.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod errors;
pub mod split;
pub mod storage;
pub mod tournament;
pub mod utils;

pub use crate::core::{Workspace, WorkspaceManager};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Splitmatch tracing initialized.");
    });
}
