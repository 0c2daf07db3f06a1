//! Roster Core keeps a private tutor's students, homework, payments,
//! attendance and reminders, and drives them from a line-command shell.
//!
//! The interesting part is the derived state: system reminders are rebuilt
//! from student records, participation is a bounded per-date history, and
//! delete-by-keyword commands go through a cascading resolver.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod reminder;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing once per process.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("roster_core tracing initialized");
    });
}
