//! Pattern detection dashboard.
//!
//! Polls the pattern service for company network issues and repeated user
//! issues and serves them as a card dashboard.

pub mod commands;
pub mod models;
pub mod services;
pub mod utils;

pub use models::{DashboardSettings, DashboardSnapshot, PatternSet};
pub use services::{PatternClient, PatternState, Poller};

pub const APP_NAME: &str = "pattern-dashboard";
