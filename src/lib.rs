//! Vigil - real-time token momentum tracking and candidate scanning server

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use config::Config;
use services::{CandidateScanner, TokenTracker};
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tracker: Arc<TokenTracker>,
    pub scanner: Arc<CandidateScanner>,
}
