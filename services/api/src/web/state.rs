//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use teaching_assistant_core::ports::{ContentGenerationService, DatabaseService};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
///
/// Every field is read-only after startup, so concurrent requests share it without locks.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub config: Arc<Config>,
    pub generator: Arc<dyn ContentGenerationService>,
}
