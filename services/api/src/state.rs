//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the orchestrator
//! that owns the single demo session.

use avatar_demo_core::orchestrator::Orchestrator;

/// The shared application state, created once at startup and passed to all handlers.
pub struct AppState {
    pub orchestrator: Orchestrator,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator }
    }
}
