//! Core of the avatar demo backend: provider contracts and clients, the
//! tracked session, and the orchestrator that drives it.

pub mod avatar;
pub mod config;
pub mod error;
pub mod generation;
pub mod orchestrator;
pub mod session;
