//! Avatar Demo API Library Crate
//!
//! This library contains the HTTP side of the demo backend: configuration,
//! the application state, API handlers, response models and routing. The
//! `api` binary is a thin wrapper around this library.

pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
