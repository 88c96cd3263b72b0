//! Foodgram API server library.
//!
//! Exposes the building blocks (config, state, error handling, auth, routes)
//! so integration tests and the binary entrypoints can both access them.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod import;
pub mod middleware;
pub mod query;
pub mod routes;
pub mod state;
