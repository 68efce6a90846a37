//! Lingo practice API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes, the
//! session composer) so integration tests and the binary entrypoint can both
//! access them.

pub mod composer;
pub mod config;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod inventory;
pub mod response;
pub mod routes;
pub mod state;
