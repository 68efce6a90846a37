//! HTTP request handlers, one module per route group.

pub mod admin;
pub mod levels;
pub mod practice;
