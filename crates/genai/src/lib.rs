//! Client library for the external question-generation service.
//!
//! Provides the [`generator::QuestionGenerator`] seam the inventory layer
//! programs against, plus the reqwest-backed HTTP implementation.

pub mod client;
pub mod generator;
