//! Lingo domain core.
//!
//! Pure domain logic for the adaptive practice engine, with no I/O and no
//! internal dependencies:
//!
//! - [`levels`]: the six-point CEFR proficiency scale.
//! - [`skills`]: skill areas, question types, and their static mapping.
//! - [`progression`]: the per-(user, skill, type) level state machine.
//! - [`ranking`]: weak-skill ranking and the cold-start ordering strategy.
//! - [`selection`]: bounded-window random draws used by session assembly.
//!
//! The API and repository layers feed store data through these functions so
//! every policy decision stays testable without a database.

pub mod error;
pub mod levels;
pub mod progression;
pub mod ranking;
pub mod selection;
pub mod skills;
pub mod types;
