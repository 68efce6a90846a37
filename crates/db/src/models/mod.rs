//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for the writes the API accepts

pub mod attempt;
pub mod question;
pub mod skill_level;
pub mod usage;
pub mod user;
