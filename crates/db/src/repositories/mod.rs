//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Cross-request atomicity lives
//! in the SQL itself (conditional upserts, `RETURNING`, short per-key
//! transactions), never in application-level read-modify-write.

pub mod attempt_repo;
pub mod question_repo;
pub mod skill_level_repo;
pub mod usage_repo;
pub mod user_repo;

pub use attempt_repo::AttemptRepo;
pub use question_repo::QuestionRepo;
pub use skill_level_repo::SkillLevelRepo;
pub use usage_repo::UsageRepo;
pub use user_repo::UserRepo;
