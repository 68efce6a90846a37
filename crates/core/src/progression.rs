//! The per-(user, skill area, question type) level state machine.
//!
//! A learner's proficiency record carries the current [`CefrLevel`] plus two
//! counters: attempts made since the last transition and the current run of
//! consecutive correct outcomes. [`apply_outcome`] is the single, pure
//! transition function; persistence wraps it in a per-key transaction so a
//! graded attempt is applied exactly once (see `SkillLevelRepo`).
//!
//! Transition rules:
//!
//! - **Correct**: both counters increment. Reaching the promotion streak
//!   advances one level and zeroes both counters. At C2 the streak completes
//!   the run in place: counters zero, level unchanged.
//! - **Incorrect**: the streak zeroes, attempts increment. Reaching the
//!   demotion threshold regresses one level and zeroes both counters. At A1
//!   the threshold starts a fresh run in place, again with zeroed counters.
//!
//! Keeping the absorbing ends on the same counter-reset cycle bounds both
//! counters and means a long correct run at C2 can never feed a later
//! demotion.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::levels::CefrLevel;

/// Consecutive correct outcomes required to advance one level.
pub const DEFAULT_PROMOTION_STREAK: i32 = 3;

/// Attempts at a level (without completing a promotion streak) after which
/// the learner regresses one level.
pub const DEFAULT_DEMOTION_ATTEMPTS: i32 = 5;

/// The graded result of a single practice attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Correct,
    Incorrect,
}

impl AttemptOutcome {
    /// The wire form, e.g. `"correct"`.
    pub fn as_str(self) -> &'static str {
        match self {
            AttemptOutcome::Correct => "correct",
            AttemptOutcome::Incorrect => "incorrect",
        }
    }
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttemptOutcome {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "correct" => Ok(AttemptOutcome::Correct),
            "incorrect" => Ok(AttemptOutcome::Incorrect),
            other => Err(CoreError::Validation(format!(
                "Unknown outcome '{other}'. Must be one of: correct, incorrect"
            ))),
        }
    }
}

/// The mutable sub-state of one proficiency record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    pub level: CefrLevel,
    pub attempts_at_level: i32,
    pub correct_streak: i32,
}

impl LevelProgress {
    /// The state a record is created in on first lookup.
    pub fn initial() -> Self {
        Self {
            level: CefrLevel::MIN,
            attempts_at_level: 0,
            correct_streak: 0,
        }
    }
}

impl Default for LevelProgress {
    fn default() -> Self {
        Self::initial()
    }
}

/// What a transition did to the level itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelChange {
    Promoted,
    Demoted,
    Unchanged,
}

/// The result of applying one graded outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelTransition {
    pub progress: LevelProgress,
    pub change: LevelChange,
}

/// Promotion/demotion thresholds.
///
/// Constructed once at startup from configuration; [`ProgressionPolicy::new`]
/// rejects threshold pairs under which a demotion could fire while a
/// qualifying promotion streak is still in progress.
#[derive(Debug, Clone, Copy)]
pub struct ProgressionPolicy {
    promotion_streak: i32,
    demotion_attempts: i32,
}

impl ProgressionPolicy {
    pub fn new(promotion_streak: i32, demotion_attempts: i32) -> Result<Self, CoreError> {
        if promotion_streak < 1 {
            return Err(CoreError::Validation(format!(
                "promotion streak must be at least 1, got {promotion_streak}"
            )));
        }
        if demotion_attempts <= promotion_streak {
            return Err(CoreError::Validation(format!(
                "demotion attempts ({demotion_attempts}) must exceed the promotion streak \
                 ({promotion_streak})"
            )));
        }
        Ok(Self {
            promotion_streak,
            demotion_attempts,
        })
    }

    pub fn promotion_streak(&self) -> i32 {
        self.promotion_streak
    }

    pub fn demotion_attempts(&self) -> i32 {
        self.demotion_attempts
    }
}

impl Default for ProgressionPolicy {
    fn default() -> Self {
        Self {
            promotion_streak: DEFAULT_PROMOTION_STREAK,
            demotion_attempts: DEFAULT_DEMOTION_ATTEMPTS,
        }
    }
}

/// Apply one graded outcome to a proficiency record.
///
/// Pure: callers own reading and writing the record around this call.
pub fn apply_outcome(
    progress: LevelProgress,
    outcome: AttemptOutcome,
    policy: &ProgressionPolicy,
) -> LevelTransition {
    match outcome {
        AttemptOutcome::Correct => {
            let streak = progress.correct_streak + 1;
            let attempts = progress.attempts_at_level + 1;

            if streak >= policy.promotion_streak() {
                // Run complete: promote where possible, otherwise C2 holds.
                let (level, change) = match progress.level.next() {
                    Some(next) => (next, LevelChange::Promoted),
                    None => (progress.level, LevelChange::Unchanged),
                };
                LevelTransition {
                    progress: LevelProgress {
                        level,
                        attempts_at_level: 0,
                        correct_streak: 0,
                    },
                    change,
                }
            } else {
                LevelTransition {
                    progress: LevelProgress {
                        level: progress.level,
                        attempts_at_level: attempts,
                        correct_streak: streak,
                    },
                    change: LevelChange::Unchanged,
                }
            }
        }
        AttemptOutcome::Incorrect => {
            let attempts = progress.attempts_at_level + 1;

            if attempts >= policy.demotion_attempts() {
                // Run exhausted: regress where possible, otherwise A1 holds.
                let (level, change) = match progress.level.previous() {
                    Some(previous) => (previous, LevelChange::Demoted),
                    None => (progress.level, LevelChange::Unchanged),
                };
                LevelTransition {
                    progress: LevelProgress {
                        level,
                        attempts_at_level: 0,
                        correct_streak: 0,
                    },
                    change,
                }
            } else {
                LevelTransition {
                    progress: LevelProgress {
                        level: progress.level,
                        attempts_at_level: attempts,
                        correct_streak: 0,
                    },
                    change: LevelChange::Unchanged,
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
