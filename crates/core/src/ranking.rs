//! Weak-skill ranking and the cold-start ordering strategy.
//!
//! Session composition orders skill areas most-in-need first. With enough
//! graded history the order comes from score aggregates; a brand-new learner
//! gets a uniform shuffle instead so all four areas see balanced exposure
//! before adaptivity kicks in. The two behaviours are named strategies
//! selected by a single predicate, never inline conditionals in the
//! composer.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::skills::SkillArea;

/// Graded attempts required before history-based ranking takes over from the
/// cold-start shuffle.
pub const DEFAULT_MIN_HISTORY_FOR_RANKING: i64 = 4;

/// Per-skill score aggregate over a learner's recent graded attempts.
///
/// One row per skill area (the store groups by area before handing these
/// over).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillAggregate {
    pub skill_area: SkillArea,
    /// Mean graded score for the area, on whatever scale grading uses.
    pub avg_score: f64,
    /// Graded attempts contributing to the mean.
    pub attempt_count: i64,
}

/// How the composer orders skill areas for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillOrderStrategy {
    /// Rank by historical performance, weakest first.
    HistoryBased,
    /// Uniformly shuffle all areas (cold start).
    UniformShuffle,
}

impl SkillOrderStrategy {
    /// The cold-start predicate: history below the threshold shuffles.
    pub fn select(history_count: i64, min_history: i64) -> SkillOrderStrategy {
        if history_count >= min_history {
            SkillOrderStrategy::HistoryBased
        } else {
            SkillOrderStrategy::UniformShuffle
        }
    }
}

/// Rank skill areas most-in-need-of-practice first.
///
/// Primary key: average score ascending. Tie-break: attempt count
/// descending, so a well-practiced-but-still-weak area ranks ahead of a
/// rarely-attempted one with the same mean. Areas with no aggregate at all
/// are appended after the ranked ones (an unattempted skill still gets
/// practice, it just carries no weakness signal). The result is truncated
/// to `limit`.
pub fn rank_weak_skills(aggregates: &[SkillAggregate], limit: usize) -> Vec<SkillArea> {
    let mut ranked: Vec<&SkillAggregate> = aggregates.iter().collect();
    ranked.sort_by(|a, b| {
        a.avg_score
            .total_cmp(&b.avg_score)
            .then(b.attempt_count.cmp(&a.attempt_count))
            .then(a.skill_area.cmp(&b.skill_area))
    });

    let mut order: Vec<SkillArea> = ranked.iter().map(|agg| agg.skill_area).collect();
    for area in SkillArea::ALL {
        if !order.contains(&area) {
            order.push(area);
        }
    }
    order.truncate(limit);
    order
}

/// A uniform shuffle over all four skill areas.
pub fn shuffled_skill_order<R: Rng + ?Sized>(rng: &mut R) -> Vec<SkillArea> {
    let mut order = SkillArea::ALL.to_vec();
    order.shuffle(rng);
    order
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
