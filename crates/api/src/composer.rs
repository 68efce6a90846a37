//! Session composition: the adaptive selection flow behind
//! `POST /practice/session`.
//!
//! One composition is: consume a free-session unit (exactly once, before
//! anything else), order the skill areas by need, then draw one question
//! per area. Each per-area draw degrades in stages rather than failing the
//! session: an empty fresh pool triggers a best-effort inventory top-up,
//! then the repeat pool, and only then is the area skipped. A session with
//! no questions at all is the one hard failure.

use lingo_core::error::CoreError;
use lingo_core::levels::CefrLevel;
use lingo_core::ranking::{rank_weak_skills, shuffled_skill_order, SkillAggregate, SkillOrderStrategy};
use lingo_core::selection::{draw_uniform, DrawPool, SESSION_MAX_QUESTIONS};
use lingo_core::skills::{QuestionType, SkillArea};
use lingo_core::types::DbId;
use lingo_db::models::attempt::SkillScoreRow;
use lingo_db::models::question::Question;
use lingo_db::repositories::{AttemptRepo, QuestionRepo, SkillLevelRepo, UsageRepo};
use lingo_db::DbPool;
use lingo_genai::generator::QuestionGenerator;
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use crate::config::PracticeConfig;
use crate::error::AppError;
use crate::inventory::InventoryManager;
use crate::state::AppState;

/// One slot of a composed session.
#[derive(Debug, Serialize)]
pub struct SessionQuestion {
    pub skill_area: SkillArea,
    /// True when the question came from the repeat pool because every
    /// fresh candidate for the key was recently attempted.
    pub repeat: bool,
    pub question: Question,
}

/// A composed practice session, at most one question per skill area.
#[derive(Debug, Serialize)]
pub struct PracticeSession {
    pub session_id: Uuid,
    pub questions: Vec<SessionQuestion>,
    pub is_premium: bool,
}

/// Assembles practice sessions against the store and the generator.
pub struct SessionComposer<'a> {
    pool: &'a DbPool,
    practice: &'a PracticeConfig,
    generator: &'a dyn QuestionGenerator,
}

impl<'a> SessionComposer<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            pool: &state.pool,
            practice: &state.practice,
            generator: state.generator.as_ref(),
        }
    }

    /// Compose a session for the user, consuming one free-session unit.
    ///
    /// Fails with [`CoreError::QuotaExceeded`] when the gate denies, and
    /// with [`CoreError::NoContentAvailable`] when every skill area came
    /// up empty; partial sessions are returned as-is.
    pub async fn compose(&self, user_id: DbId) -> Result<PracticeSession, AppError> {
        let decision =
            UsageRepo::check_and_increment(self.pool, user_id, self.practice.free_session_limit)
                .await?;
        if !decision.allowed {
            return Err(AppError::Core(CoreError::QuotaExceeded {
                used: decision.session_count,
                limit: self.practice.free_session_limit,
            }));
        }

        let order = self.skill_order(user_id).await?;

        let mut questions = Vec::with_capacity(SESSION_MAX_QUESTIONS);
        for skill_area in order.into_iter().take(SESSION_MAX_QUESTIONS) {
            match self.draw_for_skill(user_id, skill_area).await? {
                Some(slot) => questions.push(slot),
                None => {
                    tracing::warn!(user_id, %skill_area, "No content for skill area, composing without it");
                }
            }
        }

        if questions.is_empty() {
            return Err(AppError::Core(CoreError::NoContentAvailable));
        }

        Ok(PracticeSession {
            session_id: Uuid::new_v4(),
            questions,
            is_premium: decision.is_premium,
        })
    }

    /// Order the skill areas for this session: weakest-first once the user
    /// has enough graded history, a uniform shuffle before that. A failed
    /// aggregate query degrades to the canonical order rather than failing
    /// the session.
    async fn skill_order(&self, user_id: DbId) -> Result<Vec<SkillArea>, AppError> {
        let graded = AttemptRepo::graded_count(self.pool, user_id).await?;

        match SkillOrderStrategy::select(graded, self.practice.min_history_for_ranking) {
            SkillOrderStrategy::UniformShuffle => {
                let mut rng = rand::rng();
                Ok(shuffled_skill_order(&mut rng))
            }
            SkillOrderStrategy::HistoryBased => {
                let rows = match AttemptRepo::skill_score_aggregates(
                    self.pool,
                    user_id,
                    self.practice.ranking_window_days,
                )
                .await
                {
                    Ok(rows) => rows,
                    Err(err) => {
                        tracing::warn!(user_id, error = %err, "Score aggregation failed, using canonical skill order");
                        return Ok(SkillArea::ALL.to_vec());
                    }
                };
                Ok(rank_weak_skills(&parse_aggregates(&rows), SkillArea::ALL.len()))
            }
        }
    }

    /// Draw one question for a skill area, or `None` when the area has no
    /// usable content even after a top-up and the repeat fallback.
    async fn draw_for_skill(
        &self,
        user_id: DbId,
        skill_area: SkillArea,
    ) -> Result<Option<SessionQuestion>, AppError> {
        let question_type = pick_question_type(skill_area);

        let level_row =
            SkillLevelRepo::get_or_create(self.pool, user_id, skill_area, question_type).await?;
        let level = CefrLevel::from_ordinal(level_row.cefr_level).ok_or_else(|| {
            AppError::InternalError(format!(
                "stored cefr_level {} for user {user_id} is outside A1..C2",
                level_row.cefr_level
            ))
        })?;

        let excluded = AttemptRepo::recent_question_ids(
            self.pool,
            user_id,
            skill_area,
            self.practice.exclusion_window_days,
            self.practice.exclusion_max_attempts,
        )
        .await?;

        let mut candidates = self
            .fresh_candidates(skill_area, question_type, level, &excluded)
            .await?;

        if candidates.is_empty() {
            self.top_up(skill_area, question_type, level).await;
            candidates = self
                .fresh_candidates(skill_area, question_type, level, &excluded)
                .await?;
        }

        let mut pool_kind = DrawPool::Fresh;
        if candidates.is_empty() && !excluded.is_empty() {
            candidates = QuestionRepo::draw_candidates(
                self.pool,
                skill_area,
                question_type,
                level,
                &[],
                self.practice.candidate_window,
            )
            .await?;
            pool_kind = DrawPool::Repeat;
        }

        let drawn = {
            let mut rng = rand::rng();
            draw_uniform(&mut rng, &mut candidates)
        };

        Ok(drawn.map(|question| SessionQuestion {
            skill_area,
            repeat: pool_kind == DrawPool::Repeat,
            question,
        }))
    }

    async fn fresh_candidates(
        &self,
        skill_area: SkillArea,
        question_type: QuestionType,
        level: CefrLevel,
        excluded: &[DbId],
    ) -> Result<Vec<Question>, sqlx::Error> {
        QuestionRepo::draw_candidates(
            self.pool,
            skill_area,
            question_type,
            level,
            excluded,
            self.practice.candidate_window,
        )
        .await
    }

    /// Best-effort top-up for an empty key. Failures are logged and the
    /// draw falls through to the repeat pool either way.
    async fn top_up(&self, skill_area: SkillArea, question_type: QuestionType, level: CefrLevel) {
        let manager = InventoryManager::new(self.pool, self.generator);
        let result = manager
            .ensure_inventory(
                skill_area,
                question_type,
                level,
                self.practice.inventory_min_count,
                self.practice.inventory_topup_count,
            )
            .await;

        match result {
            Err(err) => {
                tracing::warn!(%skill_area, %question_type, %level, error = %err, "Inventory top-up failed");
            }
            Ok(report) if !report.errors.is_empty() => {
                tracing::warn!(
                    %skill_area,
                    %question_type,
                    %level,
                    generated = report.generated,
                    failures = report.errors.len(),
                    "Inventory top-up finished with failures",
                );
            }
            Ok(report) if report.generated > 0 => {
                tracing::info!(%skill_area, %question_type, %level, generated = report.generated, "Inventory topped up");
            }
            Ok(_) => {}
        }
    }
}

/// Pick one of the area's exercise formats uniformly at random.
fn pick_question_type(skill_area: SkillArea) -> QuestionType {
    let types = skill_area.question_types();
    let mut rng = rand::rng();
    types[rng.random_range(0..types.len())]
}

/// Parse aggregate rows into ranking input, dropping rows whose skill
/// string the engine does not know.
fn parse_aggregates(rows: &[SkillScoreRow]) -> Vec<SkillAggregate> {
    rows.iter()
        .filter_map(|row| match row.skill_area.parse::<SkillArea>() {
            Ok(skill_area) => Some(SkillAggregate {
                skill_area,
                avg_score: row.avg_score,
                attempt_count: row.attempt_count,
            }),
            Err(_) => {
                tracing::warn!(skill_area = %row.skill_area, "Dropping aggregate row with unknown skill area");
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
